use url::Url;

/// Extracts the network location of a configured page URL
///
/// The result is used as the domain of every link found on the page, so it
/// must match the domains stored in earlier snapshots byte for byte. The
/// authority is therefore returned exactly as written: letter case,
/// userinfo and any explicit port (default or not) are kept. A string that
/// is not an absolute URL with an authority yields an empty domain instead
/// of an error, so a malformed row never aborts a run.
///
/// # Arguments
///
/// * `site` - The page URL as written in the URL list
///
/// # Examples
///
/// ```
/// use linkwatch::url::site_domain;
///
/// assert_eq!(site_domain("https://www.google.com/path?arg=val"), "www.google.com");
/// assert_eq!(site_domain("https://Example.com:443/"), "Example.com:443");
/// assert_eq!(site_domain("not a url"), "");
/// ```
pub fn site_domain(site: &str) -> String {
    let site = site.trim();
    let Ok(url) = Url::parse(site) else {
        return String::new();
    };
    if !url.has_authority() {
        return String::new();
    }

    let Some((_, rest)) = site.split_once("//") else {
        return String::new();
    };
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    rest[..end].to_string()
}
