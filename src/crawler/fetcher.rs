//! Page fetching and rendering
//!
//! This module handles everything that touches the network for a page:
//! - Building the HTTP client with the configured user agent
//! - A plain GET preflight that rejects unreachable pages and HTTP errors
//! - Rendering the page in a browser driven over the W3C WebDriver protocol
//! - Reading back the rendered page source

use crate::config::{Config, UserAgentConfig};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while fetching or rendering a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("WebDriver {action} failed: {message}")]
    WebDriver {
        action: &'static str,
        message: String,
    },
}

/// Source of rendered page HTML
///
/// Implementations are driven one page at a time; a failed page is reported
/// through the returned error and never affects later calls.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    /// Loads `url` and returns the rendered page source
    async fn render(&mut self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Timeout applied to every request
///
/// # Example
///
/// ```no_run
/// use linkwatch::config::UserAgentConfig;
/// use linkwatch::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version
    let user_agent = format!("{}/{}", config.crawler_name, config.crawler_version);

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a GET request to check that the page is reachable
///
/// # Returns
///
/// * `Ok(())` - The page answered with a status below 400
/// * `Err(FetchError)` - Transport failure or HTTP error status
pub async fn preflight(client: &Client, url: &str) -> Result<(), FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status().as_u16();
    if status >= 400 {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    Ok(())
}

/// Capabilities requested when creating a browser session
pub fn browser_capabilities(headless: bool) -> Value {
    let mut args = vec!["--no-sandbox", "--disable-gpu"];
    if headless {
        args.push("--headless");
    }

    json!({
        "capabilities": {
            "alwaysMatch": {
                "browserName": "chrome",
                "goog:chromeOptions": { "args": args }
            }
        }
    })
}

/// A browser session on a WebDriver server
///
/// The session must be released with [`BrowserSession::close`] once the run
/// is over, whether it succeeded or not.
pub struct BrowserSession {
    client: Client,
    endpoint: String,
    session_id: String,
    render_wait: Duration,
}

impl BrowserSession {
    /// Opens a new browser session
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `headless` - Render without a visible browser window
    pub async fn start(config: &Config, headless: bool) -> Result<Self, FetchError> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.browser.request_timeout_secs),
        )
        .map_err(|e| FetchError::WebDriver {
            action: "client setup",
            message: e.to_string(),
        })?;
        let endpoint = config.browser.webdriver_url.trim_end_matches('/').to_string();

        if headless {
            tracing::info!("Running browser as headless");
        }

        let created = send_command(
            "session create",
            client
                .post(format!("{}/session", endpoint))
                .json(&browser_capabilities(headless)),
        )
        .await?;

        let session_id = created
            .pointer("/value/sessionId")
            .or_else(|| created.pointer("/sessionId"))
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::WebDriver {
                action: "session create",
                message: "response is missing sessionId".to_string(),
            })?
            .to_string();

        tracing::debug!("Opened WebDriver session {}", session_id);

        Ok(Self {
            client,
            endpoint,
            session_id,
            render_wait: Duration::from_millis(config.browser.render_wait_ms),
        })
    }

    /// The WebDriver session identifier
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Navigates the browser to `url`
    pub async fn navigate(&self, url: &str) -> Result<(), FetchError> {
        send_command(
            "navigate",
            self.client
                .post(self.session_url("url"))
                .json(&json!({ "url": url })),
        )
        .await?;
        Ok(())
    }

    /// Returns the source of the currently loaded page
    pub async fn page_source(&self) -> Result<String, FetchError> {
        let response = send_command("page source", self.client.get(self.session_url("source"))).await?;

        response
            .pointer("/value")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FetchError::WebDriver {
                action: "page source",
                message: "response value is not a string".to_string(),
            })
    }

    /// Deletes the session, closing the browser
    pub async fn close(self) -> Result<(), FetchError> {
        let url = format!("{}/session/{}", self.endpoint, self.session_id);
        send_command("session delete", self.client.delete(url)).await?;
        tracing::debug!("Closed WebDriver session {}", self.session_id);
        Ok(())
    }

    fn session_url(&self, command: &str) -> String {
        format!("{}/session/{}/{}", self.endpoint, self.session_id, command)
    }
}

impl PageRenderer for BrowserSession {
    async fn render(&mut self, url: &str) -> Result<String, FetchError> {
        preflight(&self.client, url).await?;
        self.navigate(url).await?;
        // Client-side rendering has no reliable completion signal
        tokio::time::sleep(self.render_wait).await;
        self.page_source().await
    }
}

/// Sends a WebDriver command and unwraps protocol-level errors
async fn send_command(action: &'static str, request: RequestBuilder) -> Result<Value, FetchError> {
    let response = request.send().await.map_err(|e| FetchError::WebDriver {
        action,
        message: e.to_string(),
    })?;
    let status = response.status();
    let body: Value = response.json().await.map_err(|e| FetchError::WebDriver {
        action,
        message: format!("HTTP {}: unreadable response: {}", status.as_u16(), e),
    })?;

    if let Some(error) = body.pointer("/value/error").and_then(Value::as_str) {
        let message = body
            .pointer("/value/message")
            .and_then(Value::as_str)
            .unwrap_or("unknown webdriver error");
        return Err(FetchError::WebDriver {
            action,
            message: format!("{}: {}", error, message),
        });
    }

    if !status.is_success() {
        return Err(FetchError::WebDriver {
            action,
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    Ok(body)
}
