use crate::{create_test_config, mount_page, mount_webdriver};
use chrono::NaiveDate;
use linkwatch::crawler::monitor;
use linkwatch::links::FailureReason;
use linkwatch::storage::{load_snapshot, CsvReportWriter, RunContext, UrlRow};
use linkwatch::LinkwatchError;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RENDERED_PAGE: &str = r#"<html><body>
<nav><a href="/home">Home</a></nav>
<main>
  <a href="/about" class="link">About
     Us</a>
  <a href="https://other.example/x">External</a>
</main>
</body></html>"#;

fn run_context(dir: &std::path::Path, second: u32) -> RunContext {
    let time = NaiveDate::from_ymd_opt(2024, 3, 9)
        .unwrap()
        .and_hms_opt(12, 30, second)
        .unwrap();
    RunContext::at(time, dir)
}

fn row(url: String, include_nav_links: bool) -> UrlRow {
    UrlRow {
        url,
        label: "Partner".to_string(),
        include_nav_links,
    }
}

fn read(path: std::path::PathBuf) -> String {
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

#[tokio::test]
async fn test_full_monitoring_pass() {
    let site = MockServer::start().await;
    let driver = MockServer::start().await;
    mount_webdriver(&driver, RENDERED_PAGE, 1).await;
    mount_page(&site, "/", 200).await;
    mount_page(&site, "/missing", 404).await;

    let base_url = site.uri();
    let domain = base_url.trim_start_matches("http://").to_string();
    let output = TempDir::new().unwrap();
    let writer = CsvReportWriter::new(run_context(output.path(), 0));
    let config = create_test_config(&driver.uri());
    let urls = vec![
        row(format!("{}/", base_url), false),
        row(format!("{}/missing", base_url), false),
    ];

    let summary = monitor(&config, true, &writer, &urls, None)
        .await
        .expect("Monitoring pass failed");

    assert_eq!(summary.pages_attempted, 2);
    assert_eq!(
        summary.failures_by_reason,
        vec![(FailureReason::UrlNavigation, 1)]
    );
    assert_eq!(summary.links_extracted, 2);
    assert_eq!(summary.new_links, 2);
    assert_eq!(summary.text_changes, 0);
    assert_eq!(summary.snapshot_size, 2);

    let context = writer.context();
    assert_eq!(
        read(context.output_path("failed")),
        format!("failure_reason,url\nURL navigation,{}/missing\n", base_url)
    );
    assert_eq!(
        read(context.output_path("all_links")),
        format!(
            "url,label,domain,link,full_link,link_text,link_class_name\n\
             {base}/,Partner,{domain},/about,{base}/about,about us,link\n\
             {base}/,Partner,{domain},https://other.example/x,https://other.example/x,external,\n",
            base = base_url,
            domain = domain
        )
    );

    let changes = read(context.output_path("new_links"));
    let mut lines = changes.lines();
    assert_eq!(
        lines.next(),
        Some("url,label,domain,link,full_link,link_text,link_class_name,defined_change")
    );
    assert!(lines.all(|line| line.ends_with(",new link")));
}

#[tokio::test]
async fn test_second_pass_reports_text_change() {
    let site = MockServer::start().await;
    let driver = MockServer::start().await;
    mount_webdriver(&driver, RENDERED_PAGE, 2).await;
    mount_page(&site, "/", 200).await;

    let output = TempDir::new().unwrap();
    let config = create_test_config(&driver.uri());
    let urls = vec![row(format!("{}/", site.uri()), false)];

    let first = CsvReportWriter::new(run_context(output.path(), 0));
    monitor(&config, true, &first, &urls, None).await.unwrap();

    let mut snapshot = load_snapshot(Some(first.context().output_path("all_links").as_path()))
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.len(), 2);
    snapshot[0].link_text = "about".to_string();

    let second = CsvReportWriter::new(run_context(output.path(), 1));
    let summary = monitor(&config, true, &second, &urls, Some(&snapshot))
        .await
        .unwrap();

    assert_eq!(summary.new_links, 0);
    assert_eq!(summary.text_changes, 1);
    assert_eq!(summary.snapshot_size, 2);

    let updated = load_snapshot(Some(second.context().output_path("all_links").as_path()))
        .unwrap()
        .unwrap();
    assert_eq!(updated[0].link_text, "about us");

    let changes = read(second.context().output_path("new_links"));
    assert_eq!(changes.lines().count(), 2);
    assert!(changes.contains(",about us,link,text change"));
}

#[tokio::test]
async fn test_nav_links_included_when_requested() {
    let site = MockServer::start().await;
    let driver = MockServer::start().await;
    mount_webdriver(&driver, RENDERED_PAGE, 1).await;
    mount_page(&site, "/", 200).await;

    let output = TempDir::new().unwrap();
    let writer = CsvReportWriter::new(run_context(output.path(), 0));
    let config = create_test_config(&driver.uri());
    let urls = vec![row(format!("{}/", site.uri()), true)];

    let summary = monitor(&config, false, &writer, &urls, None).await.unwrap();

    assert_eq!(summary.links_extracted, 3);
    assert!(read(writer.context().output_path("all_links")).contains(",/home,"));
}

#[tokio::test]
async fn test_empty_url_list_keeps_snapshot() {
    let driver = MockServer::start().await;
    mount_webdriver(&driver, RENDERED_PAGE, 1).await;

    let output = TempDir::new().unwrap();
    let writer = CsvReportWriter::new(run_context(output.path(), 0));
    let config = create_test_config(&driver.uri());
    let snapshot = vec![linkwatch::LinkRecord {
        domain: "www.website.com".to_string(),
        full_link: "https://www.website.com/a".to_string(),
        link_text: "a".to_string(),
        ..Default::default()
    }];

    let summary = monitor(&config, true, &writer, &[], Some(&snapshot))
        .await
        .unwrap();

    assert_eq!(summary.pages_attempted, 0);
    assert_eq!(summary.snapshot_size, 1);
    assert_eq!(
        read(writer.context().output_path("failed")),
        "failure_reason,url\n"
    );
    assert_eq!(
        read(writer.context().output_path("new_links")).lines().count(),
        1
    );
    assert_eq!(
        load_snapshot(Some(writer.context().output_path("all_links").as_path()))
            .unwrap()
            .unwrap(),
        snapshot
    );
}

#[tokio::test]
async fn test_session_failure_aborts_before_writing() {
    let driver = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "value": { "error": "session not created", "message": "no chrome binary" }
        })))
        .mount(&driver)
        .await;

    let output = TempDir::new().unwrap();
    let report_dir = output.path().join("reports");
    let writer = CsvReportWriter::new(run_context(&report_dir, 0));
    let config = create_test_config(&driver.uri());
    let urls = vec![row("https://www.website.com/".to_string(), false)];

    let result = monitor(&config, true, &writer, &urls, None).await;

    match result {
        Err(LinkwatchError::Browser(e)) => {
            assert!(e.to_string().contains("session not created"));
        }
        other => panic!("Expected browser error, got {:?}", other),
    }
    assert!(!report_dir.exists());
}

#[tokio::test]
async fn test_session_closed_when_writing_fails() {
    let site = MockServer::start().await;
    let driver = MockServer::start().await;
    mount_webdriver(&driver, RENDERED_PAGE, 1).await;
    mount_page(&site, "/", 200).await;

    // A regular file where the output directory should be
    let output = TempDir::new().unwrap();
    let blocker = output.path().join("reports");
    std::fs::write(&blocker, "not a directory").unwrap();

    let writer = CsvReportWriter::new(run_context(&blocker, 0));
    let config = create_test_config(&driver.uri());
    let urls = vec![row(format!("{}/", site.uri()), false)];

    let result = monitor(&config, true, &writer, &urls, None).await;

    assert!(matches!(result, Err(LinkwatchError::Storage(_))));
}
