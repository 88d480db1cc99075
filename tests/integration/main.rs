//! Integration tests for Linkwatch
//!
//! These tests use wiremock to stand in for both the monitored web site and
//! the WebDriver server, and run complete monitoring passes end-to-end.

mod monitor_tests;
mod report_tests;

use linkwatch::config::Config;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SESSION_ID: &str = "abc";

/// Creates a test configuration pointing at the mock WebDriver server
pub fn create_test_config(webdriver_url: &str) -> Config {
    let mut config = Config::default();
    config.browser.webdriver_url = webdriver_url.to_string();
    config.browser.render_wait_ms = 0;
    config.browser.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();
    config
}

/// Mounts a WebDriver server that renders every page as `source`
///
/// The session must be deleted exactly `expected_closes` times.
pub async fn mount_webdriver(driver: &MockServer, source: &str, expected_closes: u64) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": { "sessionId": SESSION_ID, "capabilities": {} }
        })))
        .mount(driver)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/session/{}/url", SESSION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .mount(driver)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/session/{}/source", SESSION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": source })))
        .mount(driver)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/session/{}", SESSION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": null })))
        .expect(expected_closes)
        .mount(driver)
        .await;
}

/// Mounts a page on the mock site answering the preflight GET
pub async fn mount_page(site: &MockServer, page_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string("<html><body></body></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(site)
        .await;
}
