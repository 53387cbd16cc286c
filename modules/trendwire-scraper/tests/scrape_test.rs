use std::time::Duration;

use serde_json::Value;

use trendwire_common::Config;
use trendwire_scraper::scrape::{run_with_session, ScrapeRequest};
use trendwire_scraper::testing::{tweet_element, StaticSession};

fn fast_request(trend: &str) -> ScrapeRequest {
    let mut request = ScrapeRequest::new(trend);
    request.scroll_delay = 0.0;
    request.nav_delay_range = (0.0, 0.0);
    request.tweet_wait = Duration::from_millis(100);
    request.tweet_text_wait = Duration::from_millis(100);
    request
}

fn config_with_cookies(dir: &tempfile::TempDir) -> Config {
    let path = dir.path().join("auth.json");
    std::fs::write(
        &path,
        r#"{"cookies": [{"name": "auth_token", "value": "tok"}, {"name": "ct0", "value": "csrf"}]}"#,
    )
    .unwrap();
    Config {
        auth_cookie_path: path.to_str().unwrap().to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn missing_cookie_file_yields_error_payload_and_closes_session() {
    let session = StaticSession::new(Vec::new());
    let config = Config {
        auth_cookie_path: "/nonexistent/auth.json".to_string(),
        ..Config::default()
    };

    let payload = run_with_session(&session, &fast_request("AI"), &config).await;
    let value: Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(value["status"], "error");
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Error loading cookies:"));
    assert!(value["filename"]
        .as_str()
        .unwrap()
        .starts_with("error_cookies_"));
    assert_eq!(value["tweets"].as_array().unwrap().len(), 0);

    assert!(session.is_closed());
    // Nothing was navigated before the credential check failed.
    assert!(session.navigations().is_empty());
}

#[tokio::test]
async fn full_run_authenticates_filters_and_caps() {
    let batch = vec![
        tweet_element(1, "nasa", "launch", 100, 50),
        tweet_element(2, "esa", "orbit", 50, 10),
        tweet_element(3, "jaxa", "probe", 30, 6),
        tweet_element(4, "lowly", "ignored", 2, 0),
    ];
    let session = StaticSession::new(vec![batch]);
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cookies(&dir);

    let mut request = fast_request("#AI");
    request.is_hashtag = true;
    request.max_tweets = 2;

    let payload = run_with_session(&session, &request, &config).await;
    let value: Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(value["trend"], "#AI");
    assert_eq!(value["count"], 2);
    let tweets = value["tweets"].as_array().unwrap();
    assert_eq!(tweets.len(), 2);
    assert_eq!(tweets[0]["id"], "1");
    assert_eq!(tweets[0]["user"], "@nasa");
    assert_eq!(tweets[0]["likes"], 100);
    assert_eq!(tweets[1]["id"], "2");

    // Bootstrap order: home page, cookies scoped to .x.com, refresh, search.
    let navigations = session.navigations();
    assert_eq!(navigations[0], "https://x.com");
    assert!(navigations[1].contains("/search?q=%23AI&"));
    assert_eq!(session.cookies_applied(), 2);
    assert_eq!(session.cookie_domain().unwrap(), ".x.com");
    assert_eq!(session.refresh_count(), 1);
    assert!(session.is_closed());
}

#[tokio::test]
async fn navigation_failure_yields_empty_payload() {
    let session = StaticSession::failing_navigation();
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cookies(&dir);

    let payload = run_with_session(&session, &fast_request("breaking"), &config).await;
    let value: Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(value["trend"], "breaking");
    assert_eq!(value["count"], 0);
    assert_eq!(value["tweets"].as_array().unwrap().len(), 0);
    assert!(session.is_closed());
}

#[tokio::test]
async fn page_without_tweets_yields_empty_payload() {
    let session = StaticSession::new(vec![Vec::new()]);
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cookies(&dir);

    let payload = run_with_session(&session, &fast_request("ghost"), &config).await;
    let value: Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(value["count"], 0);
    assert_eq!(value["tweets"].as_array().unwrap().len(), 0);
    assert!(session.is_closed());
}

#[tokio::test]
async fn zero_tweet_target_short_circuits() {
    let session = StaticSession::new(vec![vec![tweet_element(1, "nasa", "hi", 100, 50)]]);
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_cookies(&dir);

    let mut request = fast_request("AI");
    request.max_tweets = 0;

    let payload = run_with_session(&session, &request, &config).await;
    let value: Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(value["count"], 0);
    assert!(value["tweets"].as_array().unwrap().is_empty());
    assert_eq!(session.scroll_count(), 0);
    assert!(session.is_closed());
}
