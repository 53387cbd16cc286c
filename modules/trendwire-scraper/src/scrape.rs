//! Top-level scrape routine.
//!
//! Bootstraps an authenticated session, navigates to the trend's search
//! results, runs the scroll loop, and serializes the outcome. Callers never
//! see an error: every failure mode degrades to a well-formed JSON payload,
//! and the session is closed on every exit path.

use std::time::{Duration, Instant};

use chromium_client::{ChromiumSession, DeviceProfile, SessionOptions};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use trendwire_common::{
    load_auth_cookies, Config, CookieErrorPayload, ScrapeResult, TrendwireError,
};

use crate::filter::{EngagementThresholds, TweetCollector};
use crate::navigator::PageNavigator;
use crate::scroller::{scroll_to_load_tweets, ScrollOptions};
use crate::traits::{BrowserSession, TWEET_SELECTOR, TWEET_TEXT_SELECTOR};

const X_HOME: &str = "https://x.com";
const COOKIE_DOMAIN: &str = ".x.com";
/// Aggressive post-loop scroll rounds when still under the tweet target.
const EXTRA_SCROLL_ROUNDS: u32 = 3;
const EXTRA_SCROLL_JUMP: i64 = 3000;
const EXTRA_SCROLL_PAUSE: Duration = Duration::from_secs(2);

/// Inputs for one scrape invocation.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    /// Trend name or hashtag to search for.
    pub trend: String,
    /// Whether `trend` is a hashtag (encoded as `%23name` in the query).
    pub is_hashtag: bool,
    pub headless: bool,
    pub device: DeviceProfile,
    pub scroll_count: u32,
    pub scroll_delay: f64,
    pub max_tweets: usize,
    /// Budget for the first tweet element to appear after navigation.
    pub tweet_wait: Duration,
    /// Additional budget for rendered tweet text.
    pub tweet_text_wait: Duration,
    /// Randomized pause range after each navigation action, in seconds.
    pub nav_delay_range: (f64, f64),
}

impl ScrapeRequest {
    pub fn new(trend: impl Into<String>) -> Self {
        Self {
            trend: trend.into(),
            is_hashtag: false,
            headless: true,
            device: DeviceProfile::default(),
            scroll_count: 10,
            scroll_delay: 2.0,
            max_tweets: 50,
            tweet_wait: Duration::from_secs(30),
            tweet_text_wait: Duration::from_secs(10),
            nav_delay_range: (1.0, 3.0),
        }
    }
}

/// Run a full scrape against a fresh Chromium session.
pub async fn run(request: &ScrapeRequest, config: &Config) -> String {
    let options = SessionOptions {
        headless: request.headless,
        device: request.device,
        chrome_executable: config.chrome_executable.clone(),
    };
    let session = match ChromiumSession::launch(&options).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Failed to launch browser session");
            return serialize(&ScrapeResult::empty(&request.trend));
        }
    };
    run_with_session(&session, request, config).await
}

/// Run a scrape through an existing session. The session is closed before
/// this returns, on success and on failure alike.
pub async fn run_with_session(
    session: &dyn BrowserSession,
    request: &ScrapeRequest,
    config: &Config,
) -> String {
    let outcome = scrape_trend(session, request, config).await;

    if let Err(ref e) = outcome {
        if !matches!(e, TrendwireError::Credential(_)) {
            save_failure_screenshot(session).await;
        }
    }
    if let Err(e) = session.close().await {
        warn!(error = %e, "Session close failed");
    }

    match outcome {
        Ok(result) => {
            info!(
                trend = request.trend.as_str(),
                count = result.count,
                "Scrape complete"
            );
            serialize(&result)
        }
        Err(e @ TrendwireError::Credential(_)) => {
            warn!(error = %e, "Cookie load failed, aborting scrape");
            serialize(&CookieErrorPayload::new(e))
        }
        Err(e) => {
            error!(trend = request.trend.as_str(), error = %e, "Scrape failed");
            serialize(&ScrapeResult::empty(&request.trend))
        }
    }
}

async fn scrape_trend(
    session: &dyn BrowserSession,
    request: &ScrapeRequest,
    config: &Config,
) -> Result<ScrapeResult, TrendwireError> {
    let cookies = load_auth_cookies(&config.auth_cookie_path)?;
    let (delay_low, delay_high) = request.nav_delay_range;
    let navigator = PageNavigator::new(session).with_delay_range(delay_low, delay_high);

    // Cookies must be set from the target origin, so land on the home page
    // first, inject, then refresh to pick up the authenticated state.
    if !navigator.go_to_url(X_HOME).await {
        return Err(TrendwireError::Navigation(format!(
            "initial load of {X_HOME} failed"
        )));
    }
    session
        .add_cookies(&cookies, COOKIE_DOMAIN)
        .await
        .map_err(|e| TrendwireError::Session(e.to_string()))?;
    navigator.refresh_page().await;

    let url = search_url(&request.trend, request.is_hashtag);
    info!(trend = request.trend.as_str(), url = url.as_str(), "Opening trend search");
    if !navigator.go_to_url(&url).await {
        return Err(TrendwireError::Navigation(format!(
            "trend page load failed: {url}"
        )));
    }
    if !navigator.wait_for_page_load(Duration::from_secs(10)).await {
        debug!("Document never reported complete, proceeding anyway");
    }

    wait_for_tweets(session, request).await?;

    let mut collector = TweetCollector::new(EngagementThresholds::from_config(config));
    let opts = ScrollOptions {
        scroll_count: request.scroll_count,
        scroll_delay: request.scroll_delay,
        max_tweets: request.max_tweets,
        timeout: Duration::from_secs(config.scrape_timeout_secs),
        ..ScrollOptions::default()
    };
    let completed = scroll_to_load_tweets(session, &opts, &mut collector).await;
    if !completed {
        warn!(
            collected = collector.len(),
            "Scroll loop timed out, keeping what was collected"
        );
    }

    if completed && collector.len() < request.max_tweets {
        aggressive_scrolls(session, &mut collector).await;
    }

    Ok(ScrapeResult::capped(
        &request.trend,
        collector.into_tweets(),
        request.max_tweets,
    ))
}

/// Search URL for a trend. Hashtags keep their literal `#` as `%23`; plain
/// trends are percent-encoded wholesale.
fn search_url(trend: &str, is_hashtag: bool) -> String {
    let query = if is_hashtag {
        format!("%23{}", trend.trim_start_matches('#'))
    } else {
        urlencoding::encode(trend).into_owned()
    };
    format!("{X_HOME}/search?q={query}&src=trend_click&vertical=trends")
}

/// Wait for the results page to show tweet elements and rendered text.
async fn wait_for_tweets(
    session: &dyn BrowserSession,
    request: &ScrapeRequest,
) -> Result<(), TrendwireError> {
    if !poll_for(session, TWEET_SELECTOR, request.tweet_wait).await {
        return Err(TrendwireError::TweetsNeverLoaded(
            "no tweet elements appeared".to_string(),
        ));
    }
    if !poll_for(session, TWEET_TEXT_SELECTOR, request.tweet_text_wait).await {
        return Err(TrendwireError::TweetsNeverLoaded(
            "tweet text never rendered".to_string(),
        ));
    }
    Ok(())
}

async fn poll_for(session: &dyn BrowserSession, selector: &str, budget: Duration) -> bool {
    let deadline = Instant::now() + budget;
    loop {
        if let Ok(elements) = session.find_elements(selector).await {
            if !elements.is_empty() {
                return true;
            }
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
}

/// Final hard scrolls for runs that came up short. Each round jumps well
/// past the viewport, re-extracts, and falls back to "Show more" when
/// nothing new rendered.
async fn aggressive_scrolls(session: &dyn BrowserSession, collector: &mut TweetCollector) {
    for round in 0..EXTRA_SCROLL_ROUNDS {
        let _ = session.scroll_by(EXTRA_SCROLL_JUMP).await;
        tokio::time::sleep(EXTRA_SCROLL_PAUSE).await;

        let elements = session
            .find_elements(TWEET_SELECTOR)
            .await
            .unwrap_or_default();
        let added = collector.ingest(&elements);
        debug!(round, added, total = collector.len(), "Aggressive scroll round");

        if added == 0 {
            if let Ok(true) = session.click_by_text("Show more").await {
                tokio::time::sleep(EXTRA_SCROLL_PAUSE).await;
            }
        }
    }
}

/// Best-effort screenshot for post-mortems on failed runs.
async fn save_failure_screenshot(session: &dyn BrowserSession) {
    match session.screenshot().await {
        Ok(bytes) if !bytes.is_empty() => {
            let path = format!(
                "error_screenshot_{}.png",
                chrono::Local::now().format("%Y%m%d_%H%M%S")
            );
            match std::fs::write(&path, bytes) {
                Ok(()) => info!(path = path.as_str(), "Saved failure screenshot"),
                Err(e) => debug!(error = %e, "Could not write failure screenshot"),
            }
        }
        Ok(_) => {}
        Err(e) => debug!(error = %e, "Screenshot unavailable"),
    }
}

fn serialize<T: Serialize>(payload: &T) -> String {
    serde_json::to_string(payload).unwrap_or_else(|e| {
        error!(error = %e, "Payload serialization failed");
        r#"{"tweets": []}"#.to_string()
    })
}
