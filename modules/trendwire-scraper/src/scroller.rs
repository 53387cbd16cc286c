//! Incremental scroll-and-extract loop.
//!
//! Runs up to `scroll_count` iterations, each one extracting the currently
//! rendered tweets before scrolling further. The loop ends early when the
//! tweet target is met or the wall-clock budget runs out; a stalled page
//! height escalates to a hard jump plus a "Show more" click.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::filter::TweetCollector;
use crate::traits::{BrowserSession, TWEET_SELECTOR};

/// Per-iteration scroll distance cap, in pixels.
const MAX_SCROLL_STEP: i64 = 1500;
/// Jump used when the page height stalls or stops growing.
const STALL_JUMP: i64 = 2000;

/// Bounds for one scroll run.
#[derive(Debug, Clone)]
pub struct ScrollOptions {
    /// Maximum scroll iterations.
    pub scroll_count: u32,
    /// Base pause between scrolls, in seconds.
    pub scroll_delay: f64,
    /// Stop once this many tweets have been retained.
    pub max_tweets: usize,
    /// Wall-clock budget for the whole loop.
    pub timeout: Duration,
    /// How long to wait for the document to grow after a scroll.
    pub growth_wait: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            scroll_count: 10,
            scroll_delay: 2.0,
            max_tweets: 50,
            timeout: Duration::from_secs(300),
            growth_wait: Duration::from_secs(5),
        }
    }
}

/// Scroll and extract until the target, iteration cap, or timeout is hit.
///
/// Returns `true` when the loop ran to completion (target met or iterations
/// exhausted) and `false` on timeout. Tweets collected before a timeout are
/// kept; a `max_tweets` of zero returns immediately without scrolling.
pub async fn scroll_to_load_tweets(
    session: &dyn BrowserSession,
    opts: &ScrollOptions,
    collector: &mut TweetCollector,
) -> bool {
    let start = Instant::now();
    let mut last_height: i64 = 0;
    let mut consecutive_no_change: u32 = 0;

    for iteration in 0..opts.scroll_count {
        if start.elapsed() > opts.timeout {
            warn!(
                iteration,
                collected = collector.len(),
                "Scroll loop hit its time budget"
            );
            return false;
        }
        if collector.len() >= opts.max_tweets {
            return true;
        }

        let elements = session
            .find_elements(TWEET_SELECTOR)
            .await
            .unwrap_or_default();
        let added = collector.ingest(&elements);
        debug!(
            iteration,
            visible = elements.len(),
            added,
            total = collector.len(),
            "Extracted visible tweets"
        );

        if collector.len() >= opts.max_tweets {
            return true;
        }

        let current_height = session.page_height().await.unwrap_or(0);
        if current_height == last_height {
            consecutive_no_change += 1;
            if consecutive_no_change >= 2 {
                // Loading has stalled: jump hard, then try the inline
                // "Show more" affordance.
                let _ = session.scroll_by(STALL_JUMP).await;
                sleep_secs(opts.scroll_delay).await;
                match session.click_by_text("Show more").await {
                    Ok(true) => {
                        debug!("Clicked 'Show more'");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                    Ok(false) => {}
                    Err(e) => debug!(error = %e, "'Show more' click failed"),
                }
            }
        } else {
            consecutive_no_change = 0;
        }
        last_height = current_height;

        let step = (current_height / 3).min(MAX_SCROLL_STEP);
        let _ = session.scroll_by(step).await;
        sleep_secs(opts.scroll_delay + 0.5).await;

        if !wait_for_growth(session, current_height, opts.growth_wait).await {
            let _ = session.scroll_by(STALL_JUMP).await;
            sleep_secs(opts.scroll_delay).await;
        }
    }

    true
}

/// Poll until the document grows past `previous` or the wait expires.
async fn wait_for_growth(session: &dyn BrowserSession, previous: i64, wait: Duration) -> bool {
    let deadline = Instant::now() + wait;
    while Instant::now() < deadline {
        if session.page_height().await.unwrap_or(0) > previous {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    false
}

async fn sleep_secs(secs: f64) {
    if secs > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }
}
