//! Deterministic in-memory session for tests. No browser, no network.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use trendwire_common::AuthCookie;

use crate::traits::{BrowserSession, TWEET_SELECTOR, TWEET_TEXT_SELECTOR};

/// A scripted page. `batches[i]` is the set of tweet elements visible after
/// `i` scroll actions (clamped to the last batch), which models how a feed
/// accumulates content as the page scrolls. All interactions are recorded
/// for assertions.
pub struct StaticSession {
    batches: Vec<Vec<String>>,
    heights: Vec<i64>,
    tweet_text_visible: bool,
    show_more_succeeds: bool,
    fail_navigation: bool,
    scrolls: AtomicUsize,
    scroll_log: Mutex<Vec<i64>>,
    show_more_clicks: AtomicUsize,
    closed: AtomicBool,
    navigations: Mutex<Vec<String>>,
    refreshes: AtomicUsize,
    cookies_applied: AtomicUsize,
    cookie_domain: Mutex<Option<String>>,
}

impl StaticSession {
    pub fn new(batches: Vec<Vec<String>>) -> Self {
        Self {
            batches,
            heights: Vec::new(),
            tweet_text_visible: true,
            show_more_succeeds: false,
            fail_navigation: false,
            scrolls: AtomicUsize::new(0),
            scroll_log: Mutex::new(Vec::new()),
            show_more_clicks: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            navigations: Mutex::new(Vec::new()),
            refreshes: AtomicUsize::new(0),
            cookies_applied: AtomicUsize::new(0),
            cookie_domain: Mutex::new(None),
        }
    }

    /// Page heights by scroll position. Without this the page grows by a
    /// fixed amount per scroll.
    pub fn with_heights(mut self, heights: Vec<i64>) -> Self {
        self.heights = heights;
        self
    }

    pub fn with_tweet_text_visible(mut self, visible: bool) -> Self {
        self.tweet_text_visible = visible;
        self
    }

    pub fn with_show_more(mut self, succeeds: bool) -> Self {
        self.show_more_succeeds = succeeds;
        self
    }

    /// A session whose every navigation fails.
    pub fn failing_navigation() -> Self {
        let mut session = Self::new(Vec::new());
        session.fail_navigation = true;
        session
    }

    // --- recorded-interaction accessors ---

    pub fn scroll_count(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn scroll_log(&self) -> Vec<i64> {
        self.scroll_log.lock().unwrap().clone()
    }

    pub fn show_more_clicks(&self) -> usize {
        self.show_more_clicks.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn cookies_applied(&self) -> usize {
        self.cookies_applied.load(Ordering::SeqCst)
    }

    pub fn cookie_domain(&self) -> Option<String> {
        self.cookie_domain.lock().unwrap().clone()
    }

    fn current_batch(&self) -> Vec<String> {
        if self.batches.is_empty() {
            return Vec::new();
        }
        let index = self.scrolls.load(Ordering::SeqCst).min(self.batches.len() - 1);
        self.batches[index].clone()
    }
}

#[async_trait]
impl BrowserSession for StaticSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        if self.fail_navigation {
            bail!("navigation refused: {url}");
        }
        self.navigations.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<Value> {
        if script.contains("readyState") {
            return Ok(json!("complete"));
        }
        if script.contains("location.href") {
            return Ok(json!("https://x.com/mock"));
        }
        Ok(Value::Null)
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<String>> {
        if selector == TWEET_SELECTOR {
            return Ok(self.current_batch());
        }
        if selector == TWEET_TEXT_SELECTOR {
            if self.tweet_text_visible && !self.current_batch().is_empty() {
                return Ok(vec!["<span>rendered</span>".to_string()]);
            }
            return Ok(Vec::new());
        }
        Ok(Vec::new())
    }

    async fn add_cookies(&self, cookies: &[AuthCookie], domain: &str) -> Result<()> {
        self.cookies_applied.fetch_add(cookies.len(), Ordering::SeqCst);
        *self.cookie_domain.lock().unwrap() = Some(domain.to_string());
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn page_height(&self) -> Result<i64> {
        let scrolls = self.scrolls.load(Ordering::SeqCst);
        if self.heights.is_empty() {
            return Ok(1000 * (scrolls as i64 + 1));
        }
        Ok(self.heights[scrolls.min(self.heights.len() - 1)])
    }

    async fn scroll_by(&self, pixels: i64) -> Result<()> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        self.scroll_log.lock().unwrap().push(pixels);
        Ok(())
    }

    async fn click_by_text(&self, _text: &str) -> Result<bool> {
        self.show_more_clicks.fetch_add(1, Ordering::SeqCst);
        Ok(self.show_more_succeeds)
    }
}

/// Minimal but realistic tweet element markup for fixtures.
pub fn tweet_element(id: u64, user: &str, text: &str, likes: u32, retweets: u32) -> String {
    format!(
        r#"<article data-testid="tweet">
            <div data-testid="User-Name"><a role="link" href="/{user}"><span>{user}</span></a></div>
            <a href="/{user}/status/{id}"><time datetime="2026-08-25T12:00:00.000Z">1h</time></a>
            <div data-testid="tweetText"><span>{text}</span></div>
            <button data-testid="reply"><span>3</span></button>
            <button data-testid="retweet"><span>{retweets}</span></button>
            <button data-testid="like"><span>{likes}</span></button>
        </article>"#
    )
}
