//! Capability seam over the browser-automation layer.
//!
//! [`BrowserSession`] is the only surface the navigator, scroller, and
//! scrape routine touch. Elements are exchanged as outer-HTML snapshots so
//! extraction stays pure and testable without a live browser; the helpers
//! with default bodies are plain script compositions any driver gets for
//! free.

use anyhow::Result;
use async_trait::async_trait;
use chromium_client::{ChromiumSession, Cookie};
use trendwire_common::AuthCookie;

/// Selector for a rendered tweet element.
pub const TWEET_SELECTOR: &str = r#"[data-testid="tweet"]"#;
/// Selector for the text body inside a tweet element.
pub const TWEET_TEXT_SELECTOR: &str = r#"[data-testid="tweetText"]"#;

#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn refresh(&self) -> Result<()>;

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value>;

    /// Outer-HTML snapshots of every element matching `selector`, in DOM
    /// order.
    async fn find_elements(&self, selector: &str) -> Result<Vec<String>>;

    /// Apply session cookies scoped to `domain`.
    async fn add_cookies(&self, cookies: &[AuthCookie], domain: &str) -> Result<()>;

    async fn screenshot(&self) -> Result<Vec<u8>>;

    async fn close(&self) -> Result<()>;

    /// Current document height in pixels.
    async fn page_height(&self) -> Result<i64> {
        let value = self.execute_script("document.body.scrollHeight").await?;
        Ok(value.as_i64().unwrap_or(0))
    }

    /// Scroll the window down by `pixels`.
    async fn scroll_by(&self, pixels: i64) -> Result<()> {
        self.execute_script(&format!("window.scrollBy(0, {pixels});"))
            .await?;
        Ok(())
    }

    /// Click the first span whose text contains `text`. Returns whether
    /// anything was clicked.
    async fn click_by_text(&self, text: &str) -> Result<bool> {
        let script = format!(
            r#"(() => {{
                const el = Array.from(document.querySelectorAll('span'))
                    .find(s => s.textContent.includes({text:?}));
                if (!el) return false;
                el.click();
                return true;
            }})()"#
        );
        Ok(self
            .execute_script(&script)
            .await?
            .as_bool()
            .unwrap_or(false))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        Ok(self.goto(url).await?)
    }

    async fn refresh(&self) -> Result<()> {
        Ok(self.reload().await?)
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        Ok(self.evaluate(script).await?)
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<String>> {
        let script = format!(
            "Array.from(document.querySelectorAll({selector:?})).map(el => el.outerHTML)"
        );
        let value = self.evaluate(&script).await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    async fn add_cookies(&self, cookies: &[AuthCookie], domain: &str) -> Result<()> {
        let pairs: Vec<Cookie> = cookies
            .iter()
            .map(|c| Cookie {
                name: c.name.clone(),
                value: c.value.clone(),
            })
            .collect();
        ChromiumSession::add_cookies(self, &pairs, domain).await;
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(ChromiumSession::screenshot(self).await?)
    }

    async fn close(&self) -> Result<()> {
        Ok(ChromiumSession::close(self).await?)
    }
}
