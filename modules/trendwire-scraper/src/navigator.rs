//! Navigation primitives with randomized pacing.
//!
//! Every action pauses for a random interval afterwards so the automation
//! cadence is not a fixed beat. Failures are reported as `false` rather
//! than errors; callers decide whether a failed step is fatal.

use std::time::{Duration, Instant};

use rand::Rng;
use tracing::debug;

use crate::traits::BrowserSession;

pub struct PageNavigator<'a> {
    session: &'a dyn BrowserSession,
    delay_range: (f64, f64),
}

impl<'a> PageNavigator<'a> {
    pub fn new(session: &'a dyn BrowserSession) -> Self {
        Self {
            session,
            delay_range: (1.0, 3.0),
        }
    }

    /// Override the post-action delay range, in seconds. Tests pass zeros.
    pub fn with_delay_range(mut self, low: f64, high: f64) -> Self {
        self.delay_range = (low, high);
        self
    }

    pub async fn go_to_url(&self, url: &str) -> bool {
        match self.session.navigate(url).await {
            Ok(()) => {
                debug!(url, "Navigated");
                self.pause().await;
                true
            }
            Err(e) => {
                debug!(url, error = %e, "Navigation failed");
                false
            }
        }
    }

    pub async fn refresh_page(&self) -> bool {
        match self.session.refresh().await {
            Ok(()) => {
                self.pause().await;
                true
            }
            Err(e) => {
                debug!(error = %e, "Refresh failed");
                false
            }
        }
    }

    pub async fn scroll_page(&self, pixels: i64) -> bool {
        match self.session.scroll_by(pixels).await {
            Ok(()) => {
                self.pause().await;
                true
            }
            Err(e) => {
                debug!(pixels, error = %e, "Scroll failed");
                false
            }
        }
    }

    /// Poll until the document reports it has finished loading, or the
    /// budget runs out.
    pub async fn wait_for_page_load(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let ready = self
                .session
                .execute_script("document.readyState")
                .await
                .ok()
                .and_then(|v| v.as_str().map(|s| s == "complete"))
                .unwrap_or(false);
            if ready {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }

    pub async fn current_url(&self) -> Option<String> {
        self.session
            .execute_script("window.location.href")
            .await
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
    }

    async fn pause(&self) {
        let (low, high) = self.delay_range;
        if high <= low {
            return;
        }
        let secs = rand::rng().random_range(low..high);
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticSession;

    #[tokio::test]
    async fn navigation_failure_returns_false() {
        let session = StaticSession::failing_navigation();
        let navigator = PageNavigator::new(&session).with_delay_range(0.0, 0.0);
        assert!(!navigator.go_to_url("https://x.com").await);
    }

    #[tokio::test]
    async fn reports_loaded_page_and_url() {
        let session = StaticSession::new(Vec::new());
        let navigator = PageNavigator::new(&session).with_delay_range(0.0, 0.0);
        assert!(navigator.go_to_url("https://x.com").await);
        assert!(navigator.wait_for_page_load(Duration::from_secs(1)).await);
        assert_eq!(navigator.current_url().await.as_deref(), Some("https://x.com/mock"));
    }

    #[tokio::test]
    async fn scroll_reports_success() {
        let session = StaticSession::new(Vec::new());
        let navigator = PageNavigator::new(&session).with_delay_range(0.0, 0.0);
        assert!(navigator.scroll_page(500).await);
        assert_eq!(session.scroll_log(), vec![500]);
    }
}
