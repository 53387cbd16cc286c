//! Chromium session client.
//!
//! Owns a headless (or headed) Chromium process via `chromiumoxide`, applies
//! an anti-fingerprinting profile, and exposes the small set of primitives
//! the scraping engine needs: navigate, evaluate, screenshot, cookies, close.

pub mod devices;
pub mod error;

pub use devices::DeviceProfile;
pub use error::{ChromiumError, Result};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Script registered on every new document. Overrides the navigator
/// properties automation detectors probe first.
const FINGERPRINT_OVERRIDES: &str = r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => undefined
    });
    Object.defineProperty(navigator, 'plugins', {
        get: () => [1, 2, 3, 4, 5]
    });
    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en']
    });
"#;

/// A name/value cookie applied to the session at bootstrap.
#[derive(Debug, Clone)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

/// Options for launching a session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub headless: bool,
    pub device: DeviceProfile,
    /// Explicit Chromium binary. Falls back to chromiumoxide's own discovery.
    pub chrome_executable: Option<String>,
}

/// An authenticated browser-automation handle. Created once per scrape run
/// and closed unconditionally at the end of the run.
pub struct ChromiumSession {
    browser: Mutex<Option<Browser>>,
    handler_task: Mutex<Option<JoinHandle<()>>>,
    page: Page,
}

impl ChromiumSession {
    /// Launch a Chromium process with the anti-detection profile for the
    /// given device and open a blank page.
    pub async fn launch(opts: &SessionOptions) -> Result<Self> {
        let (width, height) = opts.device.window_size();
        let user_agent = opts.device.pick_user_agent();

        let mut builder = BrowserConfig::builder()
            .viewport(opts.device.viewport())
            .window_size(width, height)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-web-security")
            .arg("--allow-running-insecure-content")
            .arg("--disable-popup-blocking")
            .arg("--ignore-certificate-errors")
            .arg("--disable-translate")
            .arg("--disable-notifications")
            .arg("--disable-default-apps")
            .arg("--disable-features=SameSiteByDefaultCookies,CookiesWithoutSameSiteMustBeSecure")
            .arg(format!("--window-size={width},{height}"))
            .arg(format!("--user-agent={user_agent}"));

        if !opts.headless {
            builder = builder.with_head();
        }
        if let Some(ref exe) = opts.chrome_executable {
            builder = builder.chrome_executable(exe);
        }

        let config = builder.build().map_err(ChromiumError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ChromiumError::Launch(e.to_string()))?;

        // Drain CDP events for the lifetime of the session; the stream ends
        // when Chromium disconnects.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "CDP handler event error");
                }
            }
            debug!("CDP event handler ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ChromiumError::Launch(e.to_string()))?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            FINGERPRINT_OVERRIDES,
        ))
        .await
        .map_err(|e| ChromiumError::Launch(format!("Failed to inject fingerprint overrides: {e}")))?;

        info!(device = %opts.device, headless = opts.headless, user_agent, "Chromium session ready");

        Ok(Self {
            browser: Mutex::new(Some(browser)),
            handler_task: Mutex::new(Some(handler_task)),
            page,
        })
    }

    /// Navigate the session page to a URL and wait for the load to settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(url, "Navigating");
        self.page
            .goto(url)
            .await
            .map_err(|e| ChromiumError::Navigation(e.to_string()))?;
        Ok(())
    }

    /// Reload the current page.
    pub async fn reload(&self) -> Result<()> {
        self.page
            .reload()
            .await
            .map_err(|e| ChromiumError::Navigation(e.to_string()))?;
        Ok(())
    }

    /// Evaluate JavaScript in the page. Scripts returning `undefined` yield
    /// `Value::Null`.
    pub async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| ChromiumError::Script(e.to_string()))?;
        Ok(result
            .into_value::<serde_json::Value>()
            .unwrap_or(serde_json::Value::Null))
    }

    /// URL the page is currently on, if any.
    pub async fn current_url(&self) -> Option<String> {
        self.page.url().await.ok().flatten()
    }

    /// Apply cookies to the active session scoped to `domain`. A single
    /// failing cookie is logged and skipped; the rest are still applied.
    pub async fn add_cookies(&self, cookies: &[Cookie], domain: &str) {
        for cookie in cookies {
            let param = match CookieParam::builder()
                .name(&cookie.name)
                .value(&cookie.value)
                .domain(domain)
                .path("/")
                .build()
            {
                Ok(param) => param,
                Err(e) => {
                    warn!(cookie = cookie.name.as_str(), error = %e, "Skipping malformed cookie");
                    continue;
                }
            };
            if let Err(e) = self.page.set_cookie(param).await {
                warn!(cookie = cookie.name.as_str(), error = %e, "Failed to apply cookie");
            }
        }
        debug!(count = cookies.len(), domain, "Cookies applied");
    }

    /// Capture a PNG screenshot of the current viewport.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.page
            .screenshot(ScreenshotParams::builder().build())
            .await
            .map_err(|e| ChromiumError::Screenshot(e.to_string()))
    }

    /// Terminate the browser process. Idempotent; later calls are no-ops.
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.browser.lock().await;
        let Some(mut browser) = guard.take() else {
            debug!("Session already closed");
            return Ok(());
        };
        if let Err(e) = browser.close().await {
            warn!(error = %e, "Browser close error (non-fatal)");
        }
        if let Some(task) = self.handler_task.lock().await.take() {
            task.abort();
        }
        info!("Chromium session closed");
        Ok(())
    }
}
