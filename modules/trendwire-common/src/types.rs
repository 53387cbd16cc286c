use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::TrendwireError;

// --- Tweet data model ---

/// A single scraped tweet. Field names match the wire format handed to the
/// calling pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    /// Native status id, or a content-derived synthetic id when the element
    /// carries no native identifier.
    pub id: String,
    pub content: String,
    /// Author handle including the leading `@`.
    pub user: String,
    /// ISO-8601 timestamp as rendered by the page; empty when absent.
    pub timestamp: String,
    pub likes: u32,
    pub retweets: u32,
    pub replies: u32,
    pub has_photos: bool,
    pub photo_urls: Vec<String>,
    pub has_videos: bool,
    pub video_urls: Vec<String>,
}

/// Result of one scrape invocation. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub tweets: Vec<Tweet>,
    pub trend: String,
    pub count: usize,
}

impl ScrapeResult {
    /// Capped result: at most `max_tweets` tweets, count reflecting the cap.
    pub fn capped(trend: &str, mut tweets: Vec<Tweet>, max_tweets: usize) -> Self {
        let count = tweets.len().min(max_tweets);
        tweets.truncate(max_tweets);
        Self {
            tweets,
            trend: trend.to_string(),
            count,
        }
    }

    /// Empty-but-valid payload for a failed run.
    pub fn empty(trend: &str) -> Self {
        Self {
            tweets: Vec::new(),
            trend: trend.to_string(),
            count: 0,
        }
    }
}

/// Structured payload for a failed cookie load. The filename is where a
/// caller may dump diagnostics; it carries a local timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieErrorPayload {
    pub status: String,
    pub error: String,
    pub filename: String,
    pub tweets: Vec<Tweet>,
}

impl CookieErrorPayload {
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            status: "error".to_string(),
            error: error.to_string(),
            filename: format!("error_cookies_{}.json", Local::now().format("%Y%m%d_%H%M%S")),
            tweets: Vec::new(),
        }
    }
}

// --- Auth cookie file ---

/// One cookie entry from `auth.json`. Extra per-cookie fields in the file
/// (path, expiry, flags) are ignored; the session rescopes every cookie to
/// the target domain anyway.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthCookie {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct CookieFile {
    cookies: Vec<AuthCookie>,
}

/// Read and parse the auth cookie file. Absence or malformed content is a
/// credential error; the caller must abort the scrape rather than proceed
/// unauthenticated.
pub fn load_auth_cookies(path: &str) -> Result<Vec<AuthCookie>, TrendwireError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| TrendwireError::Credential(format!("{path}: {e}")))?;
    let file: CookieFile =
        serde_json::from_str(&raw).map_err(|e| TrendwireError::Credential(format!("{path}: {e}")))?;
    tracing::debug!(path, count = file.cookies.len(), "Loaded auth cookies");
    Ok(file.cookies)
}
