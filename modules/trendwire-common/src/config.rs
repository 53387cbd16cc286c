use std::env;

/// Application configuration loaded from environment variables.
///
/// Engagement thresholds are read here once and passed down explicitly;
/// nothing deeper in the call path touches the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum like count for a tweet to be retained.
    pub min_likes: u32,
    /// Minimum retweet count for a tweet to be retained.
    pub min_retweets: u32,
    /// Path to the serialized auth cookie file.
    pub auth_cookie_path: String,
    /// Wall-clock budget for the scroll-and-extract loop, in seconds.
    pub scrape_timeout_secs: u64,
    /// Explicit Chromium binary override.
    pub chrome_executable: Option<String>,
}

impl Config {
    /// Load configuration from environment variables. Every variable has a
    /// default; a present-but-malformed numeric panics with a clear message.
    pub fn from_env() -> Self {
        Self {
            min_likes: parsed_env("MIN_LIKES", 10),
            min_retweets: parsed_env("MIN_RETWEETS", 5),
            auth_cookie_path: env::var("AUTH_COOKIES").unwrap_or_else(|_| "auth.json".to_string()),
            scrape_timeout_secs: parsed_env("SCRAPE_TIMEOUT_SECS", 300),
            chrome_executable: env::var("CHROME_EXECUTABLE").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_likes: 10,
            min_retweets: 5,
            auth_cookie_path: "auth.json".to_string(),
            scrape_timeout_secs: 300,
            chrome_executable: None,
        }
    }
}

fn parsed_env<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number, got {raw:?}")),
        Err(_) => default,
    }
}
