use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendwireError {
    /// Missing or unparsable auth cookie file. Fatal for the run.
    #[error("Error loading cookies: {0}")]
    Credential(String),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("Session error: {0}")]
    Session(String),

    /// The page never reached a tweet-bearing state within the wait window.
    #[error("Timed out waiting for tweets: {0}")]
    TweetsNeverLoaded(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
