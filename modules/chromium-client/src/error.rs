use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChromiumError>;

#[derive(Debug, Error)]
pub enum ChromiumError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Screenshot failed: {0}")]
    Screenshot(String),
}
