use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session create failed: {0}")]
    CreateFailed(String),

    #[error("scrollback fetch failed: {0}")]
    BufferFailed(String),

    #[error("no session {0}")]
    NotFound(String),

    #[error("pty error: {0}")]
    Pty(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("port check failed: {0}")]
    PortCheck(String),

    #[error("probe error: {0}")]
    Probe(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TermdockError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
