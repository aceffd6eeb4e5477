use std::io;

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("invalid url")]
    InvalidUrl,
    #[error("text too short: minimum {0} characters")]
    TextTooShort(usize),
    #[error("text too long: maximum {0} characters")]
    TextTooLong(usize),
    #[error("upstream rate limited")]
    UpstreamRateLimited,
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("db error: {0}")]
    Db(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            EngineError::UpstreamUnreachable(err.to_string())
        } else {
            EngineError::UpstreamUnavailable(err.to_string())
        }
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(err: rusqlite::Error) -> Self {
        EngineError::Db(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Db(err.to_string())
    }
}
