use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpamScreenError {
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("Network not supported: {0}")]
    UnsupportedNetwork(String),

    #[error("Query error: {0}")]
    Query(String),
}

impl SpamScreenError {
    /// Fetch-side failures can be retried on a later cycle;
    /// caller mistakes cannot.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SpamScreenError::HttpStatus { .. } => true,
            SpamScreenError::Transport { .. } => true,
            SpamScreenError::UnsupportedNetwork(_) => false,
            SpamScreenError::Query(_) => false,
        }
    }
}

pub type SpamScreenResult<T> = Result<T, SpamScreenError>;
