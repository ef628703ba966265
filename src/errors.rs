use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchdeckError>;

#[derive(Error, Debug)]
pub enum MatchdeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unexpected HTTP status {status} from {url}")]
    Http { status: u16, url: String },
    #[error("Parsing error")]
    Parse,
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Photo payload error: {0}")]
    Photo(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for MatchdeckError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}

impl From<toml::de::Error> for MatchdeckError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<base64::DecodeError> for MatchdeckError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Photo(e.to_string())
    }
}
