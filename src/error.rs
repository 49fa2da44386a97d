use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid stack identifier: {message}")]
    InvalidIdentifier { message: String },

    #[error("no Pulumi access token configured (set PULUMI_ACCESS_TOKEN or pass --token)")]
    MissingToken,

    #[error("failed to build request: {message}")]
    RequestConstruction { message: String },

    #[error("request to Pulumi API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed: {status}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode export JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected export shape: {message}")]
    Shape { message: String },
}

impl FetchError {
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    /// HTTP status of a rejected request, if that is what failed
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
