use thiserror::Error;

pub type Result<T> = std::result::Result<T, LensError>;

#[derive(Debug, Error)]
pub enum LensError {
    /// No script carries the requested payload, or its literal does not parse.
    #[error("payload '{key}' not found: {reason}")]
    PayloadNotFound { key: String, reason: String },

    /// The payload parsed, but a required field is missing at its fixed index path.
    #[error("data found but no valid payload for {field} at {path:?}")]
    SchemaMismatch { field: &'static str, path: Vec<usize> },

    #[error("upload response carried no refresh redirect")]
    RedirectNotFound,

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

impl LensError {
    pub(crate) fn payload_not_found(key: &str, reason: impl Into<String>) -> Self {
        LensError::PayloadNotFound {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// True for failures to interpret the page, as opposed to failures to obtain it.
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            LensError::PayloadNotFound { .. } | LensError::SchemaMismatch { .. }
        )
    }
}
