use reqwest::StatusCode;

/// INNOnet failures the bridge reacts to differently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API key is rejected or expired: the user has to re-enter it.
    #[error("the API key is rejected")]
    Authentication,

    /// No metering point is associated with the key.
    #[error("not found: {0}")]
    NotFound(String),

    /// Connectivity problem or an overloaded server: skip the cycle.
    #[error("transient failure: {0}")]
    Transient(String),

    #[error("unexpected payload: {0}")]
    UnexpectedPayload(String),
}

impl Error {
    /// Classify a non-successful HTTP status.
    pub fn from_status(status: StatusCode, context: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Authentication,
            StatusCode::NOT_FOUND => Self::NotFound(format!("`{context}` does not exist")),
            StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => {
                Self::Transient(format!("`{context}` responded with {status}"))
            }
            _ if status.is_server_error() => {
                Self::Transient(format!("`{context}` responded with {status}"))
            }
            _ => Self::UnexpectedPayload(format!("`{context}` responded with {status}")),
        }
    }

    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        // Request URLs contain the API key.
        let error = error.without_url();
        if error.is_decode() {
            Self::UnexpectedPayload(format!("{error:#}"))
        } else if let Some(status) = error.status() {
            Self::from_status(status, "request")
        } else {
            Self::Transient(format!("{error:#}"))
        }
    }
}
