use serde::Serialize;

/// Liveness payload returned by `GET /health`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub status: &'static str,
}

/// Error body shared by every non-2xx JSON response.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
