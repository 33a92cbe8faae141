use thiserror::Error;

/// Status used for failures that never produced an HTTP response.
pub const TRANSPORT_FAILURE: u16 = 0;

/// Error returned by every REST call.
///
/// `status` is the HTTP status, or [`TRANSPORT_FAILURE`] when the request
/// did not complete (DNS, connection refused, timeout, ...).
#[derive(Debug, Error, Clone, PartialEq)]
#[error("API error {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub body: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(TRANSPORT_FAILURE, message)
    }

    pub fn with_body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    /// 401/403: the caller should treat the session as invalid.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, 401 | 403)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_transport(&self) -> bool {
        self.status == TRANSPORT_FAILURE
    }

    /// Replace the message while keeping status and body.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::new(status.as_u16(), err.to_string()),
            None => ApiError::transport(err.to_string()),
        }
    }
}
