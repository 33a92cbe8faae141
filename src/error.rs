//! Error types shared across the crate.

use thiserror::Error;

/// Failures raised by the breathing session engine.
///
/// Only `start()` can fail; ticks and stops are total.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot start exercise: {0}")]
    InvalidExercise(String),
}

/// Failures decoding the bearer token held by the auth session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token: {0}")]
    MalformedToken(String),
}
