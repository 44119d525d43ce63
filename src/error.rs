//! Error taxonomy.
//!
//! Every failure the guard sees is tagged with an [`ErrorKind`], which decides
//! the category string stored on the error record. [`GateError`] is what the
//! request gate hands back to callers.

use std::fmt;
use thiserror::Error;

/// Where a captured error came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An error nobody caught.
    UncaughtRuntimeError,
    /// An asynchronous operation that was rejected and never handled.
    RejectedOperation,
    /// An error logged through the host console.
    ConsoleError,
    /// An outbound call that kept failing.
    NetworkFailure(String),
    /// A call refused because the target's breaker is open.
    CircuitOpen(String),
    /// A failure inside [`Guard::safe_async`](crate::Guard::safe_async).
    WrappedAsyncFailure,
    /// A failure inside [`Guard::safe_sync`](crate::Guard::safe_sync).
    WrappedOperationFailure,
}

impl ErrorKind {
    /// The category tag written to error records.
    pub fn category(&self) -> String {
        match self {
            ErrorKind::UncaughtRuntimeError => "JavaScript Error".to_string(),
            ErrorKind::RejectedOperation => "Promise Rejection".to_string(),
            ErrorKind::ConsoleError => "Console Error".to_string(),
            ErrorKind::NetworkFailure(target) => format!("Network Error ({target})"),
            ErrorKind::CircuitOpen(target) => format!("Circuit Open ({target})"),
            ErrorKind::WrappedAsyncFailure => "Safe Async Wrapper".to_string(),
            ErrorKind::WrappedOperationFailure => "Safe DOM Operation".to_string(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.category())
    }
}

/// Result error of [`RequestGate::execute`](crate::gate::RequestGate::execute).
#[derive(Debug, Error)]
pub enum GateError<E> {
    /// The target's breaker is open; the call was not attempted.
    #[error("circuit breaker is open for: {target}")]
    CircuitOpen { target: String },

    /// The call itself failed. The original error is returned untouched.
    #[error(transparent)]
    Call(E),
}

impl<E> GateError<E> {
    /// Returns true if the call was refused by an open breaker.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, GateError::CircuitOpen { .. })
    }

    /// Unwrap the caller's own error, if the call was attempted.
    pub fn into_call_error(self) -> Option<E> {
        match self {
            GateError::Call(e) => Some(e),
            GateError::CircuitOpen { .. } => None,
        }
    }
}

/// A plain message error, for failures that carry no richer type.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct MessageError(pub String);

impl From<&str> for MessageError {
    fn from(message: &str) -> Self {
        MessageError(message.to_string())
    }
}

impl From<String> for MessageError {
    fn from(message: String) -> Self {
        MessageError(message)
    }
}
