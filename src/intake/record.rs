//! Structured error records.

use serde::{Deserialize, Serialize};
use std::error::Error;
use uuid::Uuid;

use crate::host::ErrorContext;

/// Message and trace pulled out of an error before it is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorDetails {
    /// A message with no trace, for errors that arrive as plain text.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    /// Use the error's display form as the message and its source chain,
    /// one cause per line, as the trace.
    pub fn from_error<E: Error + ?Sized>(error: &E) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            stack: if causes.is_empty() {
                None
            } else {
                Some(causes.join("\n"))
            },
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// One captured error. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub id: Uuid,
    /// Milliseconds since the UNIX epoch.
    pub timestamp_ms: u64,
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    pub context: ErrorContext,
}

impl ErrorRecord {
    pub fn new(timestamp_ms: u64, category: String, details: ErrorDetails, context: ErrorContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp_ms,
            category,
            message: details.message,
            stack: details.stack,
            context,
        }
    }
}
