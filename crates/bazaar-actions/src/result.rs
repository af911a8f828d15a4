//! The structured outcome every action returns.

use crate::error::{ActionError, ErrorKind};
use bazaar_commerce::FieldErrors;
use serde::{Deserialize, Serialize};

/// Outcome of an action as shown to the caller.
///
/// Failures never carry a Rust error type across this boundary: they are
/// flattened into a message, an [`ErrorKind`] and, for validation failures,
/// per-field messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult<T = ()> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub field_errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResult<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            field_errors: FieldErrors::new(),
            error: None,
            data: Some(data),
        }
    }

    /// A failure with a plain message.
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            field_errors: FieldErrors::new(),
            error: Some(kind),
            data: None,
        }
    }

    /// Attach data to a failure, e.g. the order that was recorded before a
    /// later step failed.
    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Convert an action's internal result, using `message` on success.
    pub fn from_result(result: Result<T, ActionError>, message: impl Into<String>) -> Self {
        match result {
            Ok(data) => Self::ok(message, data),
            Err(e) => e.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.success
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> From<ActionError> for ActionResult<T> {
    fn from(e: ActionError) -> Self {
        let kind = e.kind();
        let message = e.to_string();
        let field_errors = match e {
            ActionError::Validation(errors) => errors,
            _ => FieldErrors::new(),
        };
        Self {
            success: false,
            message,
            field_errors,
            error: Some(kind),
            data: None,
        }
    }
}
