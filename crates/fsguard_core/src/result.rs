//! Structured outcome handed back to the tool-execution layer.

use crate::error::{ErrorKind, FsGuardError};
use serde::{Deserialize, Serialize};

/// Outcome of a file operation, as seen by the agent.
///
/// Failures never escape as errors at this boundary; they are folded into
/// a result with `success == false` and both messages filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Whether the operation took effect.
    pub success: bool,
    /// Message for the model / calling program.
    pub machine_message: String,
    /// Message for a person. Empty when `silent` is set.
    pub user_message: String,
    /// Succeeded, but nothing should be shown to the user.
    pub silent: bool,
    /// Failure kind, if the operation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl OperationResult {
    /// Successful result with no user-facing message.
    pub fn silent(machine_message: impl Into<String>) -> Self {
        Self {
            success: true,
            machine_message: machine_message.into(),
            user_message: String::new(),
            silent: true,
            error_kind: None,
        }
    }

    /// Failed result built from an error.
    pub fn failure(error: &FsGuardError) -> Self {
        Self {
            success: false,
            machine_message: error.to_string(),
            user_message: error.user_message(),
            silent: false,
            error_kind: Some(error.kind()),
        }
    }

    /// Returns true if the operation failed.
    pub fn is_error(&self) -> bool {
        !self.success
    }
}

impl From<FsGuardError> for OperationResult {
    fn from(error: FsGuardError) -> Self {
        Self::failure(&error)
    }
}
