//! Agent-facing tool adapters.
//!
//! The agent loop hands tools a JSON object of arguments. These adapters
//! validate the object, then delegate to [`SafeFs`].

use crate::error::FsGuardError;
use crate::result::OperationResult;
use crate::safe_fs::SafeFs;
use serde_json::{json, Value};

/// A file tool callable by the agent loop.
pub trait FileTool: Send + Sync {
    /// Tool name as advertised to the model.
    fn name(&self) -> &str;

    /// One-line description advertised to the model.
    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn schema(&self) -> Value;

    /// Runs the tool. Never panics on bad input; failures come back as
    /// an error [`OperationResult`].
    fn execute(&self, args: &Value) -> OperationResult;
}

fn required_str<'a>(args: &'a Value, field: &str) -> Result<&'a str, FsGuardError> {
    args.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| FsGuardError::InvalidArgument(field.to_string()))
}

/// `edit_file`: exact, unique text replacement.
#[derive(Debug, Clone)]
pub struct EditFileTool {
    fs: SafeFs,
}

impl EditFileTool {
    pub fn new(fs: SafeFs) -> Self {
        Self { fs }
    }
}

impl FileTool for EditFileTool {
    fn name(&self) -> &str {
        "edit_file"
    }

    fn description(&self) -> &str {
        "Edit a file by replacing old_text with new_text. The old_text must exist exactly once in the file."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to edit"
                },
                "old_text": {
                    "type": "string",
                    "description": "The exact text to find and replace"
                },
                "new_text": {
                    "type": "string",
                    "description": "The text to replace with"
                }
            },
            "required": ["path", "old_text", "new_text"]
        })
    }

    fn execute(&self, args: &Value) -> OperationResult {
        let parsed = required_str(args, "path").and_then(|path| {
            Ok((
                path,
                required_str(args, "old_text")?,
                required_str(args, "new_text")?,
            ))
        });
        match parsed {
            Ok((path, old_text, new_text)) => self.fs.safe_edit(path, old_text, new_text),
            Err(e) => OperationResult::failure(&e),
        }
    }
}

/// `append_file`: raw append, creating the file if absent.
#[derive(Debug, Clone)]
pub struct AppendFileTool {
    fs: SafeFs,
}

impl AppendFileTool {
    pub fn new(fs: SafeFs) -> Self {
        Self { fs }
    }
}

impl FileTool for AppendFileTool {
    fn name(&self) -> &str {
        "append_file"
    }

    fn description(&self) -> &str {
        "Append content to the end of a file"
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The file path to append to"
                },
                "content": {
                    "type": "string",
                    "description": "The content to append"
                }
            },
            "required": ["path", "content"]
        })
    }

    fn execute(&self, args: &Value) -> OperationResult {
        let parsed = required_str(args, "path")
            .and_then(|path| Ok((path, required_str(args, "content")?)));
        match parsed {
            Ok((path, content)) => self.fs.safe_append(path, content),
            Err(e) => OperationResult::failure(&e),
        }
    }
}
