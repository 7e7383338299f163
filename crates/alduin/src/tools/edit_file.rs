use std::fs;
use std::path::Path;

use alduin_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::run_blocking;

/// Input of [`EditFileTool`].
#[derive(Deserialize, JsonSchema)]
pub struct EditFileInput {
    path: String,
    old_str: String,
    new_str: String,
}

/// A tool for creating files and replacing text in them.
#[derive(Clone, Copy, Debug, Default)]
pub struct EditFileTool;

impl EditFileTool {
    /// Creates a new edit file tool.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Tool for EditFileTool {
    type Input = EditFileInput;

    fn name(&self) -> &str {
        "edit_file"
    }

    fn doc(&self) -> &str {
        "Create or edit a file by replacing occurrences of a string.

        This tool can be used to do both, create a new file (if old_str is
        empty) or edit an existing file.

        Args:
            path: The path to the file to edit.
            old_str: The string to be replaced. Leave it empty to create the
                file with new_str as its contents.
            new_str: The replacement string.

        Returns:
            A success message."
    }

    fn execute(
        &self,
        input: EditFileInput,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        run_blocking(move || edit_file(input))
    }
}

fn edit_file(input: EditFileInput) -> ToolResult {
    let EditFileInput {
        path,
        old_str,
        new_str,
    } = input;
    let io_error = |err: std::io::Error| {
        ToolError::execution_error().with_reason(format!("{path}: {err}"))
    };

    if old_str.is_empty() {
        if let Some(parent) = Path::new(&path).parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&path, &new_str).map_err(io_error)?;
        return Ok(format!("Created {path}"));
    }

    if !Path::new(&path).is_file() {
        return Err(ToolError::execution_error()
            .with_reason(format!("{path} is not a file")));
    }
    let contents = fs::read_to_string(&path).map_err(io_error)?;
    let count = contents.matches(old_str.as_str()).count();
    if count == 0 {
        return Err(ToolError::invalid_input()
            .with_reason(format!("`old_str` was not found in {path}")));
    }
    fs::write(&path, contents.replace(&old_str, &new_str)).map_err(io_error)?;
    debug!("replaced {count} occurrences in {path}");
    Ok(format!("Edited {path}: replaced {count} occurrence(s)"))
}
