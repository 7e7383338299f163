use std::fs;
use std::path::Path;

use alduin_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::run_blocking;

/// Input of [`ReadFileTool`].
#[derive(Deserialize, JsonSchema)]
pub struct ReadFileInput {
    path: String,
}

/// A tool for reading the contents of a file.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadFileTool;

impl ReadFileTool {
    /// Creates a new read file tool.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Tool for ReadFileTool {
    type Input = ReadFileInput;

    fn name(&self) -> &str {
        "read_file"
    }

    fn doc(&self) -> &str {
        "Read the contents of a file.

        Args:
            path: The path to the file to read.

        Returns:
            The contents of the file."
    }

    fn execute(
        &self,
        input: ReadFileInput,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        run_blocking(move || read_file(&input.path))
    }
}

fn read_file(path: &str) -> ToolResult {
    if !Path::new(path).is_file() {
        return Err(ToolError::execution_error().with_reason(format!(
            "{path} is not a file, please make sure it is the right path"
        )));
    }
    fs::read_to_string(path).map_err(|err| {
        ToolError::execution_error().with_reason(format!("{path}: {err}"))
    })
}
