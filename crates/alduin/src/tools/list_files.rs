use std::fs;
use std::path::Path;

use alduin_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::JsonSchema;
use serde::Deserialize;

use super::run_blocking;

/// Input of [`ListFilesTool`].
#[derive(Deserialize, JsonSchema)]
pub struct ListFilesInput {
    path: String,
}

/// A tool for listing the entries of a directory.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListFilesTool;

impl ListFilesTool {
    /// Creates a new list files tool.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Tool for ListFilesTool {
    type Input = ListFilesInput;

    fn name(&self) -> &str {
        "list_files"
    }

    fn doc(&self) -> &str {
        "List files in a directory.

        Args:
            path: The path to the directory to list files in.

        Returns:
            A newline-separated list of file names. Directories end with `/`."
    }

    fn execute(
        &self,
        input: ListFilesInput,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        run_blocking(move || list_files(&input.path))
    }
}

fn list_files(path: &str) -> ToolResult {
    let dir = Path::new(path);
    if !dir.is_dir() {
        return Err(ToolError::execution_error()
            .with_reason(format!("not a directory: {path}")));
    }

    let io_error = |err: std::io::Error| {
        ToolError::execution_error().with_reason(format!("{path}: {err}"))
    };
    let mut entries = fs::read_dir(dir)
        .map_err(io_error)?
        .map(|entry| -> std::io::Result<String> {
            let entry = entry?;
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                name.push('/');
            }
            Ok(name)
        })
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(io_error)?;

    if entries.is_empty() {
        return Ok("Directory is empty.".to_owned());
    }
    entries.sort();
    Ok(entries.join("\n"))
}
