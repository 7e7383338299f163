//! A set of built-in tools that models can use.

mod bash;
mod edit_file;
mod list_files;
mod read_file;

pub use bash::BashTool;
pub use edit_file::EditFileTool;
pub use list_files::ListFilesTool;
pub use read_file::ReadFileTool;

use alduin_core::tool::Error as ToolError;
use tokio::task::spawn_blocking;

/// Runs blocking file system work off the async thread.
async fn run_blocking<F>(f: F) -> Result<String, ToolError>
where
    F: FnOnce() -> Result<String, ToolError> + Send + 'static,
{
    spawn_blocking(f).await.map_err(|err| {
        ToolError::execution_error().with_reason(format!("{err}"))
    })?
}
