use std::env;
use std::io;

use alduin_core::tool::{
    Approval as ToolApproval, Error as ToolError, Tool, ToolResult,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::process::Command;

/// Input of [`BashTool`].
#[derive(Deserialize, JsonSchema)]
pub struct BashInput {
    command: String,
}

/// A tool for running shell commands.
///
/// Every command needs the user's approval.
#[derive(Clone, Copy, Debug, Default)]
pub struct BashTool;

impl BashTool {
    /// Creates a new bash tool.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Tool for BashTool {
    type Input = BashInput;

    fn name(&self) -> &str {
        "bash"
    }

    fn doc(&self) -> &str {
        "Execute a bash command and return its output.

        Args:
            command: The bash command to execute, preferably on a single line.

        Returns:
            What the command wrote to stdout and stderr, and its exit status
            when it failed."
    }

    fn make_approval(&self, input: &BashInput) -> Option<ToolApproval> {
        Some(ToolApproval::new(
            &input.command,
            "Agent wants to run the command",
        ))
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: BashInput,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        async move {
            run_command(&input.command).await.map_err(|err| {
                ToolError::execution_error().with_reason(format!("{err}"))
            })
        }
    }
}

#[inline]
fn create_command_with_inferred_shell() -> Command {
    let Some(shell) = env::var_os("SHELL") else {
        return Command::new("/bin/sh");
    };
    Command::new(shell)
}

async fn run_command(command: &str) -> Result<String, io::Error> {
    let output = create_command_with_inferred_shell()
        .arg("-c")
        .arg(command)
        .output()
        .await?;

    let mut result = String::new();
    if !output.stdout.is_empty() {
        result.push_str("==> STDOUT <==\n");
        result.push_str(&String::from_utf8_lossy(&output.stdout));
    }
    if !output.stderr.is_empty() {
        result.push_str("\n==> STDERR <==\n");
        result.push_str(&String::from_utf8_lossy(&output.stderr));
    }
    if !output.status.success() {
        result.push_str(&format!("\n==> EXIT STATUS <==\n{}\n", output.status));
    }
    if result.is_empty() {
        result.push_str("(no output)");
    }
    Ok(result)
}
