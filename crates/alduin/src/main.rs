//! The `alduin` command line tool.

#[macro_use]
extern crate tracing;

mod config;
mod input;
mod theme;
mod ui;

use std::env;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use alduin::SessionBuilder;
use alduin_anthropic_model::AnthropicProvider;
use tracing_subscriber::EnvFilter;

use crate::config::ConfigError;
use crate::input::{Lines, Terminal};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    ui::print_banner();

    let config = match config::from_lookup(|name| env::var(name).ok()) {
        Ok(config) => config,
        Err(err @ ConfigError::MissingApiKey) => {
            ui::print_error(&err.to_string());
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            ui::print_error(&err.to_string());
            return ExitCode::FAILURE;
        }
    };
    debug!("using {config:?}");

    let lines = Lines::from_stdin();
    let renderer = Arc::new(ui::Renderer::new());
    let provider = AnthropicProvider::new(config);
    let mut session = SessionBuilder::with_model_provider(provider)
        .with_system_prompt(
            include_str!("./system_prompt.md")
                .replace("{{HOST_OS}}", host_os()),
        )
        .on_event(move |event| renderer.render(event))
        .on_tool_call_request({
            let lines = lines.clone();
            move |approval| input::ask_approval(&lines, approval)
        })
        .build();

    match session.run(&mut Terminal::new(lines)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            ui::print_error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

#[inline]
fn host_os() -> &'static str {
    match env::consts::OS {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        _ => "some other OS",
    }
}
