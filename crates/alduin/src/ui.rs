use std::io::{self, Write as _};
use std::sync::Mutex;
use std::time::Duration;

use alduin_core::AgentEvent;
use alduin_core::tool::Approval;
use alduin_model::Usage;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::{Map, Value};

use crate::theme;

pub const PROMPT: &str = "🧑‍💻 You: ";

/// Tool output longer than this is cut when displayed. The model still
/// gets all of it.
const MAX_DISPLAY_LINES: usize = 12;

pub fn print_banner() {
    let border = theme::banner_border();
    let line = "═".repeat(44);
    println!("{}", line.style(border));
    println!(
        "  {}  {}",
        "🐉 Alduin".style(theme::banner_text()),
        "a minimal coding agent".style(theme::muted())
    );
    println!(
        "  {}",
        "Type a message, or press Ctrl-C / Ctrl-D to leave.".style(theme::muted())
    );
    println!("{}", line.style(border));
    println!();
}

pub fn print_error(message: &str) {
    eprintln!(
        "{}❌ {}",
        theme::bar(theme::error()),
        message.style(theme::error())
    );
}

pub fn print_prompt() {
    print!("{}", PROMPT.style(theme::user()));
    io::stdout().flush().ok();
}

/// Moves the cursor up and erases the line, replacing the raw prompt.
fn clear_previous_line() {
    print!("\x1b[1A\x1b[2K");
}

/// Renders agent events to the terminal.
pub struct Renderer {
    spinner: Mutex<Option<ProgressBar>>,
    spinner_style: ProgressStyle,
}

impl Renderer {
    pub fn new() -> Self {
        let spinner_style = ProgressStyle::with_template("{spinner} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        Self {
            spinner: Mutex::new(None),
            spinner_style,
        }
    }

    pub fn render(&self, event: AgentEvent) {
        // Finish the spinner before printing anything else.
        self.stop_spinner();

        match event {
            AgentEvent::UserMessage(text) => {
                clear_previous_line();
                println!(
                    "{}{}{}",
                    theme::bar(theme::user()),
                    PROMPT.style(theme::user()),
                    text
                );
            }
            AgentEvent::Thinking => self.start_spinner(),
            AgentEvent::AssistantText { text, usage } => {
                let bar = theme::bar(theme::assistant());
                println!("{bar}{}", "🤖 Alduin:".style(theme::assistant()));
                for line in text.lines() {
                    println!("{bar}{line}");
                }
                println!("{bar}{}", format_usage(usage).style(theme::muted()));
            }
            AgentEvent::ToolCall { name, arguments, .. } => {
                println!(
                    "{}🔧 {}({})",
                    theme::bar(theme::tool()),
                    name.style(theme::tool()),
                    format_arguments(&arguments).style(theme::muted())
                );
            }
            AgentEvent::ToolResult { content, .. } => {
                let bar = theme::bar(theme::tool_result());
                for line in truncate_lines(&content, MAX_DISPLAY_LINES) {
                    println!("{bar}{}", line.style(theme::muted()));
                }
            }
            AgentEvent::ToolError { name, message, .. } => {
                println!(
                    "{}⚠️  {} failed: {}",
                    theme::bar(theme::error()),
                    name.style(theme::tool()),
                    message.style(theme::error())
                );
            }
            AgentEvent::Goodbye => {
                println!();
                println!("{}", "👋 Goodbye!".style(theme::banner_text()));
            }
        }
    }

    fn start_spinner(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(self.spinner_style.clone());
        spinner.set_message("🤔 Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn stop_spinner(&self) {
        let spinner = self.spinner.lock().ok().and_then(|mut slot| slot.take());
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
    }
}

/// Asks the user whether a tool may run. The answer is read separately.
pub fn print_approval_request(approval: &Approval) {
    let bar = theme::bar(theme::tool());
    println!("{bar}⚠️  {}:", approval.justification());
    println!("{bar}{}", approval.what().bold());
    print!("Proceed? [Y/n]: ");
    io::stdout().flush().ok();
}

/// Answers an approval with what the user typed. No answer at all, as when
/// stdin is closed, rejects it.
pub fn answer_approval(approval: Approval, answer: Option<&str>) {
    match answer.map(str::trim) {
        Some(answer) if answer.is_empty() || answer.eq_ignore_ascii_case("y") => {
            approval.approve();
        }
        Some(_) => {
            approval.reject(Some("the user declined to run it".to_owned()));
        }
        None => approval.reject(None),
    }
    println!();
}

fn format_usage(usage: Usage) -> String {
    format!(
        "tokens: {} in, {} out",
        usage.input_tokens, usage.output_tokens
    )
}

fn format_arguments(arguments: &Map<String, Value>) -> String {
    arguments
        .iter()
        .map(|(name, value)| match value {
            Value::String(s) => format!("{name}={s:?}"),
            other => format!("{name}={other}"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate_lines(text: &str, max: usize) -> Vec<String> {
    let lines: Vec<_> = text.lines().collect();
    if lines.len() <= max {
        return lines.into_iter().map(str::to_owned).collect();
    }
    let mut shown: Vec<_> = lines[..max].iter().map(|s| (*s).to_owned()).collect();
    shown.push(format!("... ({} more lines)", lines.len() - max));
    shown
}
