use owo_colors::{OwoColorize, Style};

pub const BAR_CHAR: &str = "▎";

#[inline]
pub fn banner_border() -> Style {
    Style::new().bright_magenta()
}

#[inline]
pub fn banner_text() -> Style {
    Style::new().bold().bright_green()
}

#[inline]
pub fn user() -> Style {
    Style::new().bold().bright_cyan()
}

#[inline]
pub fn assistant() -> Style {
    Style::new().bold().bright_green()
}

#[inline]
pub fn tool() -> Style {
    Style::new().bold().yellow()
}

#[inline]
pub fn tool_result() -> Style {
    Style::new().green()
}

#[inline]
pub fn error() -> Style {
    Style::new().bold().red()
}

#[inline]
pub fn muted() -> Style {
    Style::new().dimmed()
}

/// Draws the left bar of a message block.
#[inline]
pub fn bar(style: Style) -> String {
    BAR_CHAR.style(style).to_string()
}
