//! A parser for Google-style doc text.
//!
//! ```text
//! Read the contents of a file.
//!
//! Args:
//!     path: The path to the file to read.
//!     limit (int): Maximum number of lines,
//!         counted from the top.
//!
//! Returns:
//!     The contents of the file.
//! ```
//!
//! Everything before the first section header is the summary. Only the
//! `Args:`/`Arguments:` section is read further; the other sections are
//! recognized so that they end it.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

const SECTION_HEADERS: &[&str] = &[
    "Args:",
    "Arguments:",
    "Returns:",
    "Return:",
    "Raises:",
    "Yields:",
    "Yield:",
    "Note:",
    "Notes:",
    "Example:",
    "Examples:",
    "Attributes:",
    "References:",
    "Todo:",
    "Todos:",
];

const ARGUMENT_HEADERS: &[&str] = &["Args:", "Arguments:"];

// `name: text` or `name (type): text`, anchored at the line start.
static ARGUMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s*(?:\(.+?\))?\s*:\s*(.*)").expect("valid regex")
});

/// A parsed doc text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Docstring {
    /// The lines before the first section, space-joined.
    pub summary: String,
    /// Descriptions from the arguments section, by parameter name.
    pub params: HashMap<String, String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Summary,
    Arguments,
    Other,
}

struct OpenParam {
    name: String,
    lines: Vec<String>,
}

/// Parses a Google-style doc text.
///
/// Parsing is total: text that fits no rule is dropped, never rejected.
pub fn parse(doc: &str) -> Docstring {
    let mut summary_lines = Vec::new();
    let mut params = HashMap::new();
    let mut section = Section::Summary;
    let mut current: Option<OpenParam> = None;

    let mut close = |current: &mut Option<OpenParam>| {
        if let Some(param) = current.take() {
            params.insert(param.name, param.lines.join(" ").trim().to_owned());
        }
    };

    for line in doc.lines() {
        let stripped = line.trim();

        if SECTION_HEADERS.contains(&stripped) {
            close(&mut current);
            section = if ARGUMENT_HEADERS.contains(&stripped) {
                Section::Arguments
            } else {
                Section::Other
            };
            continue;
        }

        match section {
            Section::Summary => summary_lines.push(stripped),
            Section::Arguments => {
                if let Some(caps) = ARGUMENT_LINE.captures(stripped) {
                    close(&mut current);
                    let first = &caps[2];
                    current = Some(OpenParam {
                        name: caps[1].to_owned(),
                        lines: if first.is_empty() {
                            vec![]
                        } else {
                            vec![first.to_owned()]
                        },
                    });
                } else if let Some(param) = &mut current {
                    if !stripped.is_empty() {
                        param.lines.push(stripped.to_owned());
                    }
                }
            }
            Section::Other => {}
        }
    }
    close(&mut current);

    let summary = summary_lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_owned();

    Docstring { summary, params }
}
