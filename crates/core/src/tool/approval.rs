use std::fmt::{self, Debug, Display};

#[derive(Debug)]
pub(crate) struct ApprovalResult {
    pub approved: bool,
    pub why: Option<String>,
}

/// Approval for a tool call request.
///
/// A tool asks for one through [`Tool::make_approval`]. The agent hands it
/// to the approval handler, and the tool only runs once
/// [`approve`](Self::approve) is called. Dropping the approval without
/// answering counts as a rejection.
///
/// [`Tool::make_approval`]: super::Tool::make_approval
pub struct Approval {
    tool: String,
    what: String,
    justification: String,
    pub(crate) on_result: Option<Box<dyn FnOnce(ApprovalResult) + Send>>,
}

impl Approval {
    /// Creates a new approval.
    #[inline]
    pub fn new<S1: Into<String>, S2: Into<String>>(
        what: S1,
        justification: S2,
    ) -> Self {
        Self {
            tool: String::new(),
            what: what.into(),
            justification: justification.into(),
            on_result: None,
        }
    }

    /// Returns the name of the tool asking for approval.
    #[inline]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Returns what the approval is for.
    #[inline]
    pub fn what(&self) -> &str {
        &self.what
    }

    /// Returns the justification for the approval.
    #[inline]
    pub fn justification(&self) -> &str {
        &self.justification
    }

    #[inline]
    pub(crate) fn set_tool(&mut self, tool: &str) {
        tool.clone_into(&mut self.tool);
    }

    /// Approves the request.
    #[inline]
    pub fn approve(self) {
        let Some(on_result) = self.on_result else {
            return;
        };
        (on_result)(ApprovalResult {
            approved: true,
            why: None,
        });
    }

    /// Rejects the request with an optional reason.
    #[inline]
    pub fn reject(self, reason: Option<String>) {
        let Some(on_result) = self.on_result else {
            return;
        };
        (on_result)(ApprovalResult {
            approved: false,
            why: reason,
        });
    }
}

impl Debug for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Approval")
            .field("tool", &self.tool)
            .field("what", &self.what)
            .field("justification", &self.justification)
            .finish_non_exhaustive()
    }
}

impl Display for Approval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{} ({})", self.what, self.justification))
    }
}
