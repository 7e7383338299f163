use serde::{Deserialize, Serialize};

use crate::{Segment, ToolUse, tool_uses};

/// A complete response from the model provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Segments of the response, in the order they were produced.
    pub segments: Vec<Segment>,
    /// Token usage of this response.
    pub usage: Usage,
}

impl ModelResponse {
    /// Returns the tool use segments of this response, in order.
    #[inline]
    pub fn tool_uses(&self) -> impl Iterator<Item = &ToolUse> {
        tool_uses(&self.segments)
    }
}

/// Token counters reported by the model provider.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Usage {
    /// Tokens consumed by the request.
    pub input_tokens: u64,
    /// Tokens produced in the response.
    pub output_tokens: u64,
}

impl Usage {
    /// Adds another usage to this one.
    #[inline]
    pub fn accumulate(&mut self, other: Usage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}
