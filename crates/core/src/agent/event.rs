use alduin_model::Usage;
use serde_json::{Map, Value};

/// Something observable that happened in the agent.
///
/// Events are emitted in strict chronological order.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentEvent {
    /// The user said something.
    UserMessage(String),
    /// A model query is about to be issued.
    Thinking,
    /// The model said something.
    AssistantText {
        /// The text of one segment.
        text: String,
        /// Usage of the query that produced the text.
        usage: Usage,
    },
    /// The model asked for a tool call.
    ToolCall {
        /// Call identifier.
        id: String,
        /// Tool name.
        name: String,
        /// Arguments, as sent by the model.
        arguments: Map<String, Value>,
    },
    /// A tool call succeeded.
    ToolResult {
        /// Call identifier.
        id: String,
        /// Tool name.
        name: String,
        /// Output of the tool.
        content: String,
    },
    /// A tool call failed.
    ToolError {
        /// Call identifier.
        id: String,
        /// Tool name.
        name: String,
        /// What went wrong.
        message: String,
    },
    /// The session is over.
    Goodbye,
}
