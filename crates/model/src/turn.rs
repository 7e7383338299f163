use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One atomic entry in the conversation log.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "snake_case")]
pub enum Turn {
    /// A user input text.
    User(String),
    /// A complete assistant response.
    Assistant(Vec<Segment>),
    /// Results of all tool calls requested by the preceding assistant turn.
    ToolResults(Vec<ToolResult>),
}

/// One unit of a model response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text.
    Text(String),
    /// A request to invoke a tool.
    ToolUse(ToolUse),
}

/// Returns the tool use segments among `segments`, in order.
pub fn tool_uses(segments: &[Segment]) -> impl Iterator<Item = &ToolUse> {
    segments.iter().filter_map(|segment| match segment {
        Segment::ToolUse(tool_use) => Some(tool_use),
        Segment::Text(_) => None,
    })
}

/// Describes a tool call request from the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolUse {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The named arguments to pass to the tool.
    pub arguments: Map<String, Value>,
}

/// The result of calling a tool.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolResult {
    /// The identifier of the originating tool call request.
    pub id: String,
    /// The output of the tool call, or a description of what went wrong.
    pub content: String,
    /// Whether `content` describes a failure.
    #[serde(default)]
    pub is_error: bool,
}
