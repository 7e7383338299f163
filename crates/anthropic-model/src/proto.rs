use alduin_model::{
    ModelRequest, ModelResponse, ModelTool, Segment, ToolResult, ToolUse,
    Turn, Usage,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::AnthropicConfig;

// ------------------------------
// Types shared in both directions
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "is_false")]
        is_error: bool,
    },
    /// Thinking blocks and anything newer than this crate.
    #[serde(other)]
    Unknown,
}

#[inline]
fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Tool {
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    input_schema: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MessagesResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: ResponseUsage,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseUsage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

// -----------
// Conversions
// -----------

pub fn create_request(
    req: &ModelRequest,
    config: &AnthropicConfig,
) -> MessagesRequest {
    let mut messages: Vec<Message> = Vec::with_capacity(req.turns.len());
    for turn in &req.turns {
        let message = create_message(turn);
        // Empty messages are rejected by the API. The model may answer a
        // tool result with no content at all.
        if message.content.is_empty() {
            trace!("skipping empty {:?} message", message.role);
            continue;
        }
        // The API wants alternating roles, so adjacent turns of the same
        // role are sent as one message.
        match messages.last_mut() {
            Some(last) if last.role == message.role => {
                last.content.extend(message.content);
            }
            _ => messages.push(message),
        }
    }

    MessagesRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        system: req.system.clone().filter(|s| !s.is_empty()),
        messages,
        tools: req.tools.iter().map(create_tool).collect(),
    }
}

fn create_message(turn: &Turn) -> Message {
    match turn {
        Turn::User(text) => Message {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.clone() }],
        },
        Turn::Assistant(segments) => Message {
            role: Role::Assistant,
            content: segments
                .iter()
                .filter_map(|segment| match segment {
                    Segment::Text(text) if text.is_empty() => None,
                    Segment::Text(text) => {
                        Some(ContentBlock::Text { text: text.clone() })
                    }
                    Segment::ToolUse(tool_use) => Some(ContentBlock::ToolUse {
                        id: tool_use.id.clone(),
                        name: tool_use.name.clone(),
                        input: Value::Object(tool_use.arguments.clone()),
                    }),
                })
                .collect(),
        },
        Turn::ToolResults(results) => Message {
            role: Role::User,
            content: results.iter().map(create_tool_result).collect(),
        },
    }
}

#[inline]
fn create_tool_result(result: &ToolResult) -> ContentBlock {
    ContentBlock::ToolResult {
        tool_use_id: result.id.clone(),
        content: result.content.clone(),
        is_error: result.is_error,
    }
}

#[inline]
fn create_tool(tool: &ModelTool) -> Tool {
    Tool {
        name: tool.name.clone(),
        description: tool.description.clone(),
        input_schema: tool.parameters.clone(),
    }
}

pub fn parse_response(resp: MessagesResponse) -> ModelResponse {
    trace!("stop reason: {:?}", resp.stop_reason);
    let segments = resp
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(Segment::Text(text)),
            ContentBlock::ToolUse { id, name, input } => {
                let arguments = match input {
                    Value::Object(map) => map,
                    other => {
                        warn!("tool input of `{name}` is not an object: {other}");
                        Map::new()
                    }
                };
                Some(Segment::ToolUse(ToolUse {
                    id,
                    name,
                    arguments,
                }))
            }
            ContentBlock::ToolResult { .. } | ContentBlock::Unknown => None,
        })
        .collect();

    ModelResponse {
        segments,
        usage: Usage {
            input_tokens: resp.usage.input_tokens,
            output_tokens: resp.usage.output_tokens,
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::AnthropicConfigBuilder;

    fn config() -> AnthropicConfig {
        AnthropicConfigBuilder::with_api_key("key")
            .with_model("claude-test")
            .with_max_tokens(1024)
            .build()
    }

    #[test]
    fn test_create_request() {
        let mut arguments = Map::new();
        arguments.insert("path".to_owned(), json!("todo.txt"));
        let req = ModelRequest {
            system: Some("Be brief.".to_owned()),
            turns: vec![
                Turn::User("Read my todo".to_owned()),
                Turn::Assistant(vec![
                    Segment::Text("Sure.".to_owned()),
                    Segment::ToolUse(ToolUse {
                        id: "toolu_1".to_owned(),
                        name: "read_file".to_owned(),
                        arguments,
                    }),
                ]),
                Turn::ToolResults(vec![ToolResult {
                    id: "toolu_1".to_owned(),
                    content: "Not a file: todo.txt".to_owned(),
                    is_error: true,
                }]),
            ],
            tools: vec![ModelTool {
                name: "read_file".to_owned(),
                description: "Read a file.".to_owned(),
                parameters: json!({
                    "type": "object",
                    "properties": { "path": { "type": "string" } },
                    "required": ["path"]
                }),
            }],
        };

        let body = serde_json::to_value(create_request(&req, &config())).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "claude-test",
                "max_tokens": 1024,
                "system": "Be brief.",
                "messages": [
                    {
                        "role": "user",
                        "content": [{ "type": "text", "text": "Read my todo" }]
                    },
                    {
                        "role": "assistant",
                        "content": [
                            { "type": "text", "text": "Sure." },
                            {
                                "type": "tool_use",
                                "id": "toolu_1",
                                "name": "read_file",
                                "input": { "path": "todo.txt" }
                            }
                        ]
                    },
                    {
                        "role": "user",
                        "content": [{
                            "type": "tool_result",
                            "tool_use_id": "toolu_1",
                            "content": "Not a file: todo.txt",
                            "is_error": true
                        }]
                    }
                ],
                "tools": [{
                    "name": "read_file",
                    "description": "Read a file.",
                    "input_schema": {
                        "type": "object",
                        "properties": { "path": { "type": "string" } },
                        "required": ["path"]
                    }
                }]
            })
        );
    }

    #[test]
    fn test_adjacent_user_turns_are_merged() {
        let req = ModelRequest {
            turns: vec![
                Turn::User("One".to_owned()),
                Turn::User("Two".to_owned()),
            ],
            ..Default::default()
        };
        let body = create_request(&req, &config());
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].content.len(), 2);
        assert!(body.system.is_none());
        assert!(body.tools.is_empty());
    }

    #[test]
    fn test_empty_assistant_reply_is_skipped() {
        let reply: MessagesResponse = serde_json::from_value(json!({
            "content": [],
            "stop_reason": "end_turn",
            "usage": { "input_tokens": 10, "output_tokens": 0 }
        }))
        .unwrap();
        let reply = parse_response(reply);
        assert!(reply.segments.is_empty());

        let req = ModelRequest {
            turns: vec![
                Turn::User("Hi".to_owned()),
                Turn::Assistant(reply.segments),
                Turn::User("Anyone there?".to_owned()),
                Turn::Assistant(vec![Segment::Text(String::new())]),
                Turn::User("Hello?".to_owned()),
            ],
            ..Default::default()
        };
        let body = serde_json::to_value(create_request(&req, &config())).unwrap();
        assert_eq!(
            body["messages"],
            json!([{
                "role": "user",
                "content": [
                    { "type": "text", "text": "Hi" },
                    { "type": "text", "text": "Anyone there?" },
                    { "type": "text", "text": "Hello?" }
                ]
            }])
        );
    }

    #[test]
    fn test_parse_response() {
        let resp: MessagesResponse = serde_json::from_value(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                { "type": "thinking", "thinking": "hmm", "signature": "x" },
                { "type": "text", "text": "Let me check." },
                {
                    "type": "tool_use",
                    "id": "toolu_1",
                    "name": "list_files",
                    "input": { "path": "." }
                }
            ],
            "stop_reason": "tool_use",
            "usage": { "input_tokens": 120, "output_tokens": 30 }
        }))
        .unwrap();

        let resp = parse_response(resp);
        assert_eq!(resp.segments.len(), 2);
        assert_eq!(resp.segments[0], Segment::Text("Let me check.".to_owned()));
        let tool_use = resp.tool_uses().next().unwrap();
        assert_eq!(tool_use.id, "toolu_1");
        assert_eq!(tool_use.arguments["path"], ".");
        assert_eq!(resp.usage.input_tokens, 120);
        assert_eq!(resp.usage.output_tokens, 30);
    }

    #[test]
    fn test_parse_error() {
        let err: ErrorResponse = serde_json::from_str(
            r#"{"type":"error","error":{"type":"rate_limit_error","message":"Slow down"}}"#,
        )
        .unwrap();
        assert_eq!(err.error.kind, "rate_limit_error");
        assert_eq!(err.error.message, "Slow down");
    }
}
