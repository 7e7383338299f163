use alduin_model::{ModelResponse, Segment, ToolUse, Usage};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The preset response for an assistant step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// Segments in this response.
    pub segments: Vec<Segment>,
    /// Usage reported with this response.
    #[serde(default)]
    pub usage: Usage,
    /// If set, the request will fail in the first `failure` attempts.
    /// `Some(0)` means the request will fail infinitely.
    #[serde(default)]
    pub failures: Option<u64>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` with the specified segments.
    #[inline]
    pub fn with_segments(segments: impl Into<Vec<Segment>>) -> Self {
        Self {
            segments: segments.into(),
            usage: Usage::default(),
            failures: None,
        }
    }

    /// Creates a text-only `PresetResponse`.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::with_segments([Segment::Text(text.into())])
    }

    /// Sets the usage reported with this response.
    #[inline]
    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.usage = Usage {
            input_tokens,
            output_tokens,
        };
        self
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }

    pub(crate) fn to_response(&self) -> ModelResponse {
        ModelResponse {
            segments: self.segments.clone(),
            usage: self.usage,
        }
    }
}

/// Makes a tool use segment from a JSON object literal.
///
/// Non-object `arguments` are treated as an empty argument map.
pub fn tool_use(id: &str, name: &str, arguments: Value) -> Segment {
    let arguments = match arguments {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Segment::ToolUse(ToolUse {
        id: id.to_owned(),
        name: name.to_owned(),
        arguments,
    })
}
