use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Turn;

/// A request to be sent to the model provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The system instructions.
    pub system: Option<String>,
    /// The full conversation so far, oldest first.
    pub turns: Vec<Turn>,
    /// Tools that are available to the model.
    pub tools: Vec<ModelTool>,
}

/// Describes a tool that can be used by the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelTool {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most model providers, the parameters should typically be
    /// defined by a [JSON schema](https://json-schema.org/) object.
    pub parameters: Value,
}
