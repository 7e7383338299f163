use alduin_model::ModelTool;
use serde_json::{Map, Value, json};

use super::{Signature, TypeSchema, docstring, map_type};

/// The machine-readable contract of one tool.
///
/// Descriptors are produced once, by [`generate`], and never change
/// afterwards; there are no setters.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
}

/// One parameter in a [`ToolDescriptor`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    /// The parameter name.
    pub name: String,
    /// The normalized type of the parameter.
    pub schema: TypeSchema,
    /// What the parameter means, when documented.
    pub description: Option<String>,
    /// `true` iff the parameter declares no default.
    pub required: bool,
}

impl ToolDescriptor {
    /// Returns the tool name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tool description, possibly empty.
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters, in declaration order.
    #[inline]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Renders the parameters as a JSON Schema object.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for param in &self.parameters {
            let mut property = param.schema.to_value();
            if let (Some(description), Value::Object(obj)) =
                (&param.description, &mut property)
            {
                obj.insert("description".to_owned(), json!(description));
            }
            properties.insert(param.name.clone(), property);
            if param.required {
                required.push(json!(param.name));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Converts this descriptor into the tool definition sent to models.
    #[inline]
    pub fn to_model_tool(&self) -> ModelTool {
        ModelTool {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.input_schema(),
        }
    }
}

/// Builds the descriptor of one tool.
pub fn describe(signature: &Signature) -> ToolDescriptor {
    let doc = signature
        .doc
        .as_deref()
        .map(docstring::parse)
        .unwrap_or_default();

    let description = if doc.summary.is_empty() {
        signature.description.clone().unwrap_or_default()
    } else {
        doc.summary
    };

    let parameters = signature
        .params
        .iter()
        .filter(|param| param.name != "self")
        .map(|param| ParameterSpec {
            name: param.name.clone(),
            schema: map_type(&param.annotation),
            description: param
                .description
                .clone()
                .or_else(|| doc.params.get(&param.name).cloned())
                .filter(|d| !d.is_empty()),
            required: !param.has_default,
        })
        .collect();

    ToolDescriptor {
        name: signature.name.clone(),
        description,
        parameters,
    }
}

/// Builds one descriptor per signature, in order.
pub fn generate<'a, I>(signatures: I) -> Vec<ToolDescriptor>
where
    I: IntoIterator<Item = &'a Signature>,
{
    signatures.into_iter().map(describe).collect()
}
