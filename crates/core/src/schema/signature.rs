use serde_json::Value;

use super::TypeAnnotation;

/// The declared shape of a tool: its name, doc text, and parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    pub(crate) name: String,
    pub(crate) doc: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) params: Vec<Param>,
}

/// One declared parameter of a tool.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub(crate) name: String,
    pub(crate) annotation: TypeAnnotation,
    pub(crate) has_default: bool,
    pub(crate) description: Option<String>,
}

impl Signature {
    /// Creates a signature with no doc text and no parameters.
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            doc: None,
            description: None,
            params: vec![],
        }
    }

    /// Derives a signature from the JSON Schema of a tool's input type.
    ///
    /// Each property becomes a parameter, in schema order. Properties that
    /// the schema does not list as `required` are taken to have a default.
    /// A property's `description` (a field doc comment, for `schemars`)
    /// becomes the parameter description, and the root `description` is
    /// kept as a fallback for the tool description.
    pub fn from_schema<S: Into<String>>(name: S, schema: &Value) -> Self {
        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let params = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, property)| Param {
                        name: name.clone(),
                        annotation: TypeAnnotation::from_json_schema_in(
                            property, schema,
                        ),
                        has_default: !required.contains(&name.as_str()),
                        description: description_of(property),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: name.into(),
            doc: None,
            description: description_of(schema),
            params,
        }
    }

    /// Attaches a Google-style doc text.
    #[inline]
    pub fn with_doc<S: Into<String>>(mut self, doc: S) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Appends a parameter.
    #[inline]
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Returns the tool name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameters.
    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

impl Param {
    /// Creates a parameter without a default.
    #[inline]
    pub fn required<S: Into<String>>(name: S, annotation: TypeAnnotation) -> Self {
        Self {
            name: name.into(),
            annotation,
            has_default: false,
            description: None,
        }
    }

    /// Creates a parameter with a default.
    #[inline]
    pub fn optional<S: Into<String>>(name: S, annotation: TypeAnnotation) -> Self {
        Self {
            has_default: true,
            ..Self::required(name, annotation)
        }
    }

    /// Attaches a description, which takes precedence over the doc text.
    #[inline]
    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the parameter name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the parameter declares a default.
    #[inline]
    pub fn has_default(&self) -> bool {
        self.has_default
    }
}

fn description_of(schema: &Value) -> Option<String> {
    schema
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}
