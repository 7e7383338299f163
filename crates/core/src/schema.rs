//! Tool descriptors derived from tool signatures.
//!
//! A tool author declares a [`Signature`]: the tool's name, a Google-style
//! doc text, and its parameters with their [`TypeAnnotation`]s and whether
//! they have a default. Most tools never write one by hand; it is derived
//! from the input type's [`schemars::JsonSchema`] implementation, which
//! carries field names, types, serde defaults and doc comments.
//!
//! [`generate`] normalizes signatures into [`ToolDescriptor`]s, the
//! contract advertised to the model. Generation never fails: anything it
//! cannot make sense of degrades to a `string` parameter or an empty
//! description.

mod annotation;
mod descriptor;
pub mod docstring;
mod mapper;
mod signature;

use serde_json::{Value, json};

pub use annotation::TypeAnnotation;
pub use descriptor::{ParameterSpec, ToolDescriptor, describe, generate};
pub use mapper::map_type;
pub use signature::{Param, Signature};

/// Normalized description of a parameter's expected value shape.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeSchema {
    /// A text value. Also the fallback for anything unresolvable.
    String,
    /// An integral number.
    Integer,
    /// Any number.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A list, optionally constrained to one item shape.
    Array(Option<Box<TypeSchema>>),
    /// A keyed mapping without further constraint.
    Object,
    /// A fixed set of scalar values.
    Enum {
        /// The allowed values.
        values: Vec<Value>,
        /// The common scalar kind of `values`, if they share one.
        base: Option<ScalarKind>,
    },
}

/// The primitive kind backing an enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Text literals.
    String,
    /// Integral literals.
    Integer,
    /// Decimal literals.
    Number,
}

impl ScalarKind {
    /// Returns the kind of a literal value, if it is one of the supported
    /// scalar kinds.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) => Some(ScalarKind::String),
            Value::Number(n) if n.is_f64() => Some(ScalarKind::Number),
            Value::Number(_) => Some(ScalarKind::Integer),
            _ => None,
        }
    }

    /// Returns the JSON Schema type name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
        }
    }
}

impl TypeSchema {
    /// Renders this schema as a JSON Schema fragment.
    pub fn to_value(&self) -> Value {
        match self {
            TypeSchema::String => json!({ "type": "string" }),
            TypeSchema::Integer => json!({ "type": "integer" }),
            TypeSchema::Number => json!({ "type": "number" }),
            TypeSchema::Boolean => json!({ "type": "boolean" }),
            TypeSchema::Array(None) => json!({ "type": "array" }),
            TypeSchema::Array(Some(items)) => {
                json!({ "type": "array", "items": items.to_value() })
            }
            TypeSchema::Object => json!({ "type": "object" }),
            TypeSchema::Enum { values, base } => match base {
                Some(base) => json!({ "type": base.as_str(), "enum": values }),
                None => json!({ "enum": values }),
            },
        }
    }
}
