use serde_json::{Map, Value};

/// A declared parameter type, as written by the tool author.
///
/// This is a faithful record of what was declared, not a normalized
/// schema: unions may hold anything, literals may mix kinds. Use
/// [`map_type`](super::map_type) to turn it into a [`TypeSchema`].
///
/// [`TypeSchema`]: super::TypeSchema
#[derive(Clone, Debug, PartialEq)]
pub enum TypeAnnotation {
    /// No annotation, or an annotation that accepts anything.
    Any,
    /// The absence of a value.
    None,
    /// Text.
    Str,
    /// Integral numbers.
    Int,
    /// Decimal numbers.
    Float,
    /// Booleans.
    Bool,
    /// One of a fixed set of literal values.
    Literal(Vec<Value>),
    /// Any of the member types.
    Union(Vec<TypeAnnotation>),
    /// A homogeneous sequence, with an optional element type.
    List(Option<Box<TypeAnnotation>>),
    /// A keyed mapping.
    Dict,
    /// Something not covered above, kept by name for diagnostics.
    Other(String),
}

impl TypeAnnotation {
    /// Shorthand for `Union([inner, None])`.
    #[inline]
    pub fn optional(inner: TypeAnnotation) -> Self {
        TypeAnnotation::Union(vec![inner, TypeAnnotation::None])
    }

    /// Shorthand for a list with the given element type.
    #[inline]
    pub fn list_of(element: TypeAnnotation) -> Self {
        TypeAnnotation::List(Some(Box::new(element)))
    }

    /// Reads an annotation back from a JSON Schema, such as one produced by
    /// `schemars`.
    ///
    /// `$ref`s are resolved against the schema's own `$defs` (or
    /// `definitions`).
    #[inline]
    pub fn from_json_schema(schema: &Value) -> Self {
        Self::from_json_schema_in(schema, schema)
    }

    /// Like [`from_json_schema`](Self::from_json_schema), but resolves
    /// `$ref`s against `root` instead of `schema` itself. Used for property
    /// schemas nested in a parameters object.
    pub fn from_json_schema_in(schema: &Value, root: &Value) -> Self {
        Reader {
            root,
            follow_refs: true,
        }
        .read(schema)
    }
}

struct Reader<'a> {
    root: &'a Value,
    // Only one `$ref` hop is followed, so recursive definitions terminate.
    follow_refs: bool,
}

impl Reader<'_> {
    fn read(&self, schema: &Value) -> TypeAnnotation {
        let obj = match schema {
            Value::Object(obj) => obj,
            Value::Bool(_) => return TypeAnnotation::Any,
            other => return TypeAnnotation::Other(other.to_string()),
        };

        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            return self.read_ref(reference);
        }
        if let Some(Value::Array(values)) = obj.get("enum") {
            return TypeAnnotation::Literal(values.clone());
        }
        if let Some(value) = obj.get("const") {
            return TypeAnnotation::Literal(vec![value.clone()]);
        }
        for key in ["anyOf", "oneOf"] {
            if let Some(Value::Array(members)) = obj.get(key) {
                let members = members.iter().map(|m| self.read(m)).collect();
                return TypeAnnotation::Union(members);
            }
        }

        match obj.get("type") {
            Some(Value::String(name)) => self.read_type_name(name, obj),
            Some(Value::Array(names)) => TypeAnnotation::Union(
                names
                    .iter()
                    .map(|name| match name.as_str() {
                        Some(name) => self.read_type_name(name, obj),
                        None => TypeAnnotation::Other(name.to_string()),
                    })
                    .collect(),
            ),
            Some(other) => TypeAnnotation::Other(other.to_string()),
            None => TypeAnnotation::Any,
        }
    }

    fn read_type_name(
        &self,
        name: &str,
        obj: &Map<String, Value>,
    ) -> TypeAnnotation {
        match name {
            "string" => TypeAnnotation::Str,
            "integer" => TypeAnnotation::Int,
            "number" => TypeAnnotation::Float,
            "boolean" => TypeAnnotation::Bool,
            "null" => TypeAnnotation::None,
            "object" => TypeAnnotation::Dict,
            "array" => TypeAnnotation::List(
                obj.get("items").map(|items| Box::new(self.read(items))),
            ),
            other => TypeAnnotation::Other(other.to_owned()),
        }
    }

    fn read_ref(&self, reference: &str) -> TypeAnnotation {
        let target = reference
            .strip_prefix('#')
            .filter(|_| self.follow_refs)
            .and_then(|pointer| self.root.pointer(pointer));
        match target {
            Some(target) => Reader {
                root: self.root,
                follow_refs: false,
            }
            .read(target),
            None => TypeAnnotation::Other(reference.to_owned()),
        }
    }
}
