use super::{ScalarKind, TypeAnnotation, TypeSchema};

/// Converts one declared type into a schema fragment.
///
/// Rules, first match wins:
///
/// 1. `Any` maps to `string`.
/// 2. `Literal` maps to an enum. Its base is the kind of the first literal
///    when every literal shares it, otherwise the enum has no base.
/// 3. `Union` maps its first non-`None` member. A union of `None` only maps
///    to `string`. Multi-member unions lose every member but the first.
/// 4. `List` maps to an array of the mapped element type, or an
///    unconstrained array.
/// 5. `Dict` maps to `object`.
/// 6. Primitives map to their counterparts.
/// 7. Everything else, a bare `None` included, maps to `string`.
pub fn map_type(annotation: &TypeAnnotation) -> TypeSchema {
    match annotation {
        TypeAnnotation::Any => TypeSchema::String,
        TypeAnnotation::Literal(values) => {
            let base = values.first().and_then(ScalarKind::of).filter(|base| {
                values.iter().all(|v| ScalarKind::of(v) == Some(*base))
            });
            TypeSchema::Enum {
                values: values.clone(),
                base,
            }
        }
        TypeAnnotation::Union(members) => members
            .iter()
            .find(|member| **member != TypeAnnotation::None)
            .map(map_type)
            .unwrap_or(TypeSchema::String),
        TypeAnnotation::List(element) => {
            TypeSchema::Array(element.as_deref().map(|e| Box::new(map_type(e))))
        }
        TypeAnnotation::Dict => TypeSchema::Object,
        TypeAnnotation::Str => TypeSchema::String,
        TypeAnnotation::Int => TypeSchema::Integer,
        TypeAnnotation::Float => TypeSchema::Number,
        TypeAnnotation::Bool => TypeSchema::Boolean,
        TypeAnnotation::None | TypeAnnotation::Other(_) => TypeSchema::String,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_primitives_and_fallbacks() {
        assert_eq!(map_type(&TypeAnnotation::Str), TypeSchema::String);
        assert_eq!(map_type(&TypeAnnotation::Int), TypeSchema::Integer);
        assert_eq!(map_type(&TypeAnnotation::Float), TypeSchema::Number);
        assert_eq!(map_type(&TypeAnnotation::Bool), TypeSchema::Boolean);
        assert_eq!(map_type(&TypeAnnotation::Dict), TypeSchema::Object);
        assert_eq!(map_type(&TypeAnnotation::Any), TypeSchema::String);
        assert_eq!(map_type(&TypeAnnotation::None), TypeSchema::String);
        assert_eq!(
            map_type(&TypeAnnotation::Other("PathBuf".into())),
            TypeSchema::String
        );
    }

    #[test]
    fn test_optional_maps_inner_type() {
        for inner in [
            TypeAnnotation::Int,
            TypeAnnotation::Bool,
            TypeAnnotation::list_of(TypeAnnotation::Str),
        ] {
            assert_eq!(
                map_type(&TypeAnnotation::optional(inner.clone())),
                map_type(&inner)
            );
        }
        // `None` listed first is skipped as well.
        assert_eq!(
            map_type(&TypeAnnotation::Union(vec![
                TypeAnnotation::None,
                TypeAnnotation::Float,
            ])),
            TypeSchema::Number
        );
    }

    #[test]
    fn test_union_uses_first_member() {
        let annotation =
            TypeAnnotation::Union(vec![TypeAnnotation::Int, TypeAnnotation::Str]);
        assert_eq!(map_type(&annotation), TypeSchema::Integer);

        let only_none = TypeAnnotation::Union(vec![TypeAnnotation::None]);
        assert_eq!(map_type(&only_none), TypeSchema::String);
        assert_eq!(map_type(&TypeAnnotation::Union(vec![])), TypeSchema::String);
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            map_type(&TypeAnnotation::list_of(TypeAnnotation::Int)),
            TypeSchema::Array(Some(Box::new(TypeSchema::Integer)))
        );
        assert_eq!(
            map_type(&TypeAnnotation::List(None)),
            TypeSchema::Array(None)
        );
        assert_eq!(
            map_type(&TypeAnnotation::list_of(TypeAnnotation::optional(
                TypeAnnotation::Float
            ))),
            TypeSchema::Array(Some(Box::new(TypeSchema::Number)))
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            map_type(&TypeAnnotation::Literal(vec![json!("r"), json!("w")])),
            TypeSchema::Enum {
                values: vec![json!("r"), json!("w")],
                base: Some(ScalarKind::String),
            }
        );
        assert_eq!(
            map_type(&TypeAnnotation::Literal(vec![json!(1), json!(2)])),
            TypeSchema::Enum {
                values: vec![json!(1), json!(2)],
                base: Some(ScalarKind::Integer),
            }
        );
        assert_eq!(
            map_type(&TypeAnnotation::Literal(vec![json!(0.5)])),
            TypeSchema::Enum {
                values: vec![json!(0.5)],
                base: Some(ScalarKind::Number),
            }
        );
        assert_eq!(
            map_type(&TypeAnnotation::Literal(vec![json!("a"), json!(1)])),
            TypeSchema::Enum {
                values: vec![json!("a"), json!(1)],
                base: None,
            }
        );
        assert_eq!(
            map_type(&TypeAnnotation::Literal(vec![])),
            TypeSchema::Enum {
                values: vec![],
                base: None,
            }
        );
    }
}
