use std::fmt::{self, Debug};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::object::{ApprovalHandler, BoxedToolFuture, ToolObject};
use super::{Error, ToolResult};
use crate::schema::Signature;

type Handler = Box<dyn Fn(&Arguments) -> ToolResult + Send + Sync>;

/// A tool backed by a plain function and a hand-written [`Signature`].
///
/// Useful when there is no input type to derive a schema from, or when the
/// tool is assembled at runtime. Required parameters are checked before
/// the function is called.
///
/// ```
/// use alduin_core::schema::{Param, Signature, TypeAnnotation};
/// use alduin_core::tool::FnTool;
///
/// let tool = FnTool::new(
///     Signature::new("add")
///         .with_doc("Adds two integers.")
///         .with_param(Param::required("a", TypeAnnotation::Int))
///         .with_param(Param::required("b", TypeAnnotation::Int)),
///     |args| {
///         let a: i64 = args.require("a")?;
///         let b: i64 = args.require("b")?;
///         Ok((a + b).to_string())
///     },
/// );
/// # let _ = tool;
/// ```
pub struct FnTool {
    signature: Signature,
    handler: Handler,
}

impl FnTool {
    /// Creates a tool from a signature and the function implementing it.
    pub fn new<F>(signature: Signature, handler: F) -> Self
    where
        F: Fn(&Arguments) -> ToolResult + Send + Sync + 'static,
    {
        Self {
            signature,
            handler: Box::new(handler),
        }
    }

    fn call(&self, arguments: Arguments) -> ToolResult {
        for param in self.signature.params() {
            if !param.has_default() && !arguments.contains(param.name()) {
                return Err(Error::invalid_input().with_reason(format!(
                    "missing required argument `{}`",
                    param.name()
                )));
            }
        }
        (self.handler)(&arguments)
    }
}

impl Debug for FnTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl ToolObject for FnTool {
    #[inline]
    fn signature(&self) -> Signature {
        self.signature.clone()
    }

    fn execute(
        self: Arc<Self>,
        arguments: Map<String, Value>,
        _on_request: &Option<ApprovalHandler>,
    ) -> BoxedToolFuture {
        Box::pin(async move { self.call(Arguments(arguments)) })
    }
}

/// Named arguments passed to a [`FnTool`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    /// Returns `true` if the argument is present and not `null`.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|v| !v.is_null())
    }

    /// Reads an optional argument. Absent and `null` arguments are `None`.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, Error> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|err| {
                Error::invalid_input()
                    .with_reason(format!("argument `{name}`: {err}"))
            }),
        }
    }

    /// Reads an argument that must be present.
    pub fn require<T: DeserializeOwned>(&self, name: &str) -> Result<T, Error> {
        self.get(name)?.ok_or_else(|| {
            Error::invalid_input()
                .with_reason(format!("missing required argument `{name}`"))
        })
    }

    /// Returns the raw argument map.
    #[inline]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Arguments {
    #[inline]
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
