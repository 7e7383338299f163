use std::any::Any;
use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use alduin_model::ModelTool;
use futures_util::FutureExt;
use serde_json::{Map, Value};
use tracing::Instrument;

use super::object::{ApprovalHandler, ToolObject};
use super::{AnyTool, Approval, Error, FnTool, Tool};
use crate::schema::{ToolDescriptor, describe};

/// The outcome of dispatching one tool call.
///
/// Both variants carry the text that goes back to the model; failures are
/// data, not faults.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The tool ran and produced this output.
    Success(String),
    /// The call failed, for the described reason.
    Failure(String),
}

impl Outcome {
    /// Returns the text of this outcome.
    #[inline]
    pub fn content(&self) -> &str {
        match self {
            Outcome::Success(content) | Outcome::Failure(content) => content,
        }
    }

    /// Returns `true` for failures.
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Consumes the outcome and returns its text.
    #[inline]
    pub fn into_content(self) -> String {
        match self {
            Outcome::Success(content) | Outcome::Failure(content) => content,
        }
    }
}

struct Entry {
    descriptor: ToolDescriptor,
    tool: Arc<dyn ToolObject>,
}

/// The set of tools available to the model, keyed by name.
///
/// Each tool's descriptor is generated when it is registered. Registering a
/// name twice replaces the earlier tool; the name keeps its original
/// position in [`descriptors`](Self::descriptors).
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    on_request: Option<ApprovalHandler>,
}

impl Registry {
    /// Creates an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    #[inline]
    pub fn register<T: Tool>(&mut self, tool: T) -> &mut Self {
        self.insert(Arc::new(AnyTool(tool)))
    }

    /// Registers a function-backed tool.
    #[inline]
    pub fn register_fn(&mut self, tool: FnTool) -> &mut Self {
        self.insert(Arc::new(tool))
    }

    fn insert(&mut self, tool: Arc<dyn ToolObject>) -> &mut Self {
        let descriptor = describe(&tool.signature());
        let name = descriptor.name().to_owned();
        let entry = Entry { descriptor, tool };
        match self.index.get(&name) {
            Some(&idx) => {
                debug!("tool `{name}` registered again, replacing it");
                self.entries[idx] = entry;
            }
            None => {
                self.index.insert(name, self.entries.len());
                self.entries.push(entry);
            }
        }
        self
    }

    /// Sets the handler that receives approval requests from tools.
    ///
    /// Without a handler, every request is approved.
    #[inline]
    pub fn on_request<F: Fn(Approval) + Send + Sync + 'static>(
        &mut self,
        on_request: F,
    ) {
        self.on_request = Some(Box::new(on_request));
    }

    /// Takes over the approval handler of `other`, unless this registry
    /// already has one.
    #[inline]
    pub(crate) fn inherit_approval_handler(&mut self, other: &mut Registry) {
        if self.on_request.is_none() {
            self.on_request = other.on_request.take();
        }
    }

    /// Returns the descriptor of the named tool.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&idx| &self.entries[idx].descriptor)
    }

    /// Returns all descriptors, in registration order.
    #[inline]
    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Returns all tool definitions, in registration order.
    #[inline]
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.descriptors().map(ToolDescriptor::to_model_tool).collect()
    }

    /// Returns the number of registered tools.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no tools are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the named tool with the given arguments.
    ///
    /// Never fails: an unknown name, bad arguments, a rejected approval, an
    /// error returned by the tool, and a panic inside it all come back as
    /// [`Outcome::Failure`].
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Outcome {
        let Some(&idx) = self.index.get(name) else {
            warn!("tool not found: {name}");
            return Outcome::Failure(
                Error::unknown_tool().with_reason(format!("`{name}`")).to_string(),
            );
        };
        let tool = Arc::clone(&self.entries[idx].tool);

        let span = debug_span!("tool dispatch", tool = name);
        trace!(parent: &span, "dispatching with args: {arguments:?}");

        let fut = match catch_unwind(AssertUnwindSafe(|| {
            tool.execute(arguments, &self.on_request)
        })) {
            Ok(fut) => fut,
            Err(panic) => return panicked(name, panic),
        };

        match AssertUnwindSafe(fut).catch_unwind().instrument(span).await {
            Ok(Ok(output)) => Outcome::Success(output),
            Ok(Err(err)) => {
                debug!("tool `{name}` failed: {err}");
                Outcome::Failure(err.to_string())
            }
            Err(panic) => panicked(name, panic),
        }
    }
}

fn panicked(name: &str, panic: Box<dyn Any + Send>) -> Outcome {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned());
    error!("tool `{name}` panicked: {message}");
    Outcome::Failure(
        Error::execution_error()
            .with_reason(format!("the tool panicked: {message}"))
            .to_string(),
    )
}

impl Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field(
                "tools",
                &self.descriptors().map(ToolDescriptor::name).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::future::ready;
    use std::sync::Mutex;

    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::schema::{Param, Signature, TypeAnnotation, TypeSchema};
    use crate::tool::ToolResult;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    fn constant(name: &str, output: &'static str) -> FnTool {
        FnTool::new(Signature::new(name), move |_| Ok(output.to_owned()))
    }

    /// Echoes the text back.
    #[derive(Deserialize, JsonSchema)]
    struct EchoInput {
        /// What to echo.
        text: String,
        times: Option<usize>,
    }

    struct EchoTool;

    impl Tool for EchoTool {
        type Input = EchoInput;

        fn name(&self) -> &str {
            "echo"
        }

        fn doc(&self) -> &str {
            "Echo some text.

            Args:
                times: How many times to repeat it."
        }

        fn make_approval(&self, input: &EchoInput) -> Option<Approval> {
            (input.text == "secret")
                .then(|| Approval::new(&input.text, "Agent wants to echo a secret"))
        }

        fn execute(
            &self,
            input: EchoInput,
        ) -> impl Future<Output = ToolResult> + Send + 'static {
            ready(Ok(input.text.repeat(input.times.unwrap_or(1))))
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = Registry::new();
        let outcome = registry.dispatch("foo", Map::new()).await;
        assert!(outcome.is_error());
        assert!(outcome.content().to_lowercase().contains("unknown tool"));
        assert!(outcome.content().contains("foo"));
    }

    #[tokio::test]
    async fn test_derived_tool() {
        let mut registry = Registry::new();
        registry.register(EchoTool);

        let descriptor = registry.get("echo").unwrap();
        assert_eq!(descriptor.description(), "Echo some text.");
        let params = descriptor.parameters();
        assert_eq!(params[0].description.as_deref(), Some("What to echo."));
        assert!(params[0].required);
        assert_eq!(params[1].schema, TypeSchema::Integer);
        assert_eq!(
            params[1].description.as_deref(),
            Some("How many times to repeat it.")
        );
        assert!(!params[1].required);

        let outcome = registry
            .dispatch("echo", args(json!({ "text": "ab", "times": 2 })))
            .await;
        assert_eq!(outcome, Outcome::Success("abab".to_owned()));
    }

    #[tokio::test]
    async fn test_invalid_arguments() {
        let mut registry = Registry::new();
        registry.register(EchoTool);

        let outcome = registry.dispatch("echo", args(json!({ "times": 2 }))).await;
        assert!(outcome.is_error());
        assert!(outcome.content().starts_with("Invalid input"));

        let outcome = registry
            .dispatch("echo", args(json!({ "text": 42 })))
            .await;
        assert!(outcome.is_error());
    }

    #[tokio::test]
    async fn test_tool_error_and_panic_become_failures() {
        let mut registry = Registry::new();
        registry
            .register_fn(FnTool::new(Signature::new("broken"), |_| {
                Err(crate::tool::Error::execution_error().with_reason("disk on fire"))
            }))
            .register_fn(FnTool::new(Signature::new("panicky"), |_| {
                panic!("boom");
            }));

        let outcome = registry.dispatch("broken", Map::new()).await;
        assert_eq!(
            outcome,
            Outcome::Failure("Execution error: disk on fire".to_owned())
        );

        let outcome = registry.dispatch("panicky", Map::new()).await;
        assert!(outcome.is_error());
        assert!(outcome.content().contains("boom"));
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut registry = Registry::new();
        registry
            .register_fn(constant("dup", "first"))
            .register_fn(constant("other", "other"))
            .register_fn(
                FnTool::new(
                    Signature::new("dup")
                        .with_param(Param::optional("x", TypeAnnotation::Int)),
                    |_| Ok("second".to_owned()),
                ),
            );

        assert_eq!(registry.len(), 2);
        let names: Vec<_> = registry.descriptors().map(|d| d.name()).collect();
        assert_eq!(names, ["dup", "other"]);
        assert_eq!(registry.get("dup").unwrap().parameters().len(), 1);

        let outcome = registry.dispatch("dup", Map::new()).await;
        assert_eq!(outcome, Outcome::Success("second".to_owned()));
    }

    #[tokio::test]
    async fn test_approval() {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let mut registry = Registry::new();
        registry.register(EchoTool);
        registry.on_request({
            let requests = Arc::clone(&requests);
            move |approval: Approval| {
                requests.lock().unwrap().push(approval.to_string());
                assert_eq!(approval.tool(), "echo");
                approval.reject(Some("not today".to_owned()));
            }
        });

        let outcome = registry.dispatch("echo", args(json!({ "text": "hi" }))).await;
        assert_eq!(outcome, Outcome::Success("hi".to_owned()));
        assert!(requests.lock().unwrap().is_empty());

        let outcome = registry
            .dispatch("echo", args(json!({ "text": "secret" })))
            .await;
        assert_eq!(
            outcome,
            Outcome::Failure("Permission denied: not today".to_owned())
        );
        assert_eq!(
            requests.lock().unwrap().as_slice(),
            ["secret (Agent wants to echo a secret)"]
        );
    }

    #[tokio::test]
    async fn test_approved_without_handler() {
        let mut registry = Registry::new();
        registry.register(EchoTool);
        let outcome = registry
            .dispatch("echo", args(json!({ "text": "secret" })))
            .await;
        assert_eq!(outcome, Outcome::Success("secret".to_owned()));
    }

    #[test]
    fn test_definitions() {
        let mut registry = Registry::new();
        registry.register(EchoTool);
        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 1);
        assert_eq!(
            definitions[0].parameters,
            json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "What to echo." },
                    "times": {
                        "type": "integer",
                        "description": "How many times to repeat it."
                    }
                },
                "required": ["text"]
            })
        );
    }
}
