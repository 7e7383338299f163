use alduin_model::ModelProvider;

use super::{Agent, AgentEvent, EventHandler};
use crate::model_client::ModelClient;
use crate::tool::{Approval, FnTool, Registry, Tool};

/// [`Agent`] builder.
pub struct AgentBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) registry: Registry,
    pub(crate) system_prompt: Option<String>,
    pub(crate) on_event: Option<EventHandler>,
}

impl AgentBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            registry: Registry::new(),
            system_prompt: None,
            on_event: None,
        }
    }

    /// Sets the system prompt sent with every query.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Registers a tool.
    #[inline]
    pub fn with_tool<T: Tool>(mut self, tool: T) -> Self {
        self.registry.register(tool);
        self
    }

    /// Registers a function-backed tool.
    #[inline]
    pub fn with_fn_tool(mut self, tool: FnTool) -> Self {
        self.registry.register_fn(tool);
        self
    }

    /// Replaces the tool registry with a prepared one.
    ///
    /// Tools registered before this call are dropped. An approval handler
    /// attached earlier is kept, unless `registry` has its own.
    #[inline]
    pub fn with_registry(mut self, mut registry: Registry) -> Self {
        registry.inherit_approval_handler(&mut self.registry);
        self.registry = registry;
        self
    }

    /// Attaches a callback receiving every [`AgentEvent`], in order.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(AgentEvent) + Send + Sync + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(on_event));
        self
    }

    /// Attaches a callback to be invoked when a tool asks for approval.
    ///
    /// Without one, every request is approved.
    #[inline]
    pub fn on_tool_call_request(
        mut self,
        on_request: impl Fn(Approval) + Send + Sync + 'static,
    ) -> Self {
        self.registry.on_request(on_request);
        self
    }

    /// Builds the agent.
    #[inline]
    pub fn build(self) -> Agent {
        Agent::from_builder(self)
    }
}
