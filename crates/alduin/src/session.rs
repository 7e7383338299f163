use alduin_core::tool::Approval as ToolApproval;
use alduin_core::{
    Agent, AgentBuilder, AgentError, AgentEvent, AgentStage, InputSource,
};
use alduin_model::{ModelProvider, Usage};

use crate::tools::*;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    agent_builder: AgentBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let agent_builder = AgentBuilder::with_model_provider(provider);
        Self { agent_builder }
    }

    /// Sets the system prompt for the agent.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.agent_builder = self.agent_builder.with_system_prompt(prompt);
        self
    }

    /// Attaches a callback to be invoked for every agent event.
    #[inline]
    pub fn on_event(
        mut self,
        on_event: impl Fn(AgentEvent) + Send + Sync + 'static,
    ) -> Self {
        self.agent_builder = self.agent_builder.on_event(on_event);
        self
    }

    /// Attaches a callback to be invoked when a tool call request is received.
    #[inline]
    pub fn on_tool_call_request(
        mut self,
        on_tool_call_request: impl Fn(ToolApproval) + Send + Sync + 'static,
    ) -> Self {
        self.agent_builder = self
            .agent_builder
            .on_tool_call_request(on_tool_call_request);
        self
    }

    /// Builds a new session with the built-in tools.
    pub fn build(self) -> Session {
        let agent = self
            .agent_builder
            .with_tool(ReadFileTool::new())
            .with_tool(EditFileTool::new())
            .with_tool(ListFilesTool::new())
            .with_tool(BashTool::new())
            .build();

        Session { agent }
    }
}

/// A chat session, like a window that displays messages and has a input box.
///
/// The session holds a fully configured agent that you can use directly, and it
/// is basically a wrapper around [`Agent`].
pub struct Session {
    agent: Agent,
}

impl Session {
    /// Sends a message to the session and waits for the final answer.
    #[inline]
    pub async fn send_message(&mut self, message: &str) -> Result<(), AgentError> {
        self.agent.send_message(message).await
    }

    /// Keeps reading messages from `input` until it is exhausted.
    #[inline]
    pub async fn run<I: InputSource>(
        &mut self,
        input: &mut I,
    ) -> Result<(), AgentError> {
        self.agent.run(input).await
    }

    /// Returns the current stage of the agent.
    #[inline]
    pub fn stage(&self) -> AgentStage {
        self.agent.stage()
    }

    /// Returns the token usage so far.
    #[inline]
    pub fn total_usage(&self) -> Usage {
        self.agent.total_usage()
    }

    /// Returns the underlying agent.
    #[inline]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }
}
