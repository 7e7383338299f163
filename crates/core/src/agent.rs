mod builder;
mod event;
mod state;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};
use std::future::ready;

use alduin_model::{ModelProviderError, ModelTool, Usage};

use crate::conversation::Conversation;
use crate::model_client::ModelClient;
use crate::tool::Registry;
pub use builder::AgentBuilder;
pub use event::AgentEvent;
pub use state::AgentStage;

pub(crate) type EventHandler = Box<dyn Fn(AgentEvent) + Send + Sync>;

/// An agent instance, which maintains a conversation, a model provider,
/// and the tools the model may call.
///
/// The agent is strictly sequential: exactly one model query or one tool
/// call is in flight at any time, and tool calls of one response run in
/// the order the model asked for them.
pub struct Agent {
    model_client: ModelClient,
    registry: Registry,
    tools: Vec<ModelTool>,
    system_prompt: Option<String>,
    conversation: Conversation,
    stage: AgentStage,
    total_usage: Usage,
    query_count: usize,
    on_event: Option<EventHandler>,
}

impl Agent {
    fn from_builder(builder: AgentBuilder) -> Self {
        let AgentBuilder {
            model_client,
            registry,
            system_prompt,
            on_event,
        } = builder;

        // Descriptors are fixed for the whole session.
        let tools = registry.definitions();
        debug!("agent created with {} tools", tools.len());

        Self {
            model_client,
            registry,
            tools,
            system_prompt,
            conversation: Conversation::default(),
            stage: AgentStage::default(),
            total_usage: Usage::default(),
            query_count: 0,
            on_event,
        }
    }

    /// Returns the current stage.
    #[inline]
    pub fn stage(&self) -> AgentStage {
        self.stage
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the token usage accumulated over all model queries.
    #[inline]
    pub fn total_usage(&self) -> Usage {
        self.total_usage
    }

    /// Returns how many model queries have been issued.
    #[inline]
    pub fn query_count(&self) -> usize {
        self.query_count
    }

    /// Returns the tool registry.
    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    fn emit(&self, event: AgentEvent) {
        trace!("emitting event: {event:?}");
        if let Some(on_event) = &self.on_event {
            on_event(event);
        }
    }
}

impl Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("stage", &self.stage)
            .field("registry", &self.registry)
            .field("turns", &self.conversation.len())
            .field("total_usage", &self.total_usage)
            .finish_non_exhaustive()
    }
}

/// A source of user input lines.
pub trait InputSource {
    /// Reads the next line.
    ///
    /// Returns `None` on interrupt or end of input, which closes the agent.
    fn read_line(&mut self) -> impl Future<Output = Option<String>>;
}

impl InputSource for VecDeque<String> {
    #[inline]
    fn read_line(&mut self) -> impl Future<Output = Option<String>> {
        ready(self.pop_front())
    }
}

/// Errors that stop the agent.
#[derive(Debug)]
pub enum Error {
    /// The model query failed. The agent is closed afterwards.
    Model(Box<dyn ModelProviderError>),
    /// The agent is already closed.
    Closed,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Model(err) => {
                write!(f, "Model query failed ({}): {err}", err.kind())
            }
            Error::Closed => write!(f, "The agent is closed"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Model(err) => Some(err.as_ref()),
            Error::Closed => None,
        }
    }
}
