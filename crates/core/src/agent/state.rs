use alduin_model::{ModelRequest, Segment, ToolResult, ToolUse};

use super::{Agent, AgentEvent, Error, InputSource};
use crate::tool::Outcome;

/// Where the agent is in its turn loop.
///
/// ```text
/// AwaitingInput -> Querying -> Responding -> AwaitingInput
///                     ^            |
///                     |            v
///                     +----- ExecutingTools
/// ```
///
/// Any stage may move to `Closed`, which is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AgentStage {
    /// Waiting for the next user message.
    #[default]
    AwaitingInput,
    /// A model query is in flight.
    Querying,
    /// The model response is being recorded.
    Responding,
    /// The tools the model asked for are running.
    ExecutingTools,
    /// The session is over.
    Closed,
}

impl Agent {
    /// Runs the loop until the input source is exhausted.
    ///
    /// Each line is handled as by [`send_message`](Self::send_message).
    /// When the source returns `None`, the agent emits
    /// [`AgentEvent::Goodbye`] and closes.
    pub async fn run<I: InputSource>(
        &mut self,
        input: &mut I,
    ) -> Result<(), Error> {
        loop {
            if self.stage == AgentStage::Closed {
                return Err(Error::Closed);
            }
            let Some(line) = input.read_line().await else {
                debug!("input exhausted, closing");
                self.close();
                return Ok(());
            };
            self.send_message(line).await?;
        }
    }

    /// Handles one user message, until the model answers without asking
    /// for tools.
    ///
    /// The input is trimmed, and blank input is ignored. A failed model
    /// query closes the agent; the user turn stays in the conversation.
    pub async fn send_message<S: Into<String>>(
        &mut self,
        input: S,
    ) -> Result<(), Error> {
        if self.stage == AgentStage::Closed {
            return Err(Error::Closed);
        }
        let input: String = input.into();
        let input = input.trim();
        if input.is_empty() {
            trace!("ignoring blank input");
            return Ok(());
        }

        self.emit(AgentEvent::UserMessage(input.to_owned()));
        self.conversation.push_user(input.to_owned());

        loop {
            let tool_uses = self.query().await?;
            if tool_uses.is_empty() {
                self.stage = AgentStage::AwaitingInput;
                return Ok(());
            }
            self.stage = AgentStage::ExecutingTools;
            self.execute_tools(tool_uses).await;
        }
    }

    /// Closes the agent. Further messages are rejected.
    pub fn close(&mut self) {
        if self.stage != AgentStage::Closed {
            self.stage = AgentStage::Closed;
            self.emit(AgentEvent::Goodbye);
        }
    }

    /// Queries the model and records its response, returning the tool
    /// uses it asked for.
    async fn query(&mut self) -> Result<Vec<ToolUse>, Error> {
        self.stage = AgentStage::Querying;
        self.emit(AgentEvent::Thinking);

        let request = ModelRequest {
            system: self.system_prompt.clone(),
            turns: self.conversation.turns().to_vec(),
            tools: self.tools.clone(),
        };
        self.query_count += 1;
        let resp = match self.model_client.send_request(request).await {
            Ok(resp) => resp,
            Err(err) => {
                warn!("model query failed: {err}");
                self.stage = AgentStage::Closed;
                return Err(Error::Model(err));
            }
        };

        self.stage = AgentStage::Responding;
        self.total_usage.accumulate(resp.usage);

        for segment in &resp.segments {
            if let Segment::Text(text) = segment {
                self.emit(AgentEvent::AssistantText {
                    text: text.clone(),
                    usage: resp.usage,
                });
            }
        }
        let tool_uses: Vec<_> = resp.tool_uses().cloned().collect();
        debug!(
            "got {} segments with {} tool uses",
            resp.segments.len(),
            tool_uses.len()
        );
        self.conversation.push_assistant(resp.segments);
        Ok(tool_uses)
    }

    /// Runs the tool uses one after another and records their results as
    /// one turn.
    async fn execute_tools(&mut self, tool_uses: Vec<ToolUse>) {
        let mut results = Vec::with_capacity(tool_uses.len());
        for ToolUse {
            id,
            name,
            arguments,
        } in tool_uses
        {
            self.emit(AgentEvent::ToolCall {
                id: id.clone(),
                name: name.clone(),
                arguments: arguments.clone(),
            });

            let outcome = self.registry.dispatch(&name, arguments).await;
            let is_error = outcome.is_error();
            let event = match &outcome {
                Outcome::Success(content) => AgentEvent::ToolResult {
                    id: id.clone(),
                    name,
                    content: content.clone(),
                },
                Outcome::Failure(message) => AgentEvent::ToolError {
                    id: id.clone(),
                    name,
                    message: message.clone(),
                },
            };
            self.emit(event);

            results.push(ToolResult {
                id,
                content: outcome.into_content(),
                is_error,
            });
        }
        self.conversation.push_tool_results(results);
    }
}
