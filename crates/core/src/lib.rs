//! Core logic including tool schemas, tool dispatch, and the agent loop.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod agent;
pub mod conversation;
mod model_client;
pub mod schema;
pub mod tool;

pub use agent::{
    Agent, AgentBuilder, AgentEvent, AgentStage, Error as AgentError,
    InputSource,
};
