//! An abstraction layer for the language model behind the agent.
//!
//! This crate establishes the protocol the agent uses to talk to a model
//! provider: the conversation turns it sends, the tools it advertises, and
//! the segments it gets back. Providers translate these types to and from
//! their own wire formats.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;
mod turn;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
pub use turn::*;
