//! A minimal coding agent that assembles file and shell tools around a
//! model provider.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to bring the agent into your own host apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod session;
pub mod tools;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`alduin_core`] crate.
pub mod core {
    pub use alduin_core::*;
}
