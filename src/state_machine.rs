//! Order-taking dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod classify;
mod effect;
mod engine;
pub mod event;
pub mod script;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use engine::{advance, restart, Advance};
pub use event::Event;
pub use state::DialogueSession;
pub use transition::transition;
