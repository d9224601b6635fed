//! Invocation dispatch for the MCP bridge.
//!
//! The [`InvocationAdapter`] orchestrates one tool call end to end: registry
//! lookup, argument validation, the two-phase permission chain, and execution
//! of the registered implementation, mapping every failure into a structured
//! [`DispatchError`].

#![warn(missing_docs, clippy::pedantic)]

mod adapter;
mod observer;

pub use adapter::{DispatchError, DispatchResult, InvocationAdapter};
pub use observer::{
    CheckStage, CompositeDecisionObserver, DecisionObserver, TracingDecisionObserver,
};
