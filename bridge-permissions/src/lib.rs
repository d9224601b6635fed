//! Permission predicates and chain evaluation for the MCP bridge.
//!
//! A tool declares an ordered list of permissions at registration time. Each
//! permission exposes a subject-level check and an object-level check; the
//! [`PermissionChain`] evaluates them in declaration order with
//! short-circuiting denial, failing closed when a predicate faults.

#![warn(missing_docs, clippy::pedantic)]

mod access;
mod builtin;
mod chain;
mod predicate;
mod resolver;

/// Decision and target-object vocabulary.
pub use access::{AccessDecision, JsonTarget, PermissionError, PermissionResult, TargetObject, ToolRef};
/// Built-in predicates ported from the classic REST-framework set.
pub use builtin::{
    AllOf, AllowAny, AnyOf, HasApiKey, IsAdminUser, IsAuthenticated, IsResourceOwner, IsSuperUser,
};
/// Ordered, short-circuiting permission chain.
pub use chain::PermissionChain;
/// The permission predicate contract.
pub use predicate::Permission;
/// Name-to-predicate resolution.
pub use resolver::{PermissionFactory, PermissionResolver, PermissionSpec};
