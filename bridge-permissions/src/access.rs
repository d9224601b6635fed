//! Decision types and the target-object contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors surfaced by permission resolution and evaluation.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// A named permission did not resolve through the resolver table.
    #[error("unknown permission `{name}`")]
    UnknownPermission {
        /// The unresolved name.
        name: String,
    },

    /// A predicate could not complete its check.
    #[error("permission check failed: {reason}")]
    Check {
        /// Human-readable explanation for logging and operators.
        reason: String,
    },
}

impl PermissionError {
    /// Creates a check error from the supplied reason.
    #[must_use]
    pub fn check(reason: impl Into<String>) -> Self {
        Self::Check {
            reason: reason.into(),
        }
    }
}

/// Result alias for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;

/// Lightweight view of the tool a permission is gating.
///
/// Predicates receive this instead of the full descriptor so the permission
/// crate stays independent of the registry.
#[derive(Clone, Copy, Debug)]
pub struct ToolRef<'a> {
    name: &'a str,
    description: &'a str,
}

impl<'a> ToolRef<'a> {
    /// Creates a tool reference.
    #[must_use]
    pub const fn new(name: &'a str, description: &'a str) -> Self {
        Self { name, description }
    }

    /// Returns the tool name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub const fn description(&self) -> &'a str {
        self.description
    }
}

/// Domain object targeted by an object-level authorization check.
///
/// Implementations expose their authorization-relevant fields as JSON values
/// keyed by attribute name. Ownership predicates compare a configured
/// attribute against the calling subject.
pub trait TargetObject: Send + Sync {
    /// Returns the named attribute, if the object carries it.
    fn attribute(&self, name: &str) -> Option<Value>;
}

/// [`TargetObject`] backed by a JSON object, for implementations whose domain
/// rows already serialize to JSON.
#[derive(Clone, Debug, Default)]
pub struct JsonTarget(Map<String, Value>);

impl JsonTarget {
    /// Creates a target from a JSON object map.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Adds an attribute and returns the updated target.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.0.insert(name.into(), value);
        self
    }
}

impl TargetObject for JsonTarget {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.0.get(name).cloned()
    }
}

/// Outcome of evaluating a permission chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    granted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl AccessDecision {
    /// Returns a granting decision.
    #[must_use]
    pub const fn grant() -> Self {
        Self {
            granted: true,
            message: None,
        }
    }

    /// Returns a denying decision carrying a caller-safe message.
    ///
    /// The message must not identify the target object or its owner; denial
    /// responses are visible to unauthorized callers.
    #[must_use]
    pub fn deny(message: impl Into<String>) -> Self {
        Self {
            granted: false,
            message: Some(message.into()),
        }
    }

    /// Returns `true` when access was granted.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        self.granted
    }

    /// Returns `true` when access was denied.
    #[must_use]
    pub const fn is_denied(&self) -> bool {
        !self.granted
    }

    /// Returns the denial message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
