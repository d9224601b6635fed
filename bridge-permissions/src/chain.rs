//! Ordered permission chain evaluation.

use std::fmt;
use std::sync::Arc;

use bridge_primitives::RequestContext;
use tracing::{debug, warn};

use crate::access::{AccessDecision, TargetObject, ToolRef};
use crate::predicate::Permission;

/// An ordered sequence of permission predicates attached to one tool.
///
/// Subject-level checks run for every predicate in declaration order and deny
/// on the first failure. Object-level checks run only when every subject-level
/// check passed and the invocation supplied a target, again in declaration
/// order with the same short-circuit rule. An empty chain grants.
///
/// A predicate that returns an error is treated as a denial: the fault is
/// logged and the caller sees a generic denial, never the fault detail.
#[derive(Clone, Default)]
pub struct PermissionChain {
    permissions: Vec<Arc<dyn Permission>>,
}

impl fmt::Debug for PermissionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.permissions.iter().map(|p| p.label()).collect();
        f.debug_tuple("PermissionChain").field(&labels).finish()
    }
}

impl PermissionChain {
    /// Creates a chain from the supplied predicates, preserving order.
    #[must_use]
    pub fn new<I>(permissions: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Permission>>,
    {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Creates an empty, always-granting chain.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of predicates in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Returns `true` when the chain has no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Returns the predicate labels in declaration order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.permissions.iter().map(|p| p.label()).collect()
    }

    /// Runs the subject-level checks.
    pub async fn check_subject(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
    ) -> AccessDecision {
        for permission in &self.permissions {
            match permission.has_permission(request, tool).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(
                        tool = tool.name(),
                        permission = permission.label(),
                        "subject-level permission denied"
                    );
                    return AccessDecision::deny(permission.denial_message());
                }
                Err(err) => {
                    warn!(
                        tool = tool.name(),
                        permission = permission.label(),
                        error = %err,
                        "subject-level permission check faulted; denying"
                    );
                    return AccessDecision::deny("Permission denied.");
                }
            }
        }

        debug!(tool = tool.name(), "subject-level permission checks passed");
        AccessDecision::grant()
    }

    /// Runs the object-level checks against a concrete target.
    pub async fn check_object(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
        target: &dyn TargetObject,
    ) -> AccessDecision {
        for permission in &self.permissions {
            match permission.has_object_permission(request, tool, target).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(
                        tool = tool.name(),
                        permission = permission.label(),
                        "object-level permission denied"
                    );
                    return AccessDecision::deny(permission.denial_message());
                }
                Err(err) => {
                    warn!(
                        tool = tool.name(),
                        permission = permission.label(),
                        error = %err,
                        "object-level permission check faulted; denying"
                    );
                    return AccessDecision::deny("Permission denied.");
                }
            }
        }

        debug!(tool = tool.name(), "object-level permission checks passed");
        AccessDecision::grant()
    }

    /// Runs both phases: subject checks first, then object checks when a
    /// target is present.
    pub async fn check(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
        target: Option<&dyn TargetObject>,
    ) -> AccessDecision {
        let decision = self.check_subject(request, tool).await;
        if decision.is_denied() {
            return decision;
        }

        match target {
            Some(target) => self.check_object(request, tool, target).await,
            None => decision,
        }
    }
}
