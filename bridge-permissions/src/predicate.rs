//! The permission predicate contract.

use async_trait::async_trait;
use bridge_primitives::RequestContext;

use crate::access::{PermissionResult, TargetObject, ToolRef};

/// A single authorization predicate.
///
/// Predicates are evaluated in two phases. The subject-level check runs
/// before any implementation logic and before any target object is fetched;
/// the object-level check runs only when the invocation has a concrete target
/// and every subject-level check in the chain has already passed. Predicates
/// with no object-level semantics keep the pass-through default so they
/// compose with object-aware predicates.
///
/// Checks return `Ok(bool)`; an `Err` marks a predicate fault (for example an
/// unreachable credential backend) and is treated as a denial by the chain.
#[async_trait]
pub trait Permission: Send + Sync {
    /// Short identifier used in logs and debug output.
    fn label(&self) -> &str;

    /// Caller-safe message attached to denials produced by this predicate.
    fn denial_message(&self) -> String {
        "Permission denied.".to_owned()
    }

    /// Subject-level gate: may this subject invoke this tool at all?
    async fn has_permission(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
    ) -> PermissionResult<bool>;

    /// Object-level gate: may this subject act on this specific object?
    async fn has_object_permission(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
        target: &dyn TargetObject,
    ) -> PermissionResult<bool> {
        let _ = (request, tool, target);
        Ok(true)
    }
}
