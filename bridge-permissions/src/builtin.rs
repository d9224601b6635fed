//! Built-in permission predicates.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use bridge_primitives::RequestContext;
use serde_json::Value;

use crate::access::{PermissionResult, TargetObject, ToolRef};
use crate::predicate::Permission;

/// Allows any access, authenticated or not.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAny;

#[async_trait]
impl Permission for AllowAny {
    fn label(&self) -> &str {
        "AllowAny"
    }

    async fn has_permission(
        &self,
        _request: &RequestContext,
        _tool: &ToolRef<'_>,
    ) -> PermissionResult<bool> {
        Ok(true)
    }
}

/// Requires an authenticated subject.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsAuthenticated;

#[async_trait]
impl Permission for IsAuthenticated {
    fn label(&self) -> &str {
        "IsAuthenticated"
    }

    fn denial_message(&self) -> String {
        "Authentication required.".to_owned()
    }

    async fn has_permission(
        &self,
        request: &RequestContext,
        _tool: &ToolRef<'_>,
    ) -> PermissionResult<bool> {
        Ok(request.subject().is_authenticated())
    }
}

/// Requires an authenticated staff subject.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsAdminUser;

#[async_trait]
impl Permission for IsAdminUser {
    fn label(&self) -> &str {
        "IsAdminUser"
    }

    fn denial_message(&self) -> String {
        "Admin privileges required.".to_owned()
    }

    async fn has_permission(
        &self,
        request: &RequestContext,
        _tool: &ToolRef<'_>,
    ) -> PermissionResult<bool> {
        Ok(request.subject().is_staff())
    }
}

/// Requires an authenticated superuser subject.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsSuperUser;

#[async_trait]
impl Permission for IsSuperUser {
    fn label(&self) -> &str {
        "IsSuperUser"
    }

    fn denial_message(&self) -> String {
        "Superuser privileges required.".to_owned()
    }

    async fn has_permission(
        &self,
        request: &RequestContext,
        _tool: &ToolRef<'_>,
    ) -> PermissionResult<bool> {
        Ok(request.subject().is_superuser())
    }
}

/// Requires a valid API key on the request.
///
/// The key is looked for in the `Authorization: Api-Key <key>` header, the
/// `x-api-key` header, and the `api_key` query parameter, in that order, and
/// validated against the configured key set.
#[derive(Debug, Clone, Default)]
pub struct HasApiKey {
    valid_keys: BTreeSet<String>,
}

impl HasApiKey {
    /// Creates a predicate accepting the supplied keys.
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            valid_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    fn extract_key<'a>(request: &'a RequestContext) -> Option<&'a str> {
        if let Some(authorization) = request.header("authorization") {
            if let Some(key) = authorization.strip_prefix("Api-Key ") {
                return Some(key);
            }
        }

        if let Some(key) = request.header("x-api-key") {
            return Some(key);
        }

        request.query_param("api_key")
    }
}

#[async_trait]
impl Permission for HasApiKey {
    fn label(&self) -> &str {
        "HasApiKey"
    }

    fn denial_message(&self) -> String {
        "Valid API key required.".to_owned()
    }

    async fn has_permission(
        &self,
        request: &RequestContext,
        _tool: &ToolRef<'_>,
    ) -> PermissionResult<bool> {
        match Self::extract_key(request) {
            Some(key) => Ok(self.valid_keys.contains(key)),
            None => Ok(false),
        }
    }
}

/// Requires the calling subject to own the target object.
///
/// Ownership is read from the configured attribute of the target, which must
/// hold the owner's subject id. The subject-level check passes unconditionally
/// so the predicate composes with subject gates such as [`IsAuthenticated`];
/// the decision happens at the object level.
#[derive(Debug, Clone)]
pub struct IsResourceOwner {
    field: String,
}

impl IsResourceOwner {
    /// Creates a predicate reading ownership from the named attribute.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Returns the attribute name holding the owner id.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }
}

#[async_trait]
impl Permission for IsResourceOwner {
    fn label(&self) -> &str {
        "IsResourceOwner"
    }

    fn denial_message(&self) -> String {
        "You must be the owner to perform this action.".to_owned()
    }

    async fn has_permission(
        &self,
        _request: &RequestContext,
        _tool: &ToolRef<'_>,
    ) -> PermissionResult<bool> {
        Ok(true)
    }

    async fn has_object_permission(
        &self,
        request: &RequestContext,
        _tool: &ToolRef<'_>,
        target: &dyn TargetObject,
    ) -> PermissionResult<bool> {
        let Some(subject_id) = request.subject().id() else {
            return Ok(false);
        };

        match target.attribute(&self.field) {
            Some(Value::String(owner)) => Ok(owner == subject_id.to_string()),
            Some(_) | None => Ok(false),
        }
    }
}

/// Combines predicates with AND logic: every inner check must pass.
pub struct AllOf {
    permissions: Vec<Arc<dyn Permission>>,
}

impl AllOf {
    /// Creates the combinator from the supplied predicates.
    #[must_use]
    pub fn new<I>(permissions: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Permission>>,
    {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Permission for AllOf {
    fn label(&self) -> &str {
        "AllOf"
    }

    async fn has_permission(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
    ) -> PermissionResult<bool> {
        for permission in &self.permissions {
            if !permission.has_permission(request, tool).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn has_object_permission(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
        target: &dyn TargetObject,
    ) -> PermissionResult<bool> {
        for permission in &self.permissions {
            if !permission
                .has_object_permission(request, tool, target)
                .await?
            {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Combines predicates with OR logic: at least one inner check must pass.
pub struct AnyOf {
    permissions: Vec<Arc<dyn Permission>>,
}

impl AnyOf {
    /// Creates the combinator from the supplied predicates.
    #[must_use]
    pub fn new<I>(permissions: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Permission>>,
    {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Permission for AnyOf {
    fn label(&self) -> &str {
        "AnyOf"
    }

    async fn has_permission(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
    ) -> PermissionResult<bool> {
        for permission in &self.permissions {
            if permission.has_permission(request, tool).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn has_object_permission(
        &self,
        request: &RequestContext,
        tool: &ToolRef<'_>,
        target: &dyn TargetObject,
    ) -> PermissionResult<bool> {
        for permission in &self.permissions {
            if permission
                .has_object_permission(request, tool, target)
                .await?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
