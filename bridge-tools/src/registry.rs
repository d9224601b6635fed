//! Process-wide registry of tool descriptors.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bridge_permissions::{
    PermissionChain, PermissionError, PermissionResolver, PermissionSpec, TargetObject, ToolRef,
};
use bridge_primitives::ToolName;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::schema::ParameterSchema;

/// Result alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors produced by tool registration and execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Registration metadata failed validation.
    #[error("invalid tool registration: {source}")]
    InvalidRegistration {
        /// Underlying validation failure.
        #[from]
        source: bridge_primitives::Error,
    },

    /// Tool name collided with an existing registration.
    #[error("tool `{name}` is already registered")]
    DuplicateTool {
        /// Name of the offending tool.
        name: String,
    },

    /// Requested tool does not exist.
    #[error("tool `{name}` is not registered")]
    UnknownTool {
        /// Name of the missing tool.
        name: String,
    },

    /// A declared permission name did not resolve.
    #[error("permission resolution failed for tool `{tool}`: {source}")]
    PermissionResolution {
        /// Tool whose registration failed.
        tool: String,
        /// Underlying resolution failure.
        source: PermissionError,
    },

    /// Tool execution failed.
    #[error("tool execution failed: {reason}")]
    Execution {
        /// Human-readable error returned by the implementation.
        reason: String,
    },
}

impl ToolError {
    /// Creates an execution error from the supplied reason.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }
}

/// Uniform execution interface every registered implementation is adapted
/// into.
///
/// Async functions and closures get this for free through the blanket
/// implementation (the plain-callable shape); executor objects implement it
/// directly (the class-with-`execute` shape). The registry and the invocation
/// adapter only ever see this trait.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Invokes the tool with validated JSON arguments, returning JSON output.
    async fn execute(&self, arguments: Value) -> ToolResult<Value>;
}

#[async_trait]
impl<F, Fut> ToolExecutor for F
where
    F: Send + Sync + Fn(Value) -> Fut,
    Fut: Future<Output = ToolResult<Value>> + Send,
{
    async fn execute(&self, arguments: Value) -> ToolResult<Value> {
        (self)(arguments).await
    }
}

/// Supplies the domain object an invocation acts on, when the tool has
/// single-object semantics.
///
/// The loader runs only after every subject-level permission check has
/// passed; returning `Ok(None)` skips the object-level phase entirely.
#[async_trait]
pub trait TargetLoader: Send + Sync {
    /// Loads the target object for the supplied validated arguments.
    async fn load(&self, arguments: &Value) -> ToolResult<Option<Arc<dyn TargetObject>>>;
}

#[async_trait]
impl<F, Fut> TargetLoader for F
where
    F: Send + Sync + Fn(Value) -> Fut,
    Fut: Future<Output = ToolResult<Option<Arc<dyn TargetObject>>>> + Send,
{
    async fn load(&self, arguments: &Value) -> ToolResult<Option<Arc<dyn TargetObject>>> {
        (self)(arguments.clone()).await
    }
}

/// Declarative description of a tool being registered.
#[derive(Clone)]
pub struct ToolRegistration {
    name: String,
    description: String,
    schema: ParameterSchema,
    permissions: Vec<PermissionSpec>,
    target_loader: Option<Arc<dyn TargetLoader>>,
}

impl ToolRegistration {
    /// Starts a registration for the supplied tool name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schema: ParameterSchema::new(),
            permissions: Vec::new(),
            target_loader: None,
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the parameter schema.
    #[must_use]
    pub fn schema(mut self, schema: ParameterSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Appends a permission spec, preserving declaration order.
    #[must_use]
    pub fn permission(mut self, spec: impl Into<PermissionSpec>) -> Self {
        self.permissions.push(spec.into());
        self
    }

    /// Attaches a target loader enabling object-level permission checks.
    #[must_use]
    pub fn target_loader<L>(mut self, loader: L) -> Self
    where
        L: TargetLoader + 'static,
    {
        self.target_loader = Some(Arc::new(loader));
        self
    }
}

/// Immutable record of one registered tool.
pub struct ToolDescriptor {
    name: ToolName,
    description: String,
    schema: ParameterSchema,
    permissions: PermissionChain,
    executor: Arc<dyn ToolExecutor>,
    target_loader: Option<Arc<dyn TargetLoader>>,
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name.as_str())
            .field("permissions", &self.permissions.labels())
            .field("has_target_loader", &self.target_loader.is_some())
            .finish_non_exhaustive()
    }
}

impl ToolDescriptor {
    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameter schema.
    #[must_use]
    pub fn schema(&self) -> &ParameterSchema {
        &self.schema
    }

    /// Returns the resolved permission chain.
    #[must_use]
    pub fn permissions(&self) -> &PermissionChain {
        &self.permissions
    }

    /// Returns the lightweight view handed to permission predicates.
    #[must_use]
    pub fn tool_ref(&self) -> ToolRef<'_> {
        ToolRef::new(self.name.as_str(), &self.description)
    }

    /// Loads the invocation's target object, when the tool declares a loader.
    ///
    /// # Errors
    ///
    /// Propagates [`ToolError::Execution`] from the loader implementation.
    pub async fn load_target(
        &self,
        arguments: &Value,
    ) -> ToolResult<Option<Arc<dyn TargetObject>>> {
        match &self.target_loader {
            Some(loader) => loader.load(arguments).await,
            None => Ok(None),
        }
    }

    /// Executes the underlying implementation.
    ///
    /// # Errors
    ///
    /// Propagates [`ToolError::Execution`] from the implementation.
    pub async fn execute(&self, arguments: Value) -> ToolResult<Value> {
        self.executor.execute(arguments).await
    }

    /// Returns the discovery summary for this tool.
    #[must_use]
    pub fn summary(&self) -> ToolSummary {
        ToolSummary {
            name: self.name.as_str().to_owned(),
            description: self.description.clone(),
            input_schema: self.schema.to_value(),
        }
    }
}

/// Discovery summary exposed through the MCP capability listing.
#[derive(Clone, Debug, Serialize)]
pub struct ToolSummary {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for the accepted arguments.
    pub input_schema: Value,
}

#[derive(Default)]
struct RegistryInner {
    tools: HashMap<String, Arc<ToolDescriptor>>,
    order: Vec<String>,
}

/// Registry mapping tool names to descriptors.
///
/// Constructed once at process startup, populated during a bounded
/// registration phase, and read-only during request handling. Re-registration
/// under an existing name is rejected with [`ToolError::DuplicateTool`]
/// unless the registry was built with [`ToolRegistry::with_override`], in
/// which case the descriptor is replaced in place and keeps its original
/// position in the listing order.
pub struct ToolRegistry {
    inner: RwLock<RegistryInner>,
    resolver: PermissionResolver,
    allow_override: bool,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read().expect("tool registry poisoned");
        f.debug_struct("ToolRegistry")
            .field("registered", &inner.order)
            .field("allow_override", &self.allow_override)
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry with the built-in permission names.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(PermissionResolver::with_builtins())
    }

    /// Creates a registry using the supplied permission resolver.
    #[must_use]
    pub fn with_resolver(resolver: PermissionResolver) -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
            resolver,
            allow_override: false,
        }
    }

    /// Enables in-place replacement of existing registrations.
    #[must_use]
    pub fn with_override(mut self) -> Self {
        self.allow_override = true;
        self
    }

    /// Returns the permission resolver used during registration.
    #[must_use]
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Registers a tool.
    ///
    /// Validates the name, resolves every declared permission eagerly, and
    /// stores the descriptor. Registration-time failures are meant to abort
    /// startup; a misregistered tool must never silently go missing.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidRegistration`] for an invalid name,
    /// [`ToolError::PermissionResolution`] for a dangling permission name, and
    /// [`ToolError::DuplicateTool`] when the name is taken and override mode
    /// is off.
    ///
    /// # Panics
    ///
    /// Panics if the internal registry lock is poisoned.
    pub fn register<E>(&self, registration: ToolRegistration, executor: E) -> ToolResult<()>
    where
        E: ToolExecutor + 'static,
    {
        let name = ToolName::new(registration.name)?;
        let permissions = self
            .resolver
            .resolve_all(&registration.permissions)
            .map_err(|source| ToolError::PermissionResolution {
                tool: name.as_str().to_owned(),
                source,
            })?;

        let descriptor = Arc::new(ToolDescriptor {
            name,
            description: registration.description,
            schema: registration.schema,
            permissions,
            executor: Arc::new(executor),
            target_loader: registration.target_loader,
        });

        let mut inner = self.inner.write().expect("tool registry poisoned");
        let key = descriptor.name().to_owned();
        if inner.tools.contains_key(&key) {
            if !self.allow_override {
                return Err(ToolError::DuplicateTool { name: key });
            }
            debug!(tool = %key, "replacing existing tool registration");
        } else {
            inner.order.push(key.clone());
            debug!(tool = %key, "tool registered");
        }
        inner.tools.insert(key, descriptor);

        Ok(())
    }

    /// Returns the descriptor registered under the supplied name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] when no tool carries the name.
    pub fn lookup(&self, name: &str) -> ToolResult<Arc<ToolDescriptor>> {
        let inner = self.inner.read().expect("tool registry poisoned");
        inner
            .tools
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::UnknownTool {
                name: name.to_owned(),
            })
    }

    /// Returns `true` when a tool is registered under the name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let inner = self.inner.read().expect("tool registry poisoned");
        inner.tools.contains_key(name)
    }

    /// Returns discovery summaries in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<ToolSummary> {
        let inner = self.inner.read().expect("tool registry poisoned");
        inner
            .order
            .iter()
            .filter_map(|name| inner.tools.get(name))
            .map(|descriptor| descriptor.summary())
            .collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        let inner = self.inner.read().expect("tool registry poisoned");
        inner.tools.len()
    }

    /// Returns `true` when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
