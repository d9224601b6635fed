//! The invocation adapter.

use std::fmt;
use std::sync::Arc;

use bridge_permissions::AccessDecision;
use bridge_primitives::RequestContext;
use bridge_tools::{SchemaError, ToolError, ToolRegistry};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::observer::{CheckStage, DecisionObserver};

/// Result alias for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Invocation-time failures, mapped into protocol error payloads by the
/// transport layer. None of these crash the hosting process.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No tool is registered under the requested name.
    #[error("tool `{name}` is not registered")]
    UnknownTool {
        /// The requested name.
        name: String,
    },

    /// Supplied arguments failed schema validation.
    #[error("invalid arguments: {source}")]
    InvalidArguments {
        /// The schema violation.
        #[from]
        source: SchemaError,
    },

    /// The permission chain denied the invocation. The message is
    /// caller-safe and carries no object-identifying detail.
    #[error("{message}")]
    Denied {
        /// Generic denial message.
        message: String,
    },

    /// The implementation (or its target loader) failed.
    #[error("tool execution failed: {reason}")]
    Execution {
        /// Reason suitable for returning to the caller.
        reason: String,
    },
}

impl DispatchError {
    fn denied(decision: &AccessDecision) -> Self {
        Self::Denied {
            message: decision
                .message()
                .unwrap_or("Permission denied.")
                .to_owned(),
        }
    }
}

fn map_tool_error(err: ToolError) -> DispatchError {
    match err {
        ToolError::UnknownTool { name } => DispatchError::UnknownTool { name },
        ToolError::Execution { reason } => DispatchError::Execution { reason },
        // Registration-time variants cannot occur while serving traffic; if
        // one surfaces anyway it is reported as an execution fault.
        other => DispatchError::Execution {
            reason: other.to_string(),
        },
    }
}

/// Orchestrates one permission-checked tool call.
///
/// The contract, in order:
///
/// 1. resolve the descriptor through the registry;
/// 2. validate the arguments against the tool's parameter schema — validation
///    runs **before** the permission chain, so a malformed call never reaches
///    the predicates;
/// 3. run the subject-level permission checks;
/// 4. when the tool declares a target loader, load the target and run the
///    object-level checks;
/// 5. await the implementation and return its JSON value.
///
/// The adapter holds no per-call state and awaits the implementation inline,
/// so cancelling the returned future (client disconnect, timeout) cancels the
/// in-flight implementation as well.
#[derive(Clone)]
pub struct InvocationAdapter {
    registry: Arc<ToolRegistry>,
    observer: Option<Arc<dyn DecisionObserver>>,
}

impl fmt::Debug for InvocationAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationAdapter")
            .field("tools", &self.registry.len())
            .field("observer_configured", &self.observer.is_some())
            .finish()
    }
}

impl InvocationAdapter {
    /// Creates an adapter serving the supplied registry.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            observer: None,
        }
    }

    /// Installs a decision observer, returning the adapter for chaining.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn DecisionObserver>) -> Self {
        self.set_observer(observer);
        self
    }

    /// Installs or replaces the decision observer.
    pub fn set_observer(&mut self, observer: Arc<dyn DecisionObserver>) {
        self.observer = Some(observer);
    }

    /// Returns the registry this adapter serves.
    #[must_use]
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    fn notify(&self, tool: &str, stage: CheckStage, decision: &AccessDecision) {
        if let Some(observer) = &self.observer {
            observer.on_decision(tool, stage, decision);
        }
    }

    /// Dispatches one tool call.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownTool`] for an unregistered name,
    /// [`DispatchError::InvalidArguments`] when the arguments fail the
    /// tool's schema, [`DispatchError::Denied`] when the permission chain
    /// refuses the call (the implementation is never invoked), and
    /// [`DispatchError::Execution`] when the implementation or its target
    /// loader fails.
    pub async fn invoke(
        &self,
        request: &RequestContext,
        name: &str,
        arguments: Value,
    ) -> DispatchResult<Value> {
        let descriptor = self.registry.lookup(name).map_err(map_tool_error)?;
        let arguments = descriptor.schema().validate(&arguments)?;

        let tool = descriptor.tool_ref();
        let decision = descriptor
            .permissions()
            .check_subject(request, &tool)
            .await;
        self.notify(descriptor.name(), CheckStage::Subject, &decision);
        if decision.is_denied() {
            return Err(DispatchError::denied(&decision));
        }

        if let Some(target) = descriptor
            .load_target(&arguments)
            .await
            .map_err(map_tool_error)?
        {
            let decision = descriptor
                .permissions()
                .check_object(request, &tool, target.as_ref())
                .await;
            self.notify(descriptor.name(), CheckStage::Object, &decision);
            if decision.is_denied() {
                return Err(DispatchError::denied(&decision));
            }
        }

        debug!(tool = descriptor.name(), "dispatching tool invocation");
        descriptor.execute(arguments).await.map_err(map_tool_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bridge_permissions::{
        IsResourceOwner, JsonTarget, Permission, PermissionResult, PermissionSpec, TargetObject,
        ToolRef,
    };
    use bridge_primitives::{Identity, Subject, SubjectId};
    use bridge_tools::{ParameterKind, ParameterSchema, ToolRegistration};
    use serde_json::json;

    struct CountingPermission {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Permission for CountingPermission {
        fn label(&self) -> &str {
            "CountingPermission"
        }

        async fn has_permission(
            &self,
            _request: &RequestContext,
            _tool: &ToolRef<'_>,
        ) -> PermissionResult<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    struct RecordingObserver {
        decisions: Mutex<Vec<(String, CheckStage, bool)>>,
    }

    impl RecordingObserver {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                decisions: Mutex::new(Vec::new()),
            })
        }

        fn drain(&self) -> Vec<(String, CheckStage, bool)> {
            self.decisions.lock().expect("observer poisoned").drain(..).collect()
        }
    }

    impl DecisionObserver for RecordingObserver {
        fn on_decision(&self, tool: &str, stage: CheckStage, decision: &AccessDecision) {
            self.decisions
                .lock()
                .expect("observer poisoned")
                .push((tool.to_owned(), stage, decision.is_granted()));
        }
    }

    fn authenticated(id: SubjectId) -> RequestContext {
        RequestContext::new(Subject::from(Identity::new(id, "ada")))
    }

    fn adapter_with_echo() -> InvocationAdapter {
        let registry = Arc::new(ToolRegistry::new());
        registry
            .register(
                ToolRegistration::new("echo")
                    .description("Echo the payload back")
                    .schema(ParameterSchema::new().required(
                        "message",
                        ParameterKind::String,
                        "Text to echo",
                    ))
                    .permission("AllowAny"),
                |arguments: Value| async move { Ok(arguments) },
            )
            .unwrap();
        InvocationAdapter::new(registry)
    }

    #[tokio::test]
    async fn echo_round_trips_valid_arguments() {
        let adapter = adapter_with_echo();
        let output = adapter
            .invoke(
                &RequestContext::anonymous(),
                "echo",
                json!({ "message": "hello" }),
            )
            .await
            .unwrap();
        assert_eq!(output, json!({ "message": "hello" }));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let adapter = adapter_with_echo();
        let err = adapter
            .invoke(&RequestContext::anonymous(), "missing", json!({}))
            .await
            .expect_err("unknown tool");
        assert!(matches!(err, DispatchError::UnknownTool { name } if name == "missing"));
    }

    #[tokio::test]
    async fn schema_failure_precedes_permissions_and_execution() {
        let permission_calls = Arc::new(AtomicUsize::new(0));
        let executions = Arc::new(AtomicUsize::new(0));

        let registry = Arc::new(ToolRegistry::new());
        let counted = executions.clone();
        registry
            .register(
                ToolRegistration::new("strict")
                    .schema(ParameterSchema::new().required(
                        "n",
                        ParameterKind::Integer,
                        "A number",
                    ))
                    .permission(PermissionSpec::instance(CountingPermission {
                        calls: permission_calls.clone(),
                    })),
                move |arguments: Value| {
                    let counted = counted.clone();
                    async move {
                        counted.fetch_add(1, Ordering::SeqCst);
                        Ok(arguments)
                    }
                },
            )
            .unwrap();
        let adapter = InvocationAdapter::new(registry);

        let err = adapter
            .invoke(&RequestContext::anonymous(), "strict", json!({ "n": "x" }))
            .await
            .expect_err("schema violation");
        assert!(matches!(err, DispatchError::InvalidArguments { .. }));
        assert_eq!(permission_calls.load(Ordering::SeqCst), 0);
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    fn guarded_registry(owner: SubjectId, executions: Arc<AtomicUsize>) -> Arc<ToolRegistry> {
        let registry = Arc::new(ToolRegistry::new());
        registry
            .register(
                ToolRegistration::new("update_resource")
                    .description("Update a resource owned by its author")
                    .schema(ParameterSchema::new().required(
                        "resource_id",
                        ParameterKind::String,
                        "Resource identifier",
                    ))
                    .permission("IsAuthenticated")
                    .permission(PermissionSpec::instance(IsResourceOwner::new("author")))
                    .target_loader(move |_arguments: Value| {
                        let owner = owner.to_string();
                        async move {
                            let target = JsonTarget::default()
                                .with_attribute("author", json!(owner));
                            Ok(Some(Arc::new(target) as Arc<dyn TargetObject>))
                        }
                    }),
                move |_arguments: Value| {
                    let executions = executions.clone();
                    async move {
                        executions.fetch_add(1, Ordering::SeqCst);
                        Ok(json!({ "updated": true }))
                    }
                },
            )
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn unauthenticated_subject_denied_before_execution() {
        let executions = Arc::new(AtomicUsize::new(0));
        let adapter = InvocationAdapter::new(guarded_registry(SubjectId::random(), executions.clone()));

        let err = adapter
            .invoke(
                &RequestContext::anonymous(),
                "update_resource",
                json!({ "resource_id": "r-1" }),
            )
            .await
            .expect_err("anonymous should be denied");
        assert!(matches!(err, DispatchError::Denied { .. }));
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn owner_passes_both_stages() {
        let owner = SubjectId::random();
        let executions = Arc::new(AtomicUsize::new(0));
        let observer = RecordingObserver::new();
        let adapter = InvocationAdapter::new(guarded_registry(owner, executions.clone()))
            .with_observer(observer.clone());

        let output = adapter
            .invoke(
                &authenticated(owner),
                "update_resource",
                json!({ "resource_id": "r-1" }),
            )
            .await
            .unwrap();
        assert_eq!(output, json!({ "updated": true }));
        assert_eq!(executions.load(Ordering::SeqCst), 1);

        let decisions = observer.drain();
        assert_eq!(
            decisions,
            vec![
                ("update_resource".to_owned(), CheckStage::Subject, true),
                ("update_resource".to_owned(), CheckStage::Object, true),
            ]
        );
    }

    #[tokio::test]
    async fn non_owner_denied_at_object_stage() {
        let executions = Arc::new(AtomicUsize::new(0));
        let observer = RecordingObserver::new();
        let adapter =
            InvocationAdapter::new(guarded_registry(SubjectId::random(), executions.clone()))
                .with_observer(observer.clone());

        let err = adapter
            .invoke(
                &authenticated(SubjectId::random()),
                "update_resource",
                json!({ "resource_id": "r-1" }),
            )
            .await
            .expect_err("non-owner should be denied");
        assert!(
            matches!(&err, DispatchError::Denied { message } if message == "You must be the owner to perform this action.")
        );
        assert_eq!(executions.load(Ordering::SeqCst), 0);

        // Subject stage passed; denial came from the object stage.
        let decisions = observer.drain();
        assert_eq!(
            decisions,
            vec![
                ("update_resource".to_owned(), CheckStage::Subject, true),
                ("update_resource".to_owned(), CheckStage::Object, false),
            ]
        );
    }

    #[tokio::test]
    async fn execution_fault_maps_to_execution_error() {
        let registry = Arc::new(ToolRegistry::new());
        registry
            .register(ToolRegistration::new("broken"), |_: Value| async move {
                Err(bridge_tools::ToolError::execution("backend down"))
            })
            .unwrap();
        let adapter = InvocationAdapter::new(registry);

        let err = adapter
            .invoke(&RequestContext::anonymous(), "broken", json!({}))
            .await
            .expect_err("execution fails");
        assert!(matches!(err, DispatchError::Execution { reason } if reason == "backend down"));
    }

    #[tokio::test]
    async fn tools_without_loader_skip_object_stage() {
        let observer = RecordingObserver::new();
        let adapter = adapter_with_echo().with_observer(observer.clone());

        adapter
            .invoke(
                &authenticated(SubjectId::random()),
                "echo",
                json!({ "message": "hi" }),
            )
            .await
            .unwrap();

        let decisions = observer.drain();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].1, CheckStage::Subject);
    }
}
