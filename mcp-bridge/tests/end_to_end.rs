//! End-to-end invocation scenarios through the SDK facade.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mcp_bridge::dispatch::{DispatchError, InvocationAdapter};
use mcp_bridge::permissions::{IsResourceOwner, JsonTarget, PermissionSpec, TargetObject};
use mcp_bridge::primitives::{Identity, RequestContext, Subject, SubjectId};
use mcp_bridge::tools::{ParameterKind, ParameterSchema, ToolRegistration, ToolRegistry};
use serde_json::{Value, json};

fn authenticated(id: SubjectId, username: &str) -> RequestContext {
    RequestContext::new(Subject::from(Identity::new(id, username)))
}

/// A registry with one ownership-guarded mutation tool, counting executions.
fn update_resource_registry(owner: SubjectId, executions: Arc<AtomicUsize>) -> Arc<ToolRegistry> {
    let registry = Arc::new(ToolRegistry::new());
    registry
        .register(
            ToolRegistration::new("update_resource")
                .description("Update a post on behalf of its author")
                .schema(ParameterSchema::new().required(
                    "post_id",
                    ParameterKind::String,
                    "Post identifier",
                ))
                .permission("IsAuthenticated")
                .permission(PermissionSpec::instance(IsResourceOwner::new("author")))
                .target_loader(move |_arguments: Value| {
                    let author = owner.to_string();
                    async move {
                        let post = JsonTarget::default()
                            .with_attribute("author", json!(author))
                            .with_attribute("title", json!("draft"));
                        Ok(Some(Arc::new(post) as Arc<dyn TargetObject>))
                    }
                }),
            move |arguments: Value| {
                let executions = executions.clone();
                async move {
                    executions.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({ "post_id": arguments["post_id"], "updated": true }))
                }
            },
        )
        .expect("registration succeeds");
    registry
}

#[tokio::test]
async fn echo_tool_round_trips_the_input() {
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

    let adapter = InvocationAdapter::new(registry);
    let output = adapter
        .invoke(
            &RequestContext::anonymous(),
            "echo",
            json!({ "message": "ping" }),
        )
        .await
        .unwrap();
    assert_eq!(output, json!({ "message": "ping" }));
}

#[tokio::test]
async fn unauthenticated_caller_never_reaches_the_implementation() {
    let executions = Arc::new(AtomicUsize::new(0));
    let registry = update_resource_registry(SubjectId::random(), executions.clone());
    let adapter = InvocationAdapter::new(registry);

    let err = adapter
        .invoke(
            &RequestContext::anonymous(),
            "update_resource",
            json!({ "post_id": "p-1" }),
        )
        .await
        .expect_err("anonymous caller must be denied");

    assert!(
        matches!(&err, DispatchError::Denied { message } if message == "Authentication required.")
    );
    assert_eq!(executions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn author_updates_their_own_resource_exactly_once() {
    let author = SubjectId::random();
    let executions = Arc::new(AtomicUsize::new(0));
    let registry = update_resource_registry(author, executions.clone());
    let adapter = InvocationAdapter::new(registry);

    let output = adapter
        .invoke(
            &authenticated(author, "ada"),
            "update_resource",
            json!({ "post_id": "p-1" }),
        )
        .await
        .unwrap();

    assert_eq!(output, json!({ "post_id": "p-1", "updated": true }));
    assert_eq!(executions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn authenticated_non_owner_is_denied_at_the_object_level() {
    let executions = Arc::new(AtomicUsize::new(0));
    let registry = update_resource_registry(SubjectId::random(), executions.clone());
    let adapter = InvocationAdapter::new(registry);

    let err = adapter
        .invoke(
            &authenticated(SubjectId::random(), "mallory"),
            "update_resource",
            json!({ "post_id": "p-1" }),
        )
        .await
        .expect_err("non-owner must be denied");

    // The subject-level gate (IsAuthenticated) passed; the ownership check
    // produced the denial.
    assert!(
        matches!(&err, DispatchError::Denied { message } if message == "You must be the owner to perform this action.")
    );
    assert_eq!(executions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn registry_reflects_registrations_exactly_and_in_order() {
    let registry = Arc::new(ToolRegistry::new());
    registry
        .register(
            ToolRegistration::new("list_posts")
                .description("List posts")
                .permission("AllowAny"),
            |_: Value| async move { Ok(json!([])) },
        )
        .unwrap();
    registry
        .register(
            ToolRegistration::new("create_post")
                .description("Create a post")
                .permission("IsAuthenticated"),
            |_: Value| async move { Ok(json!({ "created": true })) },
        )
        .unwrap();

    let descriptor = registry.lookup("create_post").unwrap();
    assert_eq!(descriptor.name(), "create_post");
    assert_eq!(descriptor.description(), "Create a post");
    assert_eq!(descriptor.permissions().labels(), ["IsAuthenticated"]);

    let names: Vec<String> = registry.list().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["list_posts", "create_post"]);

    let err = registry
        .register(
            ToolRegistration::new("create_post"),
            |_: Value| async move { Ok(Value::Null) },
        )
        .expect_err("duplicate registration must fail");
    assert!(matches!(
        err,
        mcp_bridge::tools::ToolError::DuplicateTool { name } if name == "create_post"
    ));
}
