//! Dispatcher tests: envelope shape, action routing, namespace isolation.

use std::sync::Arc;

use jive_infrastructure::{AppConfig, ServiceContext};
use jive_server::Dispatcher;
use serde_json::{Value, json};
use tempfile::TempDir;

async fn dispatcher(dir: &TempDir) -> Dispatcher {
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        embedding_model_id: "hash-v1".to_owned(),
        ..Default::default()
    };
    let ctx = ServiceContext::initialize(config).await.unwrap();
    Dispatcher::new(ctx)
}

fn data(response: &jive_server::ToolResponse) -> Value {
    assert!(
        response.success,
        "expected success, got {:?}",
        response.error
    );
    response.data.clone().unwrap()
}

fn error_code(response: &jive_server::ToolResponse) -> String {
    assert!(!response.success);
    response.error.as_ref().unwrap().code.clone()
}

#[tokio::test]
async fn unknown_tool_and_action_have_stable_codes() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir).await;

    let response = d.dispatch("jive_totally_unknown", json!({}), None).await;
    assert_eq!(error_code(&response), "UnknownTool");

    let response = d
        .dispatch(
            "jive_manage_work_item",
            json!({"action": "explode", "title": "x"}),
            None,
        )
        .await;
    assert_eq!(error_code(&response), "UnknownAction");
}

#[tokio::test]
async fn create_then_fetch_through_the_envelope() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir).await;

    let created = d
        .dispatch(
            "jive_manage_work_item",
            json!({"action": "create", "type": "task", "title": "Add login"}),
            None,
        )
        .await;
    let payload = data(&created);
    let id = payload["id"].as_str().unwrap().to_owned();
    assert_eq!(payload["work_item"]["status"], "not_started");
    assert_eq!(payload["work_item"]["sequence_order"], 0);

    let fetched = d
        .dispatch("jive_get_work_item", json!({"work_item_id": id}), None)
        .await;
    let payload = data(&fetched);
    assert_eq!(payload["work_item"]["title"], "Add login");
    assert_eq!(payload["work_item"]["progress_percentage"], 0);
}

#[tokio::test]
async fn validation_errors_surface_in_the_envelope() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir).await;

    let response = d
        .dispatch(
            "jive_manage_work_item",
            json!({"action": "create", "type": "task", "title": "x".repeat(201)}),
            None,
        )
        .await;
    assert_eq!(error_code(&response), "ValidationError");

    let response = d
        .dispatch(
            "jive_manage_work_item",
            json!({"action": "create", "type": "gadget", "title": "ok"}),
            None,
        )
        .await;
    assert_eq!(error_code(&response), "ValidationError");
}

#[tokio::test]
async fn namespaces_are_isolated() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir).await;

    let created = d
        .dispatch(
            "jive_manage_work_item",
            json!({
                "action": "create",
                "type": "task",
                "title": "alpha only",
                "namespace": "alpha",
            }),
            None,
        )
        .await;
    data(&created);

    let beta = d
        .dispatch("jive_get_work_item", json!({"namespace": "beta"}), None)
        .await;
    assert_eq!(data(&beta)["total"], 0);

    let alpha = d
        .dispatch("jive_get_work_item", json!({"namespace": "alpha"}), None)
        .await;
    assert_eq!(data(&alpha)["total"], 1);

    let reserved = d
        .dispatch("jive_get_work_item", json!({"namespace": "admin"}), None)
        .await;
    assert_eq!(error_code(&reserved), "NamespaceInvalid");
}

#[tokio::test]
async fn hierarchy_violation_carries_details() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir).await;

    let epic = d
        .dispatch(
            "jive_manage_work_item",
            json!({"action": "create", "type": "epic", "title": "Epic"}),
            None,
        )
        .await;
    let epic_id = data(&epic)["id"].as_str().unwrap().to_owned();

    let response = d
        .dispatch(
            "jive_manage_work_item",
            json!({
                "action": "create",
                "type": "task",
                "title": "bad child",
                "parent_id": epic_id,
            }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), "HierarchyViolation");
    let details = response.error.as_ref().unwrap().details.clone().unwrap();
    assert_eq!(details["parent_type"], "epic");
    assert_eq!(details["child_type"], "task");
}

#[tokio::test]
async fn memory_actions_route_end_to_end() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir).await;

    let created = d
        .dispatch(
            "jive_memory",
            json!({
                "action": "create",
                "memory_type": "troubleshoot",
                "slug": "render-loop",
                "title": "Infinite render loop",
                "ai_use_case": ["useEffect re-renders forever"],
                "ai_solutions": "Add a dependency array.",
                "keywords": ["react", "useEffect"],
            }),
            None,
        )
        .await;
    data(&created);

    let duplicate = d
        .dispatch(
            "jive_memory",
            json!({
                "action": "create",
                "memory_type": "troubleshoot",
                "slug": "render-loop",
                "title": "Same slug",
                "ai_use_case": ["whatever"],
                "ai_solutions": "n/a",
            }),
            None,
        )
        .await;
    assert_eq!(error_code(&duplicate), "SlugDuplicate");

    let used = d
        .dispatch(
            "jive_memory",
            json!({
                "action": "record_use",
                "memory_type": "troubleshoot",
                "reference": "render-loop",
                "success": true,
            }),
            None,
        )
        .await;
    let payload = data(&used);
    assert_eq!(payload["memory_item"]["usage_count"], 1);
    assert_eq!(payload["memory_item"]["success_count"], 1);

    let found = d
        .dispatch(
            "jive_memory",
            json!({
                "action": "search",
                "memory_type": "troubleshoot",
                "query": "useEffect infinite loop",
            }),
            None,
        )
        .await;
    let payload = data(&found);
    assert_eq!(payload["results"][0]["id"], data(&created)["id"]);
}

#[tokio::test]
async fn reorder_round_trip_through_dispatcher() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir).await;

    let story = d
        .dispatch(
            "jive_manage_work_item",
            json!({"action": "create", "type": "story", "title": "Story"}),
            None,
        )
        .await;
    let story_id = data(&story)["id"].as_str().unwrap().to_owned();

    let mut ids = Vec::new();
    for i in 0..3 {
        let created = d
            .dispatch(
                "jive_manage_work_item",
                json!({
                    "action": "create",
                    "type": "task",
                    "title": format!("task {i}"),
                    "parent_id": story_id,
                }),
                None,
            )
            .await;
        ids.push(data(&created)["id"].as_str().unwrap().to_owned());
    }

    let reordered = d
        .dispatch(
            "jive_reorder_work_items",
            json!({
                "action": "reorder",
                "work_item_ids": [ids[2], ids[0], ids[1]],
            }),
            None,
        )
        .await;
    let payload = data(&reordered);
    assert_eq!(payload["reordered"], 3);
    assert_eq!(payload["siblings"][0]["id"], ids[2]);
    assert_eq!(payload["siblings"][0]["sequence_order"], 0);
}

#[tokio::test]
async fn execution_validation_failure_lists_issues() {
    let dir = TempDir::new().unwrap();
    let d = dispatcher(&dir).await;

    let created = d
        .dispatch(
            "jive_manage_work_item",
            json!({"action": "create", "type": "task", "title": "no criteria"}),
            None,
        )
        .await;
    let id = data(&created)["id"].as_str().unwrap().to_owned();

    let response = d
        .dispatch(
            "jive_execute_work_item",
            json!({"work_item_id": id}),
            None,
        )
        .await;
    assert_eq!(error_code(&response), "ValidationFailed");
    let details = response.error.as_ref().unwrap().details.clone().unwrap();
    assert!(details["issues"][0].as_str().unwrap().contains("criteria"));
}
