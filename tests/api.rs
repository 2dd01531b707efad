use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use stateway::{create_app, WorkflowEngine};
use tower::ServiceExt;

fn test_router() -> Router {
    create_app(WorkflowEngine::in_memory())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

fn review_workflow() -> Value {
    json!({
        "name": "Document review",
        "states": [
            { "id": "draft", "name": "Draft", "isInitial": true },
            { "id": "review", "name": "In review" },
            { "id": "approved", "name": "Approved", "isFinal": true }
        ],
        "actions": [
            {
                "id": "submit",
                "name": "Submit",
                "fromStates": ["draft"],
                "toState": "review",
                "enabled": true
            },
            {
                "id": "approve",
                "name": "Approve",
                "fromStates": ["review"],
                "toState": "approved",
                "enabled": true
            }
        ]
    })
}

async fn create_review(app: &Router) -> String {
    let (status, body) = send(app, "POST", "/api/workflows", Some(review_workflow())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn healthz_returns_ok() {
    let app = test_router();
    let resp = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn create_get_and_list_definitions() {
    let app = test_router();
    let id = create_review(&app).await;

    let (status, body) = send(&app, "GET", &format!("/api/workflows/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Document review");
    assert_eq!(body["states"][0]["isInitial"], true);
    assert_eq!(body["states"][1]["enabled"], true);
    assert_eq!(body["actions"][1]["toState"], "approved");

    let (status, body) = send(&app, "GET", "/api/workflows", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_definition_is_404() {
    let app = test_router();

    let (status, body) = send(&app, "GET", "/api/workflows/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn two_initial_states_are_rejected() {
    let app = test_router();
    let request = json!({
        "name": "Twins",
        "states": [
            { "id": "a", "name": "A", "isInitial": true },
            { "id": "b", "name": "B", "isInitial": true }
        ],
        "actions": []
    });

    let (status, body) = send(&app, "POST", "/api/workflows", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "initial_state_count");
    assert!(body["error"].as_str().unwrap().contains("exactly one initial state"));
}

#[tokio::test]
async fn unknown_to_state_names_action_and_state() {
    let app = test_router();
    let mut request = review_workflow();
    request["actions"][1]["toState"] = json!("published");

    let (status, body) = send(&app, "POST", "/api/workflows", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unknown_to_state");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("approve"));
    assert!(message.contains("published"));
}

#[tokio::test]
async fn missing_actions_are_rejected() {
    let app = test_router();
    let mut request = review_workflow();
    request.as_object_mut().unwrap().remove("actions");

    let (status, body) = send(&app, "POST", "/api/workflows", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "missing_actions");
}

#[tokio::test]
async fn review_scenario_over_http() {
    let app = test_router();
    let definition_id = create_review(&app).await;

    let (status, instance) = send(
        &app,
        "POST",
        &format!("/api/workflows/{definition_id}/instances"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(instance["currentStateId"], "draft");
    assert_eq!(instance["history"][0]["actionId"], "START");
    assert_eq!(instance["history"][0]["fromStateId"], "");
    let instance_id = instance["id"].as_str().unwrap().to_string();
    let execute_uri = format!("/api/instances/{instance_id}/execute");

    let body = json!({ "actionId": "submit" });
    let (status, instance) = send(&app, "POST", &execute_uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(instance["currentStateId"], "review");
    assert_eq!(instance["history"].as_array().unwrap().len(), 2);

    let body = json!({ "actionId": "approve" });
    let (status, instance) = send(&app, "POST", &execute_uri, Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(instance["currentStateId"], "approved");
    assert_eq!(instance["history"].as_array().unwrap().len(), 3);

    let again = json!({ "actionId": "approve" });
    let (status, body) = send(&app, "POST", &execute_uri, Some(again)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "instance_is_final");

    let instance_uri = format!("/api/instances/{instance_id}");
    let (status, instance) = send(&app, "GET", &instance_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(instance["currentStateId"], "approved");
    assert_eq!(instance["history"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn invalid_transition_is_400_and_leaves_instance_unchanged() {
    let app = test_router();
    let definition_id = create_review(&app).await;
    let (_, instance) = send(
        &app,
        "POST",
        &format!("/api/workflows/{definition_id}/instances"),
        None,
    )
    .await;
    let instance_id = instance["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/instances/{instance_id}/execute"),
        Some(json!({ "actionId": "approve" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_transition");

    let (_, after) = send(&app, "GET", &format!("/api/instances/{instance_id}"), None).await;
    assert_eq!(after, instance);
}

#[tokio::test]
async fn start_and_execute_on_unknown_ids_are_400() {
    let app = test_router();

    let (status, body) = send(&app, "POST", "/api/workflows/missing/instances", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "definition_not_found");

    let (status, body) = send(
        &app,
        "POST",
        "/api/instances/missing/execute",
        Some(json!({ "actionId": "submit" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "instance_not_found");

    let (status, _) = send(&app, "GET", "/api/instances/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_instances_globally_and_per_definition() {
    let app = test_router();
    let first = create_review(&app).await;
    let second = create_review(&app).await;

    send(&app, "POST", &format!("/api/workflows/{first}/instances"), None).await;
    send(&app, "POST", &format!("/api/workflows/{first}/instances"), None).await;
    send(&app, "POST", &format!("/api/workflows/{second}/instances"), None).await;

    let (status, all) = send(&app, "GET", "/api/instances", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let of_first_uri = format!("/api/workflows/{first}/instances");
    let (status, of_first) = send(&app, "GET", &of_first_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(of_first.as_array().unwrap().len(), 2);

    let (status, _) = send(&app, "GET", "/api/workflows/missing/instances", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn available_actions_reflect_current_state() {
    let app = test_router();
    let definition_id = create_review(&app).await;
    let (_, instance) = send(
        &app,
        "POST",
        &format!("/api/workflows/{definition_id}/instances"),
        None,
    )
    .await;
    let instance_id = instance["id"].as_str().unwrap();

    let actions_uri = format!("/api/instances/{instance_id}/actions");
    let (status, actions) = send(&app, "GET", &actions_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(actions.as_array().unwrap().len(), 1);
    assert_eq!(actions[0]["id"], "submit");

    let (status, _) = send(&app, "GET", "/api/instances/missing/actions", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn nameless_states_and_actions_are_accepted() {
    let app = test_router();
    let request = json!({
        "name": "Bare",
        "states": [
            { "id": "a", "isInitial": true },
            { "id": "b" }
        ],
        "actions": [
            { "id": "go", "fromStates": ["a"], "toState": "b" }
        ]
    });

    let (status, body) = send(&app, "POST", "/api/workflows", Some(request)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["states"][0]["name"], "");
    assert_eq!(body["actions"][0]["name"], "");
}

#[tokio::test]
async fn action_without_to_state_fails_validation() {
    let app = test_router();
    let mut request = review_workflow();
    request["actions"][1].as_object_mut().unwrap().remove("toState");

    let (status, body) = send(&app, "POST", "/api/workflows", Some(request)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unknown_to_state");
    assert!(body["error"].as_str().unwrap().contains("approve"));
}

#[tokio::test]
async fn execute_without_action_id_is_400() {
    let app = test_router();
    let definition_id = create_review(&app).await;
    let start_uri = format!("/api/workflows/{definition_id}/instances");
    let (_, instance) = send(&app, "POST", &start_uri, None).await;
    let execute_uri = format!("/api/instances/{}/execute", instance["id"].as_str().unwrap());

    let (status, body) = send(&app, "POST", &execute_uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "action_not_found");

    let (status, body) = send(&app, "POST", "/api/instances/nope/execute", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "instance_not_found");
}

#[tokio::test]
async fn unreadable_bodies_are_400_with_error() {
    let app = test_router();

    let request = Request::builder()
        .method("POST")
        .uri("/api/workflows")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "invalid_body");
    assert!(body["error"].is_string());

    let wrong_shape = json!({ "name": "Typed", "states": "draft", "actions": [] });
    let (status, body) = send(&app, "POST", "/api/workflows", Some(wrong_shape)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_body");
}
