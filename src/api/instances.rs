/// Workflow instance REST API endpoints
///
/// Instances are started through `/api/workflows/{id}/instances` and driven
/// forward here, one action per request.

use crate::{
    api::{error::ApiError, AppState},
    error::EngineError,
    runtime::instance::WorkflowInstance,
    workflow::types::Action,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

/// Request body for action execution
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteActionRequest {
    /// Empty when omitted, which the engine rejects as an unknown action
    #[serde(default)]
    pub action_id: String,
}

/// Create instance routes
pub fn create_instance_routes() -> Router<AppState> {
    Router::new()
        .route("/api/instances", get(list_instances))
        .route("/api/instances/{id}", get(get_instance))
        .route("/api/instances/{id}/execute", post(execute_action))
        .route("/api/instances/{id}/actions", get(available_actions))
}

/// List all instances
///
/// GET /api/instances
async fn list_instances(State(state): State<AppState>) -> Json<Vec<WorkflowInstance>> {
    Json(state.engine.instances().await)
}

/// Get a specific instance by ID
///
/// GET /api/instances/{id}
async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowInstance>, ApiError> {
    state.engine.instance(&id).await.map(Json).ok_or(ApiError::NotFound)
}

/// Fire an action on an instance
///
/// POST /api/instances/{id}/execute
/// Body: { "actionId": "..." }
async fn execute_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ExecuteActionRequest>, JsonRejection>,
) -> Result<Json<WorkflowInstance>, ApiError> {
    let Json(payload) = payload?;
    let instance = state.engine.execute_action(&id, &payload.action_id).await?;

    Ok(Json(instance))
}

/// Actions that may currently fire on an instance
///
/// GET /api/instances/{id}/actions
async fn available_actions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Action>>, ApiError> {
    match state.engine.available_actions(&id).await {
        Ok(actions) => Ok(Json(actions)),
        Err(EngineError::InstanceNotFound(_)) => Err(ApiError::NotFound),
        Err(e) => Err(e.into()),
    }
}
