/// Workflow definition REST API endpoints
///
/// Definitions are created once and never updated or deleted. Starting an
/// instance lives here too because it is addressed through its definition.

use crate::{
    api::{error::ApiError, AppState},
    runtime::instance::WorkflowInstance,
    workflow::types::{Action, State, WorkflowDefinition},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State as AxumState},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

/// Request body for workflow creation
///
/// Missing `states` is treated like an empty list; missing `actions` is
/// rejected by the validator.
#[derive(Debug, Deserialize)]
pub struct CreateWorkflowRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub states: Vec<State>,
    #[serde(default)]
    pub actions: Option<Vec<Action>>,
}

/// Create workflow definition routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", post(create_workflow).get(list_workflows))
        .route("/api/workflows/{id}", get(get_workflow))
        .route(
            "/api/workflows/{id}/instances",
            post(start_instance).get(list_workflow_instances),
        )
}

/// Create a new workflow definition
///
/// POST /api/workflows
/// Body: { "name": "...", "states": [...], "actions": [...] }
async fn create_workflow(
    AxumState(state): AxumState<AppState>,
    payload: Result<Json<CreateWorkflowRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WorkflowDefinition>), ApiError> {
    let Json(payload) = payload?;
    let definition = state.engine.create_definition(
        &payload.name,
        &payload.states,
        payload.actions.as_deref(),
    )?;

    Ok((StatusCode::CREATED, Json(WorkflowDefinition::clone(&definition))))
}

/// List all workflow definitions
///
/// GET /api/workflows
async fn list_workflows(AxumState(state): AxumState<AppState>) -> Json<Vec<WorkflowDefinition>> {
    let definitions = state
        .engine
        .definitions()
        .iter()
        .map(|definition| WorkflowDefinition::clone(definition))
        .collect();

    Json(definitions)
}

/// Get a specific workflow definition by ID
///
/// GET /api/workflows/{id}
async fn get_workflow(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDefinition>, ApiError> {
    state
        .engine
        .definition(&id)
        .map(|definition| Json(WorkflowDefinition::clone(&definition)))
        .ok_or(ApiError::NotFound)
}

/// Start a new instance of a workflow definition
///
/// POST /api/workflows/{id}/instances
async fn start_instance(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<WorkflowInstance>), ApiError> {
    let instance = state.engine.start_instance(&id)?;

    Ok((StatusCode::CREATED, Json(instance)))
}

/// List the instances of one workflow definition
///
/// GET /api/workflows/{id}/instances
async fn list_workflow_instances(
    AxumState(state): AxumState<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<WorkflowInstance>>, ApiError> {
    state
        .engine
        .instances_of(&id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}
