use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use service::errors::ServiceError;
use service::student::domain::StudentPatch;

use crate::errors::ApiError;
use crate::routes::ServerState;

/// An empty collection on the list endpoint reports 404 instead of an empty
/// array. Observed behavior, kept behind a flag so the policy can be flipped
/// without re-deriving intent.
const EMPTY_LIST_IS_NOT_FOUND: bool = true;

/// Success half of the response envelope: `{message, status: true, <key>}`.
fn envelope(message: &str, key: &str, payload: impl Serialize) -> Json<Value> {
    let mut body = json!({ "message": message, "status": true });
    body[key] = json!(payload);
    Json(body)
}

fn map_service_err(e: ServiceError, storage_message: &str) -> ApiError {
    match e {
        ServiceError::Validation(errors) => ApiError::validation(errors),
        ServiceError::NotFound(_) => ApiError::not_found("student not found"),
        ServiceError::EmptyUpdate => ApiError::empty_update(),
        ServiceError::Db(detail) => {
            error!(error = %detail, "storage failure");
            ApiError::storage(storage_message)
        }
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Value>, ApiError> {
    let students = state
        .students
        .list()
        .await
        .map_err(|e| map_service_err(e, "failed to fetch students"))?;
    if EMPTY_LIST_IS_NOT_FOUND && students.is_empty() {
        return Err(ApiError::not_found("no students found"));
    }
    info!(count = students.len(), "students listed");
    Ok(envelope("students retrieved successfully", "students", students))
}

pub async fn create(
    State(state): State<ServerState>,
    Json(input): Json<StudentPatch>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let created = state
        .students
        .create(input)
        .await
        .map_err(|e| map_service_err(e, "failed to create the student"))?;
    Ok((StatusCode::CREATED, envelope("student created successfully", "student", created)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let found = state
        .students
        .get(id)
        .await
        .map_err(|e| map_service_err(e, "failed to fetch the student"))?;
    Ok(envelope("student retrieved successfully", "student", found))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<StudentPatch>,
) -> Result<Json<Value>, ApiError> {
    let updated = state
        .students
        .update(id, input)
        .await
        .map_err(|e| map_service_err(e, "failed to update the student"))?;
    Ok(envelope("student updated successfully", "student", updated))
}

pub async fn update_partial(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(input): Json<StudentPatch>,
) -> Result<Json<Value>, ApiError> {
    let updated = state
        .students
        .update_partial(id, input)
        .await
        .map_err(|e| map_service_err(e, "failed to update the student"))?;
    Ok(envelope("student updated successfully", "student", updated))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let deleted = state
        .students
        .delete(id)
        .await
        .map_err(|e| map_service_err(e, "failed to delete the student"))?;
    Ok(envelope("student deleted successfully", "student", deleted))
}
