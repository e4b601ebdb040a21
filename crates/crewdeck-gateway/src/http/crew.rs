//! Crew record endpoints. Every route here requires the manager role.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use crewdeck_access::{Capability, Claims};
use crewdeck_crew::{CrewFields, CrewMember};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{blocking, error::ApiError};
use crate::app::AppState;

/// GET /api/crew
pub async fn list_crew(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<CrewMember>>, ApiError> {
    state.access.authorize(&claims, Capability::ManageCrew)?;
    let crew = blocking(&state, |s| Ok(s.crew.list()?)).await?;
    Ok(Json(crew))
}

/// GET /api/crew/{id}
pub async fn get_crew(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<CrewMember>, ApiError> {
    state.access.authorize(&claims, Capability::ManageCrew)?;
    let Path(id) = id?;
    let member = blocking(&state, move |s| {
        s.crew
            .get(id)?
            .ok_or_else(|| ApiError::NotFound("Crew member not found".to_string()))
    })
    .await?;
    Ok(Json(member))
}

/// POST /api/crew: 201 with the stored record.
pub async fn create_crew(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CrewFields>, JsonRejection>,
) -> Result<(StatusCode, Json<CrewMember>), ApiError> {
    state.access.authorize(&claims, Capability::ManageCrew)?;
    let Json(fields) = payload?;
    let member = blocking(&state, move |s| Ok(s.crew.create(&fields)?)).await?;
    info!(crew_id = member.id, operator = %claims.sub, "crew member added");
    Ok((StatusCode::CREATED, Json(member)))
}

/// PUT /api/crew/{id}: full replacement of every field.
pub async fn update_crew(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CrewFields>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    state.access.authorize(&claims, Capability::ManageCrew)?;
    let Path(id) = id?;
    let Json(fields) = payload?;
    blocking(&state, move |s| Ok(s.crew.update(id, &fields)?)).await?;
    info!(crew_id = id, operator = %claims.sub, "crew member updated");
    Ok(Json(json!({ "message": "Updated", "id": id })))
}

/// DELETE /api/crew/{id}
///
/// Schedule entries that name this crew member are left in place; they keep
/// the id and name captured when the week was saved.
pub async fn delete_crew(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    state.access.authorize(&claims, Capability::ManageCrew)?;
    let Path(id) = id?;
    let referenced = blocking(&state, move |s| {
        // counted first: the count only feeds the log line and must not fail a delete
        let referenced = s
            .schedule
            .count_for_crew(id)
            .map_err(|e| warn!(crew_id = id, error = %e, "could not count schedule entries"))
            .ok();
        s.crew.delete(id)?;
        Ok(referenced)
    })
    .await?;
    info!(
        crew_id = id,
        operator = %claims.sub,
        schedule_entries = ?referenced,
        "crew member deleted"
    );
    Ok(Json(json!({ "message": "Deleted", "id": id })))
}
