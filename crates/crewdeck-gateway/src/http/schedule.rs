//! Weekly schedule endpoints, open to managers and co-managers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Extension, Json,
};
use chrono::NaiveDate;
use crewdeck_access::{Capability, Claims};
use crewdeck_crew::CrewManager;
use crewdeck_schedule::{week_in_cycle, WeekGrid, WeekSchedule};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{blocking, error::ApiError};
use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveScheduleRequest {
    pub date: String,
    pub slots: WeekGrid,
}

/// GET /api/schedule?date=YYYY-MM-DD
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<WeekSchedule>, ApiError> {
    state.access.authorize(&claims, Capability::ViewSchedule)?;
    let Query(query) = query?;
    let week_start = parse_week_start(query.date.as_deref())?;
    let week = blocking(&state, move |s| Ok(s.schedule.load_week(week_start)?)).await?;
    Ok(Json(week))
}

/// POST /api/schedule: replace every assignment of one week.
pub async fn save_schedule(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<SaveScheduleRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    state.access.authorize(&claims, Capability::EditSchedule)?;
    let Json(req) = payload?;
    let week_start = parse_week_start(Some(&req.date))?;
    let saved = blocking(&state, move |s| {
        let grid = resolve_grid(&s.crew, week_start, req.slots)?;
        Ok(s.schedule.replace_week(week_start, &grid)?)
    })
    .await?;
    info!(%week_start, entries = saved, operator = %claims.sub, "schedule saved");
    Ok(Json(json!({ "message": "Saved" })))
}

fn parse_week_start(date: Option<&str>) -> Result<NaiveDate, ApiError> {
    let date = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing date".to_string()))?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date: {date} (expected YYYY-MM-DD)")))
}

/// Fill in what the client left out of each assigned cell.
///
/// Every referenced crew member must exist. A missing name becomes
/// "first last"; missing rotation fields come from the member's cycle anchor
/// and length relative to `week_start`. Values the client did send win, and
/// a missing `cycleCount` is built from the final week and length.
pub fn resolve_grid(
    crew: &CrewManager,
    week_start: NaiveDate,
    mut grid: WeekGrid,
) -> Result<WeekGrid, ApiError> {
    for (boat, positions) in grid.iter_mut() {
        for (position, cell) in positions.iter_mut() {
            let Some(slot) = cell.as_mut() else { continue };
            let Some(crew_id) = slot.crew_id else { continue };

            let member = crew.get(crew_id)?.ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "Unknown crew member {crew_id} in {boat}/{position}"
                ))
            })?;

            if slot.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                slot.name = Some(member.fields.display_name());
            }
            let (week, cycle_length) = match (slot.week, slot.cycle_length) {
                (Some(week), Some(len)) => (week, len),
                (week, len) => {
                    let rotation = week_in_cycle(
                        week_start,
                        member.fields.current_cycle_start,
                        member.fields.cycle_length_weeks,
                    )?;
                    (
                        week.unwrap_or(rotation.week_number),
                        len.unwrap_or(rotation.cycle_length),
                    )
                }
            };
            slot.week = Some(week);
            slot.cycle_length = Some(cycle_length);
            // the label always describes the stored week and length
            slot.cycle_count.get_or_insert_with(|| format!("{week}/{cycle_length}"));
        }
    }
    Ok(grid)
}
