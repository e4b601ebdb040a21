use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One submitted grid cell. Every field is optional on the wire: the
/// gateway fills in name and rotation fields from the crew record before
/// the grid reaches [`crate::ScheduleManager::replace_week`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAssignment {
    /// `null`, a missing key and `""` all mean "unassigned".
    #[serde(default, deserialize_with = "deserialize_crew_id")]
    pub crew_id: Option<i64>,
    #[serde(default)]
    pub week: Option<i64>,
    #[serde(default)]
    pub cycle_length: Option<u32>,
    #[serde(default)]
    pub cycle_count: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl SlotAssignment {
    pub fn for_crew(crew_id: i64) -> Self {
        Self {
            crew_id: Some(crew_id),
            ..Self::default()
        }
    }
}

/// boat id → position id → assignment (`None` = unassigned).
pub type WeekGrid = BTreeMap<String, BTreeMap<String, Option<SlotAssignment>>>;

/// A stored row of `schedule_entries`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub boat_id: String,
    pub position: String,
    pub crew_id: i64,
    /// Copied from the crew record at save time.
    pub crew_name: String,
    pub week_number: i64,
    pub cycle_length: u32,
    pub cycle_count: Option<String>,
}

/// One cell of a loaded week, shaped like the grid the client submits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSlot {
    pub crew_id: i64,
    pub name: String,
    pub week: i64,
    pub cycle_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_count: Option<String>,
}

impl From<ScheduleEntry> for ScheduledSlot {
    fn from(e: ScheduleEntry) -> Self {
        Self {
            crew_id: e.crew_id,
            name: e.crew_name,
            week: e.week_number,
            cycle_length: e.cycle_length,
            cycle_count: e.cycle_count,
        }
    }
}

/// boat id → position id → stored assignment.
pub type WeekSchedule = BTreeMap<String, BTreeMap<String, ScheduledSlot>>;

/// Accept `7`, `"7"`, `""` and `null` for a crew reference; browser forms
/// send select values as strings.
fn deserialize_crew_id<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("crewId must be an integer, got {n}"))),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("crewId must be an integer, got {s:?}"))),
        Some(other) => Err(D::Error::custom(format!(
            "crewId must be an integer, got {other}"
        ))),
    }
}
