use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Where a scheduling week falls inside a crew member's rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationPosition {
    /// 1-based elapsed week count from the cycle anchor. Not wrapped into
    /// `1..=cycle_length`; zero or negative means the rotation has not started.
    pub week_number: i64,
    pub cycle_length: u32,
    /// Display label, `"{week_number}/{cycle_length}"`.
    pub cycle_count: String,
}

impl RotationPosition {
    pub fn has_started(&self) -> bool {
        self.week_number >= 1
    }
}

/// Compute the week-in-cycle for `reference_week_start`.
///
/// Works on calendar dates only, so no time-of-day or DST shift can move the
/// result by a day. Elapsed weeks use floor division: a reference one day
/// before the anchor is week 0, eight days before is week -1.
pub fn week_in_cycle(
    reference_week_start: NaiveDate,
    cycle_start: NaiveDate,
    cycle_length_weeks: u32,
) -> Result<RotationPosition> {
    if cycle_length_weeks == 0 {
        return Err(ScheduleError::InvalidCycleLength(cycle_length_weeks));
    }

    let elapsed_days = reference_week_start
        .signed_duration_since(cycle_start)
        .num_days();
    let week_number = elapsed_days.div_euclid(7) + 1;

    Ok(RotationPosition {
        week_number,
        cycle_length: cycle_length_weeks,
        cycle_count: format!("{}/{}", week_number, cycle_length_weeks),
    })
}

/// Last day boundary of the cycle that starts at `cycle_start`
/// (`cycle_start + cycle_length_weeks` weeks).
pub fn cycle_end(cycle_start: NaiveDate, cycle_length_weeks: u32) -> Result<NaiveDate> {
    if cycle_length_weeks == 0 {
        return Err(ScheduleError::InvalidCycleLength(cycle_length_weeks));
    }
    cycle_start
        .checked_add_days(Days::new(u64::from(cycle_length_weeks) * 7))
        .ok_or_else(|| ScheduleError::Validation(format!("cycle end out of range for {cycle_start}")))
}

/// End of a scheduling week: `week_start + 7 days`.
pub fn week_end(week_start: NaiveDate) -> Result<NaiveDate> {
    week_start
        .checked_add_days(Days::new(7))
        .ok_or_else(|| ScheduleError::Validation(format!("week end out of range for {week_start}")))
}
