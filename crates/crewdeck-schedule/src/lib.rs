//! `crewdeck-schedule`: weekly boat/position grid with SQLite persistence.
//!
//! # Overview
//!
//! [`rotation::week_in_cycle`] places a scheduling week inside a crew
//! member's personal rotation. [`manager::ScheduleManager::replace_week`]
//! swaps every stored entry of one week for the submitted grid inside a
//! single transaction, so readers never see a half-written week.
//!
//! | Table              | Key                                  |
//! |--------------------|--------------------------------------|
//! | `schedule_entries` | UNIQUE (week_start, boat_id, position) |

pub mod db;
pub mod error;
pub mod manager;
pub mod rotation;
pub mod types;

pub use error::{Result, ScheduleError};
pub use manager::ScheduleManager;
pub use rotation::{cycle_end, week_end, week_in_cycle, RotationPosition};
pub use types::{ScheduleEntry, ScheduledSlot, SlotAssignment, WeekGrid, WeekSchedule};
