use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

use crate::db::init_db;
use crate::error::{Result, ScheduleError};
use crate::rotation::week_end;
use crate::types::{ScheduleEntry, ScheduledSlot, WeekGrid, WeekSchedule};

const ENTRY_COLUMNS: &str = "week_start, week_end, boat_id, position, crew_id, crew_name,
                             week_number, cycle_length, cycle_count";

/// Owns the `schedule_entries` table.
///
/// Wraps its own SQLite connection in a `Mutex`, like every other
/// subsystem manager; WAL mode keeps readers on other connections unblocked
/// while a week is being replaced.
pub struct ScheduleManager {
    db: Mutex<Connection>,
}

impl ScheduleManager {
    /// Wrap `conn`, creating the schema if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Replace every stored entry of `week_start` with the assigned cells of `grid`.
    ///
    /// Delete and inserts run in one transaction: a failed insert rolls the
    /// week back to its previous contents. Other weeks are never touched.
    /// Returns the number of entries written.
    #[instrument(skip(self, grid), fields(%week_start))]
    pub fn replace_week(&self, week_start: NaiveDate, grid: &WeekGrid) -> Result<usize> {
        let entries = build_entries(week_start, grid)?;

        let mut db = self.conn();
        let tx = db.transaction()?;
        let removed = tx.execute(
            "DELETE FROM schedule_entries WHERE week_start = ?1",
            params![week_start],
        )?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO schedule_entries
                    (week_start, week_end, boat_id, position, crew_id, crew_name,
                     week_number, cycle_length, cycle_count)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            )?;
            for e in &entries {
                stmt.execute(params![
                    e.week_start,
                    e.week_end,
                    e.boat_id,
                    e.position,
                    e.crew_id,
                    e.crew_name,
                    e.week_number,
                    e.cycle_length,
                    e.cycle_count,
                ])?;
            }
        }
        tx.commit()?;

        info!(removed, inserted = entries.len(), "week replaced");
        Ok(entries.len())
    }

    /// Stored entries of one week, ordered by boat then position.
    #[instrument(skip(self), fields(%week_start))]
    pub fn entries_for_week(&self, week_start: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        let db = self.conn();
        let mut stmt = db.prepare_cached(&format!(
            "SELECT {ENTRY_COLUMNS} FROM schedule_entries
             WHERE week_start = ?1
             ORDER BY boat_id, position"
        ))?;
        let rows = stmt
            .query_map(params![week_start], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(entries = rows.len(), "week loaded");
        Ok(rows)
    }

    /// One week as the nested boat → position → slot mapping the client renders.
    pub fn load_week(&self, week_start: NaiveDate) -> Result<WeekSchedule> {
        let mut week = WeekSchedule::new();
        for entry in self.entries_for_week(week_start)? {
            week.entry(entry.boat_id.clone())
                .or_default()
                .insert(entry.position.clone(), ScheduledSlot::from(entry));
        }
        Ok(week)
    }

    /// Every stored entry that references `crew_id`, oldest week first.
    #[instrument(skip(self))]
    pub fn entries_for_crew(&self, crew_id: i64) -> Result<Vec<ScheduleEntry>> {
        let db = self.conn();
        let mut stmt = db.prepare_cached(&format!(
            "SELECT {ENTRY_COLUMNS} FROM schedule_entries
             WHERE crew_id = ?1
             ORDER BY week_start, boat_id, position"
        ))?;
        let rows = stmt
            .query_map(params![crew_id], row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// How many stored entries reference `crew_id`.
    #[instrument(skip(self))]
    pub fn count_for_crew(&self, crew_id: i64) -> Result<usize> {
        let db = self.conn();
        let count: i64 = db.query_row(
            "SELECT COUNT(*) FROM schedule_entries WHERE crew_id = ?1",
            params![crew_id],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Validate the grid and flatten it into rows before the store is touched.
fn build_entries(week_start: NaiveDate, grid: &WeekGrid) -> Result<Vec<ScheduleEntry>> {
    let week_end = week_end(week_start)?;
    let mut entries = Vec::new();

    for (boat_id, positions) in grid {
        for (position, slot) in positions {
            let Some(slot) = slot else { continue };
            let Some(crew_id) = slot.crew_id else { continue };

            let cell = || format!("{boat_id}/{position}");
            let crew_name = slot
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| ScheduleError::Validation(format!("{}: missing crew name", cell())))?;
            let week_number = slot
                .week
                .ok_or_else(|| ScheduleError::Validation(format!("{}: missing week", cell())))?;
            let cycle_length = slot.cycle_length.ok_or_else(|| {
                ScheduleError::Validation(format!("{}: missing cycleLength", cell()))
            })?;
            if cycle_length == 0 {
                return Err(ScheduleError::InvalidCycleLength(cycle_length));
            }

            entries.push(ScheduleEntry {
                week_start,
                week_end,
                boat_id: boat_id.clone(),
                position: position.clone(),
                crew_id,
                crew_name: crew_name.to_string(),
                week_number,
                cycle_length,
                cycle_count: slot.cycle_count.clone(),
            });
        }
    }
    Ok(entries)
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleEntry> {
    Ok(ScheduleEntry {
        week_start: row.get(0)?,
        week_end: row.get(1)?,
        boat_id: row.get(2)?,
        position: row.get(3)?,
        crew_id: row.get(4)?,
        crew_name: row.get(5)?,
        week_number: row.get(6)?,
        cycle_length: row.get(7)?,
        cycle_count: row.get(8)?,
    })
}
