use rusqlite::Connection;

use crate::error::Result;

/// Initialise the schedule schema in `conn`.
///
/// `crew_id` deliberately carries no foreign key: entries are a historical
/// snapshot and outlive the crew record they were copied from.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schedule_entries (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            week_start    TEXT    NOT NULL,   -- YYYY-MM-DD
            week_end      TEXT    NOT NULL,   -- week_start + 7 days
            boat_id       TEXT    NOT NULL,
            position      TEXT    NOT NULL,
            crew_id       INTEGER NOT NULL,
            crew_name     TEXT    NOT NULL,   -- denormalized at save time
            week_number   INTEGER NOT NULL,
            cycle_length  INTEGER NOT NULL CHECK (cycle_length >= 1),
            cycle_count   TEXT,
            UNIQUE (week_start, boat_id, position)
        );

        CREATE INDEX IF NOT EXISTS idx_schedule_week ON schedule_entries (week_start);
        CREATE INDEX IF NOT EXISTS idx_schedule_crew ON schedule_entries (crew_id);
        ",
    )?;
    Ok(())
}
