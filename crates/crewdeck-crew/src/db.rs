use crewdeck_schedule::cycle_end;
use rusqlite::{Connection, Result};

use crate::types::{CrewFields, CrewMember};

/// Column order shared by every SELECT/RETURNING in this crate; see [`row_to_crew`].
pub(crate) const CREW_COLUMNS: &str = "id, first_name, last_name, preferred_name,
    email, telephone, contact_method,
    date_employment_started, current_cycle_start, cycle_length_weeks,
    positions_trained_captain, positions_trained_1st_mate, positions_trained_engineer,
    positions_trained_chef, positions_trained_deckhand,
    boats_trained_catppalu, boats_trained_morningstar, boats_trained_seaexplorer,
    bank_name, institute_number, transit_number, account_number";

/// Map a row (column order from CREW_COLUMNS) to a CrewMember.
/// Centralised here so every query in this crate stays consistent.
pub(crate) fn row_to_crew(row: &rusqlite::Row<'_>) -> Result<CrewMember> {
    let fields = CrewFields {
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        preferred_name: row.get(3)?,
        email: row.get(4)?,
        telephone: row.get(5)?,
        contact_method: row.get(6)?,
        date_employment_started: row.get(7)?,
        current_cycle_start: row.get(8)?,
        cycle_length_weeks: row.get(9)?,
        positions_trained_captain: row.get(10)?,
        positions_trained_1st_mate: row.get(11)?,
        positions_trained_engineer: row.get(12)?,
        positions_trained_chef: row.get(13)?,
        positions_trained_deckhand: row.get(14)?,
        boats_trained_cat_ppalu: row.get(15)?,
        boats_trained_morning_star: row.get(16)?,
        boats_trained_sea_explorer: row.get(17)?,
        bank_name: row.get(18)?,
        institute_number: row.get(19)?,
        transit_number: row.get(20)?,
        account_number: row.get(21)?,
    };
    let current_cycle_end = cycle_end(fields.current_cycle_start, fields.cycle_length_weeks).ok();
    Ok(CrewMember {
        id: row.get(0)?,
        fields,
        current_cycle_end,
    })
}

/// Initialise the crew table. Safe to call on every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS crew (
            id                          INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name                  TEXT NOT NULL,
            last_name                   TEXT NOT NULL,
            preferred_name              TEXT,
            email                       TEXT,
            telephone                   TEXT,
            contact_method              TEXT,
            date_employment_started     TEXT,             -- YYYY-MM-DD
            current_cycle_start         TEXT NOT NULL,    -- YYYY-MM-DD, cycle anchor
            cycle_length_weeks          INTEGER NOT NULL CHECK (cycle_length_weeks >= 1),
            positions_trained_captain   INTEGER NOT NULL DEFAULT 0,
            positions_trained_1st_mate  INTEGER NOT NULL DEFAULT 0,
            positions_trained_engineer  INTEGER NOT NULL DEFAULT 0,
            positions_trained_chef      INTEGER NOT NULL DEFAULT 0,
            positions_trained_deckhand  INTEGER NOT NULL DEFAULT 0,
            boats_trained_catppalu      INTEGER NOT NULL DEFAULT 0,
            boats_trained_morningstar   INTEGER NOT NULL DEFAULT 0,
            boats_trained_seaexplorer   INTEGER NOT NULL DEFAULT 0,
            bank_name                   TEXT,
            institute_number            TEXT,
            transit_number              TEXT,
            account_number              TEXT
        );",
    )
}
