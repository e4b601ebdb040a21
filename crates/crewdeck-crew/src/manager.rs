use std::sync::{Mutex, MutexGuard, PoisonError};

use crewdeck_schedule::cycle_end;
use rusqlite::{params, params_from_iter, Connection, ToSql};
use tracing::{info, instrument};

use crate::db::{init_db, row_to_crew, CREW_COLUMNS};
use crate::error::{CrewError, Result};
use crate::types::{CrewFields, CrewMember};

/// Field-mapped persistence for crew records.
pub struct CrewManager {
    db: Mutex<Connection>,
}

impl CrewManager {
    /// Wrap `conn`, creating the crew table if needed.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// All crew members ordered by id.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<CrewMember>> {
        let db = self.conn();
        let mut stmt = db.prepare_cached(&format!("SELECT {CREW_COLUMNS} FROM crew ORDER BY id"))?;
        let rows = stmt
            .query_map([], row_to_crew)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Load one crew member. Returns None instead of an error when absent
    /// so callers decide whether missing is exceptional in their context.
    #[instrument(skip(self))]
    pub fn get(&self, id: i64) -> Result<Option<CrewMember>> {
        let db = self.conn();
        select_one(&db, id)
    }

    /// Validate and insert a new record; the id is generated by the store.
    #[instrument(skip(self, fields))]
    pub fn create(&self, fields: &CrewFields) -> Result<CrewMember> {
        validate(fields)?;
        let db = self.conn();
        db.execute(
            "INSERT INTO crew (
                first_name, last_name, preferred_name, email, telephone, contact_method,
                date_employment_started, current_cycle_start, cycle_length_weeks,
                positions_trained_captain, positions_trained_1st_mate, positions_trained_engineer,
                positions_trained_chef, positions_trained_deckhand,
                boats_trained_catppalu, boats_trained_morningstar, boats_trained_seaexplorer,
                bank_name, institute_number, transit_number, account_number
             ) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18,?19,?20,?21)",
            params_from_iter(field_params(fields)),
        )?;
        let id = db.last_insert_rowid();
        info!(crew_id = id, "crew member created");
        select_one(&db, id)?.ok_or(CrewError::NotFound(id))
    }

    /// Replace every mutable field of an existing record.
    #[instrument(skip(self, fields))]
    pub fn update(&self, id: i64, fields: &CrewFields) -> Result<CrewMember> {
        validate(fields)?;
        let db = self.conn();
        let id_param: &dyn ToSql = &id;
        let changed = db.execute(
            "UPDATE crew SET
                first_name=?1, last_name=?2, preferred_name=?3, email=?4, telephone=?5,
                contact_method=?6, date_employment_started=?7, current_cycle_start=?8,
                cycle_length_weeks=?9, positions_trained_captain=?10,
                positions_trained_1st_mate=?11, positions_trained_engineer=?12,
                positions_trained_chef=?13, positions_trained_deckhand=?14,
                boats_trained_catppalu=?15, boats_trained_morningstar=?16,
                boats_trained_seaexplorer=?17, bank_name=?18, institute_number=?19,
                transit_number=?20, account_number=?21
             WHERE id=?22",
            params_from_iter(field_params(fields).into_iter().chain([id_param])),
        )?;
        if changed == 0 {
            return Err(CrewError::NotFound(id));
        }
        info!(crew_id = id, "crew member updated");
        select_one(&db, id)?.ok_or(CrewError::NotFound(id))
    }

    /// Hard-delete a record. Schedule entries that reference it are left as
    /// they are; they carry their own copy of the name.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<()> {
        let db = self.conn();
        let changed = db.execute("DELETE FROM crew WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(CrewError::NotFound(id));
        }
        info!(crew_id = id, "crew member deleted");
        Ok(())
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── private helpers ───────────────────────────────────────────────────────────

fn select_one(db: &Connection, id: i64) -> Result<Option<CrewMember>> {
    let mut stmt = db.prepare_cached(&format!("SELECT {CREW_COLUMNS} FROM crew WHERE id = ?1"))?;
    match stmt.query_row(params![id], row_to_crew) {
        Ok(c) => Ok(Some(c)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(CrewError::DatabaseError(e)),
    }
}

fn validate(fields: &CrewFields) -> Result<()> {
    if fields.first_name.trim().is_empty() {
        return Err(CrewError::Validation("firstName is required".to_string()));
    }
    if fields.last_name.trim().is_empty() {
        return Err(CrewError::Validation("lastName is required".to_string()));
    }
    if fields.cycle_length_weeks < 1 {
        return Err(CrewError::Validation(
            "cycleLengthWeeks must be at least 1".to_string(),
        ));
    }
    cycle_end(fields.current_cycle_start, fields.cycle_length_weeks)
        .map_err(|e| CrewError::Validation(e.to_string()))?;
    Ok(())
}

/// Positional parameters ?1..?21 in CREW_COLUMNS order (id excluded).
fn field_params(f: &CrewFields) -> [&dyn ToSql; 21] {
    [
        &f.first_name,
        &f.last_name,
        &f.preferred_name,
        &f.email,
        &f.telephone,
        &f.contact_method,
        &f.date_employment_started,
        &f.current_cycle_start,
        &f.cycle_length_weeks,
        &f.positions_trained_captain,
        &f.positions_trained_1st_mate,
        &f.positions_trained_engineer,
        &f.positions_trained_chef,
        &f.positions_trained_deckhand,
        &f.boats_trained_cat_ppalu,
        &f.boats_trained_morning_star,
        &f.boats_trained_sea_explorer,
        &f.bank_name,
        &f.institute_number,
        &f.transit_number,
        &f.account_number,
    ]
}
