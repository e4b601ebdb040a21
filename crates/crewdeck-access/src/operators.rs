use std::sync::{Mutex, MutexGuard, PoisonError};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use crewdeck_core::{config::OperatorConfig, Role};
use rusqlite::{params, types::Type, Connection};
use tracing::{debug, info, warn};

use crate::db::init_db;
use crate::error::{AccessError, Result};
use crate::types::Operator;

/// The (username, role, password hash) table behind login.
pub struct OperatorStore {
    db: Mutex<Connection>,
}

impl OperatorStore {
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Make the table match `configured` exactly: upsert every entry with a
    /// fresh hash and drop operators no longer listed. Runs in one transaction.
    pub fn sync(&self, configured: &[OperatorConfig]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let hashed = configured
            .iter()
            .map(|op| Ok((op, hash_password(&op.password)?)))
            .collect::<Result<Vec<_>>>()?;

        let mut db = self.conn();
        let tx = db.transaction()?;
        {
            let existing: Vec<String> = tx
                .prepare("SELECT username FROM operators")?
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<_, _>>()?;
            for username in existing {
                if !configured.iter().any(|op| op.username == username) {
                    tx.execute("DELETE FROM operators WHERE username = ?1", params![username])?;
                    info!(%username, "operator removed");
                }
            }
            for (op, hash) in &hashed {
                tx.execute(
                    "INSERT INTO operators (username, role, password_hash, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)
                     ON CONFLICT(username) DO UPDATE SET
                        role = excluded.role,
                        password_hash = excluded.password_hash,
                        updated_at = excluded.updated_at",
                    params![op.username, op.role.to_string(), hash, now],
                )?;
            }
        }
        tx.commit()?;
        info!(operators = hashed.len(), "operators synced from config");
        Ok(())
    }

    /// Return the operator when `password` matches their stored hash.
    pub fn verify(&self, username: &str, password: &str) -> Result<Option<Operator>> {
        let row: Option<(String, String)> = {
            let db = self.conn();
            match db.query_row(
                "SELECT role, password_hash FROM operators WHERE username = ?1",
                params![username],
                |row| Ok((row.get(0)?, row.get(1)?)),
            ) {
                Ok(r) => Some(r),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(AccessError::Database(e)),
            }
        };

        let Some((role, stored_hash)) = row else {
            debug!(%username, "unknown operator");
            return Ok(None);
        };
        if !verify_password(password, &stored_hash)? {
            return Ok(None);
        }
        let role: Role = role.parse().map_err(|e: String| {
            warn!(%username, "stored role unreadable: {e}");
            AccessError::InvalidCredentials
        })?;
        Ok(Some(Operator {
            username: username.to_string(),
            role,
        }))
    }

    pub fn list(&self) -> Result<Vec<Operator>> {
        let db = self.conn();
        let mut stmt = db.prepare("SELECT username, role FROM operators ORDER BY username")?;
        let rows = stmt
            .query_map([], |row| {
                let role: String = row.get(1)?;
                let role = role.parse::<Role>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(1, Type::Text, e.into())
                })?;
                Ok(Operator {
                    username: row.get(0)?,
                    role,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AccessError::Hash(e.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AccessError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_reports_unreadable_roles() {
        let store = OperatorStore::new(Connection::open_in_memory().unwrap()).unwrap();
        store
            .sync(&[OperatorConfig {
                username: "skipper".to_string(),
                password: "pw".to_string(),
                role: Role::Manager,
            }])
            .unwrap();
        assert_eq!(store.list().unwrap().len(), 1);

        store
            .conn()
            .execute_batch(
                "PRAGMA ignore_check_constraints = ON;
                 INSERT INTO operators (username, role, password_hash, created_at, updated_at)
                 VALUES ('stowaway', 'captain', 'x', '', '');",
            )
            .unwrap();
        assert!(matches!(store.list(), Err(AccessError::Database(_))));
    }

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("hunter2"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }
}
