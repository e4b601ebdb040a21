use rusqlite::{Connection, Result};

/// Initialise the operators table. Safe to call on every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    // password_hash holds an argon2id PHC string; plaintext never lands here.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS operators (
            username       TEXT PRIMARY KEY NOT NULL,
            role           TEXT NOT NULL CHECK (role IN ('manager', 'co-manager')),
            password_hash  TEXT NOT NULL,
            created_at     TEXT NOT NULL,
            updated_at     TEXT NOT NULL
        );",
    )
}
