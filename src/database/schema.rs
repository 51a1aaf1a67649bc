use rusqlite::{Connection, Result};

/// Latest schema version this build knows how to create
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the on-device database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    // Schema version table for future migrations
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version = current_version(conn)?;

    if current_version < 1 {
        create_schema(conn)?;
        conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        log::info!("Database schema created (version 1)");
    }

    Ok(())
}

/// Highest applied schema version, 0 for a fresh database
pub fn current_version(conn: &Connection) -> Result<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
}

/// Version 1: small key/value table for device-local UI state
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // Trigger for updated_at in kv_store
    conn.execute(
        "CREATE TRIGGER IF NOT EXISTS update_kv_store_timestamp
         AFTER UPDATE OF value ON kv_store
         BEGIN
            UPDATE kv_store SET updated_at = CURRENT_TIMESTAMP WHERE key = NEW.key;
         END",
        [],
    )?;

    Ok(())
}
