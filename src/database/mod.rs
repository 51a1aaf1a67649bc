pub mod schema;

use crate::error::AppError;
use rusqlite::Connection;
use std::path::Path;

/// Opens (creating if needed) the database at `db_path` with the full schema
pub fn init_database(db_path: &Path) -> Result<Connection, AppError> {
    // Make sure the directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_path)?;
    schema::init_schema(&conn)?;
    log::debug!("Database ready at {}", db_path.display());

    Ok(conn)
}

/// In-memory database with the full schema
pub fn init_in_memory() -> Result<Connection, AppError> {
    let conn = Connection::open_in_memory()?;
    schema::init_schema(&conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_database_creates_parent_dirs() {
        let dir = std::env::temp_dir().join(format!("crisis-checklist-db-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("test.db");

        let conn = init_database(&path).unwrap();
        assert_eq!(schema::current_version(&conn).unwrap(), schema::SCHEMA_VERSION);
        drop(conn);
        assert!(path.exists());

        // reopening keeps the schema
        let conn = init_database(&path).unwrap();
        assert_eq!(schema::current_version(&conn).unwrap(), schema::SCHEMA_VERSION);
        drop(conn);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
