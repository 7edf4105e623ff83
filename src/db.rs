use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const DB_FILE: &str = "tally.db";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL UNIQUE,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('income', 'outcome')),
    value REAL NOT NULL,
    category_id INTEGER NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (category_id) REFERENCES categories(id)
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["categories", "transactions"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_category_title_is_unique() {
        let (_dir, conn) = test_db();
        conn.execute("INSERT INTO categories (title) VALUES ('Food')", []).unwrap();
        assert!(conn.execute("INSERT INTO categories (title) VALUES ('Food')", []).is_err());
        conn.execute("INSERT INTO categories (title) VALUES ('food')", []).unwrap();
    }

    #[test]
    fn test_transaction_type_is_checked() {
        let (_dir, conn) = test_db();
        conn.execute("INSERT INTO categories (title) VALUES ('Food')", []).unwrap();
        let cat = conn.last_insert_rowid();
        let bad = conn.execute(
            "INSERT INTO transactions (title, type, value, category_id) VALUES ('x', 'transfer', 1.0, ?1)",
            [cat],
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_transaction_requires_existing_category() {
        let (_dir, conn) = test_db();
        let orphan = conn.execute(
            "INSERT INTO transactions (title, type, value, category_id) VALUES ('x', 'income', 1.0, 999)",
            [],
        );
        assert!(orphan.is_err());
    }
}
