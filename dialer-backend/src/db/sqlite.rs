use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Duration;

use crate::models::UserRole;

/// How long a connection waits on a locked database before giving up.
/// Concurrent feedback updates queue behind each other's write lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbConnection = PooledConnection<SqliteConnectionManager>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("lead {0} not found")]
    LeadNotFound(i64),
    #[error("user '{0}' not found")]
    UserNotFound(String),
    #[error("assigned_to refers to unknown user {0}")]
    UnknownAssignee(i64),
}

pub type Result<T> = std::result::Result<T, DbError>;

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the database file at `database_url` and make sure the
    /// schema and the admin account exist.
    pub fn new(database_url: &str, pool_size: u32) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            conn.execute_batch("PRAGMA foreign_keys=ON;")
        });
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let db = Self { pool };
        db.init()?;
        Ok(db)
    }

    /// Check a connection out of the pool. It goes back when dropped.
    pub fn conn(&self) -> Result<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Idempotent schema bootstrap. Safe to call on every startup.
    pub fn init(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                role TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS leads (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lead_name TEXT NOT NULL,
                assigned_to INTEGER,
                status TEXT NOT NULL DEFAULT 'New',
                feedback TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL,
                FOREIGN KEY (assigned_to) REFERENCES users(id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS feedback_changes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                lead_id INTEGER NOT NULL,
                old_feedback TEXT NOT NULL DEFAULT '',
                new_feedback TEXT NOT NULL DEFAULT '',
                change_date TEXT NOT NULL,
                FOREIGN KEY (lead_id) REFERENCES leads(id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_leads_assigned_to ON leads(assigned_to)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_feedback_changes_lead ON feedback_changes(lead_id)",
            [],
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO users (username, role) VALUES (?1, ?2)",
            [UserRole::ADMIN, UserRole::ADMIN],
        )?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;
    use tempfile::TempDir;

    /// A database in a fresh temp directory. Keep the `TempDir` alive for the
    /// duration of the test.
    pub fn temp_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dialer.db");
        let db = Database::new(path.to_str().unwrap(), 4).expect("Failed to open database");
        (dir, db)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::temp_db;
    use super::*;

    fn count_admins(db: &Database) -> i64 {
        db.conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM users WHERE username = 'admin'", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_init_seeds_single_admin() {
        let (_dir, db) = temp_db();
        assert_eq!(count_admins(&db), 1);

        db.init().expect("second init");
        assert_eq!(count_admins(&db), 1);

        let admin = db.get_user_by_username("admin").unwrap().unwrap();
        assert_eq!(admin.role, "admin");
    }

    #[test]
    fn test_reopen_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dialer.db");
        let path = path.to_str().unwrap();

        let db = Database::new(path, 2).unwrap();
        db.create_user("alice", "telecaller").unwrap();
        drop(db);

        let db = Database::new(path, 2).unwrap();
        assert_eq!(count_admins(&db), 1);
        assert!(db.get_user_by_username("alice").unwrap().is_some());
    }

    #[test]
    fn test_foreign_keys_enabled_on_pooled_connections() {
        let (_dir, db) = temp_db();
        let conn = db.conn().unwrap();
        let enabled: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
        assert_eq!(enabled, 1);
    }
}
