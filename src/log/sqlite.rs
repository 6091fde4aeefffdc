use super::{CompletionLog, CompletionLogRecord, LogResult};
use rusqlite::{Connection, params};
use std::sync::Mutex;

/// Sqlite-backed completion log: one row per completion event, never updated
/// or deleted.
pub struct SqliteCompletionLog {
    connection: Mutex<Connection>,
}

impl SqliteCompletionLog {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> LogResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> LogResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS completion_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                exercise TEXT NOT NULL,
                week TEXT NOT NULL,
                weekday TEXT NOT NULL,
                time_slot TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                status TEXT NOT NULL,
                description TEXT NOT NULL,
                reserved TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    /// Row count, for tests and status displays.
    pub fn count(&self) -> LogResult<i64> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let count = conn.query_row("SELECT COUNT(*) FROM completion_log", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl CompletionLog for SqliteCompletionLog {
    fn append(&self, record: &CompletionLogRecord) -> LogResult<()> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        conn.execute(
            "INSERT INTO completion_log \
             (date, exercise, week, weekday, time_slot, completed_at, status, description, reserved) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.date,
                record.exercise,
                record.week,
                record.weekday,
                record.time_slot,
                record.completed_at,
                record.status,
                record.description,
                record.reserved,
            ],
        )?;
        Ok(())
    }
}
