use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// One append-only row recording a completed session. Nine fields, matching
/// the layout of the remote progress sheet; `reserved` stays empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLogRecord {
    pub date: String,
    pub exercise: String,
    pub week: String,
    pub weekday: String,
    pub time_slot: String,
    pub completed_at: String,
    pub status: String,
    pub description: String,
    pub reserved: String,
}

#[derive(Debug)]
pub enum LogError {
    Io(io::Error),
    Csv(csv::Error),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    Unavailable(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Io(err) => write!(f, "io error: {err}"),
            LogError::Csv(err) => write!(f, "csv error: {err}"),
            #[cfg(feature = "sqlite")]
            LogError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            LogError::Unavailable(msg) => write!(f, "completion log unavailable: {msg}"),
        }
    }
}

impl std::error::Error for LogError {}

impl From<io::Error> for LogError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for LogError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for LogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub type LogResult<T> = Result<T, LogError>;

/// Append-only sink for completion events. The core never reads back; writes
/// are fire-and-forget with no retry and no idempotency key.
pub trait CompletionLog {
    fn append(&self, record: &CompletionLogRecord) -> LogResult<()>;
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::CsvCompletionLog;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCompletionLog;
