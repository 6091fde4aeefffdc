use crate::log::{CompletionLog, CompletionLogRecord, LogError, LogResult};
use crate::schedule::ScheduleEntry;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;

const STATUS_COMPLETE: &str = "complete";

/// Session-local identity of a schedule row. Includes the row index so two
/// identical template rows on the same day track independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    date: NaiveDate,
    exercise: String,
    time_slot: String,
    row: usize,
}

impl EntryKey {
    fn for_entry(entry: &ScheduleEntry, row: usize) -> Self {
        Self {
            date: entry.date,
            exercise: entry.exercise.clone(),
            time_slot: entry.time_slot.clone(),
            row,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// First completion: one record appended to the log.
    Logged,
    /// Entry was already logged this session; marking is one-way, nothing
    /// was written.
    AlreadyLogged,
    /// The log was unreachable at session start; the toggle rendered but no
    /// record was produced.
    DisplayOnly,
}

/// Tracks which schedule rows were completed this session and forwards each
/// first completion to the append-only log.
///
/// State machine per entry: Unmarked -> Logged, entered only when the log
/// write succeeds. A failed write leaves the entry Unmarked so the user can
/// re-toggle; there is no queue and no retry, so a lost event stays lost
/// across sessions.
pub struct CompletionTracker {
    log: Option<Box<dyn CompletionLog + Send + Sync>>,
    logged: HashSet<EntryKey>,
}

impl CompletionTracker {
    pub fn new(log: Option<Box<dyn CompletionLog + Send + Sync>>) -> Self {
        Self {
            log,
            logged: HashSet::new(),
        }
    }

    /// Tracker with no sink: completion toggles work but write nothing.
    pub fn display_only() -> Self {
        Self::new(None)
    }

    pub fn is_display_only(&self) -> bool {
        self.log.is_none()
    }

    pub fn is_logged(&self, entry: &ScheduleEntry, row: usize) -> bool {
        self.logged.contains(&EntryKey::for_entry(entry, row))
    }

    pub fn logged_count(&self) -> usize {
        self.logged.len()
    }

    /// The schedule is rebuilt on every interaction; flags for rows that no
    /// longer exist must not survive into the new schedule.
    pub fn reset(&mut self) {
        self.logged.clear();
    }

    pub fn mark_complete(
        &mut self,
        entry: &ScheduleEntry,
        row: usize,
        observed_at: NaiveDateTime,
    ) -> LogResult<MarkOutcome> {
        let key = EntryKey::for_entry(entry, row);
        if self.logged.contains(&key) {
            return Ok(MarkOutcome::AlreadyLogged);
        }
        let Some(log) = self.log.as_ref() else {
            return Ok(MarkOutcome::DisplayOnly);
        };
        let record = completion_record(entry, observed_at);
        log.append(&record)?;
        self.logged.insert(key);
        Ok(MarkOutcome::Logged)
    }

    /// Direct submission of a prepared record, bypassing the state machine.
    pub fn submit(&self, record: &CompletionLogRecord) -> LogResult<()> {
        match self.log.as_ref() {
            Some(log) => log.append(record),
            None => Err(LogError::Unavailable(
                "tracker is running display-only".into(),
            )),
        }
    }
}

/// Build the nine-field log row for a completed entry.
pub fn completion_record(entry: &ScheduleEntry, observed_at: NaiveDateTime) -> CompletionLogRecord {
    CompletionLogRecord {
        date: entry.date.format("%Y-%m-%d").to_string(),
        exercise: entry.exercise.clone(),
        week: format!("{}", entry.week),
        weekday: entry.weekday.clone(),
        time_slot: entry.time_slot.clone(),
        completed_at: observed_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        status: STATUS_COMPLETE.to_string(),
        description: entry.description.clone(),
        reserved: String::new(),
    }
}
