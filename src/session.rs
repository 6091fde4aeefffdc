use crate::calendar::{CalendarOptions, calendar_csv_string, to_calendar_records};
use crate::completion::{CompletionTracker, MarkOutcome};
use crate::expand::{PlanWarning, SelectionConfig};
use crate::log::{CompletionLog, LogError};
use crate::schedule::{PlanError, TrainingSchedule, build_schedule};
use crate::template::TemplateRow;
use chrono::{Local, NaiveDateTime};
use std::fmt;

#[derive(Debug)]
pub enum SessionError {
    Plan(PlanError),
    Export(csv::Error),
    Log(LogError),
    NoSuchEntry(usize),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Plan(err) => write!(f, "{err}"),
            SessionError::Export(err) => write!(f, "calendar export error: {err}"),
            SessionError::Log(err) => write!(f, "{err}"),
            SessionError::NoSuchEntry(row) => write!(f, "schedule has no entry at row {row}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<PlanError> for SessionError {
    fn from(value: PlanError) -> Self {
        Self::Plan(value)
    }
}

impl From<csv::Error> for SessionError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}

impl From<LogError> for SessionError {
    fn from(value: LogError) -> Self {
        Self::Log(value)
    }
}

/// All state one user interaction can touch: template, selection, export
/// options and completion flags. Everything else is recomputed from these on
/// demand; nothing is persisted between sessions except the external log.
pub struct Session {
    template: Vec<TemplateRow>,
    config: SelectionConfig,
    calendar: CalendarOptions,
    tracker: CompletionTracker,
}

impl Session {
    pub fn new(template: Vec<TemplateRow>, config: SelectionConfig) -> Self {
        Self {
            template,
            config,
            calendar: CalendarOptions::default(),
            tracker: CompletionTracker::display_only(),
        }
    }

    pub fn template(&self) -> &[TemplateRow] {
        &self.template
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    pub fn calendar_options(&self) -> &CalendarOptions {
        &self.calendar
    }

    pub fn calendar_options_mut(&mut self) -> &mut CalendarOptions {
        &mut self.calendar
    }

    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    /// Swap the template in. Week count follows the new template and stale
    /// completion flags are dropped with the rows they pointed at.
    pub fn set_template(&mut self, template: Vec<TemplateRow>) {
        self.config.total_weeks = crate::template::template_week_count(&template).max(1);
        self.template = template;
        self.tracker.reset();
    }

    pub fn set_config(&mut self, config: SelectionConfig) {
        self.config = config;
        self.tracker.reset();
    }

    /// Attach a completion log sink; `None` degrades the tracker to
    /// display-only (toggles render, nothing is written).
    pub fn attach_log(&mut self, log: Option<Box<dyn CompletionLog + Send + Sync>>) {
        self.tracker = CompletionTracker::new(log);
    }

    /// Recompute the dated schedule from current inputs.
    pub fn schedule(&self) -> Result<(TrainingSchedule, Vec<PlanWarning>), PlanError> {
        build_schedule(&self.template, &self.config)
    }

    /// Recompute and export the calendar CSV.
    pub fn calendar_csv(&self) -> Result<String, SessionError> {
        let (schedule, _warnings) = self.schedule()?;
        let records = to_calendar_records(&schedule, &self.calendar).map_err(PlanError::from)?;
        Ok(calendar_csv_string(&records)?)
    }

    pub fn mark_complete(
        &mut self,
        row: usize,
        observed_at: NaiveDateTime,
    ) -> Result<MarkOutcome, SessionError> {
        let (schedule, _warnings) = self.schedule()?;
        let entry = schedule
            .entry(row)
            .map_err(PlanError::from)?
            .ok_or(SessionError::NoSuchEntry(row))?;
        Ok(self.tracker.mark_complete(&entry, row, observed_at)?)
    }

    /// Mark using the wall clock, for the interactive surfaces.
    pub fn mark_complete_now(&mut self, row: usize) -> Result<MarkOutcome, SessionError> {
        self.mark_complete(row, Local::now().naive_local())
    }
}
