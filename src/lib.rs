pub mod calendar;
pub mod completion;
pub mod expand;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod log;
pub mod schedule;
pub mod session;
pub mod template;

pub use calendar::{
    CalendarOptions, CalendarRecord, ExportGranularity, calendar_csv_string, to_calendar_records,
    write_calendar_csv,
};
pub use completion::{CompletionTracker, MarkOutcome, completion_record};
pub use expand::{
    ExpandedSlot, ExpansionError, ExpansionPolicy, JoinKey, PlanWarning, SelectionConfig,
    capacity_warning, expand,
};
pub use log::{CompletionLog, CompletionLogRecord, LogError};
#[cfg(feature = "sqlite")]
pub use log::SqliteCompletionLog;
pub use log::CsvCompletionLog;
pub use schedule::{PlanError, ScheduleEntry, TrainingSchedule, build_schedule, merge};
pub use session::{Session, SessionError};
pub use template::{
    TemplateError, TemplateRow, load_template_from_csv, load_template_from_reader,
    template_week_count, weekday_from_label, weekday_label,
};
