use crate::schedule::{ScheduleEntry, TrainingSchedule};
use chrono::{NaiveDate, NaiveTime};
use polars::prelude::PolarsResult;
use serde::{Deserialize, Serialize};
use std::io::Write;

const DATE_FORMAT: &str = "%Y/%m/%d";
const TIME_FORMAT: &str = "%I:%M %p";

/// One row of the Google Calendar import CSV. The nine headers and their
/// order are fixed by the import format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "End Time")]
    pub end_time: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "All Day Event")]
    pub all_day_event: String,
    #[serde(rename = "Private")]
    pub private: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportGranularity {
    /// One calendar record per schedule entry.
    PerEntry,
    /// One record per unique training date, like the v2 daily-block export.
    PerDay,
}

/// Export configuration. The event time window is a configured constant, not
/// derived from the per-entry `time_slot` text; callers that want the slot in
/// the event can change the window here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarOptions {
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub location: String,
    pub granularity: ExportGranularity,
    /// Subject for per-day blocks, where a single record covers several
    /// exercises.
    pub block_subject: String,
    /// Description for per-day blocks.
    pub block_description: String,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            window_start: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            window_end: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            location: "水池".to_string(),
            granularity: ExportGranularity::PerEntry,
            block_subject: "水中運動訓練".to_string(),
            block_description: "水中阻力訓練與有氧強化".to_string(),
        }
    }
}

impl CalendarOptions {
    fn record(&self, date: NaiveDate, subject: &str, description: &str) -> CalendarRecord {
        CalendarRecord {
            subject: subject.to_string(),
            start_date: date.format(DATE_FORMAT).to_string(),
            start_time: self.window_start.format(TIME_FORMAT).to_string(),
            end_date: date.format(DATE_FORMAT).to_string(),
            end_time: self.window_end.format(TIME_FORMAT).to_string(),
            description: description.to_string(),
            location: self.location.clone(),
            all_day_event: "False".to_string(),
            private: "True".to_string(),
        }
    }
}

/// Map the schedule to calendar records per the configured granularity.
pub fn to_calendar_records(
    schedule: &TrainingSchedule,
    options: &CalendarOptions,
) -> PolarsResult<Vec<CalendarRecord>> {
    let entries = schedule.entries()?;
    Ok(match options.granularity {
        ExportGranularity::PerEntry => entries
            .iter()
            .map(|entry| entry_record(entry, options))
            .collect(),
        ExportGranularity::PerDay => schedule
            .distinct_dates()?
            .into_iter()
            .map(|date| options.record(date, &options.block_subject, &options.block_description))
            .collect(),
    })
}

fn entry_record(entry: &ScheduleEntry, options: &CalendarOptions) -> CalendarRecord {
    options.record(entry.date, &entry.exercise, &entry.description)
}

const CSV_HEADERS: [&str; 9] = [
    "Subject",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "Description",
    "Location",
    "All Day Event",
    "Private",
];

/// Serialize records to the nine-column CSV shape. The header row is written
/// explicitly so an empty schedule still exports a well-formed file.
pub fn write_calendar_csv<W: Write>(
    records: &[CalendarRecord],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Convenience: records straight to an in-memory CSV string, ready for a
/// download response.
pub fn calendar_csv_string(records: &[CalendarRecord]) -> Result<String, csv::Error> {
    let mut buffer = Vec::new();
    write_calendar_csv(records, &mut buffer)?;
    Ok(String::from_utf8(buffer).expect("csv output is valid utf-8"))
}
