use crate::expand::{
    ExpandedSlot, ExpansionError, JoinKey, PlanWarning, SelectionConfig, capacity_warning, expand,
};
use crate::template::{TemplateError, TemplateRow, weekday_label};
use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One dated schedule row: an expanded slot joined with its template row.
///
/// Entries carry no completion state; that lives in the tracker so the
/// schedule can be recomputed from scratch on every interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub week: u32,
    pub occurrence: u32,
    pub date: NaiveDate,
    pub weekday: String,
    pub exercise: String,
    pub time_slot: String,
    pub description: String,
}

impl ScheduleEntry {
    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(7);

        let week: [i32; 1] = [self.week as i32];
        columns.push(Series::new(PlSmallStr::from_static("week"), week).into_column());

        let occurrence: [i32; 1] = [self.occurrence as i32];
        columns.push(Series::new(PlSmallStr::from_static("occurrence"), occurrence).into_column());

        let date: [i32; 1] = [Self::date_to_i32(self.date)];
        columns.push(
            Series::new(PlSmallStr::from_static("date"), date)
                .cast(&DataType::Date)?
                .into_column(),
        );

        let weekday: [&str; 1] = [self.weekday.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("weekday"), weekday).into_column());

        let exercise: [&str; 1] = [self.exercise.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("exercise"), exercise).into_column());

        let time_slot: [&str; 1] = [self.time_slot.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("time_slot"), time_slot).into_column());

        let description: [&str; 1] = [self.description.as_str()];
        columns
            .push(Series::new(PlSmallStr::from_static("description"), description).into_column());

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let week = df
            .column("week")?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("schedule row missing week".into()))?;
        let occurrence = df
            .column("occurrence")?
            .i32()?
            .get(row_idx)
            .ok_or_else(|| PolarsError::ComputeError("schedule row missing occurrence".into()))?;
        let date = df
            .column("date")?
            .date()?
            .get(row_idx)
            .map(Self::i32_to_date)
            .ok_or_else(|| PolarsError::ComputeError("schedule row missing date".into()))?;

        let str_field = |name: &str| -> PolarsResult<String> {
            Ok(df
                .column(name)?
                .str()?
                .get(row_idx)
                .unwrap_or("")
                .to_string())
        };

        Ok(Self {
            week: week as u32,
            occurrence: occurrence as u32,
            date,
            weekday: str_field("weekday")?,
            exercise: str_field("exercise")?,
            time_slot: str_field("time_slot")?,
            description: str_field("description")?,
        })
    }

    fn date_to_i32(date: NaiveDate) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        (date - epoch).num_days() as i32
    }

    fn i32_to_date(days: i32) -> NaiveDate {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        epoch + Duration::days(days as i64)
    }
}

#[derive(Debug)]
pub enum PlanError {
    Template(TemplateError),
    Expansion(ExpansionError),
    DataFrame(PolarsError),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::Template(err) => write!(f, "template error: {err}"),
            PlanError::Expansion(err) => write!(f, "expansion error: {err}"),
            PlanError::DataFrame(err) => write!(f, "dataframe error: {err}"),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<TemplateError> for PlanError {
    fn from(value: TemplateError) -> Self {
        Self::Template(value)
    }
}

impl From<ExpansionError> for PlanError {
    fn from(value: ExpansionError) -> Self {
        Self::Expansion(value)
    }
}

impl From<PolarsError> for PlanError {
    fn from(value: PolarsError) -> Self {
        Self::DataFrame(value)
    }
}

/// Left-join expanded slots against template rows.
///
/// Slots with no matching template row drop silently; a partial template must
/// never abort expansion. Result is ordered by date, then by original template
/// row order within a date.
pub fn merge(
    slots: &[ExpandedSlot],
    template: &[TemplateRow],
    join_key: JoinKey,
) -> Vec<ScheduleEntry> {
    // Template rows bucketed by join key, in original row order.
    let mut buckets: HashMap<(u32, u32), Vec<(usize, &TemplateRow)>> = HashMap::new();
    match join_key {
        JoinKey::Weekday => {
            for (idx, row) in template.iter().enumerate() {
                let key = (row.week, row.weekday.num_days_from_monday());
                buckets.entry(key).or_default().push((idx, row));
            }
        }
        JoinKey::Occurrence => {
            // Without an explicit occurrence column, sessions number off by
            // first appearance of each weekday within the week.
            let mut derived: HashMap<(u32, u32), u32> = HashMap::new();
            let mut next_in_week: HashMap<u32, u32> = HashMap::new();
            for (idx, row) in template.iter().enumerate() {
                let occurrence = match row.occurrence {
                    Some(occurrence) => occurrence,
                    None => {
                        let day_key = (row.week, row.weekday.num_days_from_monday());
                        *derived.entry(day_key).or_insert_with(|| {
                            let counter = next_in_week.entry(row.week).or_insert(0);
                            let value = *counter;
                            *counter += 1;
                            value
                        })
                    }
                };
                buckets
                    .entry((row.week, occurrence))
                    .or_default()
                    .push((idx, row));
            }
        }
    }

    let mut keyed: Vec<(NaiveDate, usize, ScheduleEntry)> = Vec::new();
    for slot in slots {
        let key = match join_key {
            JoinKey::Weekday => (slot.week, slot.weekday.num_days_from_monday()),
            JoinKey::Occurrence => (slot.week, slot.occurrence),
        };
        let Some(matches) = buckets.get(&key) else {
            continue;
        };
        for (template_idx, row) in matches {
            keyed.push((
                slot.date,
                *template_idx,
                ScheduleEntry {
                    week: slot.week,
                    occurrence: slot.occurrence,
                    date: slot.date,
                    weekday: weekday_label(slot.weekday).to_string(),
                    exercise: row.exercise.clone(),
                    time_slot: row.time_slot.clone(),
                    description: row.description.clone(),
                },
            ));
        }
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    keyed.into_iter().map(|(_, _, entry)| entry).collect()
}

/// The merged, dated schedule, held as a DataFrame with typed row accessors.
#[derive(Debug)]
pub struct TrainingSchedule {
    df: DataFrame,
}

impl TrainingSchedule {
    fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("week".into(), DataType::Int32),
            Field::new("occurrence".into(), DataType::Int32),
            Field::new("date".into(), DataType::Date),
            Field::new("weekday".into(), DataType::String),
            Field::new("exercise".into(), DataType::String),
            Field::new("time_slot".into(), DataType::String),
            Field::new("description".into(), DataType::String),
        ])
    }

    pub fn empty() -> Self {
        Self {
            df: DataFrame::empty_with_schema(&Self::default_schema()),
        }
    }

    pub fn from_entries(entries: &[ScheduleEntry]) -> PolarsResult<Self> {
        let mut df = DataFrame::empty_with_schema(&Self::default_schema());
        for entry in entries {
            let row = entry.to_dataframe_row()?;
            df = df.vstack(&row)?;
        }
        Ok(Self { df })
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn entries(&self) -> PolarsResult<Vec<ScheduleEntry>> {
        let mut entries = Vec::with_capacity(self.df.height());
        for idx in 0..self.df.height() {
            entries.push(ScheduleEntry::from_dataframe_row(&self.df, idx)?);
        }
        Ok(entries)
    }

    pub fn entry(&self, row_idx: usize) -> PolarsResult<Option<ScheduleEntry>> {
        if row_idx >= self.df.height() {
            return Ok(None);
        }
        ScheduleEntry::from_dataframe_row(&self.df, row_idx).map(Some)
    }

    /// Distinct dates in ascending order; the per-day export granularity
    /// emits one calendar record per element.
    pub fn distinct_dates(&self) -> PolarsResult<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = self
            .entries()?
            .into_iter()
            .map(|entry| entry.date)
            .collect();
        dates.sort_unstable();
        dates.dedup();
        Ok(dates)
    }
}

/// Run the full pipeline: validate, expand, merge. Stateless: the result is a
/// pure function of the template and the config, so running it twice with the
/// same inputs yields the same schedule.
pub fn build_schedule(
    template: &[TemplateRow],
    config: &SelectionConfig,
) -> Result<(TrainingSchedule, Vec<PlanWarning>), PlanError> {
    let slots = expand(config)?;
    let warnings: Vec<PlanWarning> = capacity_warning(template, config).into_iter().collect();
    let entries = merge(&slots, template, config.join_key);
    let schedule = TrainingSchedule::from_entries(&entries)?;
    Ok((schedule, warnings))
}
