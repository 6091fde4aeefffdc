use crate::template::{TemplateRow, template_week_count, weekday_label};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How abstract (week, weekday) slots are turned into concrete dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionPolicy {
    /// One slot per selected weekday per week, dated by the modular offset
    /// from the start date's weekday.
    WeekdaySet,
    /// Two slots per week on the start date's weekday and the day after.
    FixedPair,
}

/// Which key the merger joins on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    /// Canonical: (week, weekday label).
    Weekday,
    /// Legacy compatibility: (week, session index within the week).
    Occurrence,
}

/// Per-session selection state. Serializable so consumers can persist and
/// replay a session; the pipeline itself is a pure function of this struct
/// and the template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub start_date: NaiveDate,
    pub selected_weekdays: Vec<Weekday>,
    pub total_weeks: u32,
    pub policy: ExpansionPolicy,
    pub join_key: JoinKey,
}

impl SelectionConfig {
    pub fn new(start_date: NaiveDate, selected_weekdays: Vec<Weekday>, total_weeks: u32) -> Self {
        Self {
            start_date,
            selected_weekdays,
            total_weeks,
            policy: ExpansionPolicy::WeekdaySet,
            join_key: JoinKey::Weekday,
        }
    }

    /// Build a config whose week count is derived from the template.
    pub fn for_template(
        template: &[TemplateRow],
        start_date: NaiveDate,
        selected_weekdays: Vec<Weekday>,
    ) -> Self {
        let total_weeks = template_week_count(template).max(1);
        Self::new(start_date, selected_weekdays, total_weeks)
    }

    /// Selected weekdays deduplicated and ordered by modular offset from the
    /// start weekday, so occurrence order always matches date order within a
    /// week.
    pub fn normalized_weekdays(&self) -> Vec<Weekday> {
        let mut days = self.selected_weekdays.clone();
        days.sort_by_key(|wd| self.weekday_offset(*wd));
        days.dedup();
        days
    }

    /// Days from the start date to the first occurrence of `weekday` on or
    /// after it.
    pub fn weekday_offset(&self, weekday: Weekday) -> i64 {
        let start = self.start_date.weekday().num_days_from_monday() as i64;
        let target = weekday.num_days_from_monday() as i64;
        (target - start).rem_euclid(7)
    }
}

/// A dated slot: the concrete calendar date for one (week, occurrence) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedSlot {
    pub week: u32,
    pub occurrence: u32,
    pub date: NaiveDate,
    pub weekday: Weekday,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionError {
    EmptySelection,
}

impl fmt::Display for ExpansionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpansionError::EmptySelection => {
                write!(f, "no weekdays selected; pick at least one training day")
            }
        }
    }
}

impl std::error::Error for ExpansionError {}

/// Expand the selection into dated slots. Pure; recomputed in full on every
/// interaction.
pub fn expand(config: &SelectionConfig) -> Result<Vec<ExpandedSlot>, ExpansionError> {
    match config.policy {
        ExpansionPolicy::WeekdaySet => expand_weekday_set(config),
        ExpansionPolicy::FixedPair => Ok(expand_fixed_pair(config)),
    }
}

fn expand_weekday_set(config: &SelectionConfig) -> Result<Vec<ExpandedSlot>, ExpansionError> {
    let days = config.normalized_weekdays();
    if days.is_empty() {
        return Err(ExpansionError::EmptySelection);
    }

    let mut slots = Vec::with_capacity(config.total_weeks as usize * days.len());
    for week in 1..=config.total_weeks {
        let week_base = 7 * (week as i64 - 1);
        for (occurrence, weekday) in days.iter().enumerate() {
            let offset = week_base + config.weekday_offset(*weekday);
            slots.push(ExpandedSlot {
                week,
                occurrence: occurrence as u32,
                date: config.start_date + Duration::days(offset),
                weekday: *weekday,
            });
        }
    }
    Ok(slots)
}

fn expand_fixed_pair(config: &SelectionConfig) -> Vec<ExpandedSlot> {
    let mut slots = Vec::with_capacity(config.total_weeks as usize * 2);
    for week in 1..=config.total_weeks {
        for offset in 0..2i64 {
            let date = config.start_date + Duration::days(7 * (week as i64 - 1) + offset);
            slots.push(ExpandedSlot {
                week,
                occurrence: offset as u32,
                date,
                weekday: date.weekday(),
            });
        }
    }
    slots
}

/// Non-fatal pipeline diagnostics surfaced next to the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanWarning {
    /// More weekdays selected than the template has sessions in some week;
    /// the extra slots will not match any template row.
    SelectionExceedsTemplate { selected: usize, available: usize },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::SelectionExceedsTemplate {
                selected,
                available,
            } => write!(
                f,
                "{selected} training days selected but the template has at most {available} sessions per week; extra days will stay empty"
            ),
        }
    }
}

/// Warn when the selection asks for more sessions per week than the template
/// provides. Expansion still proceeds; unmatched slots drop at merge time.
pub fn capacity_warning(template: &[TemplateRow], config: &SelectionConfig) -> Option<PlanWarning> {
    if config.policy != ExpansionPolicy::WeekdaySet || template.is_empty() {
        return None;
    }
    let selected = config.normalized_weekdays().len();
    let mut weeks: Vec<u32> = template.iter().map(|row| row.week).collect();
    weeks.sort_unstable();
    weeks.dedup();
    let available = weeks
        .iter()
        .map(|week| {
            let mut days: Vec<&'static str> = template
                .iter()
                .filter(|row| row.week == *week)
                .map(|row| weekday_label(row.weekday))
                .collect();
            days.sort_unstable();
            days.dedup();
            days.len()
        })
        .max()
        .unwrap_or(0);
    if selected > available {
        Some(PlanWarning::SelectionExceedsTemplate {
            selected,
            available,
        })
    } else {
        None
    }
}
