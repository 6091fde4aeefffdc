use chrono::Weekday;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One row of the training template: what to do in a given week on a given weekday.
///
/// `(week, weekday)` is not unique; several exercises may share a day. The
/// optional `occurrence` (0-based session index within the week) only matters
/// for the legacy occurrence-based merge.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRow {
    pub week: u32,
    pub occurrence: Option<u32>,
    pub weekday: Weekday,
    pub exercise: String,
    pub time_slot: String,
    pub description: String,
}

#[derive(Debug)]
pub enum TemplateError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Io(err) => write!(f, "io error: {err}"),
            TemplateError::Csv(err) => write!(f, "csv error: {err}"),
            TemplateError::MissingColumn(name) => {
                write!(f, "template is missing required column '{name}'")
            }
            TemplateError::InvalidField {
                line,
                column,
                value,
            } => write!(f, "line {line}: invalid {column} value '{value}'"),
        }
    }
}

impl std::error::Error for TemplateError {}

impl From<std::io::Error> for TemplateError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for TemplateError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub type TemplateResult<T> = Result<T, TemplateError>;

// Header aliases: English names plus the labels used by the original
// training_schedule.csv files.
const WEEK_HEADERS: &[&str] = &["week", "week_index", "週次"];
const OCCURRENCE_HEADERS: &[&str] = &["occurrence", "session", "次數"];
const WEEKDAY_HEADERS: &[&str] = &["weekday", "day", "星期"];
const EXERCISE_HEADERS: &[&str] = &["exercise", "name", "訓練項目"];
const TIME_SLOT_HEADERS: &[&str] = &["time_slot", "time", "時間"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "notes", "操作說明"];

struct HeaderMap {
    week: Option<usize>,
    occurrence: Option<usize>,
    weekday: usize,
    exercise: usize,
    time_slot: Option<usize>,
    description: Option<usize>,
}

impl HeaderMap {
    fn resolve(headers: &csv::StringRecord) -> TemplateResult<Self> {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.iter().any(|a| a.eq_ignore_ascii_case(h.trim())))
        };
        let weekday = find(WEEKDAY_HEADERS).ok_or(TemplateError::MissingColumn("weekday"))?;
        let exercise = find(EXERCISE_HEADERS).ok_or(TemplateError::MissingColumn("exercise"))?;
        Ok(Self {
            week: find(WEEK_HEADERS),
            occurrence: find(OCCURRENCE_HEADERS),
            weekday,
            exercise,
            time_slot: find(TIME_SLOT_HEADERS),
            description: find(DESCRIPTION_HEADERS),
        })
    }
}

/// Parse a weekday label. Accepts English names ("Mon", "Monday") and the
/// Chinese labels from the original template files ("週一", "周一", "週日").
pub fn weekday_from_label(label: &str) -> Option<Weekday> {
    let trimmed = label.trim();
    if let Ok(weekday) = trimmed.parse::<Weekday>() {
        return Some(weekday);
    }
    let day = trimmed
        .strip_prefix('週')
        .or_else(|| trimmed.strip_prefix('周'))
        .or_else(|| trimmed.strip_prefix("星期"))?;
    match day {
        "一" => Some(Weekday::Mon),
        "二" => Some(Weekday::Tue),
        "三" => Some(Weekday::Wed),
        "四" => Some(Weekday::Thu),
        "五" => Some(Weekday::Fri),
        "六" => Some(Weekday::Sat),
        "日" | "天" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Canonical display label for a weekday (English abbreviation).
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Parse a week value. Accepts "3", "Week 3" and the original "第3週" labels.
fn parse_week(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if let Ok(week) = trimmed.parse::<u32>() {
        return Some(week);
    }
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok()
}

pub fn load_template_from_reader<R: Read>(reader: R) -> TemplateResult<Vec<TemplateRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let map = HeaderMap::resolve(&headers)?;

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let field = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        let weekday_value = field(Some(map.weekday));
        let weekday =
            weekday_from_label(&weekday_value).ok_or_else(|| TemplateError::InvalidField {
                line,
                column: "weekday",
                value: weekday_value.clone(),
            })?;

        // Absent week column means a one-week template.
        let week = match map.week {
            Some(idx) => {
                let value = field(Some(idx));
                match parse_week(&value) {
                    Some(week) if week >= 1 => week,
                    _ => {
                        return Err(TemplateError::InvalidField {
                            line,
                            column: "week",
                            value,
                        });
                    }
                }
            }
            None => 1,
        };

        // Occurrence is 1-based on disk, 0-based in memory.
        let occurrence = match map.occurrence {
            Some(idx) => {
                let value = field(Some(idx));
                if value.is_empty() {
                    None
                } else {
                    match value.parse::<u32>() {
                        Ok(n) if n >= 1 => Some(n - 1),
                        _ => {
                            return Err(TemplateError::InvalidField {
                                line,
                                column: "occurrence",
                                value,
                            });
                        }
                    }
                }
            }
            None => None,
        };

        rows.push(TemplateRow {
            week,
            occurrence,
            weekday,
            exercise: field(Some(map.exercise)),
            time_slot: field(map.time_slot),
            description: field(map.description),
        });
    }
    Ok(rows)
}

pub fn load_template_from_csv<P: AsRef<Path>>(path: P) -> TemplateResult<Vec<TemplateRow>> {
    let file = File::open(path)?;
    load_template_from_reader(file)
}

/// Number of weeks covered by the template (distinct week values).
pub fn template_week_count(template: &[TemplateRow]) -> u32 {
    let mut weeks: Vec<u32> = template.iter().map(|row| row.week).collect();
    weeks.sort_unstable();
    weeks.dedup();
    weeks.len() as u32
}
