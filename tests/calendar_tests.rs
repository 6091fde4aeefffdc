use chrono::{NaiveDate, NaiveTime, Weekday};
use plan_tool::{
    CalendarOptions, ExportGranularity, SelectionConfig, TemplateRow, build_schedule,
    calendar_csv_string, to_calendar_records,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn row(week: u32, weekday: Weekday, exercise: &str) -> TemplateRow {
    TemplateRow {
        week,
        occurrence: None,
        weekday,
        exercise: exercise.to_string(),
        time_slot: "10 min".to_string(),
        description: format!("{exercise} drill"),
    }
}

fn sample_schedule() -> plan_tool::TrainingSchedule {
    let template = vec![
        row(1, Weekday::Mon, "Water walk"),
        row(1, Weekday::Mon, "Leg lift"),
        row(1, Weekday::Tue, "Arm sweep"),
        row(2, Weekday::Mon, "Side step"),
    ];
    let config = SelectionConfig::new(d(2025, 7, 7), vec![Weekday::Mon, Weekday::Tue], 2);
    let (schedule, _warnings) = build_schedule(&template, &config).unwrap();
    schedule
}

#[test]
fn per_entry_export_mirrors_schedule_rows() {
    let schedule = sample_schedule();
    let records = to_calendar_records(&schedule, &CalendarOptions::default()).unwrap();
    assert_eq!(records.len(), schedule.len());

    let entries = schedule.entries().unwrap();
    for (record, entry) in records.iter().zip(entries.iter()) {
        // Same date on both ends, reformatted without drift.
        assert_eq!(record.start_date, entry.date.format("%Y/%m/%d").to_string());
        assert_eq!(record.end_date, record.start_date);
        assert_eq!(record.subject, entry.exercise);
        assert_eq!(record.description, entry.description);
        assert_eq!(record.all_day_event, "False");
        assert_eq!(record.private, "True");
    }
}

#[test]
fn default_window_renders_in_twelve_hour_clock() {
    let schedule = sample_schedule();
    let records = to_calendar_records(&schedule, &CalendarOptions::default()).unwrap();
    assert_eq!(records[0].start_time, "08:00 PM");
    assert_eq!(records[0].end_time, "09:00 PM");
    assert_eq!(records[0].location, "水池");
}

#[test]
fn custom_window_is_configuration_not_time_slot() {
    let schedule = sample_schedule();
    let mut options = CalendarOptions::default();
    options.window_start = NaiveTime::from_hms_opt(7, 30, 0).unwrap();
    options.window_end = NaiveTime::from_hms_opt(8, 15, 0).unwrap();
    let records = to_calendar_records(&schedule, &options).unwrap();
    assert_eq!(records[0].start_time, "07:30 AM");
    assert_eq!(records[0].end_time, "08:15 AM");
    // The template's time_slot text never leaks into the export times.
    assert!(records.iter().all(|r| r.start_time != "10 min"));
}

#[test]
fn per_day_export_emits_one_record_per_unique_date() {
    let schedule = sample_schedule();
    let mut options = CalendarOptions::default();
    options.granularity = ExportGranularity::PerDay;
    let records = to_calendar_records(&schedule, &options).unwrap();
    // Three distinct dates: two Mondays and one Tuesday; the doubled Monday
    // session collapses into one block.
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].start_date, "2025/07/07");
    assert_eq!(records[1].start_date, "2025/07/08");
    assert_eq!(records[2].start_date, "2025/07/14");
    assert!(records.iter().all(|r| r.subject == options.block_subject));
}

#[test]
fn csv_export_has_the_exact_nine_column_header() {
    let schedule = sample_schedule();
    let records = to_calendar_records(&schedule, &CalendarOptions::default()).unwrap();
    let csv = calendar_csv_string(&records).unwrap();
    let header = csv.lines().next().unwrap();
    assert_eq!(
        header,
        "Subject,Start Date,Start Time,End Date,End Time,Description,Location,All Day Event,Private"
    );
    assert_eq!(csv.lines().count(), 1 + records.len());
}

#[test]
fn empty_schedule_still_exports_the_header_row() {
    // A template whose days never match the selection merges to zero rows;
    // the export must stay a well-formed file, not an empty string.
    let template = vec![row(1, Weekday::Fri, "Water walk")];
    let config = SelectionConfig::new(d(2025, 7, 7), vec![Weekday::Mon], 1);
    let (schedule, _warnings) = build_schedule(&template, &config).unwrap();
    assert!(schedule.is_empty());

    let records = to_calendar_records(&schedule, &CalendarOptions::default()).unwrap();
    let csv = calendar_csv_string(&records).unwrap();
    assert_eq!(
        csv.trim_end(),
        "Subject,Start Date,Start Time,End Date,End Time,Description,Location,All Day Event,Private"
    );
}
