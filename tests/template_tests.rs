use chrono::Weekday;
use plan_tool::{TemplateError, load_template_from_reader, template_week_count, weekday_from_label};

#[test]
fn loads_template_with_english_headers() {
    let csv = "\
week,occurrence,weekday,exercise,time_slot,description
1,1,Mon,Water walk,10 min,Straight posture forward walk
1,2,Tue,Arm sweep,8 min,Alternating underwater sweeps
2,1,Mon,Leg lift,3x12,Hold the pool edge
";
    let rows = load_template_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].week, 1);
    assert_eq!(rows[0].occurrence, Some(0));
    assert_eq!(rows[0].weekday, Weekday::Mon);
    assert_eq!(rows[0].exercise, "Water walk");
    assert_eq!(rows[0].time_slot, "10 min");
    assert_eq!(rows[1].weekday, Weekday::Tue);
    assert_eq!(rows[2].week, 2);
    assert_eq!(template_week_count(&rows), 2);
}

#[test]
fn loads_template_with_original_chinese_headers() {
    let csv = "\
週次,次數,星期,訓練項目,時間,操作說明
第1週,1,週一,水中漫步,10 分鐘,直立姿勢於水中前進
第1週,2,週二,水中划臂,10 分鐘,雙臂交替前划
第2週,1,週一,水中抬腿,3 組,扶池邊抬膝
";
    let rows = load_template_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].week, 1);
    assert_eq!(rows[0].weekday, Weekday::Mon);
    assert_eq!(rows[1].weekday, Weekday::Tue);
    assert_eq!(rows[1].occurrence, Some(1));
    assert_eq!(rows[2].week, 2);
    assert_eq!(rows[0].exercise, "水中漫步");
}

#[test]
fn missing_weekday_column_is_a_schema_error() {
    let csv = "week,exercise\n1,Water walk\n";
    let err = load_template_from_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, TemplateError::MissingColumn("weekday")));
}

#[test]
fn missing_exercise_column_is_a_schema_error() {
    let csv = "week,weekday\n1,Mon\n";
    let err = load_template_from_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, TemplateError::MissingColumn("exercise")));
}

#[test]
fn absent_week_column_defaults_to_week_one() {
    let csv = "weekday,exercise\nMon,Water walk\nTue,Arm sweep\n";
    let rows = load_template_from_reader(csv.as_bytes()).unwrap();
    assert!(rows.iter().all(|row| row.week == 1));
    assert_eq!(template_week_count(&rows), 1);
}

#[test]
fn missing_optional_fields_pass_through_as_empty_strings() {
    let csv = "weekday,exercise\nMon,Water walk\n";
    let rows = load_template_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(rows[0].time_slot, "");
    assert_eq!(rows[0].description, "");
    assert_eq!(rows[0].occurrence, None);
}

#[test]
fn unparseable_weekday_is_an_invalid_field() {
    let csv = "weekday,exercise\nSomeday,Water walk\n";
    let err = load_template_from_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        TemplateError::InvalidField {
            column: "weekday",
            ..
        }
    ));
}

#[test]
fn weekday_labels_parse_in_both_languages() {
    assert_eq!(weekday_from_label("Mon"), Some(Weekday::Mon));
    assert_eq!(weekday_from_label("monday"), Some(Weekday::Mon));
    assert_eq!(weekday_from_label("週三"), Some(Weekday::Wed));
    assert_eq!(weekday_from_label("周日"), Some(Weekday::Sun));
    assert_eq!(weekday_from_label("星期五"), Some(Weekday::Fri));
    assert_eq!(weekday_from_label("nonsense"), None);
}

#[test]
fn week_labels_parse_in_both_formats() {
    let csv = "week,weekday,exercise\nWeek 3,Mon,Water walk\n第4週,Tue,Arm sweep\n";
    let rows = load_template_from_reader(csv.as_bytes()).unwrap();
    assert_eq!(rows[0].week, 3);
    assert_eq!(rows[1].week, 4);
}
