use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_prints_help() {
    run_cli("help\nquit\n")
        .success()
        .stdout(str_contains("start <YYYY-MM-DD>"))
        .stdout(str_contains("export <csv_path>"));
}

#[test]
fn cli_shows_dated_schedule_for_a_selection() {
    let assert = run_cli("start 2025-07-02\ndays Mon,Tue\nquit\n").success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    // A Wednesday start puts the first Monday five days out.
    assert!(output.contains("2025-07-07"), "schedule output:\n{output}");
    assert!(output.contains("2025-07-08"), "schedule output:\n{output}");
    assert!(output.contains("水中漫步"), "schedule output:\n{output}");
}

#[test]
fn cli_reports_empty_selection() {
    run_cli("start 2025-07-02\nshow\nquit\n")
        .success()
        .stdout(str_contains("no weekdays selected"));
}

#[test]
fn cli_rejects_unknown_weekday() {
    run_cli("days Mon,Fooday\nquit\n")
        .success()
        .stdout(str_contains("unknown weekday 'Fooday'"));
}

#[test]
fn cli_exports_calendar_csv() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!("start 2025-07-02\ndays Mon,Tue\nexport {path}\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("Calendar CSV written to"));

    let exported = std::fs::read_to_string(tmp.path()).expect("read exported csv");
    assert!(exported.starts_with("Subject,Start Date,Start Time"));
    assert!(exported.contains("2025/07/07"));
    assert!(exported.contains("水池"));
}

#[test]
fn cli_marks_completion_display_only_without_a_log() {
    run_cli("start 2025-07-02\ndays Mon,Tue\ndone 0\nstatus\nquit\n")
        .success()
        .stdout(str_contains("no completion log attached"))
        .stdout(str_contains("display-only"));
}

#[test]
fn cli_logs_completion_to_csv() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!("start 2025-07-02\ndays Mon,Tue\nlog csv {path}\ndone 0\ndone 0\nquit\n");
    run_cli(&script)
        .success()
        .stdout(str_contains("Row 0 marked complete and logged."))
        .stdout(str_contains("Row 0 was already marked complete."));

    let log = std::fs::read_to_string(tmp.path()).expect("read completion log");
    assert_eq!(log.lines().count(), 2, "header plus one record:\n{log}");
    assert!(log.contains("complete"));
}
