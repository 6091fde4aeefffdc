use chrono::{Duration, NaiveDate, NaiveTime};
use plan_tool::{
    CsvCompletionLog, ExpansionPolicy, ExportGranularity, JoinKey, MarkOutcome, SelectionConfig,
    Session, load_template_from_csv, weekday_from_label, weekday_label,
};
use polars::prelude::{AnyValue, DataFrame};
use std::fs::File;
use std::io::{self, Write};

const DEFAULT_TEMPLATE: &str = "data/training_schedule.csv";

fn format_cell(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            (epoch + Duration::days(*days as i64))
                .format("%Y-%m-%d")
                .to_string()
        }
        other => other.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            if let Ok(ref av) = col.get(row_idx) {
                let s = format_cell(av);
                if s.len() > widths[ci] {
                    widths[ci] = s.len();
                }
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in col_names.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row_idx in 0..df.height() {
        out.push('|');
        for (ci, col) in columns.iter().enumerate() {
            let s = col
                .get(row_idx)
                .map(|av| format_cell(&av))
                .unwrap_or_default();
            out.push(' ');
            out.push_str(&s);
            let pad = widths[ci].saturating_sub(s.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <csv_path>                    Load a training template\n  start <YYYY-MM-DD>                 Set the start date\n  days <csv>                         Set training weekdays (e.g. Mon,Tue)\n  policy <weekday_set|fixed_pair>    Set the expansion policy\n  joinkey <weekday|occurrence>       Set the merge join key\n  weeks <n>                          Override the week count\n  show                               Recompute and show the schedule\n  export <csv_path>                  Write the Google Calendar CSV\n  window <HH:MM> <HH:MM>             Set the calendar event time window\n  granularity <per_entry|per_day>    Set the calendar export granularity\n  location <text...>                 Set the calendar event location\n  log csv <path>                     Log completions to a CSV file\n  log none                           Run display-only (no log writes)\n  done <row>                         Mark a schedule row complete\n  status                             Show session status\n  quit|exit                          Exit"
    );
}

fn print_status(session: &Session) {
    let config = session.config();
    let days = config
        .selected_weekdays
        .iter()
        .map(|wd| weekday_label(*wd))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Template rows   : {}", session.template().len());
    println!("Start date      : {}", config.start_date);
    println!(
        "Training days   : {}",
        if days.is_empty() { "(none)" } else { &days }
    );
    println!("Total weeks     : {}", config.total_weeks);
    println!("Policy          : {:?}", config.policy);
    println!("Join key        : {:?}", config.join_key);
    println!(
        "Completion log  : {}",
        if session.tracker().is_display_only() {
            "display-only"
        } else {
            "attached"
        }
    );
    println!("Marked complete : {}", session.tracker().logged_count());
}

fn show_schedule(session: &Session) {
    match session.schedule() {
        Ok((schedule, warnings)) => {
            for warning in &warnings {
                println!("Warning: {warning}");
            }
            if schedule.is_empty() {
                println!("Schedule is empty (no template rows matched).");
            } else {
                println!("{}", render_df_as_text_table(schedule.dataframe()));
            }
        }
        Err(e) => println!("Error: {e}"),
    }
}

fn parse_days(csv: &str) -> Result<Vec<chrono::Weekday>, String> {
    csv.split(',')
        .map(|part| {
            weekday_from_label(part).ok_or_else(|| format!("unknown weekday '{}'", part.trim()))
        })
        .collect()
}

fn main() {
    let template = match load_template_from_csv(DEFAULT_TEMPLATE) {
        Ok(rows) => {
            println!("Loaded default template ({} rows).", rows.len());
            rows
        }
        Err(_) => {
            println!("No default template found; use 'load <csv_path>'.");
            Vec::new()
        }
    };
    let start_date = chrono::Local::now().date_naive();
    let config = SelectionConfig::for_template(&template, start_date, Vec::new());
    let mut session = Session::new(template, config);

    println!("Training Plan Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        if stdin.read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => match parts.next() {
                Some(path) => match load_template_from_csv(path) {
                    Ok(rows) => {
                        println!("Loaded {} template rows from {}.", rows.len(), path);
                        session.set_template(rows);
                    }
                    Err(e) => println!("Error loading template: {e}"),
                },
                None => println!("Usage: load <csv_path>"),
            },
            "start" => match parts.next() {
                Some(date_s) => match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
                    Ok(date) => {
                        let mut config = session.config().clone();
                        config.start_date = date;
                        session.set_config(config);
                        println!("Start date set to {date}.");
                    }
                    Err(_) => println!("Invalid date (YYYY-MM-DD)"),
                },
                None => println!("Usage: start <YYYY-MM-DD>"),
            },
            "days" => match parts.next() {
                Some(csv) => match parse_days(csv) {
                    Ok(days) => {
                        let mut config = session.config().clone();
                        config.selected_weekdays = days;
                        session.set_config(config);
                        show_schedule(&session);
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: days <csv> (e.g. days Mon,Tue)"),
            },
            "policy" => match parts.next() {
                Some("weekday_set") => {
                    let mut config = session.config().clone();
                    config.policy = ExpansionPolicy::WeekdaySet;
                    session.set_config(config);
                    println!("Policy set to weekday_set.");
                }
                Some("fixed_pair") => {
                    let mut config = session.config().clone();
                    config.policy = ExpansionPolicy::FixedPair;
                    session.set_config(config);
                    println!("Policy set to fixed_pair.");
                }
                _ => println!("Usage: policy <weekday_set|fixed_pair>"),
            },
            "joinkey" => match parts.next() {
                Some("weekday") => {
                    let mut config = session.config().clone();
                    config.join_key = JoinKey::Weekday;
                    session.set_config(config);
                    println!("Join key set to weekday.");
                }
                Some("occurrence") => {
                    let mut config = session.config().clone();
                    config.join_key = JoinKey::Occurrence;
                    session.set_config(config);
                    println!("Join key set to occurrence.");
                }
                _ => println!("Usage: joinkey <weekday|occurrence>"),
            },
            "weeks" => match parts.next().and_then(|s| s.parse::<u32>().ok()) {
                Some(weeks) if weeks >= 1 => {
                    let mut config = session.config().clone();
                    config.total_weeks = weeks;
                    session.set_config(config);
                    println!("Week count set to {weeks}.");
                }
                _ => println!("Usage: weeks <n>"),
            },
            "show" => show_schedule(&session),
            "export" => match parts.next() {
                Some(path) => match session.calendar_csv() {
                    Ok(csv) => match File::create(path).and_then(|mut f| f.write_all(csv.as_bytes()))
                    {
                        Ok(_) => println!("Calendar CSV written to {path}."),
                        Err(e) => println!("Error writing {path}: {e}"),
                    },
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: export <csv_path>"),
            },
            "window" => {
                let start_s = parts.next();
                let end_s = parts.next();
                match (start_s, end_s) {
                    (Some(start_s), Some(end_s)) => {
                        let start = NaiveTime::parse_from_str(start_s, "%H:%M");
                        let end = NaiveTime::parse_from_str(end_s, "%H:%M");
                        match (start, end) {
                            (Ok(start), Ok(end)) => {
                                let options = session.calendar_options_mut();
                                options.window_start = start;
                                options.window_end = end;
                                println!("Calendar window set to {start_s}-{end_s}.");
                            }
                            _ => println!("Invalid time (HH:MM)"),
                        }
                    }
                    _ => println!("Usage: window <HH:MM> <HH:MM>"),
                }
            }
            "granularity" => match parts.next() {
                Some("per_entry") => {
                    session.calendar_options_mut().granularity = ExportGranularity::PerEntry;
                    println!("Export granularity set to per_entry.");
                }
                Some("per_day") => {
                    session.calendar_options_mut().granularity = ExportGranularity::PerDay;
                    println!("Export granularity set to per_day.");
                }
                _ => println!("Usage: granularity <per_entry|per_day>"),
            },
            "location" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: location <text...>");
                } else {
                    session.calendar_options_mut().location = rest.join(" ");
                    println!("Calendar location updated.");
                }
            }
            "log" => match parts.next() {
                Some("csv") => match parts.next() {
                    Some(path) => {
                        session.attach_log(Some(Box::new(CsvCompletionLog::new(path))));
                        println!("Completion log set to {path}.");
                    }
                    None => println!("Usage: log csv <path>"),
                },
                Some("none") => {
                    session.attach_log(None);
                    println!("Completion tracking is display-only.");
                }
                _ => println!("Usage: log csv <path> | log none"),
            },
            "done" => match parts.next().and_then(|s| s.parse::<usize>().ok()) {
                Some(row) => match session.mark_complete_now(row) {
                    Ok(MarkOutcome::Logged) => println!("Row {row} marked complete and logged."),
                    Ok(MarkOutcome::AlreadyLogged) => {
                        println!("Row {row} was already marked complete.")
                    }
                    Ok(MarkOutcome::DisplayOnly) => println!(
                        "Row {row} marked in this session only (no completion log attached)."
                    ),
                    Err(e) => println!("Warning: completion not recorded: {e}"),
                },
                None => println!("Usage: done <row>"),
            },
            "status" => print_status(&session),
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
