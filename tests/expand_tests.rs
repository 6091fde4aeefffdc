use chrono::{Duration, NaiveDate, Weekday};
use plan_tool::{ExpansionError, ExpansionPolicy, SelectionConfig, expand};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn weekday_set_produces_weeks_times_days_slots() {
    let config = SelectionConfig::new(d(2025, 7, 7), vec![Weekday::Mon, Weekday::Wed], 4);
    let slots = expand(&config).unwrap();
    assert_eq!(slots.len(), 4 * 2);
}

#[test]
fn fixed_pair_produces_two_slots_per_week() {
    let mut config = SelectionConfig::new(d(2025, 7, 7), Vec::new(), 3);
    config.policy = ExpansionPolicy::FixedPair;
    let slots = expand(&config).unwrap();
    assert_eq!(slots.len(), 3 * 2);
    // Week 2 sits exactly one week after week 1, same pair of days.
    assert_eq!(slots[2].date, d(2025, 7, 14));
    assert_eq!(slots[3].date, d(2025, 7, 15));
    assert_eq!(slots[2].weekday, Weekday::Mon);
    assert_eq!(slots[3].weekday, Weekday::Tue);
}

#[test]
fn dates_increase_with_occurrence_inside_a_seven_day_window() {
    // Deliberately unsorted selection; normalization orders it by offset.
    let start = d(2025, 7, 3); // Thursday
    let config = SelectionConfig::new(start, vec![Weekday::Mon, Weekday::Sat, Weekday::Thu], 5);
    let slots = expand(&config).unwrap();
    for week in 1..=5u32 {
        let window_start = start + Duration::days(7 * (week as i64 - 1));
        let week_slots: Vec<_> = slots.iter().filter(|s| s.week == week).collect();
        for pair in week_slots.windows(2) {
            assert!(pair[0].occurrence < pair[1].occurrence);
            assert!(pair[0].date < pair[1].date);
        }
        for slot in week_slots {
            let offset = (slot.date - window_start).num_days();
            assert!(
                (0..7).contains(&offset),
                "week {} slot {} fell outside its window",
                week,
                slot.date
            );
        }
    }
}

#[test]
fn wednesday_start_wraps_monday_and_tuesday_into_the_next_week() {
    // 2025-07-02 is a Wednesday.
    let start = d(2025, 7, 2);
    let config = SelectionConfig::new(start, vec![Weekday::Mon, Weekday::Tue], 4);
    let slots = expand(&config).unwrap();
    // The chosen weekdays precede the start weekday, so the first occurrences
    // wrap to the following Monday and Tuesday.
    assert_eq!(slots[0].date, start + Duration::days(5));
    assert_eq!(slots[0].weekday, Weekday::Mon);
    assert_eq!(slots[1].date, start + Duration::days(6));
    assert_eq!(slots[1].weekday, Weekday::Tue);
}

#[test]
fn empty_selection_halts_expansion() {
    let config = SelectionConfig::new(d(2025, 7, 7), Vec::new(), 4);
    let err = expand(&config).unwrap_err();
    assert_eq!(err, ExpansionError::EmptySelection);
}

#[test]
fn duplicate_selected_weekdays_collapse() {
    let config = SelectionConfig::new(d(2025, 7, 7), vec![Weekday::Mon, Weekday::Mon], 2);
    let slots = expand(&config).unwrap();
    assert_eq!(slots.len(), 2);
}

#[test]
fn start_weekday_in_selection_lands_on_the_start_date() {
    let start = d(2025, 7, 7); // Monday
    let config = SelectionConfig::new(start, vec![Weekday::Mon, Weekday::Fri], 1);
    let slots = expand(&config).unwrap();
    assert_eq!(slots[0].date, start);
    assert_eq!(slots[1].date, start + Duration::days(4));
}

#[test]
fn expansion_is_deterministic() {
    let config = SelectionConfig::new(d(2025, 7, 2), vec![Weekday::Tue, Weekday::Sun], 6);
    assert_eq!(expand(&config).unwrap(), expand(&config).unwrap());
}
