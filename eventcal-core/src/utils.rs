//! Date grid and positioning helpers shared by every view.
//!
//! Everything here is pure: same input, same output, no clock access
//! (callers pass `today` where it matters).

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};

use crate::event::CalendarItem;

/// Pixel height of one hour row in the time grids.
pub const HOUR_HEIGHT: f64 = 60.0;

/// Minimum block height so short and point events stay clickable.
pub const MIN_EVENT_HEIGHT: f64 = 30.0;

pub const HOURS_PER_DAY: u32 = 24;

/// Vertical placement of an event block inside a day column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPosition {
    pub top: f64,
    pub height: f64,
}

/// Days of the month containing `date`, left-padded with `None` so the first
/// day sits under its weekday column (Monday first). The tail is not padded.
pub fn days_in_month_grid(date: NaiveDate) -> Vec<Option<NaiveDate>> {
    let first = first_of_month(date);
    let leading = first.weekday().num_days_from_monday() as usize;

    let mut grid: Vec<Option<NaiveDate>> = vec![None; leading];
    grid.extend(first.iter_days().take_while(|d| d.month() == first.month()).map(Some));
    grid
}

/// The seven days of the Monday-start week containing `date`.
pub fn week_days(date: NaiveDate) -> [NaiveDate; 7] {
    let dow = date.weekday().num_days_from_sunday() as i64;
    let offset = if dow == 0 { -6 } else { 1 - dow };
    let monday = shift_days(date, offset);
    std::array::from_fn(|i| shift_days(monday, i as i64))
}

/// Items whose start falls on `date`. This is a same-day check on the start,
/// not a range overlap test.
pub fn events_for_date<'a>(date: NaiveDate, events: &'a [CalendarItem]) -> Vec<&'a CalendarItem> {
    events.iter().filter(|e| e.start.date() == date).collect()
}

/// Exact length in hours (fractional). Zero for point events.
pub fn duration_hours(item: &CalendarItem) -> f64 {
    (item.end_or_start() - item.start).num_seconds().max(0) as f64 / 3600.0
}

/// Length in whole hours, rounded up.
pub fn duration(item: &CalendarItem) -> i64 {
    let seconds = (item.end_or_start() - item.start).num_seconds().max(0);
    (seconds + 3599) / 3600
}

pub fn event_position(item: &CalendarItem) -> EventPosition {
    let top = (item.start.hour() as f64 + item.start.minute() as f64 / 60.0) * HOUR_HEIGHT;
    let height = (duration_hours(item) * HOUR_HEIGHT).max(MIN_EVENT_HEIGHT);
    EventPosition { top, height }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Move by whole months, clamping the day to the target month's length.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Move by whole days, saturating at the ends of the representable range.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    match date.checked_add_signed(Duration::days(days)) {
        Some(shifted) => shifted,
        None if days < 0 => NaiveDate::MIN,
        None => NaiveDate::MAX,
    }
}

pub fn format_time(dt: &NaiveDateTime) -> String {
    dt.format("%H:%M").to_string()
}

/// "09:00 - 10:30", or just the start for point events.
pub fn format_time_range(item: &CalendarItem) -> String {
    match &item.end {
        Some(end) => format!("{} - {}", format_time(&item.start), format_time(end)),
        None => format_time(&item.start),
    }
}

/// "1h 30m", "45m", "2h". Empty for point events.
pub fn format_duration_label(item: &CalendarItem) -> String {
    let minutes = (item.end_or_start() - item.start).num_minutes().max(0);
    match (minutes / 60, minutes % 60) {
        (0, 0) => String::new(),
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Human-readable day label relative to `today` (e.g. "Today", "Tomorrow", "Wed Mar 12")
pub fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

pub fn week_label(date: NaiveDate) -> String {
    let days = week_days(date);
    format!("{} – {}", days[0].format("%b %-d"), days[6].format("%b %-d, %Y"))
}

pub fn day_label(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::fixtures::{at, event};
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_grid_leading_padding_matches_weekday() {
        for year in [2024, 2025, 2026] {
            for month in 1..=12 {
                let first = date(year, month, 1);
                let grid = days_in_month_grid(date(year, month, 15));
                let leading = grid.iter().take_while(|d| d.is_none()).count();

                assert_eq!(leading as u32, (first.weekday().num_days_from_sunday() + 6) % 7);
                assert_eq!(grid[leading], Some(first));
                assert!(grid[leading..].iter().all(Option::is_some));
            }
        }
    }

    #[test]
    fn month_grid_sunday_start_gets_six_empties() {
        // June 2025 starts on a Sunday
        let grid = days_in_month_grid(date(2025, 6, 1));
        assert_eq!(grid.iter().take_while(|d| d.is_none()).count(), 6);
        assert_eq!(grid.len(), 6 + 30);
    }

    #[test]
    fn week_days_start_monday_and_are_consecutive() {
        let mut d = date(2025, 1, 1);
        for _ in 0..60 {
            let days = week_days(d);
            assert_eq!(days[0].weekday(), Weekday::Mon);
            assert!(days.contains(&d));
            for pair in days.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
            d += Duration::days(1);
        }
    }

    #[test]
    fn week_days_sunday_wraps_to_end() {
        // 2025-03-16 is a Sunday
        let days = week_days(date(2025, 3, 16));
        assert_eq!(days[0], date(2025, 3, 10));
        assert_eq!(days[6], date(2025, 3, 16));
    }

    #[test]
    fn week_days_saturate_at_calendar_edges() {
        let days = week_days(NaiveDate::MAX);
        assert_eq!(days[0].weekday(), Weekday::Mon);
        assert!(days.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(days[6], NaiveDate::MAX);

        let days = week_days(NaiveDate::MIN);
        assert!(days.contains(&NaiveDate::MIN));
        assert_eq!(shift_days(NaiveDate::MIN, -1), NaiveDate::MIN);
        assert_eq!(shift_days(date(2025, 3, 10), 7), date(2025, 3, 17));
    }

    #[test]
    fn events_for_date_matches_start_day_only() {
        let events = vec![
            event("a", at(2025, 3, 10, 9, 0), Some(at(2025, 3, 12, 9, 0))),
            event("b", at(2025, 3, 11, 9, 0), None),
        ];
        let on_tenth = events_for_date(date(2025, 3, 10), &events);
        assert_eq!(on_tenth.len(), 1);
        assert_eq!(on_tenth[0].id, "a");

        // multi-day events are not repeated on following days
        assert_eq!(events_for_date(date(2025, 3, 11), &events)[0].id, "b");
        assert!(events_for_date(date(2025, 3, 12), &events).is_empty());
    }

    #[test]
    fn position_uses_sixty_pixels_per_hour() {
        let e = event("a", at(2025, 3, 10, 9, 0), Some(at(2025, 3, 10, 10, 30)));
        let pos = event_position(&e);
        assert_eq!(pos.top, 540.0);
        assert_eq!(pos.height, 90.0);
    }

    #[test]
    fn position_has_minimum_height() {
        let point = event("a", at(2025, 3, 10, 13, 15), None);
        let pos = event_position(&point);
        assert_eq!(pos.top, 795.0);
        assert_eq!(pos.height, MIN_EVENT_HEIGHT);

        let short = event("b", at(2025, 3, 10, 13, 0), Some(at(2025, 3, 10, 13, 10)));
        assert_eq!(event_position(&short).height, MIN_EVENT_HEIGHT);
    }

    #[test]
    fn position_is_monotonic_in_start() {
        let mut previous = -1.0;
        for minute in (0..24 * 60).step_by(7) {
            let e = event("a", at(2025, 3, 10, minute / 60, minute % 60), None);
            let top = event_position(&e).top;
            assert!(top >= previous);
            previous = top;
        }
    }

    #[test]
    fn duration_rounds_up() {
        let e = event("a", at(2025, 3, 10, 9, 0), Some(at(2025, 3, 10, 10, 30)));
        assert_eq!(duration(&e), 2);

        let exact = event("b", at(2025, 3, 10, 9, 0), Some(at(2025, 3, 10, 11, 0)));
        assert_eq!(duration(&exact), 2);

        let point = event("c", at(2025, 3, 10, 9, 0), None);
        assert_eq!(duration(&point), 0);
    }

    #[test]
    fn shift_months_clamps_day() {
        assert_eq!(shift_months(date(2025, 1, 31), 1), date(2025, 2, 28));
        assert_eq!(shift_months(date(2024, 3, 31), -1), date(2024, 2, 29));
        assert_eq!(shift_months(date(2025, 12, 15), 1), date(2026, 1, 15));
    }

    #[test]
    fn labels() {
        let today = date(2025, 3, 10);
        assert_eq!(format_date_label(today, today), "Today");
        assert_eq!(format_date_label(date(2025, 3, 11), today), "Tomorrow");
        assert_eq!(format_date_label(date(2025, 3, 12), today), "Wed Mar 12");
        assert_eq!(month_label(today), "March 2025");
        assert_eq!(week_label(date(2025, 3, 12)), "Mar 10 – Mar 16, 2025");
        assert_eq!(day_label(today), "Monday, March 10, 2025");
    }

    #[test]
    fn duration_labels() {
        let e = event("a", at(2025, 3, 10, 9, 0), Some(at(2025, 3, 10, 10, 30)));
        assert_eq!(format_duration_label(&e), "1h 30m");
        assert_eq!(format_time_range(&e), "09:00 - 10:30");

        let point = event("b", at(2025, 3, 10, 9, 0), None);
        assert_eq!(format_duration_label(&point), "");
        assert_eq!(format_time_range(&point), "09:00");
    }
}
