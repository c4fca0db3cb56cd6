//! Week grid: seven day columns over 24 hour rows.

use chrono::NaiveDate;
use serde::Serialize;

use super::time_grid::{DayColumn, HourRow, hour_rows};
use crate::event::CalendarItem;
use crate::utils::{week_days, week_label};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekLayout {
    pub label: String,
    pub hours: Vec<HourRow>,
    /// Monday through Sunday
    pub columns: Vec<DayColumn>,
}

pub fn layout(reference: NaiveDate, today: NaiveDate, events: &[CalendarItem]) -> WeekLayout {
    let columns = week_days(reference)
        .into_iter()
        .map(|date| DayColumn::build(date, today, events))
        .collect();

    WeekLayout {
        label: week_label(reference),
        hours: hour_rows(),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::fixtures::{at, event};
    use chrono::{Datelike, Weekday};

    #[test]
    fn columns_follow_the_iso_week() {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        let events = vec![
            event("mon", at(2025, 3, 10, 9, 0), None),
            event("sun", at(2025, 3, 16, 18, 0), Some(at(2025, 3, 16, 20, 0))),
            event("next-mon", at(2025, 3, 17, 9, 0), None),
        ];
        let week = layout(reference, reference, &events);

        assert_eq!(week.columns.len(), 7);
        assert_eq!(week.columns[0].date.weekday(), Weekday::Mon);
        assert_eq!(week.columns[0].blocks[0].chip.id, "mon");
        assert_eq!(week.columns[6].blocks[0].chip.id, "sun");
        assert_eq!(week.columns[6].blocks[0].top, 1080.0);
        assert_eq!(week.columns[6].blocks[0].height, 120.0);
        assert!(week.columns[2].is_today);

        let total: usize = week.columns.iter().map(|c| c.blocks.len()).sum();
        assert_eq!(total, 2);
    }
}
