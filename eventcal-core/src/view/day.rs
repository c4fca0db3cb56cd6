//! Single-day grid.

use chrono::NaiveDate;
use serde::Serialize;

use super::time_grid::{DayColumn, HourRow, hour_rows};
use crate::event::CalendarItem;
use crate::utils::day_label;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayLayout {
    pub label: String,
    pub hours: Vec<HourRow>,
    pub column: DayColumn,
}

pub fn layout(reference: NaiveDate, today: NaiveDate, events: &[CalendarItem]) -> DayLayout {
    DayLayout {
        label: day_label(reference),
        hours: hour_rows(),
        column: DayColumn::build(reference, today, events),
    }
}
