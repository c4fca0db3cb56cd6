//! Month grid.
//!
//! Seven columns, Monday first. A day cell shows at most two items; when
//! there are more, the second chip is drawn as a stack (two shadow layers)
//! with a badge counting the hidden items. The badge opens the "all events
//! for this date" list.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{EventChip, placeable};
use crate::event::CalendarItem;
use crate::utils::{days_in_month_grid, events_for_date, first_of_month, month_label};

/// Items shown directly in a day cell.
pub const MAX_VISIBLE_PER_DAY: usize = 2;

/// Shadow layers drawn behind a stacked chip.
pub const STACK_LAYERS: usize = 2;

pub const WEEKDAY_HEADERS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthLayout {
    pub label: String,
    pub month: NaiveDate,
    pub cells: Vec<MonthCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MonthCell {
    Empty,
    Day(DayCell),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    /// At most `MAX_VISIBLE_PER_DAY` chips
    pub chips: Vec<EventChip>,
    /// Items not shown in the cell
    pub overflow: usize,
}

impl DayCell {
    /// Whether the last visible chip is drawn with the stacked shadow.
    pub fn is_stacked(&self) -> bool {
        self.overflow > 0
    }

    /// Text of the overflow badge, e.g. "+1".
    pub fn overflow_badge(&self) -> Option<String> {
        (self.overflow > 0).then(|| format!("+{}", self.overflow))
    }

    pub fn total(&self) -> usize {
        self.chips.len() + self.overflow
    }
}

impl MonthLayout {
    /// Cells grouped into rows of seven, with the last row padded.
    pub fn weeks(&self) -> Vec<Vec<MonthCell>> {
        self.cells
            .chunks(7)
            .map(|row| {
                let mut row = row.to_vec();
                row.resize(7, MonthCell::Empty);
                row
            })
            .collect()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCell> {
        self.cells.iter().find_map(|cell| match cell {
            MonthCell::Day(day) if day.date == date => Some(day),
            _ => None,
        })
    }
}

pub fn layout(reference: NaiveDate, today: NaiveDate, events: &[CalendarItem]) -> MonthLayout {
    let cells = days_in_month_grid(reference)
        .into_iter()
        .map(|slot| match slot {
            None => MonthCell::Empty,
            Some(date) => MonthCell::Day(day_cell(date, today, events)),
        })
        .collect();

    MonthLayout {
        label: month_label(reference),
        month: first_of_month(reference),
        cells,
    }
}

fn day_cell(date: NaiveDate, today: NaiveDate, events: &[CalendarItem]) -> DayCell {
    let items = placeable(events_for_date(date, events));
    let overflow = items.len().saturating_sub(MAX_VISIBLE_PER_DAY);
    let chips = items
        .into_iter()
        .take(MAX_VISIBLE_PER_DAY)
        .map(EventChip::from)
        .collect();

    DayCell {
        date,
        is_today: date == today,
        chips,
        overflow,
    }
}

/// Whether `date` belongs to the month shown by `layout`.
pub fn in_month(layout: &MonthLayout, date: NaiveDate) -> bool {
    layout.month.year() == date.year() && layout.month.month() == date.month()
}
