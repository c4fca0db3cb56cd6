//! Hour-row grid shared by the week and day views.
//!
//! Blocks are positioned by `top`/`height` only. Overlapping items are not
//! split into side-by-side columns; they overlap on screen.

use chrono::NaiveDate;
use serde::Serialize;

use super::{EventChip, placeable};
use crate::event::CalendarItem;
use crate::utils::{EventPosition, HOUR_HEIGHT, HOURS_PER_DAY, event_position, events_for_date};

/// One hour row of the grid (0-23).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRow {
    pub hour: u32,
    pub label: String,
    pub top: f64,
}

/// An absolutely-positioned item inside a day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBlock {
    pub chip: EventChip,
    pub top: f64,
    pub height: f64,
}

impl EventBlock {
    pub fn new(item: &CalendarItem) -> Self {
        let EventPosition { top, height } = event_position(item);
        EventBlock {
            chip: EventChip::from(item),
            top,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether the vertical extents of two blocks intersect.
    pub fn overlaps(&self, other: &EventBlock) -> bool {
        self.top < other.bottom() && other.top < self.bottom()
    }
}

/// A single day's column of positioned blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub is_today: bool,
    pub blocks: Vec<EventBlock>,
}

impl DayColumn {
    pub fn build(date: NaiveDate, today: NaiveDate, events: &[CalendarItem]) -> Self {
        let blocks = placeable(events_for_date(date, events))
            .into_iter()
            .map(EventBlock::new)
            .collect();

        DayColumn {
            date,
            is_today: date == today,
            blocks,
        }
    }

    /// Blocks covering the given hour row.
    pub fn blocks_in_hour(&self, hour: u32) -> impl Iterator<Item = &EventBlock> {
        let row_top = hour as f64 * HOUR_HEIGHT;
        let row_bottom = row_top + HOUR_HEIGHT;
        self.blocks
            .iter()
            .filter(move |b| b.top < row_bottom && b.bottom() > row_top)
    }
}

pub fn hour_rows() -> Vec<HourRow> {
    (0..HOURS_PER_DAY)
        .map(|hour| HourRow {
            hour,
            label: format!("{:02}:00", hour),
            top: hour as f64 * HOUR_HEIGHT,
        })
        .collect()
}

/// Total pixel height of a day column.
pub fn grid_height() -> f64 {
    HOURS_PER_DAY as f64 * HOUR_HEIGHT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::fixtures::{at, event, meeting};

    #[test]
    fn hour_rows_cover_the_day() {
        let rows = hour_rows();
        assert_eq!(rows.len(), 24);
        assert_eq!(rows[0].label, "00:00");
        assert_eq!(rows[23].top, 1380.0);
        assert_eq!(grid_height(), 1440.0);
    }

    #[test]
    fn blocks_in_hour_includes_spanning_items() {
        let events = vec![event("a", at(2025, 3, 10, 9, 30), Some(at(2025, 3, 10, 11, 15)))];
        let column = DayColumn::build(at(2025, 3, 10, 0, 0).date(), at(2025, 3, 10, 0, 0).date(), &events);

        assert_eq!(column.blocks_in_hour(8).count(), 0);
        assert_eq!(column.blocks_in_hour(9).count(), 1);
        assert_eq!(column.blocks_in_hour(10).count(), 1);
        assert_eq!(column.blocks_in_hour(11).count(), 1);
        assert_eq!(column.blocks_in_hour(12).count(), 0);
    }

    #[test]
    fn overlapping_items_are_not_split() {
        let events = vec![
            meeting("m", at(2025, 3, 10, 14, 0), Some(at(2025, 3, 10, 15, 0))),
            event("e", at(2025, 3, 10, 14, 0), Some(at(2025, 3, 10, 15, 0))),
        ];
        let date = at(2025, 3, 10, 0, 0).date();
        let column = DayColumn::build(date, date, &events);

        assert_eq!(column.blocks.len(), 2);
        assert_eq!(column.blocks[0].top, column.blocks[1].top);
        assert_eq!(column.blocks[0].height, column.blocks[1].height);
        assert!(column.blocks[0].overlaps(&column.blocks[1]));
    }
}
