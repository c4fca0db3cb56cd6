//! Condensed single-column view for small screens.
//!
//! A strip of days (the selected week, or the whole month) above the agenda
//! of the selected day. Navigation moves by whole months only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AgendaEntry, placeable};
use crate::event::CalendarItem;
use crate::utils::{
    days_in_month_grid, day_label, events_for_date, month_label, shift_months, week_days,
};

/// Colored dots shown under a strip day.
pub const MAX_DOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripMode {
    #[default]
    Week,
    Month,
}

/// Selection state of the mobile view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MobileView {
    selected: NaiveDate,
    strip: StripMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobileLayout {
    pub month_label: String,
    pub selected_label: String,
    pub strip_mode: StripMode,
    /// `None` entries are the leading padding of the month strip
    pub strip: Vec<Option<StripDay>>,
    pub agenda: Vec<AgendaEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripDay {
    pub date: NaiveDate,
    pub is_selected: bool,
    pub is_today: bool,
    pub count: usize,
    pub dots: Vec<String>,
}

impl MobileView {
    pub fn new(selected: NaiveDate) -> Self {
        MobileView {
            selected,
            strip: StripMode::default(),
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn strip_mode(&self) -> StripMode {
        self.strip
    }

    /// Tap on a strip day.
    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    pub fn next_month(&mut self) {
        self.selected = shift_months(self.selected, 1);
    }

    pub fn prev_month(&mut self) {
        self.selected = shift_months(self.selected, -1);
    }

    pub fn toggle_strip(&mut self) {
        self.strip = match self.strip {
            StripMode::Week => StripMode::Month,
            StripMode::Month => StripMode::Week,
        };
    }

    pub fn layout(&self, today: NaiveDate, events: &[CalendarItem]) -> MobileLayout {
        let slots: Vec<Option<NaiveDate>> = match self.strip {
            StripMode::Week => week_days(self.selected).into_iter().map(Some).collect(),
            StripMode::Month => days_in_month_grid(self.selected),
        };

        let strip = slots
            .into_iter()
            .map(|slot| slot.map(|date| self.strip_day(date, today, events)))
            .collect();

        let agenda = placeable(events_for_date(self.selected, events))
            .into_iter()
            .map(|item| AgendaEntry::new(item, today))
            .collect();

        MobileLayout {
            month_label: month_label(self.selected),
            selected_label: day_label(self.selected),
            strip_mode: self.strip,
            strip,
            agenda,
        }
    }

    fn strip_day(&self, date: NaiveDate, today: NaiveDate, events: &[CalendarItem]) -> StripDay {
        let items = events_for_date(date, events);
        StripDay {
            date,
            is_selected: date == self.selected,
            is_today: date == today,
            count: items.len(),
            dots: items
                .iter()
                .take(MAX_DOTS)
                .map(|item| item.color().to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::fixtures::{at, event, meeting};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn selecting_a_day_shows_its_agenda() {
        let events = vec![
            event("a", at(2025, 3, 10, 15, 0), None),
            meeting("b", at(2025, 3, 10, 9, 0), None),
            event("c", at(2025, 3, 11, 9, 0), None),
        ];
        let mut view = MobileView::new(date(2025, 3, 11));
        view.select(date(2025, 3, 10));
        let layout = view.layout(date(2025, 3, 10), &events);

        let ids: Vec<_> = layout.agenda.iter().map(|e| e.chip.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let selected = layout.strip.iter().flatten().find(|d| d.is_selected).unwrap();
        assert_eq!(selected.date, date(2025, 3, 10));
        assert_eq!(selected.count, 2);
        assert_eq!(layout.strip.len(), 7);
    }

    #[test]
    fn month_navigation_moves_whole_months() {
        let mut view = MobileView::new(date(2025, 1, 31));
        view.next_month();
        assert_eq!(view.selected(), date(2025, 2, 28));
        view.prev_month();
        assert_eq!(view.selected(), date(2025, 1, 28));
    }

    #[test]
    fn month_strip_is_padded_like_the_month_grid() {
        let mut view = MobileView::new(date(2025, 6, 15));
        view.toggle_strip();
        let layout = view.layout(date(2025, 6, 15), &[]);

        assert_eq!(layout.strip_mode, StripMode::Month);
        assert_eq!(layout.strip.iter().take_while(|d| d.is_none()).count(), 6);
        assert_eq!(layout.strip.iter().flatten().count(), 30);
        assert_eq!(layout.month_label, "June 2025");
    }
}
