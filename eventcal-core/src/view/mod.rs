//! View layouts.
//!
//! Each view turns `(reference date, today, visible events)` into a plain
//! layout value: grid cells, positioned blocks, grouped lists. Hosts draw
//! the layout however they like and report clicks back to the
//! [`Calendar`](crate::calendar::Calendar) using the ids and dates it carries.

pub mod day;
pub mod employee;
pub mod mobile;
pub mod month;
pub mod time_grid;
pub mod week;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::event::{CalendarItem, Employee};
use crate::utils::{format_date_label, format_duration_label, format_time_range};

pub use day::DayLayout;
pub use employee::{EmployeeGroup, EmployeeLayout};
pub use mobile::{MobileLayout, MobileView, StripMode};
pub use month::{DayCell, MonthCell, MonthLayout};
pub use time_grid::{DayColumn, EventBlock};
pub use week::WeekLayout;

/// The four desktop view modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
    Employee,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [ViewMode::Month, ViewMode::Week, ViewMode::Day, ViewMode::Employee];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
            ViewMode::Employee => "employee",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown view '{}'. Expected month, week, day or employee", s))
    }
}

/// Compact display data for one item, shared by every view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventChip {
    pub id: String,
    pub name: String,
    pub time: String,
    pub color: String,
    pub is_meeting: bool,
    pub status: String,
}

impl From<&CalendarItem> for EventChip {
    fn from(item: &CalendarItem) -> Self {
        EventChip {
            id: item.id.clone(),
            name: item.name.clone(),
            time: format_time_range(item),
            color: item.color().to_string(),
            is_meeting: item.is_meeting(),
            status: item.status.label().to_string(),
        }
    }
}

/// A row in list-style views (employee groups, mobile agenda, overflow modal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgendaEntry {
    pub chip: EventChip,
    pub date: NaiveDate,
    pub date_label: String,
    pub duration: String,
    pub location: String,
    pub client: Option<String>,
}

impl AgendaEntry {
    pub fn new(item: &CalendarItem, today: NaiveDate) -> Self {
        AgendaEntry {
            chip: EventChip::from(item),
            date: item.date(),
            date_label: format_date_label(item.date(), today),
            duration: format_duration_label(item),
            location: item.location.clone(),
            client: item.client().map(|c| c.display_name().to_string()),
        }
    }
}

/// Layout of whichever desktop view is active.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewLayout {
    Month(MonthLayout),
    Week(WeekLayout),
    Day(DayLayout),
    Employee(EmployeeLayout),
}

impl ViewLayout {
    pub fn build(
        mode: ViewMode,
        reference: NaiveDate,
        today: NaiveDate,
        events: &[CalendarItem],
        employees: &[Employee],
    ) -> Self {
        match mode {
            ViewMode::Month => ViewLayout::Month(month::layout(reference, today, events)),
            ViewMode::Week => ViewLayout::Week(week::layout(reference, today, events)),
            ViewMode::Day => ViewLayout::Day(day::layout(reference, today, events)),
            ViewMode::Employee => {
                ViewLayout::Employee(employee::layout(employees, today, events))
            }
        }
    }
}

/// Items that can be placed on a grid, sorted by start. Items breaking the
/// `end >= start` invariant are logged and left out instead of failing the
/// whole layout.
pub(crate) fn placeable<'a, I>(items: I) -> Vec<&'a CalendarItem>
where
    I: IntoIterator<Item = &'a CalendarItem>,
{
    let mut placeable: Vec<&CalendarItem> = items
        .into_iter()
        .filter(|item| match item.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(event = %item.id, error = %e, "Leaving event out of layout");
                false
            }
        })
        .collect();
    placeable.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    placeable
}
