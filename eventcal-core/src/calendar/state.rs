//! View state: the reference date and the active view mode.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::utils::{day_label, month_label, shift_days, shift_months, week_label};
use crate::view::ViewMode;

pub const EMPLOYEE_VIEW_LABEL: &str = "Team schedule";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn sign(self) -> i32 {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prev" | "previous" | "back" => Ok(Direction::Prev),
            "next" | "forward" => Ok(Direction::Next),
            _ => Err(format!("Unknown direction '{}'. Expected prev or next", s)),
        }
    }
}

/// The temporal anchor shared by all views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub reference_date: NaiveDate,
    pub mode: ViewMode,
}

impl ViewState {
    pub fn new(reference_date: NaiveDate, mode: ViewMode) -> Self {
        ViewState {
            reference_date,
            mode,
        }
    }

    /// Move one period of the active view. The employee view has no period
    /// of its own and leaves the date alone.
    pub fn advance(&mut self, direction: Direction) {
        let sign = direction.sign();
        self.reference_date = match self.mode {
            ViewMode::Month => shift_months(self.reference_date, sign),
            ViewMode::Week => shift_days(self.reference_date, 7 * sign as i64),
            ViewMode::Day => shift_days(self.reference_date, sign as i64),
            ViewMode::Employee => self.reference_date,
        };
    }

    /// Switch mode. The reference date is kept.
    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.reference_date = date;
    }

    /// Localized description of the displayed period.
    pub fn label(&self) -> String {
        match self.mode {
            ViewMode::Month => month_label(self.reference_date),
            ViewMode::Week => week_label(self.reference_date),
            ViewMode::Day => day_label(self.reference_date),
            ViewMode::Employee => EMPLOYEE_VIEW_LABEL.to_string(),
        }
    }
}
