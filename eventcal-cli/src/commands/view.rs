use anyhow::Result;
use chrono::NaiveDate;
use eventcal_core::calendar::{Calendar, Direction};
use eventcal_core::view::{MobileView, StripMode};
use owo_colors::OwoColorize;

use crate::render::Render;

/// Render the active view after moving `steps` periods (negative goes back).
pub fn run(calendar: &mut Calendar, today: NaiveDate, steps: i32) -> Result<()> {
    let direction = if steps < 0 { Direction::Prev } else { Direction::Next };
    for _ in 0..steps.unsigned_abs() {
        calendar.advance(direction);
    }

    print_filter_summary(calendar);
    println!("{}", calendar.layout(today).render());
    Ok(())
}

/// Condensed agenda: day strip plus the selected day's events.
pub fn agenda(calendar: &Calendar, today: NaiveDate, month_strip: bool) -> Result<()> {
    let mut mobile = MobileView::new(calendar.view().reference_date);
    if month_strip && mobile.strip_mode() == StripMode::Week {
        mobile.toggle_strip();
    }

    print_filter_summary(calendar);
    println!("{}", calendar.mobile_layout(&mobile, today).render());
    Ok(())
}

/// Every visible event on one date, as opened from a month cell badge.
pub fn more(calendar: &mut Calendar, today: NaiveDate, date: NaiveDate) -> Result<()> {
    calendar.show_day_overflow(date);
    let Some((date, entries)) = calendar.day_overflow(today) else {
        return Ok(());
    };

    println!("{}", date.format("%A, %B %-d, %Y").bold());
    if entries.is_empty() {
        println!("   {}", "No events".dimmed());
    }
    for entry in &entries {
        println!("   {}", entry.render());
    }
    calendar.close_day_overflow();
    Ok(())
}

fn print_filter_summary(calendar: &Calendar) {
    let active = calendar.filters().active_count();
    if active == 0 {
        return;
    }
    let shown = calendar.events().len();
    let total = calendar.all_events().len();
    let plural = if active == 1 { "filter" } else { "filters" };
    println!(
        "{}",
        format!("{} {} active, showing {} of {} events", active, plural, shown, total).dimmed()
    );
}
