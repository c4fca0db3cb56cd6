use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use eventcal_core::calendar::{Calendar, EventClick};

use crate::render::Render;

/// Open an item: meetings show their summary, events their detail page.
pub fn run(calendar: &mut Calendar, today: NaiveDate, id: &str) -> Result<()> {
    match calendar.click_event(id, today)? {
        EventClick::MeetingSummary(summary) => {
            println!("{}", summary.render());
            calendar.close_modal();
        }
        EventClick::NavigateToEvent(id) => {
            let item = calendar
                .events()
                .iter()
                .find(|e| e.id == id)
                .ok_or_else(|| anyhow!("Event '{}' disappeared", id))?;
            println!("{}", item.render());
        }
    }
    Ok(())
}
