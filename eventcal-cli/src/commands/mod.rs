pub mod new;
pub mod open;
pub mod options;
pub mod view;

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use eventcal_core::calendar::Calendar;
use eventcal_core::config::CalendarConfig;
use eventcal_core::filter::FilterAction;
use eventcal_core::view::ViewMode;
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::store::JsonFileStore;
use crate::utils::tui::create_spinner;

/// Open the configured store and mount a calendar on it.
pub async fn mount(
    config: &CalendarConfig,
    today: NaiveDate,
    mode: ViewMode,
    filters: Vec<FilterAction>,
) -> Result<Calendar> {
    let store = Arc::new(JsonFileStore::new(
        config.store_path(),
        config.current_user.clone(),
    ));
    tracing::debug!(path = %store.path().display(), "Opening event store");

    let spinner = create_spinner("Loading events".into());
    let mut calendar = Calendar::mount(store, today, mode).await;
    spinner.finish_and_clear();

    if let Some(error) = calendar.load_error() {
        eprintln!("{}", format!("Could not load events: {}", error).red());
    }

    for action in filters {
        calendar.dispatch(action);
    }

    Ok(calendar)
}

/// Print and drain queued notifications.
pub fn flush_notifications(calendar: &mut Calendar) {
    for notification in calendar.take_notifications() {
        eprintln!("{}", notification.render());
    }
}
