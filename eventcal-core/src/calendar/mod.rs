//! The calendar orchestrator.
//!
//! `Calendar` owns everything a hosting page needs: the view state, the
//! filter set, the event snapshot and its filtered view, the modal and
//! tooltip state, and the live change subscription. Hosts call its methods
//! in response to user input and render `layout()`.
//!
//! The snapshot is always replaced wholesale and the visible collection
//! recomputed from it; nothing is patched in place and nothing is inserted
//! locally after a write. New items show up through the change
//! notification (or the refresh that follows a successful write).

mod state;

pub use state::{Direction, EMPLOYEE_VIEW_LABEL, ViewState};

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{CalendarError, CalendarResult};
use crate::event::{CalendarItem, ItemKind};
use crate::filter::{FilterAction, FilterSet, apply_filters};
use crate::record::items_from_records;
use crate::store::{Capabilities, EventStore, EventType, FilterOptions, Subscription};
use crate::tooltip::{HoverTooltip, ScreenPoint};
use crate::utils::{events_for_date, format_date_label, format_duration_label, format_time_range};
use crate::view::{AgendaEntry, EventChip, MobileLayout, MobileView, ViewLayout, ViewMode};
use crate::wizard::{EventWizard, MeetingForm};

/// What the "new" button offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateMenu {
    /// Full choice of item types
    TypeSelector(Vec<CreateOption>),
    /// The user may only create meetings; the meeting form opens directly
    MeetingOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOption {
    Business,
    Individual,
    Meeting,
}

/// Result of clicking an item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventClick {
    /// Meetings open an inline summary
    MeetingSummary(MeetingSummary),
    /// Events navigate to their detail page
    NavigateToEvent(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeetingSummary {
    pub id: String,
    pub name: String,
    pub date_label: String,
    pub time: String,
    pub location: String,
    /// Participant display names
    pub participants: Vec<String>,
    pub notes: Option<String>,
}

/// Which modal is open.
#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    Closed,
    CreateMenu(CreateMenu),
    EventWizard(Box<EventWizard>),
    MeetingForm(MeetingForm),
    MeetingSummary(MeetingSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message for the user (toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Content of the hover tooltip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub chip: EventChip,
    pub at: ScreenPoint,
    pub duration: String,
    pub location: String,
    pub client: Option<String>,
}

pub struct Calendar {
    store: Arc<dyn EventStore>,
    view: ViewState,
    filters: FilterSet,
    capabilities: Capabilities,
    options: FilterOptions,
    all_events: Arc<[CalendarItem]>,
    events: Vec<CalendarItem>,
    load_error: Option<String>,
    modal: Modal,
    tooltip: HoverTooltip,
    day_overflow: Option<NaiveDate>,
    notifications: Vec<Notification>,
    subscription: Subscription,
}

impl Calendar {
    /// Load capabilities, lookup tables and events, and start listening for
    /// changes.
    pub async fn mount(store: Arc<dyn EventStore>, today: NaiveDate, mode: ViewMode) -> Self {
        let capabilities = store.current_user_capabilities().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not resolve capabilities, restricting to meetings");
            Capabilities::default()
        });

        let options = store.fetch_filter_options().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not load filter options");
            FilterOptions::default()
        });

        // Subscribe before the first fetch so no change slips in between.
        let subscription = store.subscribe_to_event_changes();

        let mut calendar = Calendar {
            store,
            view: ViewState::new(today, mode),
            filters: FilterSet::default(),
            capabilities,
            options,
            all_events: Arc::from(Vec::new()),
            events: Vec::new(),
            load_error: None,
            modal: Modal::Closed,
            tooltip: HoverTooltip::new(),
            day_overflow: None,
            notifications: Vec::new(),
            subscription,
        };
        calendar.refresh().await;
        calendar
    }

    /// Refetch the snapshot and recompute the visible collection. A failed
    /// fetch leaves an empty calendar and is logged, never returned.
    pub async fn refresh(&mut self) {
        match self.store.fetch_events().await {
            Ok(records) => {
                let items = items_from_records(records);
                tracing::debug!(count = items.len(), "Loaded events");
                self.all_events = Arc::from(items);
                self.load_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch events");
                self.all_events = Arc::from(Vec::new());
                self.load_error = Some(e.to_string());
            }
        }
        self.recompute();
    }

    /// Wait for the next change notification and refresh. Returns false once
    /// the subscription has ended.
    pub async fn next_change(&mut self) -> bool {
        match self.subscription.changed().await {
            Some(change) => {
                tracing::debug!(kind = ?change.kind, id = ?change.id, "Event collection changed");
                self.refresh().await;
                true
            }
            None => false,
        }
    }

    /// Stop listening for changes. Also happens when the calendar is dropped.
    pub fn unmount(&mut self) {
        self.subscription.unsubscribe();
        self.tooltip.dismiss();
        self.modal = Modal::Closed;
    }

    pub fn is_live(&self) -> bool {
        self.subscription.is_active()
    }

    fn recompute(&mut self) {
        self.events = apply_filters(&self.all_events, &self.filters, self.current_user());
    }

    // STATE:

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn current_user(&self) -> Option<&str> {
        self.capabilities.id.as_deref()
    }

    /// The full snapshot, unfiltered.
    pub fn all_events(&self) -> &[CalendarItem] {
        &self.all_events
    }

    /// The filtered collection the views render.
    pub fn events(&self) -> &[CalendarItem] {
        &self.events
    }

    /// Error message of the last failed fetch, for the empty state.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Drain pending notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // FILTERS + NAVIGATION:

    pub fn dispatch(&mut self, action: FilterAction) {
        self.filters.apply(action);
        self.recompute();
    }

    /// Replace the capabilities (e.g. after a session change). The visible
    /// collection depends on the current user, so it is recomputed.
    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
        self.recompute();
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        self.view.set_mode(mode);
    }

    pub fn advance(&mut self, direction: Direction) {
        self.view.advance(direction);
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.view.go_to(today);
    }

    pub fn go_to(&mut self, date: NaiveDate) {
        self.view.go_to(date);
    }

    pub fn label(&self) -> String {
        self.view.label()
    }

    // LAYOUT:

    pub fn layout(&self, today: NaiveDate) -> ViewLayout {
        ViewLayout::build(
            self.view.mode,
            self.view.reference_date,
            today,
            &self.events,
            &self.options.employees,
        )
    }

    pub fn mobile_layout(&self, mobile: &MobileView, today: NaiveDate) -> MobileLayout {
        mobile.layout(today, &self.events)
    }

    // INTERACTION:

    /// A day was clicked: it becomes the reference date, and the month view
    /// drills down into that day.
    pub fn click_date(&mut self, date: NaiveDate) {
        self.view.go_to(date);
        if self.view.mode == ViewMode::Month {
            self.view.set_mode(ViewMode::Day);
        }
    }

    pub fn click_event(&mut self, id: &str, today: NaiveDate) -> CalendarResult<EventClick> {
        let item = self.find(id)?;
        let click = match &item.kind {
            ItemKind::Meeting(meeting) => EventClick::MeetingSummary(MeetingSummary {
                id: item.id.clone(),
                name: item.name.clone(),
                date_label: format_date_label(item.date(), today),
                time: format_time_range(item),
                location: item.location.clone(),
                participants: meeting
                    .participants
                    .iter()
                    .map(|p| self.employee_name(p))
                    .collect(),
                notes: meeting.notes.clone(),
            }),
            ItemKind::Event(_) => EventClick::NavigateToEvent(item.id.clone()),
        };

        if let EventClick::MeetingSummary(summary) = &click {
            self.modal = Modal::MeetingSummary(summary.clone());
        }
        Ok(click)
    }

    fn find(&self, id: &str) -> CalendarResult<&CalendarItem> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CalendarError::UnknownEvent(id.to_string()))
    }

    fn employee_name(&self, id: &str) -> String {
        self.options
            .employees
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Open the "all events on this date" list (from a month cell badge).
    pub fn show_day_overflow(&mut self, date: NaiveDate) {
        self.day_overflow = Some(date);
    }

    pub fn close_day_overflow(&mut self) {
        self.day_overflow = None;
    }

    /// The open overflow list: its date and every visible item on it.
    pub fn day_overflow(&self, today: NaiveDate) -> Option<(NaiveDate, Vec<AgendaEntry>)> {
        let date = self.day_overflow?;
        let mut items = events_for_date(date, &self.events);
        items.sort_by_key(|e| e.start);
        let entries = items
            .into_iter()
            .map(|item| AgendaEntry::new(item, today))
            .collect();
        Some((date, entries))
    }

    pub fn hover_event(&mut self, id: &str, at: ScreenPoint) {
        if self.events.iter().any(|e| e.id == id) {
            self.tooltip.hover(id, at);
        }
    }

    pub fn leave_event(&mut self, now: Instant) {
        self.tooltip.leave(now);
    }

    pub fn enter_tooltip(&mut self) {
        self.tooltip.enter_tooltip();
    }

    /// Drive the tooltip dismissal timer. Returns true if it just closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.tooltip.tick(now)
    }

    pub fn tooltip(&self) -> Option<TooltipContent> {
        let (id, at) = self.tooltip.visible()?;
        let item = self.events.iter().find(|e| e.id == id)?;
        Some(TooltipContent {
            chip: EventChip::from(item),
            at,
            duration: format_duration_label(item),
            location: item.location.clone(),
            client: item.client().map(|c| c.display_name().to_string()),
        })
    }

    // CREATION:

    /// "New" was clicked. Users who may create events choose a type; everyone
    /// else goes straight to the meeting form.
    pub fn open_create(&mut self, date: NaiveDate) -> CreateMenu {
        let menu = if self.capabilities.can_create_events {
            CreateMenu::TypeSelector(vec![
                CreateOption::Business,
                CreateOption::Individual,
                CreateOption::Meeting,
            ])
        } else {
            CreateMenu::MeetingOnly
        };

        self.modal = match &menu {
            CreateMenu::TypeSelector(_) => Modal::CreateMenu(menu.clone()),
            CreateMenu::MeetingOnly => {
                Modal::MeetingForm(MeetingForm::new(date, self.capabilities.id.clone()))
            }
        };
        menu
    }

    /// Pick an entry from the type selector. Without the capability, event
    /// types degrade to the meeting form.
    pub fn choose_create(&mut self, option: CreateOption, date: NaiveDate) {
        let created_by = self.capabilities.id.clone();
        let event_type = match option {
            CreateOption::Business => Some(EventType::Business),
            CreateOption::Individual => Some(EventType::Individual),
            CreateOption::Meeting => None,
        };

        self.modal = match event_type {
            Some(event_type) if self.capabilities.can_create_events => {
                Modal::EventWizard(Box::new(EventWizard::new(event_type, date, created_by)))
            }
            Some(_) => {
                tracing::debug!("Event creation not permitted, falling back to meeting form");
                Modal::MeetingForm(MeetingForm::new(date, created_by))
            }
            None => Modal::MeetingForm(MeetingForm::new(date, created_by)),
        };
    }

    pub fn event_wizard_mut(&mut self) -> Option<&mut EventWizard> {
        match &mut self.modal {
            Modal::EventWizard(wizard) => Some(wizard.as_mut()),
            _ => None,
        }
    }

    pub fn meeting_form_mut(&mut self) -> Option<&mut MeetingForm> {
        match &mut self.modal {
            Modal::MeetingForm(form) => Some(form),
            _ => None,
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
    }

    /// Submit the open event wizard. On failure the wizard stays open and an
    /// error notification is queued; on success the modal closes and the
    /// snapshot is refetched.
    pub async fn submit_event(&mut self) -> CalendarResult<CalendarItem> {
        let payload = match &self.modal {
            Modal::EventWizard(wizard) => wizard.finish(),
            _ => return Err(CalendarError::Validation("No event wizard is open".into())),
        };
        let payload = payload.map_err(|e| self.fail(CalendarError::Validation(e.to_string())))?;

        if !self.capabilities.can_create_events {
            return Err(self.fail(CalendarError::Validation(
                "You do not have permission to create events".into(),
            )));
        }

        let result = self.store.create_event(payload).await;
        self.finish_write(result, "Event created").await
    }

    /// Submit the open meeting form, with the same failure handling as
    /// `submit_event`.
    pub async fn submit_meeting(&mut self) -> CalendarResult<CalendarItem> {
        let payload = match &self.modal {
            Modal::MeetingForm(form) => form.validate(),
            _ => return Err(CalendarError::Validation("No meeting form is open".into())),
        };
        let payload = payload.map_err(|e| self.fail(CalendarError::Validation(e.to_string())))?;

        let result = self.store.create_meeting(payload).await;
        self.finish_write(result, "Meeting created").await
    }

    async fn finish_write(
        &mut self,
        result: CalendarResult<CalendarItem>,
        success: &str,
    ) -> CalendarResult<CalendarItem> {
        let item = result.map_err(|e| self.fail(e))?;
        tracing::info!(id = %item.id, name = %item.name, "Created calendar item");

        self.modal = Modal::Closed;
        self.notifications.push(Notification {
            level: NotificationLevel::Success,
            message: success.to_string(),
        });
        self.refresh().await;
        Ok(item)
    }

    /// Queue an error notification and hand the error back.
    fn fail(&mut self, error: CalendarError) -> CalendarError {
        tracing::warn!(error = %error, "Calendar write failed");
        self.notifications.push(Notification {
            level: NotificationLevel::Error,
            message: error.to_string(),
        });
        error
    }
}
