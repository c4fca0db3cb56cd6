//! The event store seam.
//!
//! The calendar never talks to a database directly. Everything it reads or
//! writes goes through an [`EventStore`]: bulk reads of events and lookup
//! tables, the change-notification stream, the two write operations, and the
//! current user's capabilities.

mod memory;
mod subscription;

pub use memory::MemoryStore;
pub use subscription::{ChangeKind, EventChange, Subscription};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CalendarResult;
use crate::event::{
    CalendarItem, Category, Client, EmployeeAssignment, Employee, EventDetails, EventStatus,
    ItemKind, MeetingDetails,
};
use crate::record::EventRecord;

/// Lookup tables backing the filter menus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// Who is looking at the calendar and what they may do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Employee id of the current user
    pub id: Option<String>,
    #[serde(default)]
    pub can_create_events: bool,
}

/// Business events bill an organization; individual events a private contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Business,
    Individual,
}

/// Payload for creating a business or individual event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub event_type: EventType,
    pub name: String,
    pub client: Client,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub description: String,
    pub status: EventStatus,
    pub category_id: Option<String>,
    pub budget: Option<f64>,
    pub assignments: Vec<EmployeeAssignment>,
    pub created_by: Option<String>,
}

/// Payload for creating a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMeeting {
    pub name: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub participants: Vec<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
}

/// Status given to newly created meetings.
pub const MEETING_STATUS: EventStatus = EventStatus::InPreparation;

impl NewEvent {
    /// Build the stored item, resolving the category id against `categories`.
    pub fn into_item(self, id: String, categories: &[Category]) -> CalendarItem {
        let category = self
            .category_id
            .as_deref()
            .and_then(|cid| categories.iter().find(|c| c.id == cid))
            .cloned();

        CalendarItem {
            id,
            name: self.name,
            start: self.start,
            end: self.end,
            location: self.location,
            description: self.description,
            status: self.status,
            category,
            created_by: self.created_by,
            kind: ItemKind::Event(EventDetails {
                client: Some(self.client),
                budget: self.budget,
                assignments: self.assignments,
                ..EventDetails::default()
            }),
        }
    }
}

impl NewMeeting {
    pub fn into_item(self, id: String) -> CalendarItem {
        CalendarItem {
            id,
            name: self.name,
            start: self.start,
            end: self.end,
            location: self.location,
            description: String::new(),
            status: MEETING_STATUS,
            category: None,
            created_by: self.created_by,
            kind: ItemKind::Meeting(MeetingDetails {
                participants: self.participants,
                notes: self.notes,
            }),
        }
    }
}

/// Fresh id for a created item.
pub fn new_item_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Remote collection the calendar reads from and writes to.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// The full event collection.
    async fn fetch_events(&self) -> CalendarResult<Vec<EventRecord>>;

    async fn fetch_filter_options(&self) -> CalendarResult<FilterOptions>;

    /// Register for notifications about any insert, update or delete.
    fn subscribe_to_event_changes(&self) -> Subscription;

    async fn create_event(&self, event: NewEvent) -> CalendarResult<CalendarItem>;

    async fn create_meeting(&self, meeting: NewMeeting) -> CalendarResult<CalendarItem>;

    async fn current_user_capabilities(&self) -> CalendarResult<Capabilities>;
}
