//! Calendar item types.
//!
//! A `CalendarItem` is anything that occupies time on the calendar grid.
//! Meetings and business events share timing and display fields; whatever
//! differs between them lives in `ItemKind`, so code that cares about the
//! difference matches on the variant instead of checking a flag.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CalendarError, CalendarResult};

/// Fallback color for items without a category.
pub const DEFAULT_COLOR: &str = "#6b7280";

/// A schedulable item shown on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarItem {
    pub id: String,
    pub name: String,
    pub start: NaiveDateTime,
    /// Absent for point events
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub status: EventStatus,
    pub category: Option<Category>,
    /// User id of whoever created the item
    pub created_by: Option<String>,
    pub kind: ItemKind,
}

/// What kind of item this is, with the fields only that kind carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Meeting(MeetingDetails),
    Event(EventDetails),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingDetails {
    /// User ids of the participants
    #[serde(default)]
    pub participants: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub client: Option<Client>,
    pub budget: Option<f64>,
    pub final_cost: Option<f64>,
    #[serde(default)]
    pub assignments: Vec<EmployeeAssignment>,
    #[serde(default)]
    pub equipment: Vec<EquipmentBooking>,
    #[serde(default)]
    pub vehicles: Vec<VehicleAssignment>,
    #[serde(default)]
    pub tasks: Vec<EventTask>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// The primary client of a business or individual event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Client {
    Organization {
        id: String,
        name: String,
        alias: Option<String>,
    },
    Contact {
        id: String,
        name: String,
    },
}

impl Client {
    pub fn id(&self) -> &str {
        match self {
            Client::Organization { id, .. } | Client::Contact { id, .. } => id,
        }
    }

    /// Alias if the organization has one, otherwise its name.
    pub fn display_name(&self) -> &str {
        match self {
            Client::Organization {
                alias: Some(alias), ..
            } => alias,
            Client::Organization { name, .. } | Client::Contact { name, .. } => name,
        }
    }

    /// Whether a filter key refers to this client (by id, name or alias).
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Client::Organization { id, name, alias } => {
                id == key || name == key || alias.as_deref() == Some(key)
            }
            Client::Contact { id, name } => id == key || name == key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    /// Custom icon payload (e.g. inline SVG)
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAssignment {
    pub employee_id: String,
    pub role: Option<String>,
    pub hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentBooking {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub notes: Option<String>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleAssignment {
    pub vehicle: String,
    pub driver_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTask {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub url: String,
}

/// An employee as listed in the lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
}

/// Lifecycle status of an event.
///
/// Store records may contain strings outside the known set; those are kept
/// as `Unknown` and rendered as a display error instead of failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventStatus {
    Inquiry,
    OfferToSend,
    OfferSent,
    OfferAccepted,
    InPreparation,
    InProgress,
    Completed,
    Cancelled,
    Invoiced,
    Unknown(String),
}

impl EventStatus {
    /// Every known status, in workflow order.
    pub const ALL: [EventStatus; 9] = [
        EventStatus::Inquiry,
        EventStatus::OfferToSend,
        EventStatus::OfferSent,
        EventStatus::OfferAccepted,
        EventStatus::InPreparation,
        EventStatus::InProgress,
        EventStatus::Completed,
        EventStatus::Cancelled,
        EventStatus::Invoiced,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventStatus::Inquiry => "inquiry",
            EventStatus::OfferToSend => "offer_to_send",
            EventStatus::OfferSent => "offer_sent",
            EventStatus::OfferAccepted => "offer_accepted",
            EventStatus::InPreparation => "in_preparation",
            EventStatus::InProgress => "in_progress",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Invoiced => "invoiced",
            EventStatus::Unknown(raw) => raw,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Inquiry => "Inquiry",
            EventStatus::OfferToSend => "Offer to send",
            EventStatus::OfferSent => "Offer sent",
            EventStatus::OfferAccepted => "Offer accepted",
            EventStatus::InPreparation => "In preparation",
            EventStatus::InProgress => "In progress",
            EventStatus::Completed => "Completed",
            EventStatus::Cancelled => "Cancelled",
            EventStatus::Invoiced => "Invoiced",
            EventStatus::Unknown(_) => "Unknown status",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            EventStatus::Inquiry => "#3b82f6",
            EventStatus::OfferToSend => "#eab308",
            EventStatus::OfferSent => "#f97316",
            EventStatus::OfferAccepted => "#22c55e",
            EventStatus::InPreparation => "#a855f7",
            EventStatus::InProgress => "#06b6d4",
            EventStatus::Completed => "#16a34a",
            EventStatus::Cancelled => "#ef4444",
            EventStatus::Invoiced => "#64748b",
            EventStatus::Unknown(_) => DEFAULT_COLOR,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EventStatus::Unknown(_))
    }
}

impl From<String> for EventStatus {
    fn from(raw: String) -> Self {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == raw)
            .unwrap_or(EventStatus::Unknown(raw))
    }
}

impl From<&str> for EventStatus {
    fn from(raw: &str) -> Self {
        EventStatus::from(raw.to_string())
    }
}

impl From<EventStatus> for String {
    fn from(status: EventStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl CalendarItem {
    pub fn is_meeting(&self) -> bool {
        matches!(self.kind, ItemKind::Meeting(_))
    }

    /// End of the item, or its start for point events.
    pub fn end_or_start(&self) -> NaiveDateTime {
        self.end.unwrap_or(self.start)
    }

    /// Calendar day the item is placed on.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn client(&self) -> Option<&Client> {
        match &self.kind {
            ItemKind::Event(details) => details.client.as_ref(),
            ItemKind::Meeting(_) => None,
        }
    }

    /// Display color: category color, or the status color when uncategorized.
    pub fn color(&self) -> &str {
        match &self.category {
            Some(category) => &category.color,
            None => self.status.color(),
        }
    }

    /// Ids of the people attached to this item: participants for meetings,
    /// assigned employees for events.
    pub fn people(&self) -> Vec<&str> {
        match &self.kind {
            ItemKind::Meeting(meeting) => meeting.participants.iter().map(String::as_str).collect(),
            ItemKind::Event(details) => details
                .assignments
                .iter()
                .map(|a| a.employee_id.as_str())
                .collect(),
        }
    }

    /// Whether the given user takes part in this item.
    pub fn involves(&self, user_id: &str) -> bool {
        match &self.kind {
            ItemKind::Meeting(meeting) => meeting.participants.iter().any(|p| p == user_id),
            ItemKind::Event(details) => details.assignments.iter().any(|a| a.employee_id == user_id),
        }
    }

    /// Whether any of the given users takes part in this item.
    pub fn involves_any(&self, user_ids: &BTreeSet<String>) -> bool {
        user_ids.iter().any(|id| self.involves(id))
    }

    /// Check the `end >= start` invariant.
    pub fn validate(&self) -> CalendarResult<()> {
        match self.end {
            Some(end) if end < self.start => Err(CalendarError::InvalidTimeRange {
                id: self.id.clone(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for CalendarItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    pub fn event(id: &str, start: NaiveDateTime, end: Option<NaiveDateTime>) -> CalendarItem {
        CalendarItem {
            id: id.to_string(),
            name: format!("Event {}", id),
            start,
            end,
            location: String::new(),
            description: String::new(),
            status: EventStatus::Inquiry,
            category: None,
            created_by: None,
            kind: ItemKind::Event(EventDetails::default()),
        }
    }

    pub fn meeting(id: &str, start: NaiveDateTime, end: Option<NaiveDateTime>) -> CalendarItem {
        CalendarItem {
            kind: ItemKind::Meeting(MeetingDetails::default()),
            name: format!("Meeting {}", id),
            ..event(id, start, end)
        }
    }

    pub fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            color: "#123456".to_string(),
            icon: None,
        }
    }

    pub fn assign(item: &mut CalendarItem, employee_id: &str) {
        match &mut item.kind {
            ItemKind::Event(details) => details.assignments.push(EmployeeAssignment {
                employee_id: employee_id.to_string(),
                role: None,
                hours: None,
            }),
            ItemKind::Meeting(meeting) => meeting.participants.push(employee_id.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn status_roundtrips_known_values() {
        for status in EventStatus::ALL {
            let raw: String = status.clone().into();
            assert_eq!(EventStatus::from(raw), status);
        }
    }

    #[test]
    fn unknown_status_is_kept_not_rejected() {
        let status: EventStatus = serde_json::from_str("\"postponed\"").unwrap();
        assert_eq!(status, EventStatus::Unknown("postponed".to_string()));
        assert!(!status.is_known());
        assert_eq!(status.label(), "Unknown status");
    }

    #[test]
    fn validate_rejects_end_before_start() {
        let item = event("a", at(2025, 3, 10, 10, 0), Some(at(2025, 3, 10, 9, 0)));
        assert!(matches!(
            item.validate(),
            Err(CalendarError::InvalidTimeRange { .. })
        ));

        let point = event("b", at(2025, 3, 10, 10, 0), None);
        assert!(point.validate().is_ok());
    }

    #[test]
    fn involves_branches_on_kind() {
        let mut m = meeting("m", at(2025, 3, 10, 14, 0), None);
        let mut e = event("e", at(2025, 3, 10, 14, 0), None);
        assign(&mut m, "alice");
        assign(&mut e, "bob");

        assert!(m.involves("alice"));
        assert!(!m.involves("bob"));
        assert!(e.involves("bob"));
        assert!(!e.involves("alice"));
    }

    #[test]
    fn client_display_prefers_alias() {
        let org = Client::Organization {
            id: "o1".into(),
            name: "Acme Corporation".into(),
            alias: Some("Acme".into()),
        };
        assert_eq!(org.display_name(), "Acme");
        assert!(org.matches("Acme Corporation"));
        assert!(org.matches("o1"));
        assert!(org.matches("Acme"));
        assert!(!org.matches("Other"));
    }

    #[test]
    fn color_falls_back_to_status() {
        let mut item = event("a", at(2025, 3, 10, 9, 0), None);
        item.status = EventStatus::Cancelled;
        assert_eq!(item.color(), "#ef4444");

        item.category = Some(category("c1", "Conference"));
        assert_eq!(item.color(), "#123456");
    }
}
