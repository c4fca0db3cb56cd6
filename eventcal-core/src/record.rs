//! Raw store records.
//!
//! The backing store hands out flat rows: timestamps as strings, an
//! `is_meeting` flag with an optional `meeting_data` payload, and separate
//! organization / contact references. `CalendarItem::try_from` turns a row
//! into the typed model and is the only place timestamps get parsed.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, CalendarResult};
use crate::event::{
    Attachment, CalendarItem, Category, Client, EmployeeAssignment, EquipmentBooking,
    EventDetails, EventStatus, EventTask, ItemKind, MeetingDetails, VehicleAssignment,
};

/// An event row as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub name: String,
    pub start: String,
    pub end: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: EventStatus,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub is_meeting: bool,
    #[serde(default)]
    pub meeting_data: Option<MeetingData>,
    #[serde(default)]
    pub organization: Option<OrganizationRef>,
    #[serde(default)]
    pub contact: Option<ContactRef>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub final_cost: Option<f64>,
    #[serde(default)]
    pub employees: Vec<EmployeeAssignment>,
    #[serde(default)]
    pub equipment: Vec<EquipmentBooking>,
    #[serde(default)]
    pub vehicles: Vec<VehicleAssignment>,
    #[serde(default)]
    pub tasks: Vec<EventTask>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeetingData {
    #[serde(default)]
    pub participants: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRef {
    pub id: String,
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRef {
    pub id: String,
    pub name: String,
}

/// Parse a store timestamp into local wall-clock time.
///
/// Accepts RFC 3339 (converted to local time), `YYYY-MM-DDTHH:MM[:SS]`,
/// the same with a space separator, and bare `YYYY-MM-DD` (midnight).
/// Anything else is an error; there is no "now" fallback.
pub fn parse_timestamp(raw: &str) -> CalendarResult<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CalendarError::InvalidTimestamp(raw.to_string()))
}

/// Format a timestamp the way records store it.
pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

impl TryFrom<EventRecord> for CalendarItem {
    type Error = CalendarError;

    fn try_from(record: EventRecord) -> CalendarResult<Self> {
        let start = parse_timestamp(&record.start)?;
        let end = record.end.as_deref().map(parse_timestamp).transpose()?;

        let kind = if record.is_meeting {
            let data = record.meeting_data.unwrap_or_default();
            ItemKind::Meeting(MeetingDetails {
                participants: data.participants,
                notes: data.notes,
            })
        } else {
            let client = match (record.organization, record.contact) {
                (Some(org), contact) => {
                    if contact.is_some() {
                        tracing::warn!(
                            event = %record.id,
                            "Event has both an organization and a contact, using the organization"
                        );
                    }
                    Some(Client::Organization {
                        id: org.id,
                        name: org.name,
                        alias: org.alias,
                    })
                }
                (None, Some(contact)) => Some(Client::Contact {
                    id: contact.id,
                    name: contact.name,
                }),
                (None, None) => None,
            };
            ItemKind::Event(EventDetails {
                client,
                budget: record.budget,
                final_cost: record.final_cost,
                assignments: record.employees,
                equipment: record.equipment,
                vehicles: record.vehicles,
                tasks: record.tasks,
                attachments: record.attachments,
            })
        };

        let item = CalendarItem {
            id: record.id,
            name: record.name,
            start,
            end,
            location: record.location.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            status: record.status,
            category: record.category,
            created_by: record.created_by,
            kind,
        };
        item.validate()?;
        Ok(item)
    }
}

impl From<&CalendarItem> for EventRecord {
    fn from(item: &CalendarItem) -> Self {
        let mut record = EventRecord {
            id: item.id.clone(),
            name: item.name.clone(),
            start: format_timestamp(&item.start),
            end: item.end.as_ref().map(format_timestamp),
            location: Some(item.location.clone()).filter(|s| !s.is_empty()),
            description: Some(item.description.clone()).filter(|s| !s.is_empty()),
            status: item.status.clone(),
            category: item.category.clone(),
            created_by: item.created_by.clone(),
            is_meeting: item.is_meeting(),
            meeting_data: None,
            organization: None,
            contact: None,
            budget: None,
            final_cost: None,
            employees: Vec::new(),
            equipment: Vec::new(),
            vehicles: Vec::new(),
            tasks: Vec::new(),
            attachments: Vec::new(),
        };

        match &item.kind {
            ItemKind::Meeting(meeting) => {
                record.meeting_data = Some(MeetingData {
                    participants: meeting.participants.clone(),
                    notes: meeting.notes.clone(),
                });
            }
            ItemKind::Event(details) => {
                match &details.client {
                    Some(Client::Organization { id, name, alias }) => {
                        record.organization = Some(OrganizationRef {
                            id: id.clone(),
                            name: name.clone(),
                            alias: alias.clone(),
                        });
                    }
                    Some(Client::Contact { id, name }) => {
                        record.contact = Some(ContactRef {
                            id: id.clone(),
                            name: name.clone(),
                        });
                    }
                    None => {}
                }
                record.budget = details.budget;
                record.final_cost = details.final_cost;
                record.employees = details.assignments.clone();
                record.equipment = details.equipment.clone();
                record.vehicles = details.vehicles.clone();
                record.tasks = details.tasks.clone();
                record.attachments = details.attachments.clone();
            }
        }

        record
    }
}

/// Convert store rows, skipping (and logging) any that fail to parse.
pub fn items_from_records(records: Vec<EventRecord>) -> Vec<CalendarItem> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            match CalendarItem::try_from(record) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(event = %id, error = %e, "Skipping malformed event record");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn record(id: &str, start: &str, end: Option<&str>) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            name: "Launch party".to_string(),
            start: start.to_string(),
            end: end.map(str::to_string),
            location: None,
            description: None,
            status: EventStatus::OfferSent,
            category: None,
            created_by: None,
            is_meeting: false,
            meeting_data: None,
            organization: None,
            contact: None,
            budget: None,
            final_cost: None,
            employees: vec![],
            equipment: vec![],
            vehicles: vec![],
            tasks: vec![],
            attachments: vec![],
        }
    }

    #[test]
    fn parse_timestamp_formats() {
        let dt = parse_timestamp("2025-03-10T09:30:00").unwrap();
        assert_eq!((dt.hour(), dt.minute()), (9, 30));

        let dt = parse_timestamp("2025-03-10 14:00").unwrap();
        assert_eq!(dt.hour(), 14);

        let dt = parse_timestamp("2025-03-10").unwrap();
        assert_eq!((dt.day(), dt.hour()), (10, 0));
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("next tuesday"),
            Err(CalendarError::InvalidTimestamp(_))
        ));
        assert!(parse_timestamp("2025-13-40T25:00").is_err());
    }

    #[test]
    fn meeting_flag_selects_meeting_variant() {
        let mut r = record("m1", "2025-03-10T14:00", Some("2025-03-10T15:00"));
        r.is_meeting = true;
        r.meeting_data = Some(MeetingData {
            participants: vec!["alice".into()],
            notes: Some("Bring slides".into()),
        });

        let item = CalendarItem::try_from(r).unwrap();
        assert!(item.is_meeting());
        assert!(item.involves("alice"));
    }

    #[test]
    fn organization_wins_over_contact() {
        let mut r = record("e1", "2025-03-10T09:00", None);
        r.organization = Some(OrganizationRef {
            id: "o1".into(),
            name: "Acme".into(),
            alias: None,
        });
        r.contact = Some(ContactRef {
            id: "c1".into(),
            name: "Jane".into(),
        });

        let item = CalendarItem::try_from(r).unwrap();
        assert_eq!(item.client().map(|c| c.id()), Some("o1"));
    }

    #[test]
    fn malformed_records_are_skipped() {
        let records = vec![
            record("ok", "2025-03-10T09:00", Some("2025-03-10T10:00")),
            record("bad-time", "soon", None),
            record("backwards", "2025-03-10T10:00", Some("2025-03-10T09:00")),
        ];

        let items = items_from_records(records);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "ok");
    }

    #[test]
    fn record_conversion_keeps_client_and_team() {
        let mut r = record("e1", "2025-03-10T09:00:00", Some("2025-03-10T10:30:00"));
        r.contact = Some(ContactRef {
            id: "c1".into(),
            name: "Jane".into(),
        });
        r.employees = vec![EmployeeAssignment {
            employee_id: "bob".into(),
            role: Some("Lead".into()),
            hours: Some(4.0),
        }];

        let item = CalendarItem::try_from(r.clone()).unwrap();
        assert_eq!(EventRecord::from(&item), r);
    }
}
