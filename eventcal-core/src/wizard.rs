//! Creation forms.
//!
//! `EventWizard` walks through a business or individual event in four steps
//! (client, details, team, review) and validates each step before moving on.
//! `MeetingForm` is the single-screen form for meetings.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::event::{Client, EmployeeAssignment, EventStatus};
use crate::store::{EventType, NewEvent, NewMeeting};

/// Default start time for forms opened from a date.
pub const DEFAULT_START_HOUR: u32 = 9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WizardError {
    #[error("A client is required")]
    MissingClient,

    #[error("Business events need an organization, individual events a contact")]
    ClientTypeMismatch,

    #[error("A name is required")]
    MissingName,

    #[error("The end must not be before the start")]
    EndBeforeStart,

    #[error("Budget must be a non-negative amount")]
    InvalidBudget,

    #[error("Hours for '{0}' must be positive")]
    InvalidHours(String),

    #[error("Employee '{0}' is already assigned")]
    DuplicateAssignment(String),

    #[error("Finish the remaining steps first")]
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Client,
    Details,
    Team,
    Review,
}

impl WizardStep {
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::Client => Some(WizardStep::Details),
            WizardStep::Details => Some(WizardStep::Team),
            WizardStep::Team => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    pub fn prev(self) -> Option<WizardStep> {
        match self {
            WizardStep::Client => None,
            WizardStep::Details => Some(WizardStep::Client),
            WizardStep::Team => Some(WizardStep::Details),
            WizardStep::Review => Some(WizardStep::Team),
        }
    }

    /// 1-based position, for "Step 2 of 4".
    pub fn number(self) -> usize {
        match self {
            WizardStep::Client => 1,
            WizardStep::Details => 2,
            WizardStep::Team => 3,
            WizardStep::Review => 4,
        }
    }
}

fn default_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0).unwrap_or_default())
}

fn check_range(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Result<(), WizardError> {
    match end {
        Some(end) if end < start => Err(WizardError::EndBeforeStart),
        _ => Ok(()),
    }
}

/// Multi-step form for business and individual events.
#[derive(Debug, Clone)]
pub struct EventWizard {
    event_type: EventType,
    step: WizardStep,
    pub client: Option<Client>,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub description: String,
    pub status: EventStatus,
    pub category_id: Option<String>,
    pub budget: Option<f64>,
    assignments: Vec<EmployeeAssignment>,
    created_by: Option<String>,
}

impl EventWizard {
    pub fn new(event_type: EventType, date: NaiveDate, created_by: Option<String>) -> Self {
        let start = default_start(date);
        EventWizard {
            event_type,
            step: WizardStep::Client,
            client: None,
            name: String::new(),
            start,
            end: Some(start + Duration::hours(1)),
            location: String::new(),
            description: String::new(),
            status: EventStatus::Inquiry,
            category_id: None,
            budget: None,
            assignments: Vec::new(),
            created_by,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn assignments(&self) -> &[EmployeeAssignment] {
        &self.assignments
    }

    pub fn assign(
        &mut self,
        employee_id: impl Into<String>,
        role: Option<String>,
        hours: Option<f64>,
    ) -> Result<(), WizardError> {
        let employee_id = employee_id.into();
        if self.assignments.iter().any(|a| a.employee_id == employee_id) {
            return Err(WizardError::DuplicateAssignment(employee_id));
        }
        if hours.is_some_and(|h| !(h > 0.0)) {
            return Err(WizardError::InvalidHours(employee_id));
        }
        self.assignments.push(EmployeeAssignment {
            employee_id,
            role,
            hours,
        });
        Ok(())
    }

    pub fn unassign(&mut self, employee_id: &str) {
        self.assignments.retain(|a| a.employee_id != employee_id);
    }

    fn validate_step(&self, step: WizardStep) -> Result<(), WizardError> {
        match step {
            WizardStep::Client => match (&self.client, self.event_type) {
                (None, _) => Err(WizardError::MissingClient),
                (Some(Client::Organization { .. }), EventType::Business)
                | (Some(Client::Contact { .. }), EventType::Individual) => Ok(()),
                _ => Err(WizardError::ClientTypeMismatch),
            },
            WizardStep::Details => {
                if self.name.trim().is_empty() {
                    return Err(WizardError::MissingName);
                }
                if self.budget.is_some_and(|b| !(b >= 0.0)) {
                    return Err(WizardError::InvalidBudget);
                }
                check_range(self.start, self.end)
            }
            WizardStep::Team | WizardStep::Review => Ok(()),
        }
    }

    /// Validate the current step and move to the next one.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.validate_step(self.step)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Build the create payload. Only possible from the review step.
    pub fn finish(&self) -> Result<NewEvent, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::Incomplete);
        }
        self.validate_step(WizardStep::Client)?;
        self.validate_step(WizardStep::Details)?;

        let client = self.client.clone().ok_or(WizardError::MissingClient)?;
        Ok(NewEvent {
            event_type: self.event_type,
            name: self.name.trim().to_string(),
            client,
            start: self.start,
            end: self.end,
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
            status: self.status.clone(),
            category_id: self.category_id.clone(),
            budget: self.budget,
            assignments: self.assignments.clone(),
            created_by: self.created_by.clone(),
        })
    }
}

/// Single-screen meeting form.
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingForm {
    pub name: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub participants: Vec<String>,
    pub notes: String,
    created_by: Option<String>,
}

impl MeetingForm {
    pub fn new(date: NaiveDate, created_by: Option<String>) -> Self {
        let start = default_start(date);
        // The organizer takes part in their own meeting.
        let participants = created_by.iter().cloned().collect();
        MeetingForm {
            name: String::new(),
            start,
            end: Some(start + Duration::hours(1)),
            location: String::new(),
            participants,
            notes: String::new(),
            created_by,
        }
    }

    pub fn toggle_participant(&mut self, id: &str) {
        if let Some(pos) = self.participants.iter().position(|p| p == id) {
            self.participants.remove(pos);
        } else {
            self.participants.push(id.to_string());
        }
    }

    pub fn validate(&self) -> Result<NewMeeting, WizardError> {
        if self.name.trim().is_empty() {
            return Err(WizardError::MissingName);
        }
        check_range(self.start, self.end)?;

        let notes = self.notes.trim();
        Ok(NewMeeting {
            name: self.name.trim().to_string(),
            start: self.start,
            end: self.end,
            location: self.location.trim().to_string(),
            participants: self.participants.clone(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            created_by: self.created_by.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn acme() -> Client {
        Client::Organization {
            id: "o1".into(),
            name: "Acme".into(),
            alias: None,
        }
    }

    #[test]
    fn wizard_walks_all_steps() {
        let mut wizard = EventWizard::new(EventType::Business, date(), Some("me".into()));
        assert_eq!(wizard.next(), Err(WizardError::MissingClient));

        wizard.client = Some(acme());
        assert_eq!(wizard.next(), Ok(WizardStep::Details));
        assert_eq!(wizard.next(), Err(WizardError::MissingName));

        wizard.name = "  Product launch ".into();
        assert_eq!(wizard.next(), Ok(WizardStep::Team));
        wizard.assign("bob", Some("Lead".into()), Some(6.0)).unwrap();
        assert_eq!(wizard.next(), Ok(WizardStep::Review));

        let payload = wizard.finish().unwrap();
        assert_eq!(payload.name, "Product launch");
        assert_eq!(payload.start, date().and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(payload.assignments.len(), 1);
        assert_eq!(payload.created_by.as_deref(), Some("me"));
    }

    #[test]
    fn individual_event_needs_contact() {
        let mut wizard = EventWizard::new(EventType::Individual, date(), None);
        wizard.client = Some(acme());
        assert_eq!(wizard.next(), Err(WizardError::ClientTypeMismatch));

        wizard.client = Some(Client::Contact {
            id: "c1".into(),
            name: "Jane".into(),
        });
        assert_eq!(wizard.next(), Ok(WizardStep::Details));
    }

    #[test]
    fn finish_requires_review_step() {
        let mut wizard = EventWizard::new(EventType::Business, date(), None);
        wizard.client = Some(acme());
        wizard.name = "Gala".into();
        assert_eq!(wizard.finish(), Err(WizardError::Incomplete));
        assert_eq!(wizard.back(), WizardStep::Client);
    }

    #[test]
    fn details_reject_backwards_range_and_negative_budget() {
        let mut wizard = EventWizard::new(EventType::Business, date(), None);
        wizard.client = Some(acme());
        wizard.next().unwrap();
        wizard.name = "Gala".into();

        wizard.end = Some(wizard.start - Duration::minutes(30));
        assert_eq!(wizard.next(), Err(WizardError::EndBeforeStart));

        wizard.end = None;
        wizard.budget = Some(-5.0);
        assert_eq!(wizard.next(), Err(WizardError::InvalidBudget));
    }

    #[test]
    fn duplicate_assignment_is_rejected() {
        let mut wizard = EventWizard::new(EventType::Business, date(), None);
        wizard.assign("bob", None, None).unwrap();
        assert_eq!(
            wizard.assign("bob", None, None),
            Err(WizardError::DuplicateAssignment("bob".into()))
        );
        wizard.unassign("bob");
        assert!(wizard.assignments().is_empty());
    }

    #[test]
    fn meeting_form_includes_organizer() {
        let mut form = MeetingForm::new(date(), Some("me".into()));
        assert_eq!(form.validate(), Err(WizardError::MissingName));

        form.name = "Weekly sync".into();
        form.toggle_participant("alice");
        let payload = form.validate().unwrap();
        assert_eq!(payload.participants, vec!["me".to_string(), "alice".to_string()]);
        assert_eq!(payload.notes, None);
    }
}
