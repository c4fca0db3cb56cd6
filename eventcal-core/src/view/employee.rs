//! Per-employee agenda.
//!
//! One group per employee, holding every visible item the employee takes
//! part in (meeting participant or assigned to the event), oldest first.
//! Employees with nothing scheduled still get a group so hosts can show an
//! empty state for them.

use chrono::NaiveDate;
use serde::Serialize;

use super::{AgendaEntry, placeable};
use crate::event::{CalendarItem, Employee};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeLayout {
    pub groups: Vec<EmployeeGroup>,
    /// Items nobody is attached to
    pub unassigned: Vec<AgendaEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeGroup {
    pub employee: Employee,
    pub entries: Vec<AgendaEntry>,
}

impl EmployeeGroup {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn layout(employees: &[Employee], today: NaiveDate, events: &[CalendarItem]) -> EmployeeLayout {
    let items = placeable(events);

    let mut roster: Vec<Employee> = employees.to_vec();
    for item in &items {
        for id in item.people() {
            if !roster.iter().any(|e| e.id == id) {
                tracing::debug!(employee = %id, "Employee missing from lookup table");
                roster.push(Employee {
                    id: id.to_string(),
                    name: id.to_string(),
                    color: None,
                });
            }
        }
    }

    let groups = roster
        .into_iter()
        .map(|employee| {
            let entries = items
                .iter()
                .filter(|item| item.involves(&employee.id))
                .map(|item| AgendaEntry::new(item, today))
                .collect();
            EmployeeGroup { employee, entries }
        })
        .collect();

    let unassigned = items
        .iter()
        .filter(|item| item.people().is_empty())
        .map(|item| AgendaEntry::new(item, today))
        .collect();

    EmployeeLayout { groups, unassigned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::fixtures::{assign, at, event, meeting};

    fn employee(id: &str, name: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: name.to_string(),
            color: None,
        }
    }

    #[test]
    fn groups_by_assignment_and_participation() {
        let mut late = event("late", at(2025, 3, 12, 9, 0), None);
        assign(&mut late, "bob");
        let mut early = meeting("early", at(2025, 3, 10, 9, 0), None);
        assign(&mut early, "bob");
        assign(&mut early, "alice");
        let lonely = event("lonely", at(2025, 3, 11, 9, 0), None);

        let employees = vec![employee("alice", "Alice"), employee("bob", "Bob"), employee("carol", "Carol")];
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let view = layout(&employees, today, &[late, early, lonely]);

        let bob = &view.groups[1];
        let ids: Vec<_> = bob.entries.iter().map(|e| e.chip.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        assert_eq!(bob.entries[0].date_label, "Today");

        assert_eq!(view.groups[0].entries.len(), 1);
        assert!(view.groups[2].is_empty());
        assert_eq!(view.unassigned.len(), 1);
    }

    #[test]
    fn unknown_employees_get_a_group() {
        let mut e = event("e", at(2025, 3, 10, 9, 0), None);
        assign(&mut e, "ghost");
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let view = layout(&[], today, &[e]);

        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].employee.name, "ghost");
    }
}
