//! Filter engine.
//!
//! `FilterSet` is the value the user edits through `FilterAction`s;
//! `apply_filters` narrows an event snapshot down to the visible subset.
//! Every non-empty dimension must match (logical AND), so the order in which
//! dimensions are checked never changes the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::event::{CalendarItem, EventStatus};

/// The active filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub statuses: BTreeSet<EventStatus>,
    /// Category ids or names
    pub categories: BTreeSet<String>,
    /// Client ids, names or aliases
    pub clients: BTreeSet<String>,
    /// Employee ids
    pub employees: BTreeSet<String>,
    pub my_events: bool,
    pub assigned_to_me: bool,
}

/// A single edit to the filter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    ToggleStatus(EventStatus),
    ToggleCategory(String),
    ToggleClient(String),
    ToggleEmployee(String),
    ToggleMyEvents,
    ToggleAssignedToMe,
    Reset,
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one edit.
    pub fn apply(&mut self, action: FilterAction) {
        match action {
            FilterAction::ToggleStatus(status) => toggle(&mut self.statuses, status),
            FilterAction::ToggleCategory(id) => toggle(&mut self.categories, id),
            FilterAction::ToggleClient(id) => toggle(&mut self.clients, id),
            FilterAction::ToggleEmployee(id) => toggle(&mut self.employees, id),
            FilterAction::ToggleMyEvents => self.my_events = !self.my_events,
            FilterAction::ToggleAssignedToMe => self.assigned_to_me = !self.assigned_to_me,
            FilterAction::Reset => *self = FilterSet::default(),
        }
    }

    /// Builder-style variant of `apply`.
    pub fn with(mut self, action: FilterAction) -> Self {
        self.apply(action);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of active selections, for a "Filters (n)" badge.
    pub fn active_count(&self) -> usize {
        self.statuses.len()
            + self.categories.len()
            + self.clients.len()
            + self.employees.len()
            + usize::from(self.my_events)
            + usize::from(self.assigned_to_me)
    }

    /// Whether a single item passes every active dimension.
    pub fn matches(&self, item: &CalendarItem, current_user: Option<&str>) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&item.status) {
            return false;
        }

        if !self.categories.is_empty() {
            let hit = item.category.as_ref().is_some_and(|c| {
                self.categories.contains(&c.id) || self.categories.contains(&c.name)
            });
            if !hit {
                return false;
            }
        }

        if !self.clients.is_empty() {
            let hit = item
                .client()
                .is_some_and(|client| self.clients.iter().any(|key| client.matches(key)));
            if !hit {
                return false;
            }
        }

        if self.my_events {
            let mine = match (current_user, item.created_by.as_deref()) {
                (Some(user), Some(creator)) => user == creator,
                _ => false,
            };
            if !mine {
                return false;
            }
        }

        if self.assigned_to_me && !current_user.is_some_and(|user| item.involves(user)) {
            return false;
        }

        if !self.employees.is_empty() && !item.involves_any(&self.employees) {
            return false;
        }

        true
    }
}

/// Visible subset of `events` under `filters`, in input order.
pub fn apply_filters(
    events: &[CalendarItem],
    filters: &FilterSet,
    current_user: Option<&str>,
) -> Vec<CalendarItem> {
    if filters.is_empty() {
        return events.to_vec();
    }

    events
        .iter()
        .filter(|item| filters.matches(item, current_user))
        .cloned()
        .collect()
}
