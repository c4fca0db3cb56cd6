//! JSON file event store.
//!
//! Everything lives in a single document:
//!
//! ```json
//! { "events": [...], "categories": [...], "clients": [...],
//!   "employees": [...], "user": { "id": "emp-1", "can_create_events": true } }
//! ```
//!
//! A missing file reads as an empty calendar and is created on the first
//! write.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use eventcal_core::error::{CalendarError, CalendarResult};
use eventcal_core::event::{CalendarItem, Category, Client, Employee};
use eventcal_core::record::EventRecord;
use eventcal_core::store::{
    Capabilities, ChangeKind, EventChange, EventStore, FilterOptions, NewEvent, NewMeeting,
    Subscription, new_item_id,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};

const CHANGE_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Event rows, decoded one at a time by `decode_records`
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub user: Capabilities,
}

/// Decode event rows one by one. A row that does not fit the record shape
/// is logged and skipped; the rest still load.
fn decode_records(rows: Vec<serde_json::Value>) -> Vec<EventRecord> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let id = row.get("id").and_then(|v| v.as_str()).map(String::from);
            match serde_json::from_value::<EventRecord>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(index, id = ?id, error = %e, "Skipping malformed event row");
                    None
                }
            }
        })
        .collect()
}

pub struct JsonFileStore {
    path: PathBuf,
    /// Overrides `user.id` from the document
    current_user: Option<String>,
    changes: broadcast::Sender<EventChange>,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, current_user: Option<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        JsonFileStore {
            path: path.into(),
            current_user,
            changes,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> CalendarResult<StoreDocument> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Store file missing, starting empty");
                return Ok(StoreDocument::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| {
            CalendarError::Serialization(format!("{}: {}", self.path.display(), e))
        })
    }

    async fn write(&self, document: &StoreDocument) -> CalendarResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(document)
            .map_err(|e| CalendarError::Serialization(e.to_string()))?;

        // Write to a sibling file first so a crash never leaves half a document.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn insert(&self, item: CalendarItem) -> CalendarResult<CalendarItem> {
        {
            let _guard = self.write_lock.lock().await;
            let mut document = self.read().await?;
            let row = serde_json::to_value(EventRecord::from(&item))
                .map_err(|e| CalendarError::Serialization(e.to_string()))?;
            document.events.push(row);
            self.write(&document).await?;
        }

        let _ = self
            .changes
            .send(EventChange::new(ChangeKind::Insert, item.id.clone()));
        Ok(item)
    }
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn fetch_events(&self) -> CalendarResult<Vec<EventRecord>> {
        Ok(decode_records(self.read().await?.events))
    }

    async fn fetch_filter_options(&self) -> CalendarResult<FilterOptions> {
        let document = self.read().await?;
        Ok(FilterOptions {
            categories: document.categories,
            clients: document.clients,
            employees: document.employees,
        })
    }

    fn subscribe_to_event_changes(&self) -> Subscription {
        Subscription::new(self.changes.subscribe())
    }

    async fn create_event(&self, event: NewEvent) -> CalendarResult<CalendarItem> {
        let categories = self.read().await?.categories;
        let item = event.into_item(new_item_id(), &categories);
        item.validate()?;
        self.insert(item).await
    }

    async fn create_meeting(&self, meeting: NewMeeting) -> CalendarResult<CalendarItem> {
        let item = meeting.into_item(new_item_id());
        item.validate()?;
        self.insert(item).await
    }

    async fn current_user_capabilities(&self) -> CalendarResult<Capabilities> {
        let mut user = self.read().await?.user;
        if let Some(id) = &self.current_user {
            user.id = Some(id.clone());
        }
        Ok(user)
    }
}
