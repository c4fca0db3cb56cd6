//! In-process store.
//!
//! Keeps records in memory and publishes changes on a broadcast channel.
//! Reads and writes can be made to fail on demand, which is how the
//! calendar's error paths are tested.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;

use super::{
    Capabilities, ChangeKind, EventChange, EventStore, FilterOptions, NewEvent, NewMeeting,
    Subscription, new_item_id,
};
use crate::error::{CalendarError, CalendarResult};
use crate::event::CalendarItem;
use crate::record::EventRecord;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct Inner {
    records: Vec<EventRecord>,
    options: FilterOptions,
    capabilities: Capabilities,
    fail_reads: bool,
    fail_writes: bool,
}

pub struct MemoryStore {
    inner: Mutex<Inner>,
    changes: broadcast::Sender<EventChange>,
    fetches: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        MemoryStore {
            inner: Mutex::new(Inner::default()),
            changes,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_records(self, records: Vec<EventRecord>) -> Self {
        self.inner().records = records;
        self
    }

    pub fn with_options(self, options: FilterOptions) -> Self {
        self.inner().options = options;
        self
    }

    pub fn with_capabilities(self, capabilities: Capabilities) -> Self {
        self.inner().capabilities = capabilities;
        self
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert or replace a record and notify subscribers, as if another
    /// client had written it.
    pub fn upsert(&self, record: EventRecord) {
        let id = record.id.clone();
        let kind = {
            let mut inner = self.inner();
            match inner.records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => {
                    *existing = record;
                    ChangeKind::Update
                }
                None => {
                    inner.records.push(record);
                    ChangeKind::Insert
                }
            }
        };
        self.notify(EventChange::new(kind, id));
    }

    pub fn remove(&self, id: &str) {
        let removed = {
            let mut inner = self.inner();
            let before = inner.records.len();
            inner.records.retain(|r| r.id != id);
            inner.records.len() != before
        };
        if removed {
            self.notify(EventChange::new(ChangeKind::Delete, id));
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner().fail_writes = fail;
    }

    /// Number of live change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.changes.receiver_count()
    }

    /// Number of `fetch_events` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<EventRecord> {
        self.inner().records.clone()
    }

    fn notify(&self, change: EventChange) {
        // No receivers is fine: nobody is watching.
        let _ = self.changes.send(change);
    }

    fn store_item(&self, item: CalendarItem) -> CalendarResult<CalendarItem> {
        {
            let mut inner = self.inner();
            if inner.fail_writes {
                return Err(CalendarError::Store("write rejected".into()));
            }
            inner.records.push(EventRecord::from(&item));
        }
        self.notify(EventChange::new(ChangeKind::Insert, item.id.clone()));
        Ok(item)
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn fetch_events(&self) -> CalendarResult<Vec<EventRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let inner = self.inner();
        if inner.fail_reads {
            return Err(CalendarError::Store("read rejected".into()));
        }
        Ok(inner.records.clone())
    }

    async fn fetch_filter_options(&self) -> CalendarResult<FilterOptions> {
        let inner = self.inner();
        if inner.fail_reads {
            return Err(CalendarError::Store("read rejected".into()));
        }
        Ok(inner.options.clone())
    }

    fn subscribe_to_event_changes(&self) -> Subscription {
        Subscription::new(self.changes.subscribe())
    }

    async fn create_event(&self, event: NewEvent) -> CalendarResult<CalendarItem> {
        let categories = self.inner().options.categories.clone();
        let item = event.into_item(new_item_id(), &categories);
        item.validate()?;
        self.store_item(item)
    }

    async fn create_meeting(&self, meeting: NewMeeting) -> CalendarResult<CalendarItem> {
        let item = meeting.into_item(new_item_id());
        item.validate()?;
        self.store_item(item)
    }

    async fn current_user_capabilities(&self) -> CalendarResult<Capabilities> {
        Ok(self.inner().capabilities.clone())
    }
}
