//! Change-notification subscription.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// Notifications were dropped; the whole collection should be reloaded
    Resync,
}

/// A change to the backing event table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChange {
    pub kind: ChangeKind,
    pub id: Option<String>,
}

impl EventChange {
    pub fn new(kind: ChangeKind, id: impl Into<String>) -> Self {
        EventChange {
            kind,
            id: Some(id.into()),
        }
    }

    pub fn resync() -> Self {
        EventChange {
            kind: ChangeKind::Resync,
            id: None,
        }
    }
}

/// Live handle on a store's change stream.
///
/// Holding the handle keeps the subscription registered; `unsubscribe` or
/// dropping it releases it, after which no more notifications are delivered.
#[derive(Debug)]
pub struct Subscription {
    rx: Option<broadcast::Receiver<EventChange>>,
}

impl Subscription {
    pub fn new(rx: broadcast::Receiver<EventChange>) -> Self {
        Subscription { rx: Some(rx) }
    }

    /// A subscription that never fires, for stores without change feeds.
    pub fn inert() -> Self {
        Subscription { rx: None }
    }

    pub fn is_active(&self) -> bool {
        self.rx.is_some()
    }

    /// Wait for the next change. Returns `None` once the subscription is
    /// released or the store has shut its channel.
    pub async fn changed(&mut self) -> Option<EventChange> {
        let rx = self.rx.as_mut()?;
        match rx.recv().await {
            Ok(change) => Some(change),
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Change subscription lagged, requesting resync");
                Some(EventChange::resync())
            }
            Err(RecvError::Closed) => {
                self.rx = None;
                None
            }
        }
    }

    pub fn unsubscribe(&mut self) {
        if self.rx.take().is_some() {
            tracing::debug!("Change subscription released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_changes_until_released() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = Subscription::new(rx);

        tx.send(EventChange::new(ChangeKind::Insert, "e1")).unwrap();
        assert_eq!(
            sub.changed().await,
            Some(EventChange::new(ChangeKind::Insert, "e1"))
        );

        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(tx.receiver_count(), 0);
        assert_eq!(sub.changed().await, None);
    }

    #[tokio::test]
    async fn closed_channel_ends_subscription() {
        let (tx, rx) = broadcast::channel::<EventChange>(8);
        let mut sub = Subscription::new(rx);
        drop(tx);
        assert_eq!(sub.changed().await, None);
        assert!(!sub.is_active());
    }

    #[tokio::test]
    async fn lag_turns_into_resync() {
        let (tx, rx) = broadcast::channel(1);
        let mut sub = Subscription::new(rx);
        tx.send(EventChange::new(ChangeKind::Update, "a")).unwrap();
        tx.send(EventChange::new(ChangeKind::Update, "b")).unwrap();

        assert_eq!(sub.changed().await.map(|c| c.kind), Some(ChangeKind::Resync));
    }
}
