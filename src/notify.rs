//! Transient notifications
//!
//! Every notification owns an expiry timer. The timer holds only a weak
//! reference to the center, so an expiry firing after the center is gone is
//! a no-op. Dismissing a notification removes it and aborts its timer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// How long a notification stays visible
pub const DEFAULT_DISPLAY_MS: u64 = 3000;

/// Unique identifier for a notification
pub type NotificationId = String;

/// Style keyword attached to a notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Danger,
    /// Any other style keyword
    Custom(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
            Severity::Custom(s) => s,
        }
    }
}

impl From<&str> for Severity {
    fn from(s: &str) -> Self {
        match s {
            "info" => Severity::Info,
            "success" => Severity::Success,
            "warning" => Severity::Warning,
            "danger" | "error" => Severity::Danger,
            other => Severity::Custom(other.to_string()),
        }
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn new(message: String, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message,
            severity,
            created_at: Utc::now(),
        }
    }
}

/// Lifecycle events published to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Shown(Notification),
    Expired(NotificationId),
    Dismissed(NotificationId),
}

/// Configuration for the notification center
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Time before a notification retracts itself
    pub display: Duration,
    /// Capacity of the event broadcast channel
    pub event_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display: Duration::from_millis(DEFAULT_DISPLAY_MS),
            event_capacity: 64,
        }
    }
}

struct Entry {
    notification: Notification,
    expiry: JoinHandle<()>,
}

struct Inner {
    active: RwLock<Vec<Entry>>,
    events: broadcast::Sender<NotificationEvent>,
    display: Duration,
}

impl Inner {
    async fn remove(&self, id: &str) -> Option<Entry> {
        let mut active = self.active.write().await;
        let pos = active.iter().position(|e| e.notification.id == id)?;
        Some(active.remove(pos))
    }
}

/// Owns the visible notifications and their expiry timers.
///
/// Cloning yields another handle to the same set. There is no cap on how
/// many notifications may be visible at once; they stack in creation order.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl NotificationCenter {
    pub fn new(config: NotificationConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                active: RwLock::new(Vec::new()),
                events,
                display: config.display,
            }),
        }
    }

    /// Show a notification and schedule its removal.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn show(&self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let notification = Notification::new(message.into(), severity);
        let id = notification.id.clone();

        // Hold the lock until the entry is in place so the timer can't race it
        let mut active = self.inner.active.write().await;
        let expiry = spawn_expiry(Arc::downgrade(&self.inner), id.clone(), self.inner.display);
        active.push(Entry {
            notification: notification.clone(),
            expiry,
        });
        drop(active);

        tracing::debug!(
            notification_id = %id,
            severity = %notification.severity,
            message = %notification.message,
            "Notification shown"
        );
        let _ = self.inner.events.send(NotificationEvent::Shown(notification));

        id
    }

    /// Remove a notification before its deadline and cancel its timer.
    ///
    /// Returns `false` if it was already gone.
    pub async fn dismiss(&self, id: &str) -> bool {
        match self.inner.remove(id).await {
            Some(entry) => {
                entry.expiry.abort();
                tracing::debug!(notification_id = %id, "Notification dismissed");
                let _ = self
                    .inner
                    .events
                    .send(NotificationEvent::Dismissed(id.to_string()));
                true
            }
            None => false,
        }
    }

    /// Currently visible notifications, oldest first
    pub async fn active(&self) -> Vec<Notification> {
        self.inner
            .active
            .read()
            .await
            .iter()
            .map(|e| e.notification.clone())
            .collect()
    }

    pub async fn active_count(&self) -> usize {
        self.inner.active.read().await.len()
    }

    /// Receive lifecycle events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.events.subscribe()
    }

    pub fn display_duration(&self) -> Duration {
        self.inner.display
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(NotificationConfig::default())
    }
}

fn spawn_expiry(inner: Weak<Inner>, id: NotificationId, display: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(display).await;

        let Some(inner) = inner.upgrade() else {
            return;
        };
        // Already dismissed: nothing to do
        if inner.remove(&id).await.is_some() {
            tracing::debug!(notification_id = %id, "Notification expired");
            let _ = inner.events.send(NotificationEvent::Expired(id));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_keywords() {
        assert_eq!(Severity::default(), Severity::Info);
        assert_eq!(Severity::from("warning"), Severity::Warning);
        assert_eq!(Severity::from("error"), Severity::Danger);
        assert_eq!(Severity::from("primary"), Severity::Custom("primary".to_string()));
        assert_eq!(Severity::Custom("dark".to_string()).as_str(), "dark");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_display_duration() {
        let center = NotificationCenter::default();
        center.show("Data updated", Severity::Success).await;

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(center.active_count().await, 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(center.active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_timer() {
        let center = NotificationCenter::default();
        let mut events = center.subscribe();

        let id = center.show("Heads up", Severity::Warning).await;
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert!(center.dismiss(&id).await);
        assert!(!center.dismiss(&id).await);

        // Past the original deadline, nothing fires
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(center.active_count().await, 0);

        assert!(matches!(events.try_recv(), Ok(NotificationEvent::Shown(_))));
        assert_eq!(
            events.try_recv().ok(),
            Some(NotificationEvent::Dismissed(id))
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifications_stack_in_order() {
        let center = NotificationCenter::default();
        center.show("first", Severity::Info).await;
        center.show("second", Severity::Warning).await;
        center.show("first", Severity::Info).await;

        let messages: Vec<_> = center
            .active()
            .await
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, vec!["first", "second", "first"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_event_published() {
        let center = NotificationCenter::new(NotificationConfig {
            display: Duration::from_millis(100),
            event_capacity: 8,
        });
        let mut events = center.subscribe();

        let id = center.show("short", Severity::Info).await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(matches!(events.recv().await, Ok(NotificationEvent::Shown(_))));
        assert_eq!(events.recv().await.ok(), Some(NotificationEvent::Expired(id)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_after_center_dropped_is_noop() {
        let center = NotificationCenter::default();
        center.show("orphan", Severity::Info).await;
        drop(center);

        tokio::time::sleep(Duration::from_millis(3500)).await;
    }
}
