//! Notification bus.
//!
//! User-visible messages from every component flow through here; the UI
//! shell subscribes and renders them as toasts.

use fontpool::{Notifier, Severity};
use tokio::sync::broadcast;

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone)]
pub struct Bus {
    sender: broadcast::Sender<Notice>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    pub fn publish(&self, notice: Notice) {
        // A send error only means nobody is subscribed yet.
        let _ = self.sender.send(notice);
    }
}

impl Notifier for Bus {
    fn report(&self, message: &str, severity: Severity) {
        self.publish(Notice {
            message: message.to_string(),
            severity,
        });
    }
}
