//! State-change notifications.
//!
//! After each committed transition the controller publishes a [`StateChange`] to
//! every subscriber. Presentation code re-reads whatever snapshot it needs; the
//! change only says which part moved. Subscribers whose receiver was dropped are
//! pruned on the next publish.

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// Non-fatal: data may be stale but the UI is fully usable.
    Warning,
    /// A failed user action; shown as a blocking notice.
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }

    pub fn is_blocking(&self) -> bool {
        self.level != NoticeLevel::Warning
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    Catalog,
    Selection,
    Conversation,
    Draft,
    /// Pending file or uploading/analyzing/awaiting flags.
    Flags,
    Health,
    Notice(Notice),
}

#[derive(Debug, Default)]
pub struct Observers {
    senders: Vec<mpsc::UnboundedSender<StateChange>>,
}

impl Observers {
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StateChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.push(tx);
        rx
    }

    pub fn publish(&mut self, change: StateChange) {
        self.senders.retain(|tx| tx.send(change.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut observers = Observers::default();
        let mut kept = observers.subscribe();
        drop(observers.subscribe());
        observers.publish(StateChange::Catalog);
        assert_eq!(observers.len(), 1);
        assert_eq!(kept.try_recv().unwrap(), StateChange::Catalog);
    }
}
