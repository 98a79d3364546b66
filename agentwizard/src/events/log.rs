//! Append-only run log.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

use crate::core::LogEntry;

#[derive(Debug)]
struct LogInner {
    entries: RwLock<Vec<LogEntry>>,
    len_tx: watch::Sender<usize>,
}

/// Ordered, append-only record of emitted log entries.
///
/// Cloning yields another handle to the same log. Observers either read
/// snapshots or [`subscribe`](LogSink::subscribe) to the published length.
#[derive(Debug, Clone)]
pub struct LogSink {
    inner: Arc<LogInner>,
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        let (len_tx, _) = watch::channel(0);
        Self {
            inner: Arc::new(LogInner {
                entries: RwLock::new(Vec::new()),
                len_tx,
            }),
        }
    }

    /// Appends an entry and returns the new length.
    pub(crate) fn append(&self, entry: LogEntry) -> usize {
        let len = {
            let mut entries = self.inner.entries.write();
            entries.push(entry);
            entries.len()
        };
        self.inner.len_tx.send_replace(len);
        len
    }

    /// Removes every entry.
    pub(crate) fn clear(&self) {
        self.inner.entries.write().clear();
        self.inner.len_tx.send_replace(0);
    }

    /// Returns a copy of every entry in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.inner.entries.read().clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Returns true if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.read().is_empty()
    }

    /// Returns the most recent entry.
    #[must_use]
    pub fn last(&self) -> Option<LogEntry> {
        self.inner.entries.read().last().cloned()
    }

    /// Returns the entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<LogEntry> {
        self.inner.entries.read().get(index).cloned()
    }

    /// Subscribes to the log length, published after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.inner.len_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let log = LogSink::new();
        assert!(log.is_empty());

        assert_eq!(log.append(LogEntry::info("DESIGN", "one")), 1);
        assert_eq!(log.append(LogEntry::info("DESIGN", "two")), 2);

        let messages: Vec<String> = log.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["one", "two"]);
        assert_eq!(log.last().unwrap().message, "two");
        assert_eq!(log.get(0).unwrap().message, "one");
        assert!(log.get(2).is_none());
    }

    #[test]
    fn test_no_deduplication() {
        let log = LogSink::new();
        let entry = LogEntry::info("TESTER", "same");
        log.append(entry.clone());
        log.append(entry);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_clones_share_entries() {
        let log = LogSink::new();
        let other = log.clone();
        log.append(LogEntry::info("DESIGN", "shared"));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_clear_empties_log() {
        let log = LogSink::new();
        log.append(LogEntry::info("DESIGN", "one"));
        log.clear();
        assert!(log.is_empty());
        assert!(log.last().is_none());
    }

    #[tokio::test]
    async fn test_subscribe_observes_length() {
        let log = LogSink::new();
        let mut rx = log.subscribe();
        assert_eq!(*rx.borrow(), 0);

        log.append(LogEntry::info("DESIGN", "one"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        log.clear();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 0);
    }
}
