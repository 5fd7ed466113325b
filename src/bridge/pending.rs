use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::transport::{Action, Reply};

/// In-flight requests, keyed by the id replies must echo back.
#[derive(Default)]
pub(crate) struct PendingRequests {
    next_id: AtomicU64,
    inner: Mutex<HashMap<u64, PendingEntry>>,
}

struct PendingEntry {
    action: Action,
    reply_tx: oneshot::Sender<Reply>,
}

impl PendingRequests {
    pub fn register(&self, action: Action) -> (u64, oneshot::Receiver<Reply>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (reply_tx, reply_rx) = oneshot::channel();
        self.inner
            .lock()
            .unwrap()
            .insert(id, PendingEntry { action, reply_tx });
        (id, reply_rx)
    }

    /// Action of the request still pending under `id`, if any.
    pub fn expected_action(&self, id: u64) -> Option<Action> {
        self.inner.lock().unwrap().get(&id).map(|entry| entry.action)
    }

    /// Removes the entry and settles its caller. A missing entry means the
    /// request already ended some other way; the reply is dropped.
    pub fn settle(&self, id: u64, reply: Reply) {
        if let Some(entry) = self.inner.lock().unwrap().remove(&id) {
            let _ = entry.reply_tx.send(reply);
        }
    }

    pub fn remove(&self, id: u64) {
        self.inner.lock().unwrap().remove(&id);
    }

    /// Drops every pending sender, failing the matching receivers.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

/// Deregisters a pending request when dropped, so every exit path of a
/// command (settled, timed out, caller cancelled) releases its entry.
pub(crate) struct PendingGuard<'a> {
    pending: &'a PendingRequests,
    id: u64,
}

impl<'a> PendingGuard<'a> {
    pub fn new(pending: &'a PendingRequests, id: u64) -> Self {
        PendingGuard { pending, id }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.remove(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn reply_for(id: u64) -> Reply {
        Reply {
            action: Action::GetVersion.reply_action(),
            request_id: id,
            success: true,
            payload: Value::Null,
        }
    }

    #[test]
    fn test_ids_are_unique_per_registration() {
        let pending = PendingRequests::default();
        let (first, _rx1) = pending.register(Action::GetVersion);
        let (second, _rx2) = pending.register(Action::GetVersion);
        assert_ne!(first, second);
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_settle_consumes_the_entry() {
        let pending = PendingRequests::default();
        let (id, mut rx) = pending.register(Action::GetVersion);
        pending.settle(id, reply_for(id));
        assert_eq!(pending.len(), 0);
        assert!(rx.try_recv().is_ok());

        // settling again is a no-op
        pending.settle(id, reply_for(id));
    }

    #[test]
    fn test_guard_removes_on_drop() {
        let pending = PendingRequests::default();
        let (id, _rx) = pending.register(Action::DeriveAddress);
        {
            let _guard = PendingGuard::new(&pending, id);
        }
        assert_eq!(pending.len(), 0);
        assert_eq!(pending.expected_action(id), None);
    }
}
