use super::events::{CallEvent, EventKind};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub type EventListener = Arc<dyn Fn(&CallEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    kind: EventKind,
    listener: EventListener,
}

/// Listener registry a call session can embed to implement `on`/`off`.
///
/// Listeners run in registration order. The registry lock is not held while
/// they run, so a listener may subscribe or unsubscribe others.
#[derive(Default)]
pub struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry>>,
}

impl Listeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, kind: EventKind, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push(Entry { id, kind, listener });
        id
    }

    /// Returns `false` if the listener was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn emit(&self, event: &CallEvent) {
        let kind = event.kind();
        let matching: Vec<EventListener> = self
            .entries
            .lock()
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| Arc::clone(&entry.listener))
            .collect();
        tracing::trace!("Dispatching {kind} to {} listener(s)", matching.len());
        for listener in matching {
            listener(event);
        }
    }

    #[must_use]
    pub fn count(&self, kind: EventKind) -> usize {
        self.entries.lock().iter().filter(|entry| entry.kind == kind).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter(hits: &Arc<AtomicUsize>) -> EventListener {
        let hits = Arc::clone(hits);
        Arc::new(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn emit_only_reaches_matching_kind() {
        let listeners = Listeners::new();
        let hits = Arc::new(AtomicUsize::new(0));
        listeners.subscribe(EventKind::LeftMeeting, counter(&hits));
        listeners.subscribe(EventKind::LocalAudioLevel, counter(&hits));

        listeners.emit(&CallEvent::LeftMeeting);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let listeners = Listeners::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = listeners.subscribe(EventKind::LeftMeeting, counter(&hits));

        assert!(listeners.unsubscribe(id));
        assert!(!listeners.unsubscribe(id));
        listeners.emit(&CallEvent::LeftMeeting);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(listeners.is_empty());
    }

    #[test]
    fn listener_may_unsubscribe_itself() {
        let listeners = Arc::new(Listeners::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let slot: Arc<Mutex<Option<ListenerId>>> = Arc::new(Mutex::new(None));

        let registry = Arc::clone(&listeners);
        let own_id = Arc::clone(&slot);
        let counted = Arc::clone(&hits);
        let id = listeners.subscribe(
            EventKind::LeftMeeting,
            Arc::new(move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = *own_id.lock() {
                    registry.unsubscribe(id);
                }
            }),
        );
        *slot.lock() = Some(id);

        listeners.emit(&CallEvent::LeftMeeting);
        listeners.emit(&CallEvent::LeftMeeting);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
