//! Store change notifications.
//!
//! Views subscribe to the store's [`EventBus`] and re-render the affected
//! entity when an event arrives. Subscriptions follow the disposer pattern:
//! hold the returned [`Subscription`] to keep receiving events, drop it to
//! unsubscribe.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

use serde::Serialize;

use climbhub_shared::VideoId;

/// A change to store state that views may need to re-render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    /// A load completed and replaced the collection.
    Loaded {
        /// Number of videos now in the store.
        count: usize,
    },
    /// A video's like set changed.
    LikesChanged {
        #[serde(rename = "videoId")]
        video_id: VideoId,
        #[serde(rename = "likeCount")]
        like_count: usize,
    },
    /// A video's comment sequence was swapped for the server's.
    CommentsReplaced {
        #[serde(rename = "videoId")]
        video_id: VideoId,
        #[serde(rename = "commentCount")]
        comment_count: usize,
    },
    /// A video's saved projection flipped.
    SavedChanged {
        #[serde(rename = "videoId")]
        video_id: VideoId,
        saved: bool,
    },
    /// The view session ended and the collection was evicted.
    Cleared,
}

/// Subscription handle that unsubscribes automatically when dropped.
pub struct Subscription {
    bus: Weak<EventBus>,
    id: usize,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

/// Fan-out of [`StoreEvent`]s to all mounted views.
///
/// Wrap in `Arc` to enable subscriptions.
pub struct EventBus {
    callbacks: RwLock<Vec<(usize, Arc<dyn Fn(StoreEvent) + Send + Sync>)>>,
    next_id: AtomicUsize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events. Returns a [`Subscription`] that unsubscribes on
    /// drop.
    pub fn subscribe(
        self: &Arc<Self>,
        callback: impl Fn(StoreEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(callback)));
        Subscription {
            bus: Arc::downgrade(self),
            id,
        }
    }

    fn unsubscribe(&self, id: usize) {
        // try_write so a Subscription dropped during an emit (or during
        // panic unwinding) cannot deadlock.
        if let Ok(mut guard) = self.callbacks.try_write() {
            guard.retain(|(i, _)| *i != id);
        }
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: StoreEvent) {
        // Snapshot the callback list so a callback may itself subscribe.
        let callbacks: Vec<_> = self
            .callbacks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_bus() -> (Arc<EventBus>, Arc<Mutex<Vec<StoreEvent>>>, Subscription) {
        let bus = Arc::new(EventBus::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = bus.subscribe(move |event| sink.lock().unwrap().push(event));
        (bus, seen, sub)
    }

    #[test]
    fn subscribe_and_emit() {
        let (bus, seen, _sub) = recording_bus();

        bus.emit(StoreEvent::Loaded { count: 3 });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(matches!(seen[0], StoreEvent::Loaded { count: 3 }));
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let (bus, seen, sub) = recording_bus();

        bus.emit(StoreEvent::Cleared);
        drop(sub);
        bus.emit(StoreEvent::Cleared);

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn all_subscribers_see_each_event() {
        let bus = Arc::new(EventBus::new());
        let first = Arc::new(Mutex::new(0usize));
        let second = Arc::new(Mutex::new(0usize));

        let sink = Arc::clone(&first);
        let _a = bus.subscribe(move |_| *sink.lock().unwrap() += 1);
        let sink = Arc::clone(&second);
        let _b = bus.subscribe(move |_| *sink.lock().unwrap() += 1);

        bus.emit(StoreEvent::Loaded { count: 1 });

        assert_eq!(*first.lock().unwrap(), 1);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[test]
    fn events_serialize_with_camel_case_tags() {
        let event = StoreEvent::SavedChanged {
            video_id: VideoId::new(),
            saved: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"savedChanged\""));
        assert!(json.contains("\"videoId\""));
    }
}
