//! Synchronous fan-out of remote keys to subscribed listeners.
//!
//! The subscriber list lives behind an [`ArcSwap`], so `publish` walks an
//! immutable snapshot without holding a lock. Listeners may therefore
//! subscribe or unsubscribe from inside a callback; the change applies to
//! the next publish.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use tracing::{debug, error};

use super::key::RemoteKey;

type Listener = Arc<dyn Fn(RemoteKey) + Send + Sync>;

/// Opaque token returned by [`KeyEventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

/// Outcome of one [`KeyEventBus::publish`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Listeners that returned normally.
    pub delivered: usize,
    /// Listeners that panicked and were skipped.
    pub failed: usize,
}

#[derive(Clone)]
struct Subscriber {
    handle: SubscriptionHandle,
    listener: Listener,
}

struct BusInner {
    subscribers: ArcSwap<Vec<Subscriber>>,
    next_id: AtomicU64,
}

/// Dispatcher of remote keys to the listeners of whatever is on screen.
///
/// Cheaply cloneable; clones share the same subscriber list.
#[derive(Clone)]
pub struct KeyEventBus {
    inner: Arc<BusInner>,
}

impl Default for KeyEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEventBus")
            .field("subscribers", &self.len())
            .finish()
    }
}

impl KeyEventBus {
    /// An independent bus with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                subscribers: ArcSwap::from_pointee(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// The process-wide bus.
    pub fn shared() -> &'static KeyEventBus {
        static SHARED: OnceLock<KeyEventBus> = OnceLock::new();
        SHARED.get_or_init(KeyEventBus::new)
    }

    /// Register `listener`. It is called after every listener that
    /// subscribed before it.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionHandle
    where
        F: Fn(RemoteKey) + Send + Sync + 'static,
    {
        let handle = SubscriptionHandle(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let subscriber = Subscriber {
            handle,
            listener: Arc::new(listener),
        };
        self.inner.subscribers.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(subscriber.clone());
            next
        });
        debug!(subscription = handle.0, "key listener subscribed");
        handle
    }

    /// Remove the listener behind `handle`. Returns `false` when it was
    /// already gone; calling twice is harmless.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let previous = self.inner.subscribers.rcu(|current| {
            current
                .iter()
                .filter(|s| s.handle != handle)
                .cloned()
                .collect::<Vec<_>>()
        });
        let removed = previous.iter().any(|s| s.handle == handle);
        if removed {
            debug!(subscription = handle.0, "key listener unsubscribed");
        }
        removed
    }

    /// Deliver `key` to every listener, in subscription order. A listener
    /// that panics is logged and skipped; the rest still run.
    pub fn publish(&self, key: RemoteKey) -> PublishReport {
        let subscribers = self.inner.subscribers.load_full();
        let mut report = PublishReport::default();

        for subscriber in subscribers.iter() {
            let listener = &subscriber.listener;
            match catch_unwind(AssertUnwindSafe(|| listener(key))) {
                Ok(()) => report.delivered += 1,
                Err(payload) => {
                    report.failed += 1;
                    error!(
                        subscription = subscriber.handle.0,
                        %key,
                        panic = panic_message(payload.as_ref()),
                        "key listener panicked"
                    );
                }
            }
        }
        report
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.inner.subscribers.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn Fn(RemoteKey) + Send + Sync>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |name: &str| {
            let sink = Arc::clone(&sink);
            let name = name.to_owned();
            Box::new(move |key: RemoteKey| sink.lock().push(format!("{name}:{key}")))
                as Box<dyn Fn(RemoteKey) + Send + Sync>
        };
        (log, make)
    }

    #[test]
    fn publish_runs_listeners_in_subscription_order() {
        let bus = KeyEventBus::new();
        let (log, make) = recorder();
        bus.subscribe(make("a"));
        bus.subscribe(make("b"));
        bus.subscribe(make("c"));

        let report = bus.publish(RemoteKey::Enter);

        assert_eq!(report, PublishReport { delivered: 3, failed: 0 });
        assert_eq!(*log.lock(), ["a:enter", "b:enter", "c:enter"]);
    }

    #[test]
    fn unsubscribed_listener_is_never_called_again() {
        let bus = KeyEventBus::new();
        let (log, make) = recorder();
        let a = bus.subscribe(make("a"));
        bus.subscribe(make("b"));

        assert!(bus.unsubscribe(a));
        bus.publish(RemoteKey::Left);

        assert_eq!(*log.lock(), ["b:left"]);
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn double_unsubscribe_is_harmless() {
        let bus = KeyEventBus::new();
        let handle = bus.subscribe(|_| {});
        assert!(bus.unsubscribe(handle));
        assert!(!bus.unsubscribe(handle));
        assert!(bus.is_empty());
    }

    #[test]
    fn panicking_listener_does_not_stop_the_rest() {
        let bus = KeyEventBus::new();
        let (log, make) = recorder();
        bus.subscribe(make("before"));
        bus.subscribe(|_| panic!("listener exploded"));
        bus.subscribe(make("after"));

        let report = bus.publish(RemoteKey::Back);

        assert_eq!(report, PublishReport { delivered: 2, failed: 1 });
        assert_eq!(*log.lock(), ["before:back", "after:back"]);
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_publish() {
        let bus = KeyEventBus::new();
        let calls = Arc::new(Mutex::new(0_u32));
        let slot: Arc<Mutex<Option<SubscriptionHandle>>> = Arc::new(Mutex::new(None));

        let handle = {
            let inner_bus = bus.clone();
            let calls = Arc::clone(&calls);
            let slot = Arc::clone(&slot);
            bus.subscribe(move |_| {
                *calls.lock() += 1;
                let me = *slot.lock();
                if let Some(me) = me {
                    inner_bus.unsubscribe(me);
                }
            })
        };
        *slot.lock() = Some(handle);

        bus.publish(RemoteKey::Up);
        bus.publish(RemoteKey::Up);

        assert_eq!(*calls.lock(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn clones_share_subscribers() {
        let bus = KeyEventBus::new();
        let other = bus.clone();
        other.subscribe(|_| {});
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn shared_bus_is_one_instance() {
        let handle = KeyEventBus::shared().subscribe(|_| {});
        assert!(!KeyEventBus::shared().is_empty());
        assert!(KeyEventBus::shared().unsubscribe(handle));
    }
}
