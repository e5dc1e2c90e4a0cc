use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tracing::{debug, trace};

use crate::{
    error::{CallbackFailure, DeliveryError},
    event::{ChangeEvent, Channel},
    listener::{IntoListener, Listener, Outcome},
};

/// Identifies one subscription for later removal.
///
/// Ids are never reused within a registry, and the handle remembers which registry issued it, so a
/// stale or foreign handle can never remove somebody else's subscription.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubscriptionHandle {
    registry: usize,
    id: u64,
}

impl std::fmt::Display for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}:{}", self.registry, self.id) }
}

/// Ordered mapping from channel to the listeners registered on it.
#[derive(Clone)]
pub struct SubscriptionRegistry(Arc<Inner>);

pub(crate) struct Inner {
    id: usize,
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    channels: HashMap<Channel, Vec<Entry>>,
    // subscription id -> the channel it lives on
    index: HashMap<u64, Channel>,
}

struct Entry {
    id: u64,
    listener: Listener,
}

impl Default for SubscriptionRegistry {
    fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry").field("id", &self.0.id).field("subscriptions", &self.len()).finish()
    }
}

impl Inner {
    fn read(&self) -> RwLockReadGuard<'_, State> { self.state.read().unwrap_or_else(PoisonError::into_inner) }

    fn write(&self) -> RwLockWriteGuard<'_, State> { self.state.write().unwrap_or_else(PoisonError::into_inner) }

    fn remove(&self, handle: SubscriptionHandle) -> bool {
        if handle.registry != self.id {
            return false;
        }
        let mut state = self.write();
        let Some(channel) = state.index.remove(&handle.id) else {
            return false;
        };
        if let Some(entries) = state.channels.get_mut(&channel) {
            entries.retain(|entry| entry.id != handle.id);
            if entries.is_empty() {
                state.channels.remove(&channel);
            }
        }
        trace!("removed subscription {handle} from {channel}");
        true
    }
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(Arc::new(Inner { id: NEXT.fetch_add(1, Ordering::Relaxed), state: RwLock::new(State::default()) }))
    }

    /// Append a listener to the channel. Registering the same callback twice yields two
    /// independent subscriptions with distinct handles.
    pub fn add(&self, channel: impl Into<Channel>, listener: impl IntoListener) -> SubscriptionHandle {
        let channel = channel.into();
        let mut state = self.0.write();
        let id = state.next_id;
        state.next_id += 1;
        state.channels.entry(channel.clone()).or_default().push(Entry { id, listener: listener.into_listener() });
        state.index.insert(id, channel.clone());
        let handle = SubscriptionHandle { registry: self.0.id, id };
        debug!("added subscription {handle} on {channel}");
        handle
    }

    /// Remove exactly the subscription identified by `handle`. Returns whether anything was
    /// removed; unknown or already removed handles are not an error.
    pub fn remove(&self, handle: SubscriptionHandle) -> bool { self.0.remove(handle) }

    /// Deliver an event to the listeners of its channel, then to the wildcard listeners.
    ///
    /// The listener list is snapshotted before the first call and no lock is held while listeners
    /// run, so listeners may subscribe, unsubscribe or notify re-entrantly without affecting this
    /// pass. Failures are collected and returned once every listener has been called.
    pub fn deliver(&self, event: &ChangeEvent) -> Result<(), DeliveryError> {
        let snapshot = self.snapshot(event.name());
        trace!("delivering {event} to {} listener(s)", snapshot.len());

        let mut errors = DeliveryError::default();
        let mut gone = Vec::new();
        for (id, listener) in snapshot {
            let handle = SubscriptionHandle { registry: self.0.id, id };
            match listener.call(event) {
                Outcome::Delivered => {}
                Outcome::Failed(source) => {
                    debug!("listener {handle} failed on {}: {source}", event.name());
                    errors.push(CallbackFailure { event: event.name().to_string(), handle, source });
                }
                Outcome::Gone => gone.push(handle),
            }
        }

        for handle in gone {
            if self.0.remove(handle) {
                debug!("pruned subscription {handle}: observer was dropped");
            }
        }
        errors.into_result()
    }

    fn snapshot(&self, name: &str) -> Vec<(u64, Listener)> {
        let state = self.0.read();
        // TODO: avoid the String allocation by keying channels with a borrowed lookup type
        let named = state.channels.get(&Channel::named(name)).into_iter().flatten();
        let wildcard = state.channels.get(&Channel::Any).into_iter().flatten();
        named.chain(wildcard).map(|entry| (entry.id, entry.listener.clone())).collect()
    }

    /// Number of active subscriptions across all channels
    pub fn len(&self) -> usize { self.0.read().index.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Number of active subscriptions on one channel (the wildcard is not included for named channels)
    pub fn listener_count(&self, channel: impl Into<Channel>) -> usize { self.0.read().channels.get(&channel.into()).map_or(0, Vec::len) }

    pub fn contains(&self, handle: SubscriptionHandle) -> bool { handle.registry == self.0.id && self.0.read().index.contains_key(&handle.id) }

    /// A guard that removes the subscription when dropped. The guard does not keep the registry alive.
    pub fn guard(&self, handle: SubscriptionHandle) -> SubscriptionGuard { SubscriptionGuard { registry: Arc::downgrade(&self.0), handle: Some(handle) } }

    pub(crate) fn downgrade(&self) -> Weak<Inner> { Arc::downgrade(&self.0) }

    pub(crate) fn upgrade(weak: &Weak<Inner>) -> Option<Self> { weak.upgrade().map(Self) }
}

/// Removes its subscription when dropped.
#[must_use = "dropping the guard immediately unsubscribes"]
pub struct SubscriptionGuard {
    registry: Weak<Inner>,
    handle: Option<SubscriptionHandle>,
}

impl SubscriptionGuard {
    pub fn handle(&self) -> Option<SubscriptionHandle> { self.handle }

    /// Give up the guard without unsubscribing, handing back the plain handle
    pub fn detach(mut self) -> Option<SubscriptionHandle> { self.handle.take() }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let (Some(handle), Some(registry)) = (self.handle.take(), self.registry.upgrade()) {
            registry.remove(handle);
        }
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "SubscriptionGuard({:?})", self.handle) }
}
