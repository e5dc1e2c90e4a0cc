use std::sync::{Arc, Weak};

use tracing::trace;

use crate::{
    error::{DeliveryError, ListenerError},
    event::{ChangeEvent, Channel, EventData, SubjectId},
    listener::{IntoListener, Listener, Observer},
    registry::{Inner, SubscriptionGuard, SubscriptionHandle, SubscriptionRegistry},
};

/// Manages subscriptions and dispatches change events synchronously.
///
/// A `Subject` is cheap to clone: clones share the same registry and identity. Listeners that need
/// to notify re-entrantly should capture a [`WeakSubject`] rather than a clone, so that the
/// subscription does not keep the subject alive.
#[derive(Clone, Debug)]
pub struct Subject {
    id: SubjectId,
    registry: SubscriptionRegistry,
}

/// A non-owning reference to a [`Subject`]
#[derive(Clone)]
pub struct WeakSubject {
    id: SubjectId,
    registry: Weak<Inner>,
}

impl Default for Subject {
    fn default() -> Self { Self::new() }
}

impl Subject {
    pub fn new() -> Self { Self { id: SubjectId::next(), registry: SubscriptionRegistry::new() } }

    pub fn id(&self) -> SubjectId { self.id }

    pub fn registry(&self) -> &SubscriptionRegistry { &self.registry }

    /// Subscribe a closure to a named event or to [`Channel::Any`]. If the closure panics, the
    /// panic is reported from `notify` as a failure and the remaining listeners still run.
    pub fn subscribe<F>(&self, channel: impl Into<Channel>, callback: F) -> SubscriptionHandle
    where F: Fn(&ChangeEvent) + Send + Sync + 'static {
        self.registry.add(channel, Listener::Callback(Arc::new(callback)))
    }

    /// Subscribe a closure whose errors are collected and returned from `notify`
    pub fn try_subscribe<F>(&self, channel: impl Into<Channel>, callback: F) -> SubscriptionHandle
    where F: Fn(&ChangeEvent) -> Result<(), ListenerError> + Send + Sync + 'static {
        self.registry.add(channel, Listener::Fallible(Arc::new(callback)))
    }

    /// Subscribe anything that converts into a [`Listener`], such as a channel sender
    pub fn subscribe_with(&self, channel: impl Into<Channel>, listener: impl IntoListener) -> SubscriptionHandle {
        self.registry.add(channel, listener)
    }

    /// Register an observer without taking ownership of it. Once the observer is dropped its
    /// subscription is skipped and pruned.
    pub fn observe<O: Observer + 'static>(&self, channel: impl Into<Channel>, observer: &Arc<O>) -> SubscriptionHandle {
        let observer: Arc<dyn Observer> = observer.clone();
        self.registry.add(channel, Listener::Observer(Arc::downgrade(&observer)))
    }

    /// Like `subscribe`, but unsubscribes when the returned guard is dropped
    pub fn subscribe_guarded<F>(&self, channel: impl Into<Channel>, callback: F) -> SubscriptionGuard
    where F: Fn(&ChangeEvent) + Send + Sync + 'static {
        self.registry.guard(self.subscribe(channel, callback))
    }

    /// Remove a subscription. Unknown or already removed handles are ignored.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) { self.registry.remove(handle); }

    /// Build a change event from this subject and deliver it to every matching listener before
    /// returning. May be called from inside a listener; the nested pass completes before the
    /// calling listener resumes.
    pub fn notify(&self, name: &str, data: EventData) -> Result<(), DeliveryError> {
        let event = ChangeEvent::new(name, self.id, data);
        trace!("notify {event}");
        self.registry.deliver(&event)
    }

    pub fn downgrade(&self) -> WeakSubject { WeakSubject { id: self.id, registry: self.registry.downgrade() } }
}

impl WeakSubject {
    pub fn id(&self) -> SubjectId { self.id }

    pub fn upgrade(&self) -> Option<Subject> { SubscriptionRegistry::upgrade(&self.registry).map(|registry| Subject { id: self.id, registry }) }
}

impl std::fmt::Debug for WeakSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "WeakSubject({})", self.id) }
}

/// The observable capability. Implement `subject()` on a type that owns a [`Subject`] and the rest
/// comes for free, without the type having to derive from anything.
pub trait Observable {
    fn subject(&self) -> &Subject;

    fn subscribe<F>(&self, channel: impl Into<Channel>, callback: F) -> SubscriptionHandle
    where F: Fn(&ChangeEvent) + Send + Sync + 'static {
        self.subject().subscribe(channel, callback)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) { self.subject().unsubscribe(handle) }

    fn notify(&self, name: &str, data: EventData) -> Result<(), DeliveryError> { self.subject().notify(name, data) }
}

impl Observable for Subject {
    fn subject(&self) -> &Subject { self }
}
