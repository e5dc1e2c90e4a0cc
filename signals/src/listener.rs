use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use tracing::trace;

use crate::{
    error::{ListenerError, ListenerPanicked},
    event::ChangeEvent,
};

/// An object that wants to be notified of change events without being owned by the subject.
///
/// Register it with `Subject::observe`; the subject keeps only a `Weak` reference, so dropping the
/// observer is enough to stop delivery.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &ChangeEvent) -> Result<(), ListenerError>;
}

/// A registered callback.
#[derive(Clone)]
pub enum Listener {
    /// Infallible closure
    Callback(Arc<dyn Fn(&ChangeEvent) + Send + Sync + 'static>),
    /// Closure whose errors are collected and reported after the delivery pass
    Fallible(Arc<dyn Fn(&ChangeEvent) -> Result<(), ListenerError> + Send + Sync + 'static>),
    /// Non-owning reference to an observer
    Observer(Weak<dyn Observer>),
}

pub(crate) enum Outcome {
    Delivered,
    Failed(ListenerError),
    /// The observer behind a weak listener has been dropped
    Gone,
}

impl Listener {
    /// Invoke the listener. A panic is caught and reported as a failure like any returned error,
    /// so it cannot cut the delivery pass short.
    pub(crate) fn call(&self, event: &ChangeEvent) -> Outcome {
        let result = match self {
            Listener::Callback(callback) => guarded(|| callback(event)),
            Listener::Fallible(callback) => guarded(|| callback(event)).and_then(|r| r),
            Listener::Observer(observer) => match observer.upgrade() {
                Some(observer) => guarded(|| observer.on_event(event)).and_then(|r| r),
                None => return Outcome::Gone,
            },
        };
        match result {
            Ok(()) => Outcome::Delivered,
            Err(e) => Outcome::Failed(e),
        }
    }
}

fn guarded<R>(f: impl FnOnce() -> R) -> Result<R, ListenerError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| Box::new(ListenerPanicked::from_payload(payload.as_ref())) as ListenerError)
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Listener::Callback(_) => write!(f, "Listener::Callback"),
            Listener::Fallible(_) => write!(f, "Listener::Fallible"),
            Listener::Observer(observer) => write!(f, "Listener::Observer(alive: {})", observer.strong_count() > 0),
        }
    }
}

/// Trait for types that can be registered as listeners.
pub trait IntoListener {
    fn into_listener(self) -> Listener;
}

impl IntoListener for Listener {
    fn into_listener(self) -> Listener { self }
}

impl IntoListener for Arc<dyn Fn(&ChangeEvent) + Send + Sync + 'static> {
    fn into_listener(self) -> Listener { Listener::Callback(self) }
}

impl IntoListener for Weak<dyn Observer> {
    fn into_listener(self) -> Listener { Listener::Observer(self) }
}

impl IntoListener for std::sync::mpsc::Sender<ChangeEvent> {
    fn into_listener(self) -> Listener {
        Listener::Callback(Arc::new(move |event: &ChangeEvent| {
            if self.send(event.clone()).is_err() {
                trace!("receiver dropped, discarding {event}");
            }
        }))
    }
}

#[cfg(feature = "tokio")]
impl IntoListener for tokio::sync::mpsc::UnboundedSender<ChangeEvent> {
    fn into_listener(self) -> Listener {
        Listener::Callback(Arc::new(move |event: &ChangeEvent| {
            if self.send(event.clone()).is_err() {
                trace!("receiver dropped, discarding {event}");
            }
        }))
    }
}
