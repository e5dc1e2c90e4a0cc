//! Error types for the notification core.

use thiserror::Error;

use crate::registry::SubscriptionHandle;

/// The error a fallible listener may return
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Returned from `Bindable::get` when a property was never set and has no default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown property: {property}")]
pub struct UnknownPropertyError {
    pub property: String,
}

/// A single listener that failed during a delivery pass.
#[derive(Debug, Error)]
#[error("listener {handle} failed on \"{event}\": {source}")]
pub struct CallbackFailure {
    /// Name of the event being delivered
    pub event: String,
    pub handle: SubscriptionHandle,
    #[source]
    pub source: ListenerError,
}

/// A listener panicked while an event was being delivered to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("listener panicked: {message}")]
pub struct ListenerPanicked {
    pub message: String,
}

impl ListenerPanicked {
    pub(crate) fn from_payload(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = match (payload.downcast_ref::<&str>(), payload.downcast_ref::<String>()) {
            (Some(s), _) => s.to_string(),
            (_, Some(s)) => s.clone(),
            _ => "non-string panic payload".to_string(),
        };
        Self { message }
    }
}

/// All listener failures of one or more delivery passes.
///
/// Delivery never stops at the first failure; every remaining listener is still called and the
/// failures are reported together once the pass has completed.
#[derive(Debug, Default, Error)]
#[error("{} listener(s) failed during delivery", .failures.len())]
pub struct DeliveryError {
    pub failures: Vec<CallbackFailure>,
}

impl DeliveryError {
    pub fn len(&self) -> usize { self.failures.len() }

    pub fn is_empty(&self) -> bool { self.failures.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &CallbackFailure> { self.failures.iter() }

    pub(crate) fn push(&mut self, failure: CallbackFailure) { self.failures.push(failure) }

    /// Fold another pass's outcome into this one
    pub(crate) fn absorb(&mut self, result: Result<(), DeliveryError>) {
        if let Err(mut other) = result {
            self.failures.append(&mut other.failures);
        }
    }

    /// `Ok(())` if nothing failed, otherwise `Err(self)`
    pub(crate) fn into_result(self) -> Result<(), DeliveryError> { if self.failures.is_empty() { Ok(()) } else { Err(self) } }
}

impl IntoIterator for DeliveryError {
    type Item = CallbackFailure;
    type IntoIter = std::vec::IntoIter<CallbackFailure>;
    fn into_iter(self) -> Self::IntoIter { self.failures.into_iter() }
}
