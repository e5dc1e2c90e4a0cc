use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use tracing::trace;

use crate::{
    error::{DeliveryError, UnknownPropertyError},
    event::{EventData, PROPERTY_CHANGE},
    subject::{Observable, Subject, WeakSubject},
    value::Value,
};

/// A subject that tracks named property values and announces changes to them.
///
/// Every actual change is delivered twice: once on the generic [`PROPERTY_CHANGE`] channel and once
/// on the channel named after the property, both with the payload `{property, value}`.
///
/// A listener that reads or writes its own holder must capture a [`WeakBindable`]; a strong clone
/// captured by one of the holder's own listeners would keep the holder alive forever.
#[derive(Clone, Default)]
pub struct Bindable {
    subject: Subject,
    properties: Arc<RwLock<Properties>>,
}

/// A non-owning reference to a [`Bindable`]
#[derive(Clone)]
pub struct WeakBindable {
    subject: WeakSubject,
    properties: Weak<RwLock<Properties>>,
}

#[derive(Default)]
struct Properties {
    values: HashMap<String, Value>,
    defaults: HashMap<String, Value>,
}

impl Bindable {
    pub fn new() -> Self { Self::default() }

    /// Create a holder with initial values. Nothing is announced.
    pub fn with_values<K: Into<String>, V: Into<Value>>(values: impl IntoIterator<Item = (K, V)>) -> Self {
        let holder = Self::new();
        holder.write().values.extend(values.into_iter().map(|(k, v)| (k.into(), v.into())));
        holder
    }

    fn read(&self) -> RwLockReadGuard<'_, Properties> { self.properties.read().unwrap_or_else(PoisonError::into_inner) }

    fn write(&self) -> RwLockWriteGuard<'_, Properties> { self.properties.write().unwrap_or_else(PoisonError::into_inner) }

    /// Current value of a property, falling back to its registered default
    pub fn get(&self, name: &str) -> Result<Value, UnknownPropertyError> {
        let properties = self.read();
        properties
            .values
            .get(name)
            .or_else(|| properties.defaults.get(name))
            .cloned()
            .ok_or_else(|| UnknownPropertyError { property: name.to_string() })
    }

    /// Set a property and announce the change.
    ///
    /// Returns `Ok(false)` without notifying anyone if the value is the same as the stored one
    /// (see [`Value::same`]). Otherwise the value is stored before any listener runs, so listeners
    /// reading it back see the new value. An `Err` means the value was changed but at least one
    /// listener failed; all listeners of both passes were still called.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<bool, DeliveryError> {
        let value = value.into();
        {
            let mut properties = self.write();
            if properties.values.get(name).is_some_and(|current| current.same(&value)) {
                trace!("set {name}: unchanged");
                return Ok(false);
            }
            properties.values.insert(name.to_string(), value.clone());
        }
        self.announce(name, value)?;
        Ok(true)
    }

    /// Announce a property change unconditionally, without touching the tracked values.
    ///
    /// For values computed or cached outside the holder. No change detection is applied.
    pub fn notify_property_change(&self, name: &str, value: impl Into<Value>) -> Result<(), DeliveryError> { self.announce(name, value.into()) }

    fn announce(&self, name: &str, value: Value) -> Result<(), DeliveryError> {
        let mut errors = DeliveryError::default();
        if name == PROPERTY_CHANGE {
            errors.absorb(self.subject.notify(PROPERTY_CHANGE, EventData::property(name, value)));
        } else {
            errors.absorb(self.subject.notify(PROPERTY_CHANGE, EventData::property(name, value.clone())));
            errors.absorb(self.subject.notify(name, EventData::property(name, value)));
        }
        errors.into_result()
    }

    /// Store a value without announcing it. Intended for setting up state before observers attach.
    pub fn initialize(&self, name: &str, value: impl Into<Value>) { self.write().values.insert(name.to_string(), value.into()); }

    /// Value returned by `get` while the property has never been set
    pub fn set_default(&self, name: &str, value: impl Into<Value>) { self.write().defaults.insert(name.to_string(), value.into()); }

    /// Whether the property has a stored value (defaults do not count)
    pub fn contains(&self, name: &str) -> bool { self.read().values.contains_key(name) }

    pub fn downgrade(&self) -> WeakBindable { WeakBindable { subject: self.subject.downgrade(), properties: Arc::downgrade(&self.properties) } }

    /// Names of all stored properties, sorted
    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().values.keys().cloned().collect();
        names.sort();
        names
    }
}

impl WeakBindable {
    pub fn upgrade(&self) -> Option<Bindable> {
        let subject = self.subject.upgrade()?;
        let properties = self.properties.upgrade()?;
        Some(Bindable { subject, properties })
    }
}

impl std::fmt::Debug for WeakBindable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "WeakBindable({})", self.subject.id()) }
}

impl Observable for Bindable {
    fn subject(&self) -> &Subject { &self.subject }
}

impl std::fmt::Debug for Bindable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bindable").field("subject", &self.subject.id()).field("properties", &self.property_names()).finish()
    }
}
