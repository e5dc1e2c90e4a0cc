use std::sync::atomic::{AtomicUsize, Ordering};

use crate::value::Value;

/// The generic channel fired on every property mutation
pub const PROPERTY_CHANGE: &str = "propertyChange";

/// A unique identifier for a subject. Events carry this rather than a reference to the subject,
/// so holding on to an event never keeps its source alive.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubjectId(usize);

impl SubjectId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "subject#{}", self.0) }
}

/// What a subscription listens to: one named event, or every event
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Channel {
    /// The wildcard channel. Receives every event regardless of name, after the named listeners.
    Any,
    Named(String),
}

impl Channel {
    pub fn named(name: impl Into<String>) -> Self { Channel::Named(name.into()) }
}

impl From<&str> for Channel {
    fn from(name: &str) -> Self { Channel::Named(name.to_string()) }
}
impl From<String> for Channel {
    fn from(name: String) -> Self { Channel::Named(name) }
}
impl From<&String> for Channel {
    fn from(name: &String) -> Self { Channel::Named(name.clone()) }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Any => write!(f, "*"),
            Channel::Named(name) => write!(f, "{name}"),
        }
    }
}

/// The optional payload of a notification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventData {
    pub property: Option<String>,
    pub value: Option<Value>,
}

impl EventData {
    pub fn empty() -> Self { Self::default() }

    /// Payload of a property change: `{propertyName, value}`
    pub fn property(name: impl Into<String>, value: impl Into<Value>) -> Self { Self { property: Some(name.into()), value: Some(value.into()) } }

    pub fn value(value: impl Into<Value>) -> Self { Self { property: None, value: Some(value.into()) } }
}

/// The immutable payload delivered to listeners. A fresh event is built for every notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    name: String,
    source: SubjectId,
    property: Option<String>,
    value: Option<Value>,
}

impl ChangeEvent {
    pub(crate) fn new(name: impl Into<String>, source: SubjectId, data: EventData) -> Self {
        Self { name: name.into(), source, property: data.property, value: data.value }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn source(&self) -> SubjectId { self.source }

    pub fn property(&self) -> Option<&str> { self.property.as_deref() }

    pub fn value(&self) -> Option<&Value> { self.value.as_ref() }

    pub fn is_property_change(&self) -> bool { self.name == PROPERTY_CHANGE }
}

impl std::fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.name, self.source)?;
        if let Some(property) = &self.property {
            write!(f, " {property}")?;
        }
        if let Some(value) = &self.value {
            write!(f, " = {value}")?;
        }
        Ok(())
    }
}
