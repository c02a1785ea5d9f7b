//! Test-scoped record of resource lifetimes and step activity.

use std::sync::{Arc, Mutex, PoisonError};

use stepwise::{Acquired, BoxError, Resource};

/// Something observed while a feature ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A resource was acquired.
    Constructed(String),
    /// A resource was released.
    Disposed(String),
    /// A step body noted that it ran.
    Ran(String),
}

impl Event {
    /// Shorthand for [`Event::Constructed`].
    pub fn constructed(name: impl Into<String>) -> Self { Self::Constructed(name.into()) }

    /// Shorthand for [`Event::Disposed`].
    pub fn disposed(name: impl Into<String>) -> Self { Self::Disposed(name.into()) }

    /// Shorthand for [`Event::Ran`].
    pub fn ran(name: impl Into<String>) -> Self { Self::Ran(name.into()) }
}

/// Shared, cloneable event sink passed into the declarations under test.
#[derive(Clone, Debug, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self { Self::default() }

    /// Append `event`.
    pub fn record(&self, event: Event) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Record that `step` ran.
    pub fn ran(&self, step: &str) { self.record(Event::ran(step)); }

    /// Every event so far, in order.
    pub fn events(&self) -> Vec<Event> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Acquire a resource called `name`, recording its construction.
    pub fn acquire(&self, name: &str) -> Acquired { Acquired::one(self.tracked(name)) }

    /// Acquire several resources, in order.
    pub fn acquire_all(&self, names: &[&str]) -> Acquired {
        Acquired::many(names.iter().map(|name| self.tracked(name)))
    }

    /// Acquire a resource whose release fails with `reason`.
    pub fn acquire_failing(&self, name: &str, reason: &str) -> Acquired {
        let mut resource = self.tracked(name);
        resource.failure = Some(reason.to_owned());
        Acquired::one(resource)
    }

    /// Names of constructed resources, in order.
    pub fn constructed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Constructed(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Names of released resources, in order.
    pub fn disposed(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Disposed(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Forget every event.
    pub fn clear(&self) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn tracked(&self, name: &str) -> TrackedResource {
        self.record(Event::constructed(name));
        TrackedResource {
            name: name.to_owned(),
            log: self.clone(),
            failure: None,
        }
    }
}

/// Resource recording its release in an [`EventLog`].
#[derive(Debug)]
pub struct TrackedResource {
    name: String,
    log: EventLog,
    failure: Option<String>,
}

impl Resource for TrackedResource {
    fn label(&self) -> std::borrow::Cow<'_, str> { std::borrow::Cow::Borrowed(&self.name) }

    fn release(self: Box<Self>) -> Result<(), BoxError> {
        let Self { name, log, failure } = *self;
        log.record(Event::Disposed(name));
        match failure {
            Some(reason) => Err(reason.into()),
            None => Ok(()),
        }
    }
}
