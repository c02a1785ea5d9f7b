//! Resources owned by an execution unit and their ordered release.
//!
//! A step body hands resources to its unit by returning them inside an
//! [`Acquired`] collection. The unit's [`DisposalRegistry`] takes ownership
//! the moment the body returns and releases everything, most recent first,
//! once the unit stops progressing.

use std::{borrow::Cow, fmt};

use tracing::{debug, error};

use crate::{
    error::{BoxError, DisposalFailure},
    metrics,
    panic,
};

/// Anything released by a single release operation.
pub trait Resource: Send {
    /// Human-readable label used in logs and [`DisposalFailure`]s.
    fn label(&self) -> Cow<'_, str> { Cow::Borrowed(std::any::type_name::<Self>()) }

    /// Release the resource. Called at most once.
    ///
    /// # Errors
    ///
    /// Returns an error if the release fails; remaining resources are still
    /// released.
    fn release(self: Box<Self>) -> Result<(), BoxError>;
}

/// Values a release closure may return.
pub trait ReleaseOutcome {
    /// Convert into the result of a release operation.
    ///
    /// # Errors
    ///
    /// Returns the error carried by a failed release.
    fn into_release_result(self) -> Result<(), BoxError>;
}

impl ReleaseOutcome for () {
    fn into_release_result(self) -> Result<(), BoxError> { Ok(()) }
}

impl<E: Into<BoxError>> ReleaseOutcome for Result<(), E> {
    fn into_release_result(self) -> Result<(), BoxError> { self.map_err(Into::into) }
}

/// Resource released by running a closure.
///
/// ```
/// use stepwise::disposal::{Acquired, OnRelease};
///
/// let acquired = Acquired::one(OnRelease::new("temp dir", || println!("removed")));
/// assert_eq!(acquired.len(), 1);
/// ```
pub struct OnRelease<F> {
    label: String,
    action: F,
}

impl<F, R> OnRelease<F>
where
    F: FnOnce() -> R + Send,
    R: ReleaseOutcome,
{
    /// Wrap `action` as a resource labelled `label`.
    pub fn new(label: impl Into<String>, action: F) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

impl<F, R> Resource for OnRelease<F>
where
    F: FnOnce() -> R + Send,
    R: ReleaseOutcome,
{
    fn label(&self) -> Cow<'_, str> { Cow::Borrowed(&self.label) }

    fn release(self: Box<Self>) -> Result<(), BoxError> { (self.action)().into_release_result() }
}

/// Resources returned by a step body, in acquisition order.
#[derive(Default)]
pub struct Acquired(Vec<Box<dyn Resource>>);

impl Acquired {
    /// No resources.
    #[must_use]
    pub fn none() -> Self { Self::default() }

    /// A single resource.
    #[must_use]
    pub fn one(resource: impl Resource + 'static) -> Self { Self(vec![Box::new(resource)]) }

    /// Several resources, acquired in iteration order.
    #[must_use]
    pub fn many<R, I>(resources: I) -> Self
    where
        R: Resource + 'static,
        I: IntoIterator<Item = R>,
    {
        resources
            .into_iter()
            .map(|r| Box::new(r) as Box<dyn Resource>)
            .collect()
    }

    /// Append a resource acquired after those already held.
    pub fn push(&mut self, resource: impl Resource + 'static) { self.0.push(Box::new(resource)); }

    /// Number of resources held.
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns `true` if no resources are held.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl FromIterator<Box<dyn Resource>> for Acquired {
    fn from_iter<I: IntoIterator<Item = Box<dyn Resource>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Debug for Acquired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|r| r.label()))
            .finish()
    }
}

/// Per-unit, append-only record of acquired resources.
///
/// [`release_all`](Self::release_all) drains it in reverse acquisition
/// order. A registry dropped before draining releases whatever it still
/// holds, so an abandoned unit future cannot leak registered resources.
#[derive(Default)]
pub struct DisposalRegistry {
    resources: Vec<Box<dyn Resource>>,
}

impl DisposalRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Take ownership of a single resource.
    pub fn register(&mut self, resource: Box<dyn Resource>) { self.resources.push(resource); }

    /// Take ownership of every resource in `acquired`, preserving its order.
    pub fn extend(&mut self, acquired: Acquired) { self.resources.extend(acquired.0); }

    /// Number of resources awaiting release.
    #[must_use]
    pub fn len(&self) -> usize { self.resources.len() }

    /// Returns `true` if nothing awaits release.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.resources.is_empty() }

    /// Release every resource, most recently acquired first.
    ///
    /// Every resource gets exactly one release attempt. Failures, including
    /// panics, are collected and returned in release order.
    pub fn release_all(&mut self) -> Vec<DisposalFailure> {
        let mut failures = Vec::new();
        while let Some(resource) = self.resources.pop() {
            let label = resource.label().into_owned();
            let outcome = match panic::catch(move || resource.release()) {
                Ok(result) => result,
                Err(panicked) => Err(Box::new(panicked) as BoxError),
            };
            match outcome {
                Ok(()) => {
                    metrics::inc_resources_released();
                    debug!(resource = %label, "resource released");
                }
                Err(source) => {
                    metrics::inc_disposal_failures();
                    error!(resource = %label, error = %source, "resource release failed");
                    failures.push(DisposalFailure {
                        resource: label,
                        source,
                    });
                }
            }
        }
        failures
    }
}

impl fmt::Debug for DisposalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposalRegistry")
            .field("pending", &self.resources.len())
            .finish()
    }
}

impl Drop for DisposalRegistry {
    fn drop(&mut self) {
        if !self.resources.is_empty() {
            let _ = self.release_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rstest::{fixture, rstest};

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    #[fixture]
    fn log() -> Log { Arc::default() }

    fn recorded(log: &Log) -> Vec<String> { log.lock().expect("log lock").clone() }

    fn tracked(log: &Log, label: &'static str) -> OnRelease<impl FnOnce() + Send + use<>> {
        let log = Arc::clone(log);
        OnRelease::new(label, move || log.lock().expect("log lock").push(label.to_owned()))
    }

    #[rstest]
    fn releases_in_reverse_order(log: Log) {
        let mut registry = DisposalRegistry::new();
        registry.extend(Acquired::many([tracked(&log, "r1"), tracked(&log, "r2")]));
        registry.register(Box::new(tracked(&log, "r3")));
        assert_eq!(registry.len(), 3);

        let failures = registry.release_all();

        assert!(failures.is_empty());
        assert!(registry.is_empty());
        assert_eq!(recorded(&log), ["r3", "r2", "r1"]);
    }

    #[rstest]
    fn failures_do_not_stop_remaining_releases(log: Log) {
        let mut registry = DisposalRegistry::new();
        registry.register(Box::new(tracked(&log, "first")));
        registry.register(Box::new(OnRelease::new("broken", || Err::<(), _>("disk full"))));
        registry.register(Box::new(OnRelease::new("panicky", || -> Result<(), String> {
            panic!("release panicked")
        })));
        registry.register(Box::new(tracked(&log, "last")));

        let failures = registry.release_all();

        assert_eq!(recorded(&log), ["last", "first"]);
        let summary: Vec<_> = failures
            .iter()
            .map(|f| (f.resource.as_str(), f.source.to_string()))
            .collect();
        assert_eq!(
            summary,
            [
                ("panicky", "panicked: release panicked".to_owned()),
                ("broken", "disk full".to_owned()),
            ]
        );
    }

    #[rstest]
    fn each_resource_is_released_once(log: Log) {
        let mut registry = DisposalRegistry::new();
        registry.register(Box::new(tracked(&log, "only")));
        registry.release_all();
        registry.release_all();
        drop(registry);
        assert_eq!(recorded(&log), ["only"]);
    }

    #[rstest]
    fn dropping_undrained_registry_releases(log: Log) {
        let mut registry = DisposalRegistry::new();
        registry.register(Box::new(tracked(&log, "a")));
        registry.register(Box::new(tracked(&log, "b")));
        drop(registry);
        assert_eq!(recorded(&log), ["b", "a"]);
    }

    #[test]
    fn default_label_is_type_name() {
        struct Plain;
        impl Resource for Plain {
            fn release(self: Box<Self>) -> Result<(), BoxError> { Ok(()) }
        }
        assert!(Plain.label().ends_with("Plain"));
    }
}
