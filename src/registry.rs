//! Explicit registry of features, keyed by name.
//!
//! Features are registered up front rather than discovered. Materializing
//! the registry turns every feature into type-erased [`RunnableUnit`]s that a
//! [`crate::runner::Runner`] can schedule without knowing their world types.

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use tracing::debug;

use crate::{
    error::RegistryError,
    naming::UnitNames,
    runner::{UnitReport, UnitRunner},
};

/// An execution unit ready to run, with its world type erased.
pub trait RunnableUnit: Send {
    /// Qualified name: feature, scenario and unit display name.
    fn name(&self) -> &str;

    /// Labels derived for the unit.
    fn names(&self) -> &UnitNames;

    /// Run the unit to completion, including teardown.
    fn run(self: Box<Self>, runner: UnitRunner) -> BoxFuture<'static, UnitReport>;
}

/// A feature that can be turned into runnable units.
pub trait FeatureSource: Send + Sync {
    /// The feature's registry key.
    fn name(&self) -> &str;

    /// Expand every scenario of the feature into units.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Construction`] if a declaration registers an
    /// invalid step.
    fn materialize(&self) -> Result<Vec<Box<dyn RunnableUnit>>, RegistryError>;
}

/// Concurrent registry of features.
#[derive(Default)]
pub struct FeatureRegistry(DashMap<String, Arc<dyn FeatureSource>>);

impl FeatureRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Add `feature` under its name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateFeature`] if the name is taken.
    pub fn register(&self, feature: impl FeatureSource + 'static) -> Result<(), RegistryError> {
        let name = feature.name().to_owned();
        match self.0.entry(name) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateFeature(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(feature = %entry.key(), "feature registered");
                entry.insert(Arc::new(feature));
                Ok(())
            }
        }
    }

    /// Remove a feature, returning `true` if it was registered.
    pub fn remove(&self, name: &str) -> bool { self.0.remove(name).is_some() }

    /// Number of registered features.
    #[must_use]
    pub fn len(&self) -> usize { self.0.len() }

    /// Returns `true` if no features are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Registered feature names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.0.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Materialize every feature in name order.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] raised by a feature.
    pub fn materialize(&self) -> Result<Vec<Box<dyn RunnableUnit>>, RegistryError> {
        let mut features: Vec<_> = self
            .0
            .iter()
            .map(|e| (e.key().clone(), Arc::clone(e.value())))
            .collect();
        features.sort_by(|a, b| a.0.cmp(&b.0));

        let mut units = Vec::new();
        for (_, feature) in features {
            units.extend(feature.materialize()?);
        }
        Ok(units)
    }
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureRegistry")
            .field("features", &self.names())
            .finish()
    }
}
