//! Sample features run by the demo binary.

mod blog;
mod calculator;
mod disposal;

use stepwise::{FeatureRegistry, RegistryError};

/// Registry holding every sample feature.
pub fn registry() -> Result<FeatureRegistry, RegistryError> {
    let registry = FeatureRegistry::new();
    registry.register(blog::feature())?;
    registry.register(calculator::feature())?;
    registry.register(disposal::feature())?;
    Ok(registry)
}
