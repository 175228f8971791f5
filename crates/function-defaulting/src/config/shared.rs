use std::sync::Arc;

use arc_swap::ArcSwap;

use super::DefaultingConfig;

/// Holds the currently active [`DefaultingConfig`] snapshot.
///
/// Readers get their own [`Arc`] to the snapshot which was active when they called
/// [`SharedDefaultingConfig::load`], so a concurrent [`SharedDefaultingConfig::store`] never
/// changes the presets a running defaulting call sees.
#[derive(Debug)]
pub struct SharedDefaultingConfig(ArcSwap<DefaultingConfig>);

impl SharedDefaultingConfig {
    pub fn new(config: DefaultingConfig) -> Self {
        Self(ArcSwap::from_pointee(config))
    }

    /// Returns the currently active snapshot.
    pub fn load(&self) -> Arc<DefaultingConfig> {
        self.0.load_full()
    }

    /// Atomically replaces the active snapshot.
    pub fn store(&self, config: DefaultingConfig) {
        tracing::info!("publishing new defaulting configuration");
        self.0.store(Arc::new(config));
    }
}
