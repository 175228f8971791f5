//! Defaulting for serverless [`Function`][crd::Function] resources.
//!
//! Before a Function is persisted, every resource request/limit and the replica bounds it does
//! not specify are filled in from presets, so that downstream components always see a complete
//! and internally consistent spec. The presets are loaded once into an immutable
//! [`DefaultingConfig`][config::DefaultingConfig] snapshot, which is passed explicitly into
//! [`defaulting::defaulted`].
//!
//! ```
//! use stackable_function_defaulting::{config::DefaultingConfig, crd::FunctionSpec, defaulting};
//!
//! let config = DefaultingConfig::builtin().expect("built-in presets are valid");
//! let spec = defaulting::defaulted(&FunctionSpec::default(), &Default::default(), &config);
//!
//! assert!(spec.resource_configuration.is_some());
//! assert!(spec.scale_config.is_some());
//! ```

pub mod config;
pub mod constants;
pub mod crd;
pub mod defaulting;
pub mod presets;
pub mod quantity;
pub mod webhook;

// External re-exports
pub use k8s_openapi;
pub use kube;
