//! Completes a partially specified [`FunctionSpec`].
//!
//! Defaulting is a pure transformation of the given spec and the object's labels against a
//! [`DefaultingConfig`] snapshot. It cannot fail, all parsing and validation happens while the
//! object is deserialized and while the configuration is loaded.
//!
//! The function workload, the build workload and the scale bounds are resolved independently of
//! each other:
//!
//! 1. Function resources are always resolved, using the preset selected by the function resources
//!    label, the runtime preset or the global default (in that order).
//! 2. Build resources are only resolved if some requests or limits are already given, or if the
//!    build resources label names a known preset. Otherwise they are left as they are.
//! 3. Scale bounds are resolved against the default replicas preset, unless the legacy `replicas`
//!    field is set.
//!
//! Applying the defaults to an already defaulted spec does not change it any further.

use std::collections::BTreeMap;

use kube::ResourceExt as _;
use tracing::instrument;

use crate::{
    config::DefaultingConfig,
    crd::{Function, FunctionSpec, ResourceConfiguration},
};

mod resources;
mod scale;
pub mod selector;

pub use resources::{resolve_axis, resolve_resources};
pub use scale::resolve_scale;
use selector::{PresetSource, SelectionContext};

/// Returns a copy of `spec` with every unset resource and scale field filled in.
#[instrument(skip_all, fields(runtime = %spec.runtime))]
pub fn defaulted(
    spec: &FunctionSpec,
    labels: &BTreeMap<String, String>,
    config: &DefaultingConfig,
) -> FunctionSpec {
    let context = SelectionContext {
        labels,
        runtime: &spec.runtime,
    };
    let given = spec.resource_configuration.as_ref();

    let function_preset = selector::function_resources(config, &context);
    let function = resolve_resources(
        given.and_then(|c| c.function.as_ref()),
        function_preset.preset,
    );

    let given_build = given.and_then(|c| c.build.as_ref());
    let build_preset = selector::build_resources(config, &context);
    let build = if given_build.is_some_and(|b| !b.is_unset())
        || build_preset.source == PresetSource::Label
    {
        Some(resolve_resources(given_build, build_preset.preset))
    } else {
        tracing::debug!("neither build resources nor a build preset label are set, skipping");
        given_build.cloned()
    };

    let scale_config = if spec.replicas.is_some() {
        tracing::debug!("legacy replicas field is set, skipping scale defaulting");
        spec.scale_config.clone()
    } else {
        let replicas_preset = selector::replicas(config, &context);
        Some(resolve_scale(spec.scale_config.as_ref(), *replicas_preset.preset))
    };

    FunctionSpec {
        resource_configuration: Some(ResourceConfiguration {
            function: Some(function),
            build,
        }),
        scale_config,
        ..spec.clone()
    }
}

impl Function {
    /// Returns a copy of this Function with its spec defaulted, see [`defaulted`].
    pub fn with_defaults(&self, config: &DefaultingConfig) -> Self {
        let mut function = self.clone();
        function.spec = defaulted(&self.spec, self.labels(), config);
        function
    }
}
