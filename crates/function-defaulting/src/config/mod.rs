//! The immutable configuration snapshot consumed by the defaulting engine.
//!
//! A [`DefaultingConfig`] is built once, either from textual [`DefaultingOptions`] or from
//! already parsed [`PresetTables`]. Every default preset name is resolved against its table while
//! building the snapshot, so the engine itself never has to deal with missing presets.
//!
//! The snapshot is never mutated after it has been built. Use [`SharedDefaultingConfig`] to
//! publish a new snapshot while defaulting calls are running concurrently.

use std::collections::BTreeMap;

use snafu::{OptionExt as _, ResultExt as _, Snafu};

use crate::presets::{
    self, ParsePresetsError, ReplicasPreset, ReplicasPresets, ResourcePreset, ResourcePresets,
    RuntimePresets,
};

mod options;
mod shared;

pub use options::*;
pub use shared::*;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to parse function resource presets"))]
    ParseFunctionResourcesPresets { source: ParsePresetsError },

    #[snafu(display("failed to parse function runtime presets"))]
    ParseFunctionRuntimePresets { source: ParsePresetsError },

    #[snafu(display("failed to parse function replicas presets"))]
    ParseFunctionReplicasPresets { source: ParsePresetsError },

    #[snafu(display("failed to parse build resource presets"))]
    ParseBuildResourcesPresets { source: ParsePresetsError },

    #[snafu(display("the default {table} preset {preset:?} is not defined"))]
    UnknownDefaultPreset {
        table: &'static str,
        preset: String,
    },

    #[snafu(display(
        "the runtime {runtime:?} refers to the function resource preset {preset:?}, which is not defined"
    ))]
    UnknownRuntimePreset { runtime: String, preset: String },
}

/// Already parsed preset tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PresetTables {
    pub function_resources: ResourcePresets,
    pub function_runtimes: RuntimePresets,
    pub function_replicas: ReplicasPresets,
    pub build_resources: ResourcePresets,
}

/// Names of the presets used when nothing more specific applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultPresetNames {
    pub function_resources: String,
    pub function_replicas: String,
    pub build_resources: String,
}

impl Default for DefaultPresetNames {
    fn default() -> Self {
        Self {
            function_resources: DEFAULT_FUNCTION_RESOURCES_PRESET.to_owned(),
            function_replicas: DEFAULT_FUNCTION_REPLICAS_PRESET.to_owned(),
            build_resources: DEFAULT_BUILD_RESOURCES_PRESET.to_owned(),
        }
    }
}

/// A preset table together with its resolved global default.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetDefaults<T> {
    pub presets: BTreeMap<String, T>,
    pub default_name: String,
    pub default_preset: T,
}

impl<T: Clone> PresetDefaults<T> {
    fn resolve(
        presets: BTreeMap<String, T>,
        default_name: String,
        table: &'static str,
    ) -> Result<Self> {
        let default_preset = presets
            .get(&default_name)
            .cloned()
            .with_context(|| UnknownDefaultPresetSnafu {
                table,
                preset: default_name.clone(),
            })?;

        Ok(Self {
            presets,
            default_name,
            default_preset,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDefaults {
    pub resources: PresetDefaults<ResourcePreset>,
    pub runtime_presets: RuntimePresets,
    pub replicas: PresetDefaults<ReplicasPreset>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildJobDefaults {
    pub resources: PresetDefaults<ResourcePreset>,
}

/// Process-wide defaulting configuration, read-only once it has been built.
#[derive(Clone, Debug, PartialEq)]
pub struct DefaultingConfig {
    pub function: FunctionDefaults,
    pub build_job: BuildJobDefaults,
}

impl DefaultingConfig {
    /// Builds the snapshot from parsed preset tables, resolving all default preset names.
    pub fn new(tables: PresetTables, defaults: DefaultPresetNames) -> Result<Self> {
        let PresetTables {
            function_resources,
            function_runtimes,
            function_replicas,
            build_resources,
        } = tables;

        if let Some((runtime, preset)) = function_runtimes
            .iter()
            .find(|(_, preset)| !function_resources.contains_key(*preset))
        {
            return UnknownRuntimePresetSnafu { runtime, preset }.fail();
        }

        let config = Self {
            function: FunctionDefaults {
                resources: PresetDefaults::resolve(
                    function_resources,
                    defaults.function_resources,
                    "function resources",
                )?,
                runtime_presets: function_runtimes,
                replicas: PresetDefaults::resolve(
                    function_replicas,
                    defaults.function_replicas,
                    "function replicas",
                )?,
            },
            build_job: BuildJobDefaults {
                resources: PresetDefaults::resolve(
                    build_resources,
                    defaults.build_resources,
                    "build resources",
                )?,
            },
        };

        tracing::info!(
            function_resources_presets = config.function.resources.presets.len(),
            function_runtime_presets = config.function.runtime_presets.len(),
            function_replicas_presets = config.function.replicas.presets.len(),
            build_resources_presets = config.build_job.resources.presets.len(),
            "loaded defaulting configuration"
        );

        Ok(config)
    }

    /// Parses the textual preset tables contained in `options` and builds the snapshot.
    pub fn from_options(options: &DefaultingOptions) -> Result<Self> {
        let tables = PresetTables {
            function_resources: presets::parse_resource_presets(
                &options.function_resources_presets,
            )
            .context(ParseFunctionResourcesPresetsSnafu)?,
            function_runtimes: presets::parse_runtime_presets(&options.function_runtime_presets)
                .context(ParseFunctionRuntimePresetsSnafu)?,
            function_replicas: presets::parse_replicas_presets(
                &options.function_replicas_presets,
            )
            .context(ParseFunctionReplicasPresetsSnafu)?,
            build_resources: presets::parse_resource_presets(&options.build_resources_presets)
                .context(ParseBuildResourcesPresetsSnafu)?,
        };

        let defaults = DefaultPresetNames {
            function_resources: options.function_resources_default_preset.clone(),
            function_replicas: options.function_replicas_default_preset.clone(),
            build_resources: options.build_resources_default_preset.clone(),
        };

        Self::new(tables, defaults)
    }

    /// Builds the snapshot from the built-in presets.
    pub fn builtin() -> Result<Self> {
        Self::from_options(&DefaultingOptions::default())
    }
}
