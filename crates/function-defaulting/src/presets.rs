//! Named presets for function resources, build job resources and replica counts.
//!
//! Preset tables are supplied as JSON objects mapping the preset name to its values:
//!
//! ```json
//! {
//!   "S": { "requestCpu": "25m", "requestMemory": "32Mi", "limitCpu": "50m", "limitMemory": "64Mi" },
//!   "M": { "requestCpu": "50m", "requestMemory": "64Mi", "limitCpu": "100m", "limitMemory": "128Mi" }
//! }
//! ```
//!
//! Replica presets use `{ "min": 1, "max": 1 }` as values, runtime presets map a runtime name to
//! the name of a function resource preset, for example `{ "python312": "L" }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use snafu::{ResultExt as _, Snafu, ensure};

use crate::{
    crd::ResourceList,
    quantity::{CpuQuantity, MemoryQuantity},
};

pub type Result<T, E = ParsePresetsError> = std::result::Result<T, E>;

pub type ResourcePresets = BTreeMap<String, ResourcePreset>;
pub type ReplicasPresets = BTreeMap<String, ReplicasPreset>;
pub type RuntimePresets = BTreeMap<String, String>;

#[derive(Debug, Snafu)]
pub enum ParsePresetsError {
    #[snafu(display("failed to parse resource presets"))]
    ParseResourcePresets { source: serde_json::Error },

    #[snafu(display("failed to parse replicas presets"))]
    ParseReplicasPresets { source: serde_json::Error },

    #[snafu(display("failed to parse runtime presets"))]
    ParseRuntimePresets { source: serde_json::Error },

    #[snafu(display("resource preset {preset:?} requests more {resource} than its limit allows"))]
    InvertedResources {
        preset: String,
        resource: &'static str,
    },

    #[snafu(display("replicas preset {preset:?} has a negative minimum of {min}"))]
    NegativeReplicas { preset: String, min: i32 },

    #[snafu(display(
        "replicas preset {preset:?} has a minimum of {min} which exceeds its maximum of {max}"
    ))]
    InvertedReplicas { preset: String, min: i32, max: i32 },
}

/// Requests and limits for both the CPU and the memory axis.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePreset {
    pub request_cpu: CpuQuantity,
    pub request_memory: MemoryQuantity,
    pub limit_cpu: CpuQuantity,
    pub limit_memory: MemoryQuantity,
}

impl ResourcePreset {
    pub fn requests(&self) -> ResourceList {
        ResourceList::new(self.request_cpu, self.request_memory)
    }

    pub fn limits(&self) -> ResourceList {
        ResourceList::new(self.limit_cpu, self.limit_memory)
    }

    fn validate(&self, name: &str) -> Result<()> {
        ensure!(
            self.request_cpu.cmp_amount(&self.limit_cpu).is_le(),
            InvertedResourcesSnafu {
                preset: name,
                resource: "cpu"
            }
        );
        ensure!(
            self.request_memory.cmp_amount(&self.limit_memory).is_le(),
            InvertedResourcesSnafu {
                preset: name,
                resource: "memory"
            }
        );

        Ok(())
    }
}

/// Lower and upper bound of the replica count.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReplicasPreset {
    pub min: i32,
    pub max: i32,
}

impl ReplicasPreset {
    fn validate(self, name: &str) -> Result<()> {
        ensure!(
            self.min >= 0,
            NegativeReplicasSnafu {
                preset: name,
                min: self.min
            }
        );
        ensure!(
            self.min <= self.max,
            InvertedReplicasSnafu {
                preset: name,
                min: self.min,
                max: self.max
            }
        );

        Ok(())
    }
}

pub fn parse_resource_presets(input: &str) -> Result<ResourcePresets> {
    let presets: ResourcePresets =
        serde_json::from_str(input).context(ParseResourcePresetsSnafu)?;

    for (name, preset) in &presets {
        preset.validate(name)?;
    }

    Ok(presets)
}

pub fn parse_replicas_presets(input: &str) -> Result<ReplicasPresets> {
    let presets: ReplicasPresets =
        serde_json::from_str(input).context(ParseReplicasPresetsSnafu)?;

    for (name, preset) in &presets {
        preset.validate(name)?;
    }

    Ok(presets)
}

pub fn parse_runtime_presets(input: &str) -> Result<RuntimePresets> {
    serde_json::from_str(input).context(ParseRuntimePresetsSnafu)
}
