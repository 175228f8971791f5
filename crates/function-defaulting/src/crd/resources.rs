use std::collections::BTreeMap;

use k8s_openapi::{
    api::core::v1::ResourceRequirements as K8sResourceRequirements,
    apimachinery::pkg::api::resource::Quantity as K8sQuantity,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use snafu::{ResultExt as _, Snafu};

use crate::quantity::{CpuQuantity, MemoryQuantity, ParseQuantityError};

const CPU: &str = "cpu";
const MEMORY: &str = "memory";

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum ParseResourceRequirementsError {
    #[snafu(display("failed to parse {resource} {kind} quantity {value:?}"))]
    ParseQuantity {
        source: ParseQuantityError,
        resource: &'static str,
        kind: &'static str,
        value: String,
    },
}

/// A CPU and a memory amount, each of which is independently either present or absent.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct ResourceList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuQuantity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryQuantity>,
}

impl ResourceList {
    pub fn new(cpu: CpuQuantity, memory: MemoryQuantity) -> Self {
        Self {
            cpu: Some(cpu),
            memory: Some(memory),
        }
    }

    fn into_k8s(self) -> Option<BTreeMap<String, K8sQuantity>> {
        let mut list = BTreeMap::new();

        if let Some(cpu) = self.cpu {
            list.insert(CPU.to_owned(), cpu.into());
        }

        if let Some(memory) = self.memory {
            list.insert(MEMORY.to_owned(), memory.into());
        }

        if list.is_empty() { None } else { Some(list) }
    }

    fn try_from_k8s(
        list: &BTreeMap<String, K8sQuantity>,
        kind: &'static str,
    ) -> Result<Self, ParseResourceRequirementsError> {
        let cpu = list
            .get(CPU)
            .map(|quantity| {
                CpuQuantity::try_from(quantity).with_context(|_| ParseQuantitySnafu {
                    resource: CPU,
                    kind,
                    value: quantity.0.clone(),
                })
            })
            .transpose()?;

        let memory = list
            .get(MEMORY)
            .map(|quantity| {
                MemoryQuantity::try_from(quantity).with_context(|_| ParseQuantitySnafu {
                    resource: MEMORY,
                    kind,
                    value: quantity.0.clone(),
                })
            })
            .transpose()?;

        Ok(Self { cpu, memory })
    }
}

/// Requests and limits of a single workload.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceList>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceList>,
}

impl ResourceRequirements {
    /// Returns `true` if neither requests nor limits are set.
    pub fn is_unset(&self) -> bool {
        self.requests.is_none() && self.limits.is_none()
    }
}

impl From<ResourceRequirements> for K8sResourceRequirements {
    fn from(value: ResourceRequirements) -> Self {
        Self {
            limits: value.limits.and_then(ResourceList::into_k8s),
            requests: value.requests.and_then(ResourceList::into_k8s),
            ..Self::default()
        }
    }
}

impl TryFrom<&K8sResourceRequirements> for ResourceRequirements {
    type Error = ParseResourceRequirementsError;

    fn try_from(value: &K8sResourceRequirements) -> Result<Self, Self::Error> {
        Ok(Self {
            requests: value
                .requests
                .as_ref()
                .map(|list| ResourceList::try_from_k8s(list, "request"))
                .transpose()?,
            limits: value
                .limits
                .as_ref()
                .map(|list| ResourceList::try_from_k8s(list, "limit"))
                .transpose()?,
        })
    }
}
