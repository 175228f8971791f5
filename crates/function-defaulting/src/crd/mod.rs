//! The `Function` custom resource.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod resources;

pub use resources::*;

/// A deployable unit of code, which is built into an image and run with the given resources and
/// scaling configuration.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    group = "serverless.stackable.tech",
    version = "v1alpha2",
    kind = "Function",
    plural = "functions",
    derive = "PartialEq",
    crates(
        kube_core = "kube::core",
        k8s_openapi = "k8s_openapi",
        schemars = "schemars"
    ),
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSpec {
    /// The runtime the function is executed with, for example `nodejs20` or `python312`.
    ///
    /// Runtime specific resource presets can be configured, see `FUNCTION_RUNTIME_PRESETS`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub runtime: String,

    /// The source code of the function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Legacy fixed number of replicas.
    ///
    /// If this is set, `scaleConfig` is left as it is and not defaulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Resources of the function itself and of the job building it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_configuration: Option<ResourceConfiguration>,

    /// Bounds for the number of replicas of the function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_config: Option<ScaleConfig>,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfiguration {
    /// Resources of the running function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ResourceRequirements>,

    /// Resources of the job building the function image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<ResourceRequirements>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_replicas: Option<i32>,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use kube::ResourceExt as _;

    use super::*;
    use crate::constants::FUNCTION_RESOURCES_PRESET_LABEL;

    #[test]
    fn deserialize_function() {
        let function: Function = serde_yaml::from_str(indoc! {"
            apiVersion: serverless.stackable.tech/v1alpha2
            kind: Function
            metadata:
              name: greeter
              labels:
                serverless.stackable.tech/function-resources-preset: S
            spec:
              runtime: nodejs20
              replicas: 2
              resourceConfiguration:
                function:
                  requests:
                    cpu: 15m
                    memory: 15Mi
              scaleConfig:
                maxReplicas: 3
        "})
        .expect("valid Function");

        assert_eq!(
            function.labels().get(FUNCTION_RESOURCES_PRESET_LABEL),
            Some(&"S".to_owned())
        );
        assert_eq!(function.spec.runtime, "nodejs20");
        assert_eq!(function.spec.replicas, Some(2));
        assert_eq!(
            function.spec.scale_config,
            Some(ScaleConfig {
                min_replicas: None,
                max_replicas: Some(3),
            })
        );

        let function_resources = function
            .spec
            .resource_configuration
            .and_then(|c| c.function)
            .expect("function resources are set");
        assert_eq!(function_resources.limits, None);
        assert_eq!(
            function_resources
                .requests
                .and_then(|r| r.memory)
                .map(|m| m.to_string()),
            Some("15Mi".to_owned())
        );
    }

    #[test]
    fn deserialize_unparsable_quantity_fails() {
        let result = serde_yaml::from_str::<FunctionSpec>(indoc! {"
            resourceConfiguration:
              build:
                limits:
                  cpu: a-lot
        "});

        assert!(result.is_err());
    }

    #[test]
    fn serialize_skips_unset_fields() {
        let value = serde_json::to_value(FunctionSpec::default()).expect("serializable");
        assert_eq!(value, serde_json::json!({}));
    }
}
