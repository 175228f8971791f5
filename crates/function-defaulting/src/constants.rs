/// Selects a function resource preset by name, for example `S` or `L`.
pub const FUNCTION_RESOURCES_PRESET_LABEL: &str =
    "serverless.stackable.tech/function-resources-preset";

/// Selects a build job resource preset by name, for example `slow` or `fast`.
pub const BUILD_RESOURCES_PRESET_LABEL: &str = "serverless.stackable.tech/build-resources-preset";

/// Obsolete. Replica presets used to be selected by this label, it is ignored nowadays.
pub const REPLICAS_PRESET_LABEL: &str = "serverless.stackable.tech/replicas-preset";
