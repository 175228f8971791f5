/// Built-in function resource presets, used when `FUNCTION_RESOURCES_PRESETS` is not set.
pub const DEFAULT_FUNCTION_RESOURCES_PRESETS: &str = r#"{
    "XS": {"requestCpu": "10m", "requestMemory": "16Mi", "limitCpu": "25m", "limitMemory": "32Mi"},
    "S": {"requestCpu": "25m", "requestMemory": "32Mi", "limitCpu": "50m", "limitMemory": "64Mi"},
    "M": {"requestCpu": "50m", "requestMemory": "64Mi", "limitCpu": "100m", "limitMemory": "128Mi"},
    "L": {"requestCpu": "100m", "requestMemory": "128Mi", "limitCpu": "200m", "limitMemory": "256Mi"},
    "XL": {"requestCpu": "200m", "requestMemory": "256Mi", "limitCpu": "400m", "limitMemory": "512Mi"}
}"#;

/// Built-in build job resource presets, used when `BUILD_RESOURCES_PRESETS` is not set.
pub const DEFAULT_BUILD_RESOURCES_PRESETS: &str = r#"{
    "slow": {"requestCpu": "350m", "requestMemory": "350Mi", "limitCpu": "700m", "limitMemory": "700Mi"},
    "normal": {"requestCpu": "700m", "requestMemory": "700Mi", "limitCpu": "1100m", "limitMemory": "1100Mi"},
    "fast": {"requestCpu": "1100m", "requestMemory": "1100Mi", "limitCpu": "1800m", "limitMemory": "1800Mi"}
}"#;

/// Built-in replicas presets, used when `FUNCTION_REPLICAS_PRESETS` is not set.
pub const DEFAULT_FUNCTION_REPLICAS_PRESETS: &str = r#"{"S": {"min": 1, "max": 1}}"#;

pub const DEFAULT_FUNCTION_RESOURCES_PRESET: &str = "M";
pub const DEFAULT_BUILD_RESOURCES_PRESET: &str = "normal";
pub const DEFAULT_FUNCTION_REPLICAS_PRESET: &str = "S";

/// Textual preset tables and default preset names, as read from the command line or the
/// environment.
///
/// Turn these into a [`DefaultingConfig`][super::DefaultingConfig] using
/// [`DefaultingConfig::from_options`][super::DefaultingConfig::from_options].
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
#[command(next_help_heading = "Defaulting Options")]
pub struct DefaultingOptions {
    /// JSON object mapping function resource preset names to their requests and limits.
    #[arg(long, env, default_value = DEFAULT_FUNCTION_RESOURCES_PRESETS, hide_default_value = true)]
    pub function_resources_presets: String,

    /// The function resource preset used when neither a label nor a runtime preset applies.
    #[arg(long, env, default_value = DEFAULT_FUNCTION_RESOURCES_PRESET)]
    pub function_resources_default_preset: String,

    /// JSON object mapping runtime names to function resource preset names.
    #[arg(long, env, default_value = "{}")]
    pub function_runtime_presets: String,

    /// JSON object mapping replicas preset names to their `min` and `max` bounds.
    #[arg(long, env, default_value = DEFAULT_FUNCTION_REPLICAS_PRESETS, hide_default_value = true)]
    pub function_replicas_presets: String,

    /// The replicas preset used to default the scale configuration.
    #[arg(long, env, default_value = DEFAULT_FUNCTION_REPLICAS_PRESET)]
    pub function_replicas_default_preset: String,

    /// JSON object mapping build job resource preset names to their requests and limits.
    #[arg(long, env, default_value = DEFAULT_BUILD_RESOURCES_PRESETS, hide_default_value = true)]
    pub build_resources_presets: String,

    /// The build job resource preset used when no label applies.
    #[arg(long, env, default_value = DEFAULT_BUILD_RESOURCES_PRESET)]
    pub build_resources_default_preset: String,
}

impl Default for DefaultingOptions {
    fn default() -> Self {
        Self {
            function_resources_presets: DEFAULT_FUNCTION_RESOURCES_PRESETS.to_owned(),
            function_resources_default_preset: DEFAULT_FUNCTION_RESOURCES_PRESET.to_owned(),
            function_runtime_presets: "{}".to_owned(),
            function_replicas_presets: DEFAULT_FUNCTION_REPLICAS_PRESETS.to_owned(),
            function_replicas_default_preset: DEFAULT_FUNCTION_REPLICAS_PRESET.to_owned(),
            build_resources_presets: DEFAULT_BUILD_RESOURCES_PRESETS.to_owned(),
            build_resources_default_preset: DEFAULT_BUILD_RESOURCES_PRESET.to_owned(),
        }
    }
}
