use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer as _, Registry, filter::Directive, layer::SubscriberExt as _,
    util::{SubscriberInitExt as _, TryInitError},
};

/// Environment variable holding the log filter directives, for example `debug` or
/// `stackable_function_defaulting=trace,info`.
pub const LOG_ENV_VAR: &str = "FUNCTION_DEFAULTING_LOG";

/// Format of the console log output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Plain unstructured output.
    ///
    /// ANSI colors can be disabled by setting `NO_COLOR` to a non-empty value.
    #[default]
    Plain,

    /// One JSON object per event.
    Json,
}

/// Installs the global console subscriber.
///
/// Events are filtered according to [`LOG_ENV_VAR`], falling back to `INFO`.
pub fn init(format: LogFormat) -> Result<(), TryInitError> {
    let env_filter = env_filter_builder(LOG_ENV_VAR, LevelFilter::INFO);

    let layer = match format {
        LogFormat::Plain => tracing_subscriber::fmt::layer()
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_filter(env_filter)
            .boxed(),
    };

    Registry::default().with(layer).try_init()
}

fn env_filter_builder(env_var: &str, default_directive: impl Into<Directive>) -> EnvFilter {
    EnvFilter::builder()
        .with_env_var(env_var)
        .with_default_directive(default_directive.into())
        .from_env_lossy()
}
