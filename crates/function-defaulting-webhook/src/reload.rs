//! Loading and reloading of the defaulting configuration.
//!
//! The preset options can be overridden by a directory holding one file per option, named like its
//! command line flag (for example `function-resources-presets`). This is the layout of a mounted
//! ConfigMap volume. The directory is read on startup and again whenever the process receives a
//! SIGHUP, a successfully loaded configuration replaces the active snapshot.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use snafu::{ResultExt as _, Snafu};
use stackable_function_defaulting::config::{
    self, DefaultingConfig, DefaultingOptions, SharedDefaultingConfig,
};
use tokio::signal::unix::Signal;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read preset option from {path:?}"))]
    ReadOption { source: io::Error, path: PathBuf },

    #[snafu(display("failed to build defaulting configuration"))]
    BuildConfig { source: config::Error },
}

/// Returns `options` with every value replaced whose file exists in `dir`.
pub fn read_overrides(options: &DefaultingOptions, dir: &Path) -> Result<DefaultingOptions> {
    let mut options = options.clone();

    let fields = [
        (
            "function-resources-presets",
            &mut options.function_resources_presets,
        ),
        (
            "function-resources-default-preset",
            &mut options.function_resources_default_preset,
        ),
        (
            "function-runtime-presets",
            &mut options.function_runtime_presets,
        ),
        (
            "function-replicas-presets",
            &mut options.function_replicas_presets,
        ),
        (
            "function-replicas-default-preset",
            &mut options.function_replicas_default_preset,
        ),
        (
            "build-resources-presets",
            &mut options.build_resources_presets,
        ),
        (
            "build-resources-default-preset",
            &mut options.build_resources_default_preset,
        ),
    ];

    for (name, value) in fields {
        let path = dir.join(name);
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(option = name, path = %path.display(), "overriding preset option");
                *value = content.trim().to_owned();
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(source).context(ReadOptionSnafu { path }),
        }
    }

    Ok(options)
}

/// Builds the configuration from `options`, applying the overrides of `dir` if given.
pub fn load(options: &DefaultingOptions, dir: Option<&Path>) -> Result<DefaultingConfig> {
    let options = match dir {
        Some(dir) => read_overrides(options, dir)?,
        None => options.clone(),
    };

    DefaultingConfig::from_options(&options).context(BuildConfigSnafu)
}

/// Publishes a freshly loaded configuration. The active snapshot is kept if loading fails.
pub fn reload(
    shared: &SharedDefaultingConfig,
    options: &DefaultingOptions,
    dir: Option<&Path>,
) -> Result<()> {
    shared.store(load(options, dir)?);
    Ok(())
}

/// Reloads the configuration every time `sighup` fires, until the signal stream ends.
pub async fn reload_on_hangup(
    mut sighup: Signal,
    shared: Arc<SharedDefaultingConfig>,
    options: DefaultingOptions,
    dir: Option<PathBuf>,
) {
    while sighup.recv().await.is_some() {
        tracing::info!("received SIGHUP, reloading defaulting configuration");

        if let Err(error) = reload(&shared, &options, dir.as_deref()) {
            let error = snafu::Report::from_error(error);
            tracing::error!(%error, "failed to reload defaulting configuration, keeping the active one");
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn read_overrides_replaces_present_options() {
        let dir = tempdir().expect("create temporary directory");
        fs::write(dir.path().join("function-resources-default-preset"), "L\n")
            .expect("write option file");
        fs::write(
            dir.path().join("function-runtime-presets"),
            r#"{"python312": "XL"}"#,
        )
        .expect("write option file");

        let options =
            read_overrides(&DefaultingOptions::default(), dir.path()).expect("readable overrides");

        assert_eq!(options.function_resources_default_preset, "L");
        assert_eq!(options.function_runtime_presets, r#"{"python312": "XL"}"#);
        assert_eq!(
            options.build_resources_default_preset,
            DefaultingOptions::default().build_resources_default_preset
        );
    }

    #[test]
    fn load_without_overrides() {
        let config = load(&DefaultingOptions::default(), None).expect("valid default options");
        assert_eq!(config, DefaultingConfig::builtin().expect("valid built-in config"));
    }

    #[test]
    fn load_from_missing_directory_uses_options() {
        let dir = tempdir().expect("create temporary directory");
        let config = load(
            &DefaultingOptions::default(),
            Some(&dir.path().join("does-not-exist")),
        )
        .expect("missing overrides are not an error");

        assert_eq!(config.function.resources.default_name, "M");
    }

    #[test]
    fn reload_publishes_new_snapshot() {
        let shared =
            SharedDefaultingConfig::new(DefaultingConfig::builtin().expect("valid built-in config"));
        let dir = tempdir().expect("create temporary directory");
        fs::write(dir.path().join("build-resources-default-preset"), "fast")
            .expect("write option file");

        reload(&shared, &DefaultingOptions::default(), Some(dir.path())).expect("valid overrides");

        assert_eq!(shared.load().build_job.resources.default_name, "fast");
    }

    #[rstest]
    #[case::unknown_default("function-resources-default-preset", "XXL")]
    #[case::not_json("function-resources-presets", "S: 25m")]
    #[case::inverted_preset(
        "build-resources-presets",
        r#"{"normal": {"requestCpu": "2", "requestMemory": "1Gi", "limitCpu": "1", "limitMemory": "1Gi"}}"#
    )]
    fn reload_keeps_active_snapshot_on_error(#[case] name: &str, #[case] content: &str) {
        let shared =
            SharedDefaultingConfig::new(DefaultingConfig::builtin().expect("valid built-in config"));
        let before = shared.load();
        let dir = tempdir().expect("create temporary directory");
        fs::write(dir.path().join(name), content).expect("write option file");

        reload(&shared, &DefaultingOptions::default(), Some(dir.path()))
            .expect_err("invalid overrides");

        assert_eq!(shared.load(), before);
    }
}
