//! Selection of the candidate default preset for a workload.
//!
//! Candidates come from an ordered chain of [`PresetProvider`]s, the first provider that matches
//! wins. Every chain ends with the global default of the [`DefaultingConfig`], so selection always
//! yields a candidate.

use std::collections::BTreeMap;

use crate::{
    config::{DefaultingConfig, PresetDefaults},
    constants::{
        BUILD_RESOURCES_PRESET_LABEL, FUNCTION_RESOURCES_PRESET_LABEL, REPLICAS_PRESET_LABEL,
    },
    presets::{ReplicasPreset, ResourcePreset, RuntimePresets},
};

/// What providers get to look at when selecting a preset.
#[derive(Clone, Copy, Debug)]
pub struct SelectionContext<'a> {
    pub labels: &'a BTreeMap<String, String>,
    pub runtime: &'a str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PresetSource {
    Label,
    RuntimeOverride,
    GlobalDefault,
}

/// The preset picked by a [`PresetChain`], before it is applied field by field.
#[derive(Debug, PartialEq, Eq)]
pub struct Candidate<'c, T> {
    pub name: &'c str,
    pub preset: &'c T,
    pub source: PresetSource,
}

pub trait PresetProvider<'c, T> {
    /// Returns a candidate, or [`None`] if this provider does not apply.
    fn provide(&self, context: &SelectionContext<'_>) -> Option<Candidate<'c, T>>;
}

/// Matches if the object carries `label` and its value names a preset of the table.
pub struct LabelProvider<'c, T> {
    label: &'static str,
    presets: &'c BTreeMap<String, T>,
}

impl<'c, T> PresetProvider<'c, T> for LabelProvider<'c, T> {
    fn provide(&self, context: &SelectionContext<'_>) -> Option<Candidate<'c, T>> {
        let value = context.labels.get(self.label)?;

        match self.presets.get_key_value(value) {
            Some((name, preset)) => Some(Candidate {
                name,
                preset,
                source: PresetSource::Label,
            }),
            None => {
                tracing::debug!(
                    label = self.label,
                    preset = %value,
                    "label refers to an unknown preset, ignoring it"
                );
                None
            }
        }
    }
}

/// Matches if a runtime preset is configured for the runtime of the object.
pub struct RuntimeProvider<'c, T> {
    runtime_presets: &'c RuntimePresets,
    presets: &'c BTreeMap<String, T>,
}

impl<'c, T> PresetProvider<'c, T> for RuntimeProvider<'c, T> {
    fn provide(&self, context: &SelectionContext<'_>) -> Option<Candidate<'c, T>> {
        let preset_name = self.runtime_presets.get(context.runtime)?;
        let (name, preset) = self.presets.get_key_value(preset_name)?;

        Some(Candidate {
            name,
            preset,
            source: PresetSource::RuntimeOverride,
        })
    }
}

/// Providers evaluated top-down, falling back to a global default.
pub struct PresetChain<'c, T> {
    providers: Vec<Box<dyn PresetProvider<'c, T> + 'c>>,
    defaults: &'c PresetDefaults<T>,
}

impl<'c, T> PresetChain<'c, T> {
    pub fn new(defaults: &'c PresetDefaults<T>) -> Self {
        Self {
            providers: Vec::new(),
            defaults,
        }
    }

    /// Appends a provider, which is consulted after all previously added ones.
    pub fn with_provider(mut self, provider: impl PresetProvider<'c, T> + 'c) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn with_label(self, label: &'static str, presets: &'c BTreeMap<String, T>) -> Self
    where
        T: 'c,
    {
        self.with_provider(LabelProvider { label, presets })
    }

    pub fn with_runtime_presets(
        self,
        runtime_presets: &'c RuntimePresets,
        presets: &'c BTreeMap<String, T>,
    ) -> Self
    where
        T: 'c,
    {
        self.with_provider(RuntimeProvider {
            runtime_presets,
            presets,
        })
    }

    pub fn select(&self, context: &SelectionContext<'_>) -> Candidate<'c, T> {
        let defaults = self.defaults;

        self.providers
            .iter()
            .find_map(|provider| provider.provide(context))
            .unwrap_or_else(|| Candidate {
                name: &defaults.default_name,
                preset: &defaults.default_preset,
                source: PresetSource::GlobalDefault,
            })
    }
}

/// Label, then runtime override, then global default.
pub fn function_resources<'c>(
    config: &'c DefaultingConfig,
    context: &SelectionContext<'_>,
) -> Candidate<'c, ResourcePreset> {
    let resources = &config.function.resources;

    let candidate = PresetChain::new(resources)
        .with_label(FUNCTION_RESOURCES_PRESET_LABEL, &resources.presets)
        .with_runtime_presets(&config.function.runtime_presets, &resources.presets)
        .select(context);

    tracing::debug!(
        workload = "function",
        runtime = context.runtime,
        preset = candidate.name,
        source = %candidate.source,
        "selected resource preset"
    );

    candidate
}

/// Label, then global default. Build jobs have no runtime specific presets.
pub fn build_resources<'c>(
    config: &'c DefaultingConfig,
    context: &SelectionContext<'_>,
) -> Candidate<'c, ResourcePreset> {
    let resources = &config.build_job.resources;

    let candidate = PresetChain::new(resources)
        .with_label(BUILD_RESOURCES_PRESET_LABEL, &resources.presets)
        .select(context);

    tracing::debug!(
        workload = "build",
        preset = candidate.name,
        source = %candidate.source,
        "selected resource preset"
    );

    candidate
}

/// Always the global default.
pub fn replicas<'c>(
    config: &'c DefaultingConfig,
    context: &SelectionContext<'_>,
) -> Candidate<'c, ReplicasPreset> {
    if let Some(preset) = context.labels.get(REPLICAS_PRESET_LABEL) {
        tracing::debug!(
            label = REPLICAS_PRESET_LABEL,
            %preset,
            "ignoring obsolete replicas preset label"
        );
    }

    PresetChain::new(&config.function.replicas).select(context)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::DefaultingOptions;

    fn config() -> DefaultingConfig {
        DefaultingConfig::from_options(&DefaultingOptions {
            function_runtime_presets: r#"{"python312": "L"}"#.to_owned(),
            ..Default::default()
        })
        .expect("valid options")
    }

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[rstest]
    #[case::global_default(&[], "nodejs20", "M", PresetSource::GlobalDefault)]
    #[case::empty_runtime(&[], "", "M", PresetSource::GlobalDefault)]
    #[case::runtime_override(&[], "python312", "L", PresetSource::RuntimeOverride)]
    #[case::label(&[(FUNCTION_RESOURCES_PRESET_LABEL, "S")], "nodejs20", "S", PresetSource::Label)]
    #[case::label_beats_runtime(
        &[(FUNCTION_RESOURCES_PRESET_LABEL, "M")],
        "python312",
        "M",
        PresetSource::Label
    )]
    #[case::unknown_label_falls_through(
        &[(FUNCTION_RESOURCES_PRESET_LABEL, "XXL")],
        "python312",
        "L",
        PresetSource::RuntimeOverride
    )]
    #[case::build_label_is_not_a_function_label(
        &[(BUILD_RESOURCES_PRESET_LABEL, "S")],
        "nodejs20",
        "M",
        PresetSource::GlobalDefault
    )]
    fn select_function_resources(
        #[case] pairs: &[(&str, &str)],
        #[case] runtime: &str,
        #[case] expected_name: &str,
        #[case] expected_source: PresetSource,
    ) {
        let config = config();
        let labels = labels(pairs);
        let context = SelectionContext {
            labels: &labels,
            runtime,
        };

        let candidate = function_resources(&config, &context);
        assert_eq!(candidate.name, expected_name);
        assert_eq!(candidate.source, expected_source);
        assert_eq!(
            candidate.preset,
            &config.function.resources.presets[expected_name]
        );
    }

    #[rstest]
    #[case::global_default(&[], "normal", PresetSource::GlobalDefault)]
    #[case::label(&[(BUILD_RESOURCES_PRESET_LABEL, "fast")], "fast", PresetSource::Label)]
    #[case::unknown_label(&[(BUILD_RESOURCES_PRESET_LABEL, "L")], "normal", PresetSource::GlobalDefault)]
    fn select_build_resources(
        #[case] pairs: &[(&str, &str)],
        #[case] expected_name: &str,
        #[case] expected_source: PresetSource,
    ) {
        let config = config();
        let labels = labels(pairs);
        // Runtime presets never apply to build jobs
        let context = SelectionContext {
            labels: &labels,
            runtime: "python312",
        };

        let candidate = build_resources(&config, &context);
        assert_eq!(candidate.name, expected_name);
        assert_eq!(candidate.source, expected_source);
    }

    #[test]
    fn obsolete_replicas_label_is_ignored() {
        let config = config();
        let labels = labels(&[(REPLICAS_PRESET_LABEL, "XL")]);
        let context = SelectionContext {
            labels: &labels,
            runtime: "",
        };

        let candidate = replicas(&config, &context);
        assert_eq!(candidate.name, "S");
        assert_eq!(candidate.source, PresetSource::GlobalDefault);
    }
}
