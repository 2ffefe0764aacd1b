//! Optional TOML configuration consumed at start-up.

use std::{fs, path::Path};

use accuracy_mixer_core::{CorrectnessPolicy, MixInputs, MixerError, UncheckedMixInputs};
use anyhow::{Context, Result};
use serde::Deserialize;

/// Contents of a `--config` file. Every table and key is optional.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct MixerConfig {
    #[serde(default)]
    pub(crate) inputs: InputOverrides,
    #[serde(default)]
    pub(crate) layout: LayoutConfig,
}

/// Partial input triple; missing keys keep the value they override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct InputOverrides {
    pub(crate) predominant_accuracy: Option<f64>,
    pub(crate) minority_accuracy: Option<f64>,
    pub(crate) predominant_weight: Option<f64>,
}

impl InputOverrides {
    /// Layers `self` over `lower`; keys present in `self` win.
    pub(crate) fn over(self, lower: Self) -> Self {
        Self {
            predominant_accuracy: self.predominant_accuracy.or(lower.predominant_accuracy),
            minority_accuracy: self.minority_accuracy.or(lower.minority_accuracy),
            predominant_weight: self.predominant_weight.or(lower.predominant_weight),
        }
    }

    /// Applies the overrides on top of `base` and validates the outcome.
    pub(crate) fn apply(self, base: MixInputs) -> Result<MixInputs, MixerError> {
        let mut unchecked = UncheckedMixInputs::from(base);
        if let Some(value) = self.predominant_accuracy {
            unchecked.predominant_accuracy = value;
        }
        if let Some(value) = self.minority_accuracy {
            unchecked.minority_accuracy = value;
        }
        if let Some(value) = self.predominant_weight {
            unchecked.predominant_weight = value;
        }
        unchecked.validate()
    }
}

/// `[layout]` table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LayoutConfig {
    pub(crate) shuffle_seed: Option<u64>,
}

impl MixerConfig {
    /// Reads and parses the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to parse config {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Picks the correctness policy for an optional shuffle seed.
pub(crate) fn correctness_policy(shuffle_seed: Option<u64>) -> CorrectnessPolicy {
    shuffle_seed.map_or(CorrectnessPolicy::Positional, |seed| {
        CorrectnessPolicy::Shuffled { seed }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use accuracy_mixer_core::Parameter;

    #[test]
    fn empty_file_uses_defaults() {
        let config = MixerConfig::parse("").expect("empty config parses");
        assert_eq!(config, MixerConfig::default());
        assert_eq!(
            config.inputs.apply(MixInputs::default()),
            Ok(MixInputs::default())
        );
    }

    #[test]
    fn partial_tables_override_only_present_keys() {
        let config = MixerConfig::parse(
            "[inputs]\npredominant_weight = 0.5\n\n[layout]\nshuffle_seed = 42\n",
        )
        .expect("config parses");

        let inputs = config
            .inputs
            .apply(MixInputs::default())
            .expect("overrides are valid");
        assert_eq!(inputs.predominant_accuracy(), 85.0);
        assert_eq!(inputs.minority_accuracy(), 70.0);
        assert_eq!(inputs.predominant_weight(), 0.5);
        assert_eq!(
            correctness_policy(config.layout.shuffle_seed),
            CorrectnessPolicy::Shuffled { seed: 42 }
        );
    }

    #[test]
    fn out_of_range_values_are_reported() {
        let config =
            MixerConfig::parse("[inputs]\nminority_accuracy = 120.0\n").expect("config parses");
        let error = config
            .inputs
            .apply(MixInputs::default())
            .expect_err("accuracy above 100 is rejected");
        assert_eq!(error.parameter(), Parameter::MinorityAccuracy);
    }

    #[test]
    fn flags_replace_out_of_range_config_values_before_validation() {
        let config = MixerConfig::parse(
            "[inputs]\nminority_accuracy = 120.0\npredominant_weight = 0.5\n",
        )
        .expect("config parses");
        let flags = InputOverrides {
            minority_accuracy: Some(50.0),
            ..InputOverrides::default()
        };

        let inputs = flags
            .over(config.inputs)
            .apply(MixInputs::default())
            .expect("flag replaces the invalid config value");
        assert_eq!(inputs.minority_accuracy(), 50.0);
        assert_eq!(inputs.predominant_weight(), 0.5);
        assert_eq!(inputs.predominant_accuracy(), 85.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(MixerConfig::parse("[inputs]\nweight = 0.5\n").is_err());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let path = std::env::temp_dir().join("accuracy_mixer_missing_config.toml");
        let _ = fs::remove_file(&path);
        let error = MixerConfig::load(&path).expect_err("missing file fails");
        assert!(format!("{error}").contains("accuracy_mixer_missing_config.toml"));
    }

    #[test]
    fn no_seed_keeps_positional_policy() {
        assert_eq!(correctness_policy(None), CorrectnessPolicy::Positional);
    }
}
