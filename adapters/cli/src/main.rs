#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that presents the accuracy mixer.

mod config;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use accuracy_mixer_core::{CorrectnessPolicy, MixInputs};
use accuracy_mixer_rendering::{Presentation, RenderingBackend};
use accuracy_mixer_rendering_macroquad::MacroquadBackend;
use accuracy_mixer_system_layout::{GridLayout, GROUP_GAP, POPULATION_ORIGIN};
use accuracy_mixer_system_mixer::AccuracyMixer;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use self::config::{correctness_policy, InputOverrides, MixerConfig};

/// Output produced by the binary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Interactive window with sliders and charts.
    #[default]
    Window,
    /// Prints the summary lines and exits.
    Summary,
    /// Prints the composed presentation as JSON and exits.
    Scene,
}

/// Visualises how subgroup accuracies combine into a weighted average.
#[derive(Debug, Parser)]
#[command(name = "accuracy-mixer", author, version, about)]
struct CliArgs {
    /// Accuracy of the predominant group in percent (0-100)
    #[arg(long, value_name = "PERCENT")]
    predominant_accuracy: Option<f64>,

    /// Accuracy of the minority group in percent (0-100)
    #[arg(long, value_name = "PERCENT")]
    minority_accuracy: Option<f64>,

    /// Mixing weight of the predominant group (0-1)
    #[arg(long, value_name = "WEIGHT")]
    predominant_weight: Option<f64>,

    /// TOML file with optional [inputs] and [layout] tables
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed that scatters correct individuals instead of placing them first
    #[arg(long, value_name = "SEED")]
    shuffle_seed: Option<u64>,

    /// What to produce
    #[arg(long, value_enum, default_value_t = Mode::Window)]
    mode: Mode,

    /// Synchronise presentation with the display refresh rate
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,

    /// Render frames as fast as possible
    #[arg(long, overrides_with = "vsync")]
    no_vsync: bool,
}

impl CliArgs {
    fn overrides(&self) -> InputOverrides {
        InputOverrides {
            predominant_accuracy: self.predominant_accuracy,
            minority_accuracy: self.minority_accuracy,
            predominant_weight: self.predominant_weight,
        }
    }

    fn vsync(&self) -> Option<bool> {
        match (self.vsync, self.no_vsync) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Entry point for the accuracy mixer command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match &args.config {
        Some(path) => MixerConfig::load(path)?,
        None => MixerConfig::default(),
    };

    let inputs = args
        .overrides()
        .over(config.inputs)
        .apply(MixInputs::default())
        .context("invalid inputs from command line or config")?;
    let policy = correctness_policy(args.shuffle_seed.or(config.layout.shuffle_seed));

    let presentation = present(inputs, policy)?;

    match args.mode {
        Mode::Summary => {
            let mut stdout = io::stdout().lock();
            for line in &presentation.summary {
                writeln!(stdout, "{line}").context("failed to write summary")?;
            }
        }
        Mode::Scene => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &presentation)
                .context("failed to write presentation")?;
            writeln!(stdout).context("failed to write presentation")?;
        }
        Mode::Window => {
            let backend = match args.vsync() {
                Some(enabled) => MacroquadBackend::new().with_vsync(enabled),
                None => MacroquadBackend::new(),
            };
            log::info!("starting interactive window with {policy:?} correctness");
            backend
                .run(presentation, move |frame, presentation| {
                    if !frame.inputs_changed {
                        return;
                    }
                    match present(frame.inputs, policy) {
                        Ok(next) => *presentation = next,
                        Err(error) => log::warn!("keeping previous presentation: {error:#}"),
                    }
                })
                .context("rendering backend failed")?;
        }
    }

    Ok(())
}

/// Runs the full pipeline for one input triple.
fn present(inputs: MixInputs, policy: CorrectnessPolicy) -> Result<Presentation> {
    let result = AccuracyMixer::default().mix(inputs);
    let population = GridLayout::default()
        .layout_population(&result.split, POPULATION_ORIGIN, GROUP_GAP, policy)
        .context("failed to lay out population")?;
    Ok(Presentation::compose(&result, &population))
}
