#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure mixer system that combines two subgroup accuracies.
//!
//! The mixer derives the weighted overall accuracy and a discrete split of
//! [`TOTAL_POPULATION`] simulated individuals. Every invocation is independent
//! and recomputes everything from the provided input triple.

use accuracy_mixer_core::{
    round_half_even, MixInputs, MixResult, MixerError, PopulationSplit, Subgroup,
    TOTAL_POPULATION,
};
use log::debug;

/// Validates the raw input triple and mixes it.
///
/// Fails with [`MixerError::InvalidInput`] when an accuracy lies outside
/// `[0, 100]`, the weight lies outside `[0, 1]`, or any value is not finite.
pub fn compute(
    predominant_accuracy: f64,
    minority_accuracy: f64,
    predominant_weight: f64,
) -> Result<MixResult, MixerError> {
    let inputs = MixInputs::new(predominant_accuracy, minority_accuracy, predominant_weight)?;
    Ok(AccuracyMixer::new().mix(inputs))
}

/// Stateless system deriving weighted accuracies and population splits.
#[derive(Clone, Copy, Debug)]
pub struct AccuracyMixer {
    total_population: u32,
}

impl Default for AccuracyMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccuracyMixer {
    /// Creates a mixer splitting the canonical population of fifty individuals.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            total_population: TOTAL_POPULATION,
        }
    }

    /// Number of individuals split between the two subgroups.
    #[must_use]
    pub const fn total_population(&self) -> u32 {
        self.total_population
    }

    /// Derives the weighted average and the population split for `inputs`.
    #[must_use]
    pub fn mix(&self, inputs: MixInputs) -> MixResult {
        let minority_weight = inputs.minority_weight();
        let weighted_average = weighted_average(inputs);
        let split = self.split(inputs);

        debug!(
            "mixed {:.1}% x {:.2} + {:.1}% x {:.2} = {:.3}%",
            inputs.predominant_accuracy(),
            inputs.predominant_weight(),
            inputs.minority_accuracy(),
            minority_weight,
            weighted_average,
        );
        for subgroup in Subgroup::ALL {
            debug!(
                "{}: {}/{} correct, {} incorrect, realized {}",
                subgroup.label(),
                split.correct(subgroup),
                split.count(subgroup),
                split.incorrect(subgroup),
                describe_realized(split.realized_accuracy(subgroup)),
            );
        }

        MixResult {
            inputs,
            weighted_average,
            minority_weight,
            split,
        }
    }

    /// Splits the population between both subgroups and rounds the correct counts.
    ///
    /// Only the predominant count is rounded; the minority count is its
    /// complement so the two always sum to the total population.
    #[must_use]
    pub fn split(&self, inputs: MixInputs) -> PopulationSplit {
        let total = self.total_population();
        let predominant_count =
            round_half_even(f64::from(total) * inputs.predominant_weight()).min(total);
        let minority_count = total - predominant_count;

        let correct_predominant = correct_count(predominant_count, inputs.predominant_accuracy());
        let correct_minority = correct_count(minority_count, inputs.minority_accuracy());

        PopulationSplit::new(
            predominant_count,
            minority_count,
            correct_predominant,
            correct_minority,
        )
    }
}

fn describe_realized(realized: Option<f64>) -> String {
    realized.map_or_else(|| "n/a".to_owned(), |accuracy| format!("{accuracy:.1}%"))
}

/// Convex combination of both accuracies using the weight and its complement.
#[must_use]
pub fn weighted_average(inputs: MixInputs) -> f64 {
    inputs.predominant_accuracy() * inputs.predominant_weight()
        + inputs.minority_accuracy() * inputs.minority_weight()
}

fn correct_count(group_size: u32, accuracy: f64) -> u32 {
    round_half_even(f64::from(group_size) * accuracy / 100.0).min(group_size)
}
