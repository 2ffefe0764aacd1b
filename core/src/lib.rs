#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the accuracy mixer.
//!
//! This crate defines the validated input triple, the derived results and the
//! placement records that connect the pure systems with the adapters. The
//! mixer system turns [`MixInputs`] into a [`MixResult`], the layout system
//! turns the contained [`PopulationSplit`] into a [`PopulationLayout`], and
//! rendering adapters consume both without ever mutating them. Nothing in
//! here carries state between invocations.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of simulated individuals split between the two subgroups.
pub const TOTAL_POPULATION: u32 = 50;

/// Number of individuals drawn on a single row of the population grid.
pub const ROW_WIDTH: u32 = 10;

/// Lowest accepted accuracy, in percent.
pub const MIN_ACCURACY: f64 = 0.0;

/// Highest accepted accuracy, in percent.
pub const MAX_ACCURACY: f64 = 100.0;

/// Lowest accepted mixing weight.
pub const MIN_WEIGHT: f64 = 0.0;

/// Highest accepted mixing weight.
pub const MAX_WEIGHT: f64 = 1.0;

/// Resolution of the accuracy input controls.
pub const ACCURACY_STEP: f64 = 0.1;

/// Resolution of the weight input control.
pub const WEIGHT_STEP: f64 = 0.01;

/// Initial accuracy of the predominant group.
pub const DEFAULT_PREDOMINANT_ACCURACY: f64 = 85.0;

/// Initial accuracy of the minority group.
pub const DEFAULT_MINORITY_ACCURACY: f64 = 70.0;

/// Initial mixing weight of the predominant group.
pub const DEFAULT_PREDOMINANT_WEIGHT: f64 = 0.7;

/// Names every parameter that can be rejected as invalid input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Accuracy of the predominant group in percent.
    PredominantAccuracy,
    /// Accuracy of the minority group in percent.
    MinorityAccuracy,
    /// Mixing weight assigned to the predominant group.
    PredominantWeight,
    /// Number of correct individuals requested for a layout group.
    CorrectCount,
    /// Number of individuals drawn per grid row.
    RowWidth,
    /// Width of a grid cell in chart units.
    CellWidth,
    /// Height of a grid cell in chart units.
    CellHeight,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PredominantAccuracy => "predominant_accuracy",
            Self::MinorityAccuracy => "minority_accuracy",
            Self::PredominantWeight => "predominant_weight",
            Self::CorrectCount => "correct_count",
            Self::RowWidth => "row_width",
            Self::CellWidth => "cell_width",
            Self::CellHeight => "cell_height",
        };
        f.write_str(name)
    }
}

/// Errors reported by the accuracy mixer and its layout system.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum MixerError {
    /// A parameter fell outside its documented domain or was not finite.
    #[error("{parameter} must lie within [{min}, {max}] (received {value})")]
    InvalidInput {
        /// Parameter that failed validation.
        parameter: Parameter,
        /// Value supplied by the caller.
        value: f64,
        /// Lowest accepted value.
        min: f64,
        /// Highest accepted value.
        max: f64,
    },
}

impl MixerError {
    /// Parameter responsible for the error.
    #[must_use]
    pub const fn parameter(&self) -> Parameter {
        match self {
            Self::InvalidInput { parameter, .. } => *parameter,
        }
    }
}

/// Rejects values that are not finite or lie outside `[min, max]`.
pub fn ensure_within(
    parameter: Parameter,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, MixerError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(MixerError::InvalidInput {
            parameter,
            value,
            min,
            max,
        })
    }
}

/// Rejects values that are not finite or not strictly positive.
pub fn ensure_positive(parameter: Parameter, value: f64) -> Result<f64, MixerError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MixerError::InvalidInput {
            parameter,
            value,
            min: 0.0,
            max: f64::INFINITY,
        })
    }
}

/// Rounds to the nearest integer, resolving exact ties towards the even neighbour.
///
/// Every count derived by the mixer goes through this single rule so that the
/// split is reproducible. `10.5` becomes `10` while `11.5` becomes `12`.
/// Negative and non-finite inputs saturate to zero.
#[must_use]
pub fn round_half_even(value: f64) -> u32 {
    let rounded = value.round_ties_even();
    if rounded.is_finite() && rounded > 0.0 {
        rounded as u32
    } else {
        0
    }
}

/// Snaps `value` to the closest multiple of `step` and clamps it into `[min, max]`.
#[must_use]
pub fn snap_to_step(value: f64, step: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || step <= 0.0 {
        return value;
    }

    let steps_per_unit = (1.0 / step).round();
    let snapped = (value * steps_per_unit).round() / steps_per_unit;
    snapped.clamp(min, max)
}

/// Unvalidated input triple as received from configuration or callers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UncheckedMixInputs {
    /// Accuracy of the predominant group in percent.
    pub predominant_accuracy: f64,
    /// Accuracy of the minority group in percent.
    pub minority_accuracy: f64,
    /// Mixing weight assigned to the predominant group.
    pub predominant_weight: f64,
}

impl UncheckedMixInputs {
    /// Validates every field and returns the checked input triple.
    pub fn validate(self) -> Result<MixInputs, MixerError> {
        MixInputs::new(
            self.predominant_accuracy,
            self.minority_accuracy,
            self.predominant_weight,
        )
    }
}

impl From<MixInputs> for UncheckedMixInputs {
    fn from(inputs: MixInputs) -> Self {
        Self {
            predominant_accuracy: inputs.predominant_accuracy,
            minority_accuracy: inputs.minority_accuracy,
            predominant_weight: inputs.predominant_weight,
        }
    }
}

/// Validated input triple driving a single recomputation.
///
/// The minority weight is never stored: it is always the complement of the
/// predominant weight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedMixInputs", into = "UncheckedMixInputs")]
pub struct MixInputs {
    predominant_accuracy: f64,
    minority_accuracy: f64,
    predominant_weight: f64,
}

impl MixInputs {
    /// Creates a validated input triple.
    ///
    /// Accuracies must lie within `[0, 100]` and the weight within `[0, 1]`.
    /// Out-of-range or non-finite values are rejected rather than clamped.
    pub fn new(
        predominant_accuracy: f64,
        minority_accuracy: f64,
        predominant_weight: f64,
    ) -> Result<Self, MixerError> {
        Ok(Self {
            predominant_accuracy: ensure_within(
                Parameter::PredominantAccuracy,
                predominant_accuracy,
                MIN_ACCURACY,
                MAX_ACCURACY,
            )?,
            minority_accuracy: ensure_within(
                Parameter::MinorityAccuracy,
                minority_accuracy,
                MIN_ACCURACY,
                MAX_ACCURACY,
            )?,
            predominant_weight: ensure_within(
                Parameter::PredominantWeight,
                predominant_weight,
                MIN_WEIGHT,
                MAX_WEIGHT,
            )?,
        })
    }

    /// Accuracy of the predominant group in percent.
    #[must_use]
    pub const fn predominant_accuracy(&self) -> f64 {
        self.predominant_accuracy
    }

    /// Accuracy of the minority group in percent.
    #[must_use]
    pub const fn minority_accuracy(&self) -> f64 {
        self.minority_accuracy
    }

    /// Mixing weight assigned to the predominant group.
    #[must_use]
    pub const fn predominant_weight(&self) -> f64 {
        self.predominant_weight
    }

    /// Mixing weight assigned to the minority group.
    #[must_use]
    pub fn minority_weight(&self) -> f64 {
        1.0 - self.predominant_weight
    }

    /// Accuracy of the requested subgroup.
    #[must_use]
    pub const fn accuracy(&self, subgroup: Subgroup) -> f64 {
        match subgroup {
            Subgroup::Predominant => self.predominant_accuracy,
            Subgroup::Minority => self.minority_accuracy,
        }
    }

    /// Returns the inputs snapped to the resolution of the input controls.
    #[must_use]
    pub fn snapped(self) -> Self {
        Self {
            predominant_accuracy: snap_to_step(
                self.predominant_accuracy,
                ACCURACY_STEP,
                MIN_ACCURACY,
                MAX_ACCURACY,
            ),
            minority_accuracy: snap_to_step(
                self.minority_accuracy,
                ACCURACY_STEP,
                MIN_ACCURACY,
                MAX_ACCURACY,
            ),
            predominant_weight: snap_to_step(
                self.predominant_weight,
                WEIGHT_STEP,
                MIN_WEIGHT,
                MAX_WEIGHT,
            ),
        }
    }
}

impl Default for MixInputs {
    fn default() -> Self {
        Self {
            predominant_accuracy: DEFAULT_PREDOMINANT_ACCURACY,
            minority_accuracy: DEFAULT_MINORITY_ACCURACY,
            predominant_weight: DEFAULT_PREDOMINANT_WEIGHT,
        }
    }
}

impl TryFrom<UncheckedMixInputs> for MixInputs {
    type Error = MixerError;

    fn try_from(value: UncheckedMixInputs) -> Result<Self, Self::Error> {
        value.validate()
    }
}

/// Identifies one of the two mixed subgroups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subgroup {
    /// Subgroup carrying the primary mixing weight.
    Predominant,
    /// Complementary subgroup weighted by `1 - predominant_weight`.
    Minority,
}

impl Subgroup {
    /// Both subgroups in drawing order.
    pub const ALL: [Subgroup; 2] = [Subgroup::Predominant, Subgroup::Minority];

    /// Human-readable label shown next to gauges and in the summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Predominant => "Grup predominant",
            Self::Minority => "Grup minoritari",
        }
    }
}

/// Discrete split of the simulated population into the two subgroups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PopulationSplit {
    predominant_count: u32,
    minority_count: u32,
    correct_predominant: u32,
    correct_minority: u32,
}

impl PopulationSplit {
    /// Creates a split from already rounded counts.
    ///
    /// Correct counts are capped at their subgroup size.
    #[must_use]
    pub fn new(
        predominant_count: u32,
        minority_count: u32,
        correct_predominant: u32,
        correct_minority: u32,
    ) -> Self {
        Self {
            predominant_count,
            minority_count,
            correct_predominant: correct_predominant.min(predominant_count),
            correct_minority: correct_minority.min(minority_count),
        }
    }

    /// Total number of individuals across both subgroups.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.predominant_count + self.minority_count
    }

    /// Number of individuals in the requested subgroup.
    #[must_use]
    pub const fn count(&self, subgroup: Subgroup) -> u32 {
        match subgroup {
            Subgroup::Predominant => self.predominant_count,
            Subgroup::Minority => self.minority_count,
        }
    }

    /// Number of correctly classified individuals in the requested subgroup.
    #[must_use]
    pub const fn correct(&self, subgroup: Subgroup) -> u32 {
        match subgroup {
            Subgroup::Predominant => self.correct_predominant,
            Subgroup::Minority => self.correct_minority,
        }
    }

    /// Number of misclassified individuals in the requested subgroup.
    #[must_use]
    pub const fn incorrect(&self, subgroup: Subgroup) -> u32 {
        self.count(subgroup) - self.correct(subgroup)
    }

    /// Percentage of correct individuals actually drawn for the subgroup.
    ///
    /// Rounding may make this differ from the input accuracy. Returns `None`
    /// when the subgroup is empty.
    #[must_use]
    pub fn realized_accuracy(&self, subgroup: Subgroup) -> Option<f64> {
        let count = self.count(subgroup);
        if count == 0 {
            return None;
        }
        Some(f64::from(self.correct(subgroup)) * 100.0 / f64::from(count))
    }
}

/// Everything derived from a single input triple.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MixResult {
    /// Inputs the result was derived from.
    pub inputs: MixInputs,
    /// Weighted combination of both subgroup accuracies, in percent.
    pub weighted_average: f64,
    /// Complement of the predominant weight.
    pub minority_weight: f64,
    /// Discrete population split with correct counts.
    pub split: PopulationSplit,
}

/// Row and column of an individual within its subgroup grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    row: u32,
    column: u32,
}

impl GridCell {
    /// Creates a new grid cell.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index, growing downwards.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Position in chart world units, with `y` growing upwards.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl WorldPosition {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Strategy used to decide which individuals of a group are drawn as correct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CorrectnessPolicy {
    /// The first `correct_count` individuals in index order are correct.
    #[default]
    Positional,
    /// A seed-determined subset of exactly `correct_count` individuals is correct.
    Shuffled {
        /// Seed feeding the deterministic generator.
        seed: u64,
    },
}

/// Single simulated individual placed on the population grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedIndividual {
    /// Subgroup the individual belongs to.
    pub subgroup: Subgroup,
    /// Zero-based index within the subgroup.
    pub index: u32,
    /// Grid cell derived from the index.
    pub cell: GridCell,
    /// Lower-left corner of the individual's cell in world units.
    pub position: WorldPosition,
    /// Whether the individual counts as correctly classified.
    pub correct: bool,
}

/// Placement of both subgroups, predominant first.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PopulationLayout {
    /// Width of a single individual's cell in world units.
    pub cell_width: f32,
    /// Height of a single individual's cell in world units.
    pub cell_height: f32,
    /// Individuals of the predominant group in index order.
    pub predominant: Vec<PlacedIndividual>,
    /// Individuals of the minority group in index order.
    pub minority: Vec<PlacedIndividual>,
}

impl PopulationLayout {
    /// Individuals of the requested subgroup.
    #[must_use]
    pub fn group(&self, subgroup: Subgroup) -> &[PlacedIndividual] {
        match subgroup {
            Subgroup::Predominant => &self.predominant,
            Subgroup::Minority => &self.minority,
        }
    }

    /// Iterates over every placed individual, predominant group first.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedIndividual> {
        self.predominant.iter().chain(self.minority.iter())
    }

    /// Total number of placed individuals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predominant.len() + self.minority.len()
    }

    /// Returns `true` when no individual was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predominant.is_empty() && self.minority.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ensure_positive, round_half_even, snap_to_step, MixInputs, MixResult, MixerError,
        Parameter, PopulationSplit, Subgroup, UncheckedMixInputs,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn defaults_match_initial_controls() {
        let inputs = MixInputs::default();
        assert_eq!(inputs.predominant_accuracy(), 85.0);
        assert_eq!(inputs.minority_accuracy(), 70.0);
        assert_eq!(inputs.predominant_weight(), 0.7);
        assert!((inputs.minority_weight() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range_accuracy() {
        let error = MixInputs::new(100.5, 70.0, 0.5).expect_err("accuracy above 100");
        assert_eq!(error.parameter(), Parameter::PredominantAccuracy);

        let error = MixInputs::new(85.0, -0.1, 0.5).expect_err("negative accuracy");
        assert_eq!(error.parameter(), Parameter::MinorityAccuracy);
    }

    #[test]
    fn rejects_out_of_range_and_non_finite_weight() {
        for weight in [-0.01, 1.01, f64::NAN, f64::INFINITY] {
            let error = MixInputs::new(85.0, 70.0, weight).expect_err("invalid weight");
            assert!(matches!(
                error,
                MixerError::InvalidInput {
                    parameter: Parameter::PredominantWeight,
                    ..
                }
            ));
        }
    }

    #[test]
    fn accepts_domain_bounds() {
        assert!(MixInputs::new(0.0, 100.0, 0.0).is_ok());
        assert!(MixInputs::new(100.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn error_message_names_parameter_and_domain() {
        let error = MixInputs::new(85.0, 70.0, 2.0).expect_err("weight above one");
        assert_eq!(
            error.to_string(),
            "predominant_weight must lie within [0, 1] (received 2)"
        );
    }

    #[test]
    fn positive_check_rejects_zero_negative_and_non_finite() {
        assert_eq!(ensure_positive(Parameter::CellWidth, 0.5), Ok(0.5));
        for value in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let error = ensure_positive(Parameter::CellHeight, value).expect_err("rejected");
            assert_eq!(error.parameter(), Parameter::CellHeight);
        }
    }

    #[test]
    fn round_half_even_resolves_ties_towards_even() {
        assert_eq!(round_half_even(10.5), 10);
        assert_eq!(round_half_even(11.5), 12);
        assert_eq!(round_half_even(29.75), 30);
        assert_eq!(round_half_even(0.5), 0);
        assert_eq!(round_half_even(-3.0), 0);
    }

    #[test]
    fn snapping_follows_control_resolution() {
        assert_eq!(snap_to_step(0.704, 0.01, 0.0, 1.0), 0.7);
        assert_eq!(snap_to_step(84.96, 0.1, 0.0, 100.0), 85.0);
        assert_eq!(snap_to_step(1.3, 0.01, 0.0, 1.0), 1.0);

        let inputs = MixInputs::new(85.04, 69.97, 0.699).expect("valid").snapped();
        assert_eq!(inputs, MixInputs::default());
    }

    #[test]
    fn split_caps_correct_counts_and_reports_realized_accuracy() {
        let split = PopulationSplit::new(35, 15, 40, 10);
        assert_eq!(split.total(), 50);
        assert_eq!(split.correct(Subgroup::Predominant), 35);
        assert_eq!(split.incorrect(Subgroup::Minority), 5);

        let realized = split
            .realized_accuracy(Subgroup::Minority)
            .expect("non-empty subgroup");
        assert!((realized - 66.666_666_666).abs() < 1e-6);

        let empty = PopulationSplit::new(50, 0, 40, 0);
        assert!(empty.realized_accuracy(Subgroup::Minority).is_none());
    }

    #[test]
    fn unchecked_inputs_validate_through_serde() {
        let unchecked = UncheckedMixInputs {
            predominant_accuracy: 85.0,
            minority_accuracy: 170.0,
            predominant_weight: 0.7,
        };
        let bytes = bincode::serialize(&unchecked).expect("serialize");
        let decoded: Result<MixInputs, _> = bincode::deserialize(&bytes);
        assert!(decoded.is_err(), "out-of-range inputs must not deserialize");
    }

    #[test]
    fn mix_result_round_trips_through_bincode() {
        let result = MixResult {
            inputs: MixInputs::default(),
            weighted_average: 80.5,
            minority_weight: 0.3,
            split: PopulationSplit::new(35, 15, 30, 10),
        };
        assert_round_trip(&result);
    }
}
