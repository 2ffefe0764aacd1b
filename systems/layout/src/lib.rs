#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure layout system that places simulated individuals on a grid.
//!
//! Individuals of a group fill rows of [`ROW_WIDTH`] cells from left to right
//! and rows grow downwards (towards smaller `y`). The second group is stacked
//! below the rows consumed by the first one, separated by a gap, so the two
//! grids never overlap.

use accuracy_mixer_core::{
    ensure_positive, ensure_within, CorrectnessPolicy, GridCell, MixerError, Parameter,
    PlacedIndividual, PopulationLayout, PopulationSplit, Subgroup, WorldPosition, ROW_WIDTH,
};
use rand::{seq::index, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Width of a single individual's cell in chart units.
pub const CELL_WIDTH: f32 = 0.5;

/// Height of a single individual's cell in chart units.
pub const CELL_HEIGHT: f32 = 0.8;

/// Vertical gap separating the predominant and minority grids.
pub const GROUP_GAP: f32 = 0.5;

/// Lower-left corner of the first individual of the predominant group.
pub const POPULATION_ORIGIN: WorldPosition = WorldPosition::new(2.0, 5.0);

/// Grid geometry shared by both groups.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    row_width: u32,
    cell_width: f32,
    cell_height: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            row_width: ROW_WIDTH,
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
        }
    }
}

impl GridLayout {
    /// Creates a grid layout with explicit geometry.
    ///
    /// Returns an error when `row_width` is zero or either cell dimension is
    /// not a finite positive number.
    pub fn new(row_width: u32, cell_width: f32, cell_height: f32) -> Result<Self, MixerError> {
        let _ = ensure_within(
            Parameter::RowWidth,
            f64::from(row_width),
            1.0,
            f64::from(u32::MAX),
        )?;
        let _ = ensure_positive(Parameter::CellWidth, f64::from(cell_width))?;
        let _ = ensure_positive(Parameter::CellHeight, f64::from(cell_height))?;

        Ok(Self {
            row_width,
            cell_width,
            cell_height,
        })
    }

    /// Number of individuals per row.
    #[must_use]
    pub const fn row_width(&self) -> u32 {
        self.row_width
    }

    /// Width of a single cell in chart units.
    #[must_use]
    pub const fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Height of a single cell in chart units.
    #[must_use]
    pub const fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Grid cell occupied by the individual at `index`.
    #[must_use]
    pub const fn cell(&self, index: u32) -> GridCell {
        GridCell::new(index / self.row_width, index % self.row_width)
    }

    /// Number of rows consumed by a group of `group_size` individuals.
    #[must_use]
    pub const fn rows_used(&self, group_size: u32) -> u32 {
        group_size.div_ceil(self.row_width)
    }

    /// Origin of a group stacked below a group of `previous_size` individuals.
    #[must_use]
    pub fn stacked_origin(
        &self,
        previous_origin: WorldPosition,
        previous_size: u32,
        gap: f32,
    ) -> WorldPosition {
        let consumed = self.rows_used(previous_size) as f32 * self.cell_height;
        WorldPosition::new(previous_origin.x, previous_origin.y - consumed - gap)
    }

    /// Places `group_size` individuals of `subgroup`, `correct_count` of them correct.
    ///
    /// Fails with [`MixerError::InvalidInput`] when `correct_count` exceeds
    /// `group_size`.
    pub fn layout(
        &self,
        subgroup: Subgroup,
        group_size: u32,
        correct_count: u32,
        origin: WorldPosition,
        policy: CorrectnessPolicy,
    ) -> Result<Vec<PlacedIndividual>, MixerError> {
        let _ = ensure_within(
            Parameter::CorrectCount,
            f64::from(correct_count),
            0.0,
            f64::from(group_size),
        )?;

        let flags = correctness_flags(group_size, correct_count, policy);
        let placed = flags
            .into_iter()
            .zip(0..group_size)
            .map(|(correct, index)| {
                let cell = self.cell(index);
                PlacedIndividual {
                    subgroup,
                    index,
                    cell,
                    position: WorldPosition::new(
                        origin.x + cell.column() as f32 * self.cell_width,
                        origin.y - cell.row() as f32 * self.cell_height,
                    ),
                    correct,
                }
            })
            .collect();

        Ok(placed)
    }

    /// Places both subgroups of `split`, the minority grid stacked below the predominant one.
    pub fn layout_population(
        &self,
        split: &PopulationSplit,
        origin: WorldPosition,
        gap: f32,
        policy: CorrectnessPolicy,
    ) -> Result<PopulationLayout, MixerError> {
        let predominant_size = split.count(Subgroup::Predominant);
        let predominant = self.layout(
            Subgroup::Predominant,
            predominant_size,
            split.correct(Subgroup::Predominant),
            origin,
            policy,
        )?;

        let minority_origin = self.stacked_origin(origin, predominant_size, gap);
        let minority = self.layout(
            Subgroup::Minority,
            split.count(Subgroup::Minority),
            split.correct(Subgroup::Minority),
            minority_origin,
            offset_policy(policy),
        )?;

        Ok(PopulationLayout {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            predominant,
            minority,
        })
    }
}

/// Derives the policy of the second group so both groups do not share a shuffle.
fn offset_policy(policy: CorrectnessPolicy) -> CorrectnessPolicy {
    match policy {
        CorrectnessPolicy::Positional => CorrectnessPolicy::Positional,
        CorrectnessPolicy::Shuffled { seed } => CorrectnessPolicy::Shuffled {
            seed: seed.wrapping_add(1),
        },
    }
}

fn correctness_flags(
    group_size: u32,
    correct_count: u32,
    policy: CorrectnessPolicy,
) -> Vec<bool> {
    let size = group_size as usize;
    let correct = (correct_count as usize).min(size);

    match policy {
        CorrectnessPolicy::Positional => (0..size).map(|index| index < correct).collect(),
        CorrectnessPolicy::Shuffled { seed } => {
            let mut flags = vec![false; size];
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for chosen in index::sample(&mut rng, size, correct) {
                flags[chosen] = true;
            }
            flags
        }
    }
}
