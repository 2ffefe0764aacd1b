use std::collections::HashSet;

use accuracy_mixer_core::{
    CorrectnessPolicy, MixerError, Parameter, PopulationLayout, PopulationSplit, Subgroup,
    WorldPosition,
};
use accuracy_mixer_system_layout::{GridLayout, GROUP_GAP, POPULATION_ORIGIN};
use accuracy_mixer_system_mixer::compute;

#[test]
fn every_individual_occupies_a_unique_cell() {
    let layout = GridLayout::default();
    for group_size in 0..=50 {
        let placed = layout
            .layout(
                Subgroup::Predominant,
                group_size,
                group_size / 2,
                POPULATION_ORIGIN,
                CorrectnessPolicy::Positional,
            )
            .expect("valid group");

        assert_eq!(placed.len(), group_size as usize);
        let cells: HashSet<_> = placed.iter().map(|individual| individual.cell).collect();
        assert_eq!(cells.len(), placed.len(), "group of {group_size} reused a cell");
        assert!(placed.iter().all(|individual| individual.cell.column() < 10));
    }
}

#[test]
fn positions_follow_row_and_column() {
    let layout = GridLayout::default();
    let placed = layout
        .layout(
            Subgroup::Minority,
            12,
            0,
            WorldPosition::new(1.0, 4.0),
            CorrectnessPolicy::Positional,
        )
        .expect("valid group");

    let eleventh = placed[11];
    assert_eq!(eleventh.index, 11);
    assert_eq!(eleventh.cell.row(), 1);
    assert_eq!(eleventh.cell.column(), 1);
    assert!((eleventh.position.x - 1.5).abs() < 1e-6);
    assert!((eleventh.position.y - 3.2).abs() < 1e-6);
}

#[test]
fn positional_policy_marks_leading_individuals_correct() {
    let layout = GridLayout::default();
    let placed = layout
        .layout(
            Subgroup::Predominant,
            35,
            30,
            POPULATION_ORIGIN,
            CorrectnessPolicy::Positional,
        )
        .expect("valid group");

    assert!(placed[..30].iter().all(|individual| individual.correct));
    assert!(placed[30..].iter().all(|individual| !individual.correct));
}

#[test]
fn correct_count_above_group_size_is_rejected() {
    let layout = GridLayout::default();
    let error = layout
        .layout(
            Subgroup::Minority,
            5,
            6,
            POPULATION_ORIGIN,
            CorrectnessPolicy::Positional,
        )
        .expect_err("more correct individuals than members");

    assert!(matches!(
        error,
        MixerError::InvalidInput {
            parameter: Parameter::CorrectCount,
            ..
        }
    ));
}

#[test]
fn stacked_groups_never_overlap() {
    let layout = GridLayout::default();
    for predominant in 0..=50 {
        let split = PopulationSplit::new(predominant, 50 - predominant, 0, 0);
        let population = layout
            .layout_population(
                &split,
                POPULATION_ORIGIN,
                GROUP_GAP,
                CorrectnessPolicy::Positional,
            )
            .expect("valid split");

        let lowest_predominant = population
            .predominant
            .iter()
            .map(|individual| individual.position.y)
            .fold(f32::INFINITY, f32::min);
        let highest_minority_top = population
            .minority
            .iter()
            .map(|individual| individual.position.y + layout.cell_height())
            .fold(f32::NEG_INFINITY, f32::max);

        assert!(
            highest_minority_top <= lowest_predominant + 1e-5,
            "groups overlap for a {predominant}/{} split",
            50 - predominant,
        );
        assert_eq!(population.len(), 50);
    }
}

#[test]
fn population_layout_matches_mixer_split() {
    let result = compute(85.0, 70.0, 0.7).expect("valid inputs");
    let population = GridLayout::default()
        .layout_population(
            &result.split,
            POPULATION_ORIGIN,
            GROUP_GAP,
            CorrectnessPolicy::Positional,
        )
        .expect("valid split");

    assert!(!population.is_empty());
    assert!(PopulationLayout::default().is_empty());
    assert_eq!(population.group(Subgroup::Predominant).len(), 35);
    assert_eq!(population.group(Subgroup::Minority).len(), 15);
    let correct_minority = population
        .group(Subgroup::Minority)
        .iter()
        .filter(|individual| individual.correct)
        .count();
    assert_eq!(correct_minority, 10);

    let first_minority = population.minority[0];
    assert!((first_minority.position.y - 1.3).abs() < 1e-5);
}

#[test]
fn shuffled_policy_is_reproducible_and_preserves_counts() {
    let layout = GridLayout::default();
    let split = PopulationSplit::new(35, 15, 30, 10);
    let policy = CorrectnessPolicy::Shuffled { seed: 0xC0FFEE };

    let first = layout
        .layout_population(&split, POPULATION_ORIGIN, GROUP_GAP, policy)
        .expect("valid split");
    let second = layout
        .layout_population(&split, POPULATION_ORIGIN, GROUP_GAP, policy)
        .expect("valid split");

    assert_eq!(first, second);
    for subgroup in Subgroup::ALL {
        let correct = first
            .group(subgroup)
            .iter()
            .filter(|individual| individual.correct)
            .count();
        assert_eq!(correct as u32, split.correct(subgroup));
    }
}
