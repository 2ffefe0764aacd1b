use accuracy_mixer_core::{MixResult, Subgroup};

/// Summary line for a single subgroup, e.g. `Grup minoritari: 10/15 correctes (70.0%)`.
#[must_use]
pub fn subgroup_summary(result: &MixResult, subgroup: Subgroup) -> String {
    format!(
        "{}: {}/{} correctes ({:.1}%)",
        subgroup.label(),
        result.split.correct(subgroup),
        result.split.count(subgroup),
        result.inputs.accuracy(subgroup),
    )
}

/// Summary line for the weighted average, e.g. `Total: 80.5%`.
#[must_use]
pub fn total_summary(result: &MixResult) -> String {
    format!("Total: {:.1}%", result.weighted_average)
}

/// Every summary line in display order.
#[must_use]
pub fn summary_lines(result: &MixResult) -> Vec<String> {
    Subgroup::ALL
        .iter()
        .map(|subgroup| subgroup_summary(result, *subgroup))
        .chain(std::iter::once(total_summary(result)))
        .collect()
}
