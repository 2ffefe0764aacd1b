//! Fixed palette shared by every chart.

use accuracy_mixer_core::Subgroup;

use crate::Color;

/// Correct individuals and gauge of the predominant group.
pub const PREDOMINANT: Color = Color::from_rgb_u8(0x34, 0x98, 0xdb);

/// Correct individuals and gauge of the minority group.
pub const MINORITY: Color = Color::from_rgb_u8(0x2e, 0xcc, 0x71);

/// Misclassified individuals of either group.
pub const INCORRECT: Color = Color::from_rgb_u8(0xe7, 0x4c, 0x3c);

/// Combined accuracy gauge.
pub const TOTAL: Color = Color::from_rgb_u8(0x9b, 0x59, 0xb6);

/// Unfilled part of every gauge.
pub const GAUGE_TRACK: Color = Color::from_rgb_u8(0xe0, 0xe0, 0xe0).with_alpha(0.5);

/// Background of the summary box.
pub const SUMMARY_FILL: Color = Color::from_rgb_u8(0xf8, 0xf9, 0xfa);

/// Border of the summary box.
pub const SUMMARY_BORDER: Color = Color::from_rgb_u8(0xe0, 0xe0, 0xe0);

/// Page background.
pub const PAGE_BACKGROUND: Color = Color::from_rgb_u8(0xf5, 0xf7, 0xf9);

/// Section headings.
pub const HEADING: Color = Color::from_rgb_u8(0x1e, 0x3d, 0x59);

/// Regular text.
pub const TEXT: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);

/// Labels drawn on top of colored bars.
pub const INVERTED_TEXT: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);

/// Color of a subgroup's gauge and weight segment.
#[must_use]
pub const fn subgroup(subgroup: Subgroup) -> Color {
    match subgroup {
        Subgroup::Predominant => PREDOMINANT,
        Subgroup::Minority => MINORITY,
    }
}

/// Color of an individual given its subgroup and correctness.
#[must_use]
pub const fn individual(subgroup: Subgroup, correct: bool) -> Color {
    if correct {
        self::subgroup(subgroup)
    } else {
        INCORRECT
    }
}
