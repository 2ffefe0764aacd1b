use accuracy_mixer_core::{MixResult, PlacedIndividual, PopulationLayout, Subgroup};
use glam::Vec2;

use crate::{
    palette, Chart, ChartBounds, Color, DrawInstruction, FontWeight, HorizontalAlign, Legend,
    LegendEntry, TextBox, TextLabel,
};

/// Narrowest weight segment, as a fraction of the bar, that still gets an inline label.
pub const WEIGHT_LABEL_MIN_FRACTION: f64 = 0.15;

const RESULTS_BOUNDS: ChartBounds =
    ChartBounds::new(Vec2::new(0.0, -3.0), Vec2::new(10.0, 10.0));
const WEIGHTS_BOUNDS: ChartBounds = ChartBounds::new(Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.5));

const GAUGE_LEFT: f32 = 2.0;
const GAUGE_WIDTH: f32 = 6.0;
const GAUGE_LABEL_X: f32 = 1.0;
const GAUGE_VALUE_X: f32 = 8.5;
const GAUGE_HEIGHT: f32 = 0.5;
const TOTAL_GAUGE_HEIGHT: f32 = 1.2;
const PREDOMINANT_GAUGE_Y: f32 = 9.0;
const MINORITY_GAUGE_Y: f32 = 8.2;
const TOTAL_GAUGE_Y: f32 = 6.8;
const GAUGE_FONT_PT: f32 = 10.0;

const HEAD_RADIUS: f32 = 0.15;
const LIMB_SPAN: f32 = 0.15;
const FIGURE_STROKE_PX: f32 = 2.0;

const WEIGHT_BAR_HEIGHT: f32 = 0.8;
const WEIGHT_FONT_PT: f32 = 8.0;

const RESULTS_LEGEND_ANCHOR: Vec2 = Vec2::new(5.0, -0.2);
const RESULTS_LEGEND_FONT_PT: f32 = 10.0;
const SUMMARY_CENTER: Vec2 = Vec2::new(5.0, -2.0);
const SUMMARY_FONT_PT: f32 = 14.0;

/// Builds the stacked bar showing how the two weights share the unit interval.
///
/// Inline labels are drawn only on segments at least
/// [`WEIGHT_LABEL_MIN_FRACTION`] wide so they never overflow thin segments.
#[must_use]
pub fn compose_weights_chart(result: &MixResult) -> Chart {
    let mut chart = Chart::new(WEIGHTS_BOUNDS);
    let predominant_weight = result.inputs.predominant_weight();
    let segments = [
        (Subgroup::Predominant, 0.0, predominant_weight),
        (Subgroup::Minority, predominant_weight, result.minority_weight),
    ];

    for (subgroup, start, width) in segments {
        chart.push(DrawInstruction::Rectangle {
            origin: Vec2::new(start as f32, -WEIGHT_BAR_HEIGHT * 0.5),
            size: Vec2::new(width as f32, WEIGHT_BAR_HEIGHT),
            fill: palette::subgroup(subgroup),
        });
    }

    for (_, start, width) in segments {
        if width < WEIGHT_LABEL_MIN_FRACTION {
            continue;
        }
        chart.push(DrawInstruction::Text(TextLabel {
            anchor: Vec2::new((start + width * 0.5) as f32, 0.0),
            content: format!("{width:.2}"),
            align: HorizontalAlign::Center,
            size_pt: WEIGHT_FONT_PT,
            weight: FontWeight::Bold,
            color: palette::INVERTED_TEXT,
        }));
    }

    chart.push(DrawInstruction::Legend(Legend {
        anchor: Vec2::new(0.5, -0.55),
        columns: 2,
        size_pt: WEIGHT_FONT_PT,
        entries: Subgroup::ALL
            .iter()
            .map(|subgroup| LegendEntry::new(subgroup.label(), palette::subgroup(*subgroup)))
            .collect(),
    }));

    chart
}

/// Builds the gauges, the population grid, the legend and the summary box.
#[must_use]
pub fn compose_results_chart(
    result: &MixResult,
    population: &PopulationLayout,
    summary: &[String],
) -> Chart {
    let mut chart = Chart::new(RESULTS_BOUNDS);

    push_gauge(
        &mut chart,
        PREDOMINANT_GAUGE_Y,
        result.inputs.predominant_accuracy(),
        Subgroup::Predominant.label(),
        palette::PREDOMINANT,
        GAUGE_HEIGHT,
    );
    push_gauge(
        &mut chart,
        MINORITY_GAUGE_Y,
        result.inputs.minority_accuracy(),
        Subgroup::Minority.label(),
        palette::MINORITY,
        GAUGE_HEIGHT,
    );
    push_gauge(
        &mut chart,
        TOTAL_GAUGE_Y,
        result.weighted_average,
        "Total",
        palette::TOTAL,
        TOTAL_GAUGE_HEIGHT,
    );

    for individual in population.iter() {
        push_figure(&mut chart, individual, population.cell_width);
    }

    chart.push(DrawInstruction::Legend(Legend {
        anchor: RESULTS_LEGEND_ANCHOR,
        columns: 3,
        size_pt: RESULTS_LEGEND_FONT_PT,
        entries: vec![
            LegendEntry::new("Grup predominant (correctes)", palette::PREDOMINANT),
            LegendEntry::new("Grup minoritari (correctes)", palette::MINORITY),
            LegendEntry::new("Incorrectes", palette::INCORRECT),
        ],
    }));

    chart.push(DrawInstruction::TextBox(TextBox {
        center: SUMMARY_CENTER,
        lines: summary.to_vec(),
        size_pt: SUMMARY_FONT_PT,
        weight: FontWeight::Bold,
        text_color: palette::TEXT,
        fill: palette::SUMMARY_FILL,
        border: palette::SUMMARY_BORDER,
    }));

    chart
}

fn push_gauge(
    chart: &mut Chart,
    y: f32,
    accuracy: f64,
    label: &str,
    color: Color,
    height: f32,
) {
    chart.push(DrawInstruction::Rectangle {
        origin: Vec2::new(GAUGE_LEFT, y),
        size: Vec2::new(GAUGE_WIDTH, height),
        fill: palette::GAUGE_TRACK,
    });
    chart.push(DrawInstruction::Rectangle {
        origin: Vec2::new(GAUGE_LEFT, y),
        size: Vec2::new(gauge_fill_width(accuracy), height),
        fill: color,
    });

    let middle = y + height * 0.5;
    chart.push(DrawInstruction::Text(TextLabel {
        anchor: Vec2::new(GAUGE_LABEL_X, middle),
        content: label.to_owned(),
        align: HorizontalAlign::Right,
        size_pt: GAUGE_FONT_PT,
        weight: FontWeight::Bold,
        color: palette::TEXT,
    }));
    chart.push(DrawInstruction::Text(TextLabel {
        anchor: Vec2::new(GAUGE_VALUE_X, middle),
        content: format!("{accuracy:.1}%"),
        align: HorizontalAlign::Left,
        size_pt: GAUGE_FONT_PT,
        weight: FontWeight::Regular,
        color: palette::TEXT,
    }));
}

fn gauge_fill_width(accuracy: f64) -> f32 {
    GAUGE_WIDTH * (accuracy / 100.0) as f32
}

/// Stick figure: head, body, arms and two legs drawn inside the individual's cell.
fn push_figure(chart: &mut Chart, individual: &PlacedIndividual, cell_width: f32) {
    let color = palette::individual(individual.subgroup, individual.correct);
    let x = individual.position.x + cell_width * 0.5;
    let y = individual.position.y;

    chart.push(DrawInstruction::Circle {
        center: Vec2::new(x, y + 0.6),
        radius: HEAD_RADIUS,
        fill: color,
    });

    let segments = [
        (Vec2::new(x, y + 0.45), Vec2::new(x, y + 0.2)),
        (
            Vec2::new(x - LIMB_SPAN, y + 0.35),
            Vec2::new(x + LIMB_SPAN, y + 0.35),
        ),
        (Vec2::new(x, y + 0.2), Vec2::new(x - LIMB_SPAN, y + 0.05)),
        (Vec2::new(x, y + 0.2), Vec2::new(x + LIMB_SPAN, y + 0.05)),
    ];
    for (from, to) in segments {
        chart.push(DrawInstruction::Line {
            from,
            to,
            stroke_px: FIGURE_STROKE_PX,
            color,
        });
    }
}
