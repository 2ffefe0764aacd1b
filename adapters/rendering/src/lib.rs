#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for accuracy mixer adapters.
//!
//! Composition turns a [`MixResult`] and a [`PopulationLayout`] into an
//! immutable [`Presentation`]: two charts made of backend-agnostic
//! [`DrawInstruction`]s expressed in chart world units with `y` growing
//! upwards. Backends only map those instructions to pixels.

mod compose;
pub mod palette;
mod summary;

use accuracy_mixer_core::{MixInputs, MixResult, PopulationLayout};
use anyhow::Result as AnyResult;
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use self::compose::{
    compose_results_chart, compose_weights_chart, WEIGHT_LABEL_MIN_FRACTION,
};
pub use self::summary::{subgroup_summary, summary_lines, total_summary};

/// Title used by windows presenting the model.
pub const WINDOW_TITLE: &str = "Representació del model";

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Horizontal alignment of a text label relative to its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HorizontalAlign {
    /// Text starts at the anchor.
    Left,
    /// Text is centred on the anchor.
    Center,
    /// Text ends at the anchor.
    Right,
}

/// Font weight requested for a label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    /// Regular text.
    Regular,
    /// Emphasised text.
    Bold,
}

/// Single line of text, vertically centred on its anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    /// Anchor point in world units.
    pub anchor: Vec2,
    /// Text to draw.
    pub content: String,
    /// Alignment relative to the anchor.
    pub align: HorizontalAlign,
    /// Font size in points.
    pub size_pt: f32,
    /// Requested font weight.
    pub weight: FontWeight,
    /// Text color.
    pub color: Color,
}

/// Colored swatch and caption shown in a legend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Caption drawn next to the swatch.
    pub label: String,
    /// Swatch color.
    pub color: Color,
}

impl LegendEntry {
    /// Creates a new legend entry.
    #[must_use]
    pub fn new<T>(label: T, color: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            label: label.into(),
            color,
        }
    }
}

/// Legend laid out in a fixed number of columns below its anchor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    /// Top-centre point of the legend in world units.
    pub anchor: Vec2,
    /// Number of entries drawn per legend row.
    pub columns: u32,
    /// Caption font size in points.
    pub size_pt: f32,
    /// Entries in reading order.
    pub entries: Vec<LegendEntry>,
}

/// Multi-line text block drawn inside a bordered box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    /// Centre of the box in world units.
    pub center: Vec2,
    /// Lines of text, top to bottom.
    pub lines: Vec<String>,
    /// Font size in points.
    pub size_pt: f32,
    /// Requested font weight.
    pub weight: FontWeight,
    /// Text color.
    pub text_color: Color,
    /// Box fill color.
    pub fill: Color,
    /// Box border color.
    pub border: Color,
}

/// Backend-agnostic drawing primitive in chart world units.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawInstruction {
    /// Filled axis-aligned rectangle.
    Rectangle {
        /// Lower-left corner.
        origin: Vec2,
        /// Width and height.
        size: Vec2,
        /// Fill color.
        fill: Color,
    },
    /// Filled circle.
    Circle {
        /// Centre of the circle.
        center: Vec2,
        /// Radius measured along the horizontal axis.
        radius: f32,
        /// Fill color.
        fill: Color,
    },
    /// Straight line segment.
    Line {
        /// Start of the segment.
        from: Vec2,
        /// End of the segment.
        to: Vec2,
        /// Stroke width in screen pixels.
        stroke_px: f32,
        /// Stroke color.
        color: Color,
    },
    /// Single-line text label.
    Text(TextLabel),
    /// Legend with colored swatches.
    Legend(Legend),
    /// Bordered multi-line text block.
    TextBox(TextBox),
}

/// Axis-aligned world rectangle visible in a chart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartBounds {
    /// Lower-left corner.
    pub min: Vec2,
    /// Upper-right corner.
    pub max: Vec2,
}

impl ChartBounds {
    /// Creates new chart bounds.
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Horizontal extent of the bounds.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Vertical extent of the bounds.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Ordered list of draw instructions sharing the same world bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// World rectangle mapped onto the chart's viewport.
    pub bounds: ChartBounds,
    /// Instructions in painting order.
    pub instructions: Vec<DrawInstruction>,
}

impl Chart {
    /// Creates an empty chart covering `bounds`.
    #[must_use]
    pub fn new(bounds: ChartBounds) -> Self {
        Self {
            bounds,
            instructions: Vec::new(),
        }
    }

    /// Appends an instruction to the chart.
    pub fn push(&mut self, instruction: DrawInstruction) {
        self.instructions.push(instruction);
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Color of section headings.
    pub heading_color: Color,
    /// Inputs the presentation was composed from.
    pub inputs: MixInputs,
    /// Derived values shown by the charts.
    pub result: MixResult,
    /// Literal summary lines, one per subgroup plus the total.
    pub summary: Vec<String>,
    /// Stacked bar showing both mixing weights.
    pub weights: Chart,
    /// Gauges, population grid, legend and summary box.
    pub results: Chart,
}

impl Presentation {
    /// Composes a presentation from a mixing result and its population layout.
    ///
    /// Composition is pure: identical arguments always produce identical
    /// instruction lists.
    #[must_use]
    pub fn compose(result: &MixResult, population: &PopulationLayout) -> Self {
        let summary = summary_lines(result);
        log::debug!(
            "composed presentation for {} individuals: {}",
            population.len(),
            summary.join(" | ")
        );

        Self {
            window_title: WINDOW_TITLE.to_owned(),
            clear_color: palette::PAGE_BACKGROUND,
            heading_color: palette::HEADING,
            inputs: result.inputs,
            result: *result,
            weights: compose_weights_chart(result),
            results: compose_results_chart(result, population, &summary),
            summary,
        }
    }
}

/// Input snapshot gathered by adapters before updating the presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Input triple currently selected by the controls, snapped to their steps.
    pub inputs: MixInputs,
    /// Whether the triple differs from the one of the previous frame.
    pub inputs_changed: bool,
}

/// Rendering backend capable of presenting accuracy mixer charts.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_presentation` closure receives the input captured
    /// by the adapter on every frame and may replace the presentation before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_presentation: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Presentation) + 'static;
}
