#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the accuracy mixer.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The adapter uses Macroquad's immediate-mode UI module for the three input
//! sliders. All UI-specific calls live inside the local `ui` module to avoid
//! leaking Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_input_panel_ui, InputPanelUiContext, SliderState};
use accuracy_mixer_core::MixInputs;
use accuracy_mixer_rendering::{
    palette,
    Chart, ChartBounds, Color, DrawInstruction, FontWeight, FrameInput, HorizontalAlign, Legend,
    LegendEntry, Presentation, RenderingBackend, TextBox, TextLabel,
};
use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;

const WINDOW_WIDTH: i32 = 1280;
const WINDOW_HEIGHT: i32 = 800;
const INPUT_COLUMN_FRACTION: f32 = 0.4;
const INPUT_PANEL_HEIGHT_FRACTION: f32 = 0.55;
const WEIGHTS_CHART_HEIGHT_FRACTION: f32 = 0.2;
const HEADING_HEIGHT: f32 = 48.0;
const HEADING_FONT_PX: f32 = 32.0;
const COLUMN_PADDING: f32 = 16.0;
const POINTS_TO_PIXELS: f32 = 4.0 / 3.0;
const REFERENCE_SCREEN_HEIGHT: f32 = 800.0;
const LEGEND_SWATCH_PX: f32 = 12.0;
const LEGEND_GAP_PX: f32 = 6.0;
const LEGEND_COLUMN_GAP_PX: f32 = 18.0;
const TEXT_BOX_PADDING_PX: f32 = 10.0;
const LINE_SPACING: f32 = 1.3;

/// Latches the last applied input triple so recomputation only happens on change.
#[doc(hidden)]
#[derive(Clone, Copy, Debug)]
pub struct InputLatch {
    applied: MixInputs,
}

impl InputLatch {
    /// Creates a latch that considers `inputs` already applied.
    #[must_use]
    pub fn new(inputs: MixInputs) -> Self {
        Self { applied: inputs }
    }

    /// Records the inputs observed on this frame and reports whether they changed.
    pub fn observe(&mut self, inputs: MixInputs) -> FrameInput {
        let inputs_changed = inputs != self.applied;
        self.applied = inputs;
        FrameInput {
            inputs,
            inputs_changed,
        }
    }

    /// Inputs applied most recently.
    #[must_use]
    pub fn applied(&self) -> MixInputs {
        self.applied
    }
}

/// Edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_presentation: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Presentation) + 'static,
    {
        let Self { swap_interval } = self;

        let mut config = macroquad::window::Conf {
            window_title: presentation.window_title.clone(),
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        log::info!(
            "opening {}x{} window \"{}\"",
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            presentation.window_title
        );

        macroquad::Window::from_config(config, async move {
            let mut presentation = presentation;
            let mut sliders = SliderState::from_inputs(presentation.inputs);
            let mut latch = InputLatch::new(presentation.inputs);

            loop {
                if KeyboardShortcuts::poll().quit_requested {
                    break;
                }

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let columns = ScreenColumns::new(screen_width, screen_height);

                macroquad::window::clear_background(to_macroquad_color(
                    presentation.clear_color,
                ));

                let panel_context = InputPanelUiContext {
                    origin: to_macroquad_vec(columns.input_panel.origin),
                    size: to_macroquad_vec(columns.input_panel.size),
                    background: to_macroquad_color(presentation.clear_color),
                    heading: to_macroquad_color(presentation.heading_color),
                };
                draw_input_panel_ui(&mut macroquad::ui::root_ui(), panel_context, &mut sliders);

                let candidate = match sliders.snapped_inputs() {
                    Ok(inputs) => inputs,
                    Err(error) => {
                        log::warn!("ignoring slider positions: {error}");
                        latch.applied()
                    }
                };
                update_presentation(latch.observe(candidate), &mut presentation);

                let text_scale = (screen_height / REFERENCE_SCREEN_HEIGHT).clamp(0.6, 2.0);
                draw_heading(
                    "Resultats",
                    columns.results_heading,
                    presentation.heading_color,
                );
                draw_chart(
                    &presentation.weights,
                    ChartViewport::new(presentation.weights.bounds, columns.weights_chart),
                    text_scale,
                );
                draw_chart(
                    &presentation.results,
                    ChartViewport::new(presentation.results.bounds, columns.results_chart),
                    text_scale,
                );

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Axis-aligned screen rectangle in pixels, `y` growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScreenRect {
    origin: Vec2,
    size: Vec2,
}

impl ScreenRect {
    fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }
}

/// Splits the window into the input column (left) and the results column (right).
#[derive(Clone, Copy, Debug, PartialEq)]
struct ScreenColumns {
    input_panel: ScreenRect,
    weights_chart: ScreenRect,
    results_heading: ScreenRect,
    results_chart: ScreenRect,
}

impl ScreenColumns {
    fn new(screen_width: f32, screen_height: f32) -> Self {
        let input_width = screen_width * INPUT_COLUMN_FRACTION;
        let panel_height = screen_height * INPUT_PANEL_HEIGHT_FRACTION;
        let weights_height = screen_height * WEIGHTS_CHART_HEIGHT_FRACTION;
        let results_left = input_width + COLUMN_PADDING;
        let results_width = screen_width - results_left - COLUMN_PADDING;

        Self {
            input_panel: ScreenRect::new(0.0, 0.0, input_width, panel_height),
            weights_chart: ScreenRect::new(
                COLUMN_PADDING,
                panel_height,
                input_width - 2.0 * COLUMN_PADDING,
                weights_height,
            ),
            results_heading: ScreenRect::new(results_left, 0.0, results_width, HEADING_HEIGHT),
            results_chart: ScreenRect::new(
                results_left,
                HEADING_HEIGHT,
                results_width,
                screen_height - HEADING_HEIGHT - COLUMN_PADDING,
            ),
        }
    }
}

/// Maps chart world coordinates (`y` up) onto a screen rectangle (`y` down).
#[derive(Clone, Copy, Debug, PartialEq)]
struct ChartViewport {
    bounds: ChartBounds,
    rect: ScreenRect,
}

impl ChartViewport {
    fn new(bounds: ChartBounds, rect: ScreenRect) -> Self {
        Self { bounds, rect }
    }

    fn scale(&self) -> Vec2 {
        let width = self.bounds.width();
        let height = self.bounds.height();
        if width <= f32::EPSILON || height <= f32::EPSILON {
            return Vec2::ZERO;
        }
        Vec2::new(self.rect.size.x / width, self.rect.size.y / height)
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        let scale = self.scale();
        Vec2::new(
            self.rect.origin.x + (point.x - self.bounds.min.x) * scale.x,
            self.rect.origin.y + (self.bounds.max.y - point.y) * scale.y,
        )
    }

    /// Screen rectangle covered by a world rectangle anchored at its lower-left corner.
    fn rect_to_screen(&self, origin: Vec2, size: Vec2) -> ScreenRect {
        let top_left = self.to_screen(Vec2::new(origin.x, origin.y + size.y));
        let scale = self.scale();
        ScreenRect::new(top_left.x, top_left.y, size.x * scale.x, size.y * scale.y)
    }

    /// World lengths are mapped with the smaller axis scale so circles stay round.
    fn length_to_screen(&self, length: f32) -> f32 {
        let scale = self.scale();
        length * scale.x.min(scale.y)
    }
}

fn draw_heading(text: &str, rect: ScreenRect, color: Color) {
    let dimensions = macroquad::text::measure_text(text, None, HEADING_FONT_PX as u16, 1.0);
    let baseline = rect.origin.y + (rect.size.y + dimensions.offset_y) * 0.5;
    macroquad::text::draw_text(
        text,
        rect.origin.x,
        baseline,
        HEADING_FONT_PX,
        to_macroquad_color(color),
    );
}

fn draw_chart(chart: &Chart, viewport: ChartViewport, text_scale: f32) {
    if viewport.scale() == Vec2::ZERO {
        return;
    }

    for instruction in &chart.instructions {
        match instruction {
            DrawInstruction::Rectangle { origin, size, fill } => {
                let rect = viewport.rect_to_screen(*origin, *size);
                if rect.size.x <= f32::EPSILON || rect.size.y <= f32::EPSILON {
                    continue;
                }
                macroquad::shapes::draw_rectangle(
                    rect.origin.x,
                    rect.origin.y,
                    rect.size.x,
                    rect.size.y,
                    to_macroquad_color(*fill),
                );
            }
            DrawInstruction::Circle {
                center,
                radius,
                fill,
            } => {
                let center = viewport.to_screen(*center);
                macroquad::shapes::draw_circle(
                    center.x,
                    center.y,
                    viewport.length_to_screen(*radius),
                    to_macroquad_color(*fill),
                );
            }
            DrawInstruction::Line {
                from,
                to,
                stroke_px,
                color,
            } => {
                let from = viewport.to_screen(*from);
                let to = viewport.to_screen(*to);
                macroquad::shapes::draw_line(
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    *stroke_px,
                    to_macroquad_color(*color),
                );
            }
            DrawInstruction::Text(label) => draw_label(label, &viewport, text_scale),
            DrawInstruction::Legend(legend) => draw_legend(legend, &viewport, text_scale),
            DrawInstruction::TextBox(text_box) => draw_text_box(text_box, &viewport, text_scale),
        }
    }
}

fn font_px(size_pt: f32, text_scale: f32) -> f32 {
    (size_pt * POINTS_TO_PIXELS * text_scale).max(1.0)
}

/// Left edge of a text run of `width` pixels aligned on `anchor_x`.
fn aligned_left(anchor_x: f32, width: f32, align: HorizontalAlign) -> f32 {
    match align {
        HorizontalAlign::Left => anchor_x,
        HorizontalAlign::Center => anchor_x - width * 0.5,
        HorizontalAlign::Right => anchor_x - width,
    }
}

/// Draws a single line vertically centred on `center_y`.
fn draw_text_line(
    text: &str,
    left: f32,
    center_y: f32,
    font_size: f32,
    weight: FontWeight,
    color: Color,
) {
    let dimensions = macroquad::text::measure_text(text, None, font_size as u16, 1.0);
    let baseline = center_y - dimensions.height * 0.5 + dimensions.offset_y;
    let color = to_macroquad_color(color);
    macroquad::text::draw_text(text, left, baseline, font_size, color);
    if weight == FontWeight::Bold {
        // Overdraw shifted by a pixel; the default font has no bold face.
        macroquad::text::draw_text(text, left + 1.0, baseline, font_size, color);
    }
}

fn text_width(text: &str, font_size: f32) -> f32 {
    macroquad::text::measure_text(text, None, font_size as u16, 1.0).width
}

fn draw_label(label: &TextLabel, viewport: &ChartViewport, text_scale: f32) {
    let font_size = font_px(label.size_pt, text_scale);
    let anchor = viewport.to_screen(label.anchor);
    let left = aligned_left(anchor.x, text_width(&label.content, font_size), label.align);
    draw_text_line(
        &label.content,
        left,
        anchor.y,
        font_size,
        label.weight,
        label.color,
    );
}

fn draw_legend(legend: &Legend, viewport: &ChartViewport, text_scale: f32) {
    let font_size = font_px(legend.size_pt, text_scale);
    let row_height = font_size * LINE_SPACING;
    let anchor = viewport.to_screen(legend.anchor);

    for (row_index, row) in legend_rows(legend).into_iter().enumerate() {
        let widths: Vec<f32> = row
            .iter()
            .map(|entry| LEGEND_SWATCH_PX + LEGEND_GAP_PX + text_width(&entry.label, font_size))
            .collect();
        let row_width = widths.iter().sum::<f32>()
            + LEGEND_COLUMN_GAP_PX * widths.len().saturating_sub(1) as f32;
        let center_y = anchor.y + row_height * (row_index as f32 + 0.5);

        let mut left = aligned_left(anchor.x, row_width, HorizontalAlign::Center);
        for (entry, width) in row.iter().zip(widths) {
            macroquad::shapes::draw_rectangle(
                left,
                center_y - LEGEND_SWATCH_PX * 0.5,
                LEGEND_SWATCH_PX,
                LEGEND_SWATCH_PX,
                to_macroquad_color(entry.color),
            );
            draw_text_line(
                &entry.label,
                left + LEGEND_SWATCH_PX + LEGEND_GAP_PX,
                center_y,
                font_size,
                FontWeight::Regular,
                palette::TEXT,
            );
            left += width + LEGEND_COLUMN_GAP_PX;
        }
    }
}

/// Splits legend entries into rows of `columns` entries.
fn legend_rows(legend: &Legend) -> Vec<&[LegendEntry]> {
    let columns = legend.columns.max(1) as usize;
    legend.entries.chunks(columns).collect()
}

fn draw_text_box(text_box: &TextBox, viewport: &ChartViewport, text_scale: f32) {
    if text_box.lines.is_empty() {
        return;
    }

    let font_size = font_px(text_box.size_pt, text_scale);
    let line_height = font_size * LINE_SPACING;
    let widest = text_box
        .lines
        .iter()
        .map(|line| text_width(line, font_size))
        .fold(0.0_f32, f32::max);
    let width = widest + 2.0 * TEXT_BOX_PADDING_PX;
    let height = line_height * text_box.lines.len() as f32 + 2.0 * TEXT_BOX_PADDING_PX;
    let center = viewport.to_screen(text_box.center);
    let left = center.x - width * 0.5;
    let top = center.y - height * 0.5;

    macroquad::shapes::draw_rectangle(left, top, width, height, to_macroquad_color(text_box.fill));
    macroquad::shapes::draw_rectangle_lines(
        left,
        top,
        width,
        height,
        1.5,
        to_macroquad_color(text_box.border),
    );

    for (index, line) in text_box.lines.iter().enumerate() {
        let center_y = top + TEXT_BOX_PADDING_PX + line_height * (index as f32 + 0.5);
        let line_left = aligned_left(
            center.x,
            text_width(line, font_size),
            HorizontalAlign::Center,
        );
        draw_text_line(
            line,
            line_left,
            center_y,
            font_size,
            text_box.weight,
            text_box.text_color,
        );
    }
}

fn to_macroquad_vec(vec: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(vec.x, vec.y)
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results_viewport() -> ChartViewport {
        ChartViewport::new(
            ChartBounds::new(Vec2::new(0.0, -3.0), Vec2::new(10.0, 10.0)),
            ScreenRect::new(100.0, 50.0, 500.0, 650.0),
        )
    }

    #[test]
    fn viewport_flips_the_vertical_axis() {
        let viewport = results_viewport();

        assert_eq!(viewport.to_screen(Vec2::new(0.0, 10.0)), Vec2::new(100.0, 50.0));
        assert_eq!(viewport.to_screen(Vec2::new(10.0, -3.0)), Vec2::new(600.0, 700.0));
        assert_eq!(viewport.to_screen(Vec2::new(5.0, 0.0)), Vec2::new(350.0, 550.0));
    }

    #[test]
    fn rectangles_map_from_lower_left_to_top_left() {
        let viewport = results_viewport();
        let rect = viewport.rect_to_screen(Vec2::new(2.0, 9.0), Vec2::new(6.0, 0.5));

        assert_eq!(rect.origin, Vec2::new(200.0, 75.0));
        assert_eq!(rect.size, Vec2::new(300.0, 25.0));
    }

    #[test]
    fn lengths_use_the_smaller_axis_scale() {
        let viewport = ChartViewport::new(
            ChartBounds::new(Vec2::ZERO, Vec2::new(10.0, 10.0)),
            ScreenRect::new(0.0, 0.0, 400.0, 200.0),
        );
        assert_eq!(viewport.length_to_screen(0.5), 10.0);
    }

    #[test]
    fn degenerate_bounds_collapse_scale() {
        let viewport = ChartViewport::new(
            ChartBounds::new(Vec2::ZERO, Vec2::new(0.0, 1.0)),
            ScreenRect::new(0.0, 0.0, 100.0, 100.0),
        );
        assert_eq!(viewport.scale(), Vec2::ZERO);
    }

    #[test]
    fn alignment_positions_text_runs() {
        assert_eq!(aligned_left(100.0, 40.0, HorizontalAlign::Left), 100.0);
        assert_eq!(aligned_left(100.0, 40.0, HorizontalAlign::Center), 80.0);
        assert_eq!(aligned_left(100.0, 40.0, HorizontalAlign::Right), 60.0);
    }

    #[test]
    fn legend_rows_respect_column_count() {
        let legend = Legend {
            anchor: Vec2::ZERO,
            columns: 2,
            size_pt: 8.0,
            entries: vec![
                LegendEntry::new("a", Color::from_rgb_u8(0, 0, 0)),
                LegendEntry::new("b", Color::from_rgb_u8(0, 0, 0)),
                LegendEntry::new("c", Color::from_rgb_u8(0, 0, 0)),
            ],
        };
        let rows = legend_rows(&legend);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1][0].label, "c");
    }

    #[test]
    fn columns_never_overlap() {
        let columns = ScreenColumns::new(1280.0, 800.0);
        let input_right = columns.input_panel.origin.x + columns.input_panel.size.x;
        assert!(columns.results_chart.origin.x >= input_right);
        assert!(columns.weights_chart.origin.y >= columns.input_panel.size.y);
        assert!(columns.results_chart.origin.y >= columns.results_heading.size.y);
    }

    #[test]
    fn font_size_scales_with_screen() {
        assert!((font_px(12.0, 1.0) - 16.0).abs() < 1e-5);
        assert!((font_px(12.0, 2.0) - 32.0).abs() < 1e-5);
    }
}
