//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types. The three input sliders live in
//! `draw_input_panel_ui`.

use accuracy_mixer_core::{
    snap_to_step, MixInputs, MixerError, ACCURACY_STEP, MAX_ACCURACY, MAX_WEIGHT, MIN_ACCURACY,
    MIN_WEIGHT, WEIGHT_STEP,
};
use macroquad::{
    color::{Color, BLACK},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

/// Raw slider positions as reported by Macroquad.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct SliderState {
    pub(crate) predominant_accuracy: f32,
    pub(crate) minority_accuracy: f32,
    pub(crate) predominant_weight: f32,
}

impl SliderState {
    /// Places every slider on the provided inputs.
    pub(crate) fn from_inputs(inputs: MixInputs) -> Self {
        Self {
            predominant_accuracy: inputs.predominant_accuracy() as f32,
            minority_accuracy: inputs.minority_accuracy() as f32,
            predominant_weight: inputs.predominant_weight() as f32,
        }
    }

    /// Snaps slider positions to the control steps and validates them.
    pub(crate) fn snapped_inputs(&self) -> Result<MixInputs, MixerError> {
        MixInputs::new(
            snap_to_step(
                f64::from(self.predominant_accuracy),
                ACCURACY_STEP,
                MIN_ACCURACY,
                MAX_ACCURACY,
            ),
            snap_to_step(
                f64::from(self.minority_accuracy),
                ACCURACY_STEP,
                MIN_ACCURACY,
                MAX_ACCURACY,
            ),
            snap_to_step(
                f64::from(self.predominant_weight),
                WEIGHT_STEP,
                MIN_WEIGHT,
                MAX_WEIGHT,
            ),
        )
    }
}

/// Snapshot of the input panel's layout for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct InputPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub(crate) origin: Vec2,
    /// Panel dimensions in screen space.
    pub(crate) size: Vec2,
    /// Background colour applied to the window skin.
    pub(crate) background: Color,
    /// Colour of the section headings.
    pub(crate) heading: Color,
}

/// Renders the sliders and writes their new positions into `sliders`.
pub(crate) fn draw_input_panel_ui(
    ui: &mut Ui,
    context: InputPanelUiContext,
    sliders: &mut SliderState,
) {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(BLACK)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(context.heading)
        .text_color_hovered(context.heading)
        .text_color_clicked(context.heading)
        .margin(RectOffset::new(0.0, 0.0, 6.0, 6.0))
        .build();
    skin.label_style = label_style;

    ui.push_skin(&skin);

    let _ = ui.window(hash!("input_panel"), context.origin, context.size, |ui| {
        ui.label(None, "Accuracies");
        ui.slider(
            hash!(),
            "Grup predominant Accuracy (%)",
            MIN_ACCURACY as f32..MAX_ACCURACY as f32,
            &mut sliders.predominant_accuracy,
        );
        ui.slider(
            hash!(),
            "Grup minoritari Accuracy (%)",
            MIN_ACCURACY as f32..MAX_ACCURACY as f32,
            &mut sliders.minority_accuracy,
        );

        ui.separator();
        ui.label(None, "Distribució");
        ui.slider(
            hash!(),
            "Pes del Grup predominant",
            MIN_WEIGHT as f32..MAX_WEIGHT as f32,
            &mut sliders.predominant_weight,
        );
        ui.separator();
        ui.label(None, "Distribució:");
    });

    ui.pop_skin();
}
