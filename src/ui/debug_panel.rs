//! Debug Panel
//!
//! Floating egui window with the plane parameter sliders, hover easing and
//! frame statistics. Changes are reported as actions and applied by the app.

use egui::PointerButton;

use crate::plane::grid::{SEGMENT_RANGE, SIZE_RANGE};
use crate::plane::{Easing, GridParams, HoverSettings};
use crate::telemetry::FrameStats;

/// Actions that can be returned from the debug panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelAction {
    SetWidth(f32),
    SetHeight(f32),
    SetWidthSegments(u32),
    SetHeightSegments(u32),
    /// Change the highlight fade curve
    SetEasing(Easing),
    /// Return the camera to its initial position
    ResetCamera,
}

impl PanelAction {
    /// Apply a plane parameter change to `params`.
    ///
    /// Returns true when the (clamped) parameters differ afterwards and the
    /// mesh must be rebuilt.
    pub fn apply_to_grid(&self, params: &mut GridParams) -> bool {
        let before = *params;
        match *self {
            PanelAction::SetWidth(width) => params.width = width,
            PanelAction::SetHeight(height) => params.height = height,
            PanelAction::SetWidthSegments(segments) => params.width_segments = segments,
            PanelAction::SetHeightSegments(segments) => params.height_segments = segments,
            PanelAction::SetEasing(_) | PanelAction::ResetCamera => return false,
        }
        params.clamp();
        *params != before
    }
}

/// Live values shown in the statistics section
#[derive(Debug, Clone, Default)]
pub struct PanelStats {
    pub fps: f64,
    pub target_fps: u32,
    pub frame: FrameStats,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub active_eases: usize,
    /// Animation clock
    pub time: f32,
}

/// State for the debug panel
pub struct DebugPanel {
    /// Whether the panel is open
    pub open: bool,
    show_stats: bool,
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DebugPanel {
    pub fn new(open: bool) -> Self {
        Self {
            open,
            show_stats: true,
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Show the panel window
    ///
    /// Returns a list of actions to be handled by the app.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        params: &GridParams,
        hover: &HoverSettings,
        stats: &PanelStats,
    ) -> Vec<PanelAction> {
        let mut actions = Vec::new();
        if !self.open {
            return actions;
        }

        let mut open = self.open;
        egui::Window::new("Plane")
            .open(&mut open)
            .default_pos(egui::pos2(12.0, 12.0))
            .resizable(false)
            .show(ctx, |ui| {
                self.render_contents(ui, params, hover, stats, &mut actions);
            });
        self.open = open;

        actions
    }

    /// Render the panel contents
    pub fn render_contents(
        &mut self,
        ui: &mut egui::Ui,
        params: &GridParams,
        hover: &HoverSettings,
        stats: &PanelStats,
        actions: &mut Vec<PanelAction>,
    ) {
        render_plane_params(ui, params, actions);

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(4.0);

        render_hover_params(ui, hover, actions);

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Camera").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.small_button("Reset").clicked() {
                    actions.push(PanelAction::ResetCamera);
                }
            });
        });
        ui.label(egui::RichText::new("Drag to orbit, scroll to zoom").small().weak());

        ui.add_space(8.0);
        ui.separator();
        ui.add_space(4.0);

        ui.checkbox(&mut self.show_stats, "Statistics");
        if self.show_stats {
            render_stats(ui, stats);
        }

        ui.add_space(4.0);
        ui.label(egui::RichText::new("H to hide, F11 fullscreen").small().weak());
    }
}

fn render_plane_params(ui: &mut egui::Ui, params: &GridParams, actions: &mut Vec<PanelAction>) {
    let defaults = GridParams::default();

    ui.label(egui::RichText::new("Plane").strong());
    ui.add_space(4.0);

    let mut width = params.width;
    let response = ui.add(
        egui::Slider::new(&mut width, SIZE_RANGE)
            .step_by(1.0)
            .text("Width"),
    );
    if response.changed() {
        actions.push(PanelAction::SetWidth(width));
    }
    // Right-click resets to the default
    if response.clicked_by(PointerButton::Secondary) {
        actions.push(PanelAction::SetWidth(defaults.width));
    }

    let mut height = params.height;
    let response = ui.add(
        egui::Slider::new(&mut height, SIZE_RANGE)
            .step_by(1.0)
            .text("Height"),
    );
    if response.changed() {
        actions.push(PanelAction::SetHeight(height));
    }
    if response.clicked_by(PointerButton::Secondary) {
        actions.push(PanelAction::SetHeight(defaults.height));
    }

    let mut width_segments = params.width_segments;
    let response = ui.add(
        egui::Slider::new(&mut width_segments, SEGMENT_RANGE)
            .step_by(1.0)
            .text("Width segments"),
    );
    if response.changed() {
        actions.push(PanelAction::SetWidthSegments(width_segments));
    }
    if response.clicked_by(PointerButton::Secondary) {
        actions.push(PanelAction::SetWidthSegments(defaults.width_segments));
    }

    let mut height_segments = params.height_segments;
    let response = ui.add(
        egui::Slider::new(&mut height_segments, SEGMENT_RANGE)
            .step_by(1.0)
            .text("Height segments"),
    );
    if response.changed() {
        actions.push(PanelAction::SetHeightSegments(height_segments));
    }
    if response.clicked_by(PointerButton::Secondary) {
        actions.push(PanelAction::SetHeightSegments(defaults.height_segments));
    }
}

fn render_hover_params(ui: &mut egui::Ui, hover: &HoverSettings, actions: &mut Vec<PanelAction>) {
    ui.label(egui::RichText::new("Hover").strong());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.label("Fade:");
        egui::ComboBox::from_id_salt("hover_easing")
            .selected_text(hover.easing.display_name())
            .show_ui(ui, |ui| {
                for easing in Easing::all() {
                    let is_selected = hover.easing == *easing;
                    if ui
                        .selectable_label(is_selected, easing.display_name())
                        .clicked()
                        && !is_selected
                    {
                        actions.push(PanelAction::SetEasing(*easing));
                    }
                }
            });
    });

    ui.horizontal(|ui| {
        color_swatch(ui, hover.highlight_color.to_color32());
        ui.label(egui::RichText::new("→").weak());
        color_swatch(ui, hover.base_color.to_color32());
        ui.label(
            egui::RichText::new(format!("{:.1} s", hover.ease_duration))
                .small()
                .weak(),
        );
    });
}

fn color_swatch(ui: &mut egui::Ui, color: egui::Color32) {
    let (rect, _response) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::hover());
    if ui.is_rect_visible(rect) {
        ui.painter().rect_filled(rect, 2.0, color);
    }
}

fn render_stats(ui: &mut egui::Ui, stats: &PanelStats) {
    let fps_color = fps_color(stats.fps, stats.target_fps);
    ui.horizontal(|ui| {
        ui.label("FPS:");
        ui.label(
            egui::RichText::new(format!("{:.1}", stats.fps))
                .color(fps_color)
                .monospace(),
        );
        ui.label(
            egui::RichText::new(format!("/ {}", stats.target_fps))
                .color(egui::Color32::GRAY)
                .small(),
        );
    });

    egui::Grid::new("plane_stats_grid")
        .num_columns(2)
        .spacing([16.0, 2.0])
        .show(ui, |ui| {
            ui.label("Frame avg");
            ui.monospace(format!("{:.2} ms", stats.frame.avg_ms));
            ui.end_row();

            ui.label("Frame min/max");
            ui.monospace(format!("{:.2} / {:.2} ms", stats.frame.min_ms, stats.frame.max_ms));
            ui.end_row();

            ui.label("Frame p95");
            ui.monospace(format!("{:.2} ms", stats.frame.p95_ms));
            ui.end_row();

            ui.label("Vertices");
            ui.monospace(stats.vertex_count.to_string());
            ui.end_row();

            ui.label("Triangles");
            ui.monospace(stats.triangle_count.to_string());
            ui.end_row();

            ui.label("Active fades");
            ui.monospace(stats.active_eases.to_string());
            ui.end_row();

            ui.label("Time");
            ui.monospace(format!("{:.2}", stats.time));
            ui.end_row();
        });
}

/// Color code FPS against the target
fn fps_color(fps: f64, target_fps: u32) -> egui::Color32 {
    let ratio = fps / target_fps.max(1) as f64;

    if ratio >= 0.95 {
        egui::Color32::from_rgb(100, 255, 100)
    } else if ratio >= 0.8 {
        egui::Color32::from_rgb(255, 230, 100)
    } else if ratio >= 0.5 {
        egui::Color32::from_rgb(255, 150, 80)
    } else {
        egui::Color32::from_rgb(255, 80, 80)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_segments_change_regenerates() {
        let mut params = GridParams::default();
        assert!(PanelAction::SetHeightSegments(10).apply_to_grid(&mut params));
        assert_eq!(params.height_segments, 10);
        assert_eq!(params.vertex_count(), 561);
    }

    #[test]
    fn test_width_change_regenerates() {
        let mut params = GridParams::default();
        assert!(PanelAction::SetWidth(200.0).apply_to_grid(&mut params));
        assert_eq!(params.width, 200.0);
        assert_eq!(params.height, 400.0);
    }

    #[test]
    fn test_unchanged_value_is_noop() {
        let mut params = GridParams::default();
        assert!(!PanelAction::SetWidthSegments(50).apply_to_grid(&mut params));
        assert!(!PanelAction::ResetCamera.apply_to_grid(&mut params));
        assert!(!PanelAction::SetEasing(Easing::Linear).apply_to_grid(&mut params));
        assert_eq!(params, GridParams::default());
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut params = GridParams::default();
        assert!(PanelAction::SetHeight(0.0).apply_to_grid(&mut params));
        assert_eq!(params.height, 1.0);
        assert!(PanelAction::SetWidthSegments(1000).apply_to_grid(&mut params));
        assert_eq!(params.width_segments, 100);
        // Already at the maximum after clamping
        assert!(!PanelAction::SetWidthSegments(200).apply_to_grid(&mut params));
    }

    #[test]
    fn test_fps_color() {
        assert_eq!(fps_color(60.0, 60), egui::Color32::from_rgb(100, 255, 100));
        assert_eq!(fps_color(10.0, 60), egui::Color32::from_rgb(255, 80, 80));
        assert_eq!(fps_color(0.0, 0), egui::Color32::from_rgb(255, 80, 80));
    }

    #[test]
    fn test_panel_without_input_emits_nothing() {
        let ctx = egui::Context::default();
        let mut panel = DebugPanel::default();
        let params = GridParams::default();
        let hover = HoverSettings::default();
        let stats = PanelStats::default();

        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = panel.show(ctx, &params, &hover, &stats);
        });
        assert!(actions.is_empty());
        assert!(panel.open);
    }

    #[test]
    fn test_hidden_panel_emits_nothing() {
        let ctx = egui::Context::default();
        let mut panel = DebugPanel::new(false);
        let mut actions = vec![PanelAction::ResetCamera];
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions = panel.show(ctx, &GridParams::default(), &HoverSettings::default(), &PanelStats::default());
        });
        assert!(actions.is_empty());
        panel.toggle();
        assert!(panel.open);
    }
}
