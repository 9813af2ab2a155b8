//! Application state
//!
//! Ties the GPU context, plane renderer, orbit camera, mesh animator and the
//! egui debug panel together and drives them once per frame.

use std::sync::Arc;

use glam::Vec2;
use rand::rngs::ThreadRng;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::window::Window;

use crate::gpu_context::{GpuContext, GpuError};
use crate::plane::MeshAnimator;
use crate::scene::{OrbitCamera, PlaneRenderer};
use crate::settings::SceneSettings;
use crate::telemetry::FrameProfiler;
use crate::ui::{DebugPanel, PanelAction, PanelStats};

/// Radians of orbit per pixel of drag
const ORBIT_SENSITIVITY: f32 = 0.005;
/// Pixels of trackpad scroll per wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Convert a cursor position in physical pixels to normalized device
/// coordinates (+Y up). Returns `None` for an empty window.
pub fn cursor_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Option<Vec2> {
    if width == 0 || height == 0 {
        return None;
    }
    let ndc_x = (x / width as f64) * 2.0 - 1.0;
    let ndc_y = -(y / height as f64) * 2.0 + 1.0;
    Some(Vec2::new(ndc_x as f32, ndc_y as f32))
}

/// Tessellated egui output waiting to be painted
struct UiFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen: egui_wgpu::ScreenDescriptor,
}

/// Main application state
pub struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: PlaneRenderer,
    camera: OrbitCamera,
    animator: MeshAnimator,
    rng: ThreadRng,
    settings: SceneSettings,

    // Input
    /// Pointer in NDC, `None` until the cursor enters the window
    pointer: Option<Vec2>,
    cursor_position: Option<PhysicalPosition<f64>>,
    orbiting: bool,
    panning: bool,

    // Frame timing
    profiler: FrameProfiler,

    // egui integration
    panel: DebugPanel,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl App {
    /// Create the GPU context, renderer and initial mesh for `window`
    pub async fn new(window: Arc<Window>, settings: SceneSettings) -> Result<Self, GpuError> {
        let mut settings = settings;
        settings.clamp();

        let gpu = GpuContext::new(window.clone()).await?;
        let (width, height) = gpu.size();

        let renderer = PlaneRenderer::new(&gpu.device, gpu.format(), width, height);

        let mut camera = OrbitCamera::new(&settings.camera);
        camera.set_aspect(width as f32 / height as f32);

        let mut rng = rand::rng();
        let animator = MeshAnimator::new(settings.plane, settings.animation, settings.hover, &mut rng);

        let egui_ctx = egui::Context::default();
        let mut style = (*egui_ctx.style()).clone();
        style.visuals.window_shadow = egui::epaint::Shadow::NONE;
        egui_ctx.set_style(style);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        let panel = DebugPanel::new(settings.show_debug_panel);

        Ok(Self {
            window,
            gpu,
            renderer,
            camera,
            animator,
            rng,
            settings,
            pointer: None,
            cursor_position: None,
            orbiting: false,
            panning: false,
            profiler: FrameProfiler::new(),
            panel,
            egui_ctx,
            egui_state,
            egui_renderer,
        })
    }

    /// Handle a window event, returning true if egui consumed it
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        let consumed = self.egui_state.on_window_event(&self.window, event).consumed;

        match event {
            WindowEvent::CursorMoved { position, .. } => self.on_cursor_moved(*position),
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
                self.cursor_position = None;
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed if !consumed => self.orbiting = true,
                ElementState::Released => self.orbiting = false,
                _ => {}
            },
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => match state {
                ElementState::Pressed if !consumed => self.panning = true,
                ElementState::Released => self.panning = false,
                _ => {}
            },
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.camera.on_scroll(lines);
            }
            _ => {}
        }

        consumed
    }

    fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let (width, height) = self.gpu.size();
        if let Some(last) = self.cursor_position {
            let delta = ((position.x - last.x) as f32, (position.y - last.y) as f32);
            if self.orbiting {
                self.camera.on_mouse_drag(delta, ORBIT_SENSITIVITY);
            } else if self.panning {
                self.camera.on_pan(delta, height as f32);
            }
        }
        self.cursor_position = Some(position);

        self.pointer = cursor_to_ndc(position.x, position.y, width, height);
    }

    /// Resize the surface, depth buffer and camera aspect
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if !self.gpu.resize(new_size.width, new_size.height) {
            return;
        }
        self.renderer
            .resize(&self.gpu.device, new_size.width, new_size.height);
        self.camera
            .set_aspect(new_size.width as f32 / new_size.height as f32);
    }

    /// Reconfigure the surface at its current size after it was lost
    pub fn recover_surface(&mut self) {
        self.gpu.reconfigure();
    }

    /// Advance the animation by one frame
    pub fn update(&mut self) {
        let delta = self.profiler.begin_frame();

        self.animator.tick();
        self.animator.update_eases(delta);

        if let Some(pointer) = self.pointer {
            let ray = self.camera.ray_from_ndc(pointer);
            if let Some(hit) = self.animator.hover(&ray) {
                tracing::trace!(triangle = hit.triangle, distance = hit.distance, "Hover hit");
            }
        }
    }

    /// Render the plane and the debug panel
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Panel actions may regenerate the mesh before it is uploaded
        let ui = self.run_ui();

        self.renderer.prepare(
            &self.gpu.device,
            &self.gpu.queue,
            &mut self.animator,
            &self.camera,
        );

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        self.renderer.render(&mut encoder, &view);
        let ui_commands = self.paint_ui(&mut encoder, &view, ui);

        self.gpu
            .queue
            .submit(ui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
    }

    fn run_ui(&mut self) -> UiFrame {
        let raw_input = self.egui_state.take_egui_input(&self.window);

        let frame = self.profiler.stats();
        let stats = PanelStats {
            fps: self.profiler.fps(),
            target_fps: self.settings.target_fps,
            frame,
            vertex_count: self.animator.vertex_count(),
            triangle_count: self.animator.triangle_count(),
            active_eases: self.animator.active_eases(),
            time: self.animator.time(),
        };
        let params = *self.animator.params();
        let hover = self.settings.hover;

        let mut actions = Vec::new();
        let ctx = self.egui_ctx.clone();
        let full_output = ctx.run(raw_input, |ctx| {
            actions = self.panel.show(ctx, &params, &hover, &stats);
        });

        self.egui_state
            .handle_platform_output(&self.window, full_output.platform_output);

        self.apply_panel_actions(actions);

        let paint_jobs = ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = self.gpu.size();

        UiFrame {
            paint_jobs,
            textures_delta: full_output.textures_delta,
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [width, height],
                pixels_per_point: full_output.pixels_per_point,
            },
        }
    }

    fn paint_ui(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        ui: UiFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &ui.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.gpu.device, &self.gpu.queue, *id, image_delta);
        }

        let commands = self.egui_renderer.update_buffers(
            &self.gpu.device,
            &self.gpu.queue,
            encoder,
            &ui.paint_jobs,
            &ui.screen,
        );

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut render_pass, &ui.paint_jobs, &ui.screen);
        }

        for id in &ui.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        commands
    }

    fn apply_panel_actions(&mut self, actions: Vec<PanelAction>) {
        let mut params = *self.animator.params();
        let mut regenerate = false;

        for action in actions {
            match action {
                PanelAction::SetEasing(easing) => {
                    self.settings.hover.easing = easing;
                    self.animator.set_hover_settings(self.settings.hover);
                }
                PanelAction::ResetCamera => self.camera.reset(),
                grid_action => regenerate |= grid_action.apply_to_grid(&mut params),
            }
        }

        if regenerate {
            self.settings.plane = params;
            self.animator.regenerate(params, &mut self.rng);
            tracing::info!(
                width = params.width,
                height = params.height,
                width_segments = params.width_segments,
                height_segments = params.height_segments,
                "Plane parameters changed"
            );
        }
    }

    /// Show or hide the debug panel
    pub fn toggle_panel(&mut self) {
        self.panel.toggle();
    }

    /// Persist the current settings to the config directory
    pub fn save_settings(&mut self) {
        self.settings.show_debug_panel = self.panel.open;
        match self.settings.save() {
            Ok(path) => tracing::info!("Saved settings to {}", path.display()),
            Err(e) => tracing::warn!("Failed to save settings: {}", e),
        }
    }

    pub fn target_fps(&self) -> u32 {
        self.settings.target_fps
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_to_ndc() {
        let center = cursor_to_ndc(640.0, 360.0, 1280, 720).unwrap();
        assert_eq!(center, Vec2::ZERO);

        let top_left = cursor_to_ndc(0.0, 0.0, 1280, 720).unwrap();
        assert_eq!(top_left, Vec2::new(-1.0, 1.0));

        let bottom_right = cursor_to_ndc(1280.0, 720.0, 1280, 720).unwrap();
        assert_eq!(bottom_right, Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_cursor_to_ndc_empty_window() {
        assert!(cursor_to_ndc(10.0, 10.0, 0, 720).is_none());
    }
}
