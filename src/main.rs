//! Hover Plane - Main Entry Point
//!
//! A jittered, gently oscillating grid plane whose triangles light up under
//! the pointer and fade back to their base color.

use std::sync::Arc;
use std::time::{Duration, Instant};

use hover_plane::telemetry::{init_logging, LogConfig};
use hover_plane::{App, SceneSettings};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, WindowAttributes, WindowId};

const WINDOW_TITLE: &str = "Hover Plane";
const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;

/// Application state machine
enum AppState {
    /// Initial state before window is created, holding the loaded settings
    Uninitialized(SceneSettings),
    /// Window and graphics context are ready
    Running(Box<App>),
    /// Initialization failed or the app shut down
    Stopped,
}

/// Main application handler implementing winit's ApplicationHandler trait
struct HoverPlaneApp {
    state: AppState,
    next_redraw_at: Instant,
}

impl HoverPlaneApp {
    fn new(settings: SceneSettings) -> Self {
        Self {
            state: AppState::Uninitialized(settings),
            next_redraw_at: Instant::now(),
        }
    }
}

impl ApplicationHandler for HoverPlaneApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Uninitialized(settings) = &self.state else {
            return;
        };
        let settings = settings.clone();

        let window_attributes = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("Failed to create window: {}", e);
                self.state = AppState::Stopped;
                event_loop.exit();
                return;
            }
        };

        tracing::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        match pollster::block_on(App::new(window, settings)) {
            Ok(app) => {
                tracing::info!("Press ESC to exit, F11 for fullscreen, H to toggle the panel");
                self.state = AppState::Running(Box::new(app));
            }
            Err(e) => {
                tracing::error!("Failed to initialize GPU: {}", e);
                self.state = AppState::Stopped;
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let AppState::Running(app) = &mut self.state else {
            return;
        };

        // Let egui handle the event first
        let egui_consumed = app.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }

            // Keyboard shortcuts (only if egui doesn't want them)
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } if !egui_consumed => match key_code {
                KeyCode::Escape => {
                    tracing::info!("Escape pressed, exiting...");
                    event_loop.exit();
                }
                KeyCode::F11 => {
                    let window = app.window();
                    if window.fullscreen().is_some() {
                        window.set_fullscreen(None);
                        tracing::info!("Exiting fullscreen");
                    } else {
                        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                        tracing::info!("Entering fullscreen");
                    }
                }
                KeyCode::KeyH => app.toggle_panel(),
                _ => {}
            },

            WindowEvent::Resized(physical_size) => {
                app.resize(physical_size);
            }

            WindowEvent::RedrawRequested => {
                app.update();

                match app.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        tracing::warn!("Surface lost, reconfiguring...");
                        app.recover_surface();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(e) => {
                        tracing::warn!("Surface error: {:?}", e);
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let AppState::Running(app) = &mut self.state else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };

        // Drive redraws at target FPS
        let frame_duration = Duration::from_nanos(1_000_000_000u64 / app.target_fps().max(1) as u64);
        let now = Instant::now();

        if now >= self.next_redraw_at {
            app.window().request_redraw();
            self.next_redraw_at += frame_duration;

            // Reset if too far behind
            if now > self.next_redraw_at + frame_duration * 2 {
                self.next_redraw_at = now + frame_duration;
            }
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_redraw_at));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let AppState::Running(app) = &mut self.state {
            app.save_settings();
        }
        self.state = AppState::Stopped;
        tracing::info!("Shutdown complete");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = match init_logging(&LogConfig::default()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("Hover Plane v{}", env!("CARGO_PKG_VERSION"));

    let settings = SceneSettings::load();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = HoverPlaneApp::new(settings);
    event_loop.run_app(&mut app)?;

    Ok(())
}
