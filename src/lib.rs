//! Hover Plane
//!
//! A deformed grid plane rendered with wgpu. Vertices are jittered once and
//! then oscillate around their rest positions; triangles under the pointer
//! flash a highlight color and ease back to the base color. An egui panel
//! rebuilds the plane when its dimensions or subdivisions change.

pub mod app;
pub mod gpu_context;
pub mod plane;
pub mod scene;
pub mod settings;
pub mod telemetry;
pub mod ui;

pub use app::App;
pub use gpu_context::{GpuContext, GpuError};
pub use settings::{SceneSettings, SettingsError};
