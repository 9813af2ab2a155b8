//! 3D scene: orbit camera and the wgpu plane renderer

pub mod camera;
pub mod renderer;
pub mod vertex;

pub use camera::OrbitCamera;
pub use renderer::PlaneRenderer;
pub use vertex::PlaneVertex;
