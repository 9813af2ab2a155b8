//! Animated plane mesh
//!
//! Grid generation, per-frame vertex displacement, ray picking and the
//! hover highlight eases. Everything here is CPU-side and GPU-agnostic.

pub mod animator;
pub mod color;
pub mod ease;
pub mod grid;
pub mod picking;
pub mod types;

pub use animator::{MeshAnimator, VertexPhase};
pub use color::Rgb;
pub use ease::{ColorEase, EaseSet, Easing};
pub use grid::{GridParams, PlaneGeometry};
pub use picking::{pick_triangle, Hit, Ray};
pub use types::{AnimationSettings, HoverSettings};
