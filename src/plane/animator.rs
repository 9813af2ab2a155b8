//! Mesh animator
//!
//! Owns the plane mesh together with its per-vertex rest positions, phases
//! and colors. Jitters the grid once per (re)generation, displaces it every
//! tick, and runs the hover highlight eases.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::color::Rgb;
use super::ease::EaseSet;
use super::grid::{GridParams, PlaneGeometry};
use super::picking::{pick_triangle, Hit, Ray};
use super::types::{AnimationSettings, HoverSettings};

/// Random phase offsets of one vertex, in [0, 2π)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexPhase {
    /// Offset fed to the X cosine
    pub x: f32,
    /// Offset fed to the Y sine
    pub y: f32,
}

/// Animated plane mesh with hover highlighting
pub struct MeshAnimator {
    params: GridParams,
    animation: AnimationSettings,
    hover: HoverSettings,

    /// Live (displaced) positions and triangle indices
    geometry: PlaneGeometry,
    /// Positions right after jitter, parallel to `geometry.positions`
    rest_positions: Vec<Vec3>,
    /// Per-vertex phases, parallel to `geometry.positions`
    phases: Vec<VertexPhase>,
    /// Per-vertex colors, parallel to `geometry.positions`
    colors: Vec<Rgb>,

    eases: EaseSet,
    /// Virtual animation time
    time: f32,
    /// Bumped on every regeneration so GPU buffers can be reallocated
    generation: u64,
    positions_dirty: bool,
    colors_dirty: bool,
}

impl MeshAnimator {
    /// Build and jitter a new plane
    pub fn new<R: Rng + ?Sized>(
        params: GridParams,
        animation: AnimationSettings,
        hover: HoverSettings,
        rng: &mut R,
    ) -> Self {
        let mut animator = Self {
            params,
            animation,
            hover,
            geometry: PlaneGeometry {
                positions: Vec::new(),
                indices: Vec::new(),
            },
            rest_positions: Vec::new(),
            phases: Vec::new(),
            colors: Vec::new(),
            eases: EaseSet::new(),
            time: 0.0,
            generation: 0,
            positions_dirty: true,
            colors_dirty: true,
        };
        animator.regenerate(params, rng);
        animator
    }

    /// Replace the mesh with a freshly jittered grid.
    ///
    /// Rest positions, phases and colors are rebuilt in lockstep with the
    /// positions. Running eases are dropped since their vertex indices refer
    /// to the old grid.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, params: GridParams, rng: &mut R) {
        let params = params.clamped();
        let mut geometry = PlaneGeometry::new(&params);
        let vertex_count = geometry.vertex_count();
        let jitter = self.animation.jitter;

        let mut phases = Vec::with_capacity(vertex_count);
        for (i, position) in geometry.positions.iter_mut().enumerate() {
            // The first vertex keeps its exact grid position
            if i > 0 && jitter > 0.0 {
                position.x += rng.random_range(-jitter..jitter);
                position.y += rng.random_range(-jitter..jitter);
                position.z += rng.random_range(-jitter..jitter);
            }
            phases.push(VertexPhase {
                x: rng.random_range(0.0..TAU),
                y: rng.random_range(0.0..TAU),
            });
        }

        self.rest_positions = geometry.positions.clone();
        self.phases = phases;
        self.colors = vec![self.hover.base_color; vertex_count];
        self.geometry = geometry;
        self.params = params;
        self.eases.clear();
        self.generation += 1;
        self.positions_dirty = true;
        self.colors_dirty = true;

        tracing::debug!(
            width = params.width,
            height = params.height,
            width_segments = params.width_segments,
            height_segments = params.height_segments,
            vertices = vertex_count,
            generation = self.generation,
            "Plane regenerated"
        );
    }

    /// Advance virtual time by one step and displace every vertex
    pub fn tick(&mut self) {
        self.time += self.animation.time_step;
        self.displace(self.time);
    }

    /// Set every vertex to its rest position offset by the oscillation at `time`
    pub fn displace(&mut self, time: f32) {
        let x_amplitude = self.animation.x_amplitude;
        let y_amplitude = self.animation.y_amplitude;

        for ((position, rest), phase) in self
            .geometry
            .positions
            .iter_mut()
            .zip(&self.rest_positions)
            .zip(&self.phases)
        {
            position.x = rest.x + (time + phase.x).cos() * x_amplitude;
            position.y = rest.y + (time + phase.y).sin() * y_amplitude;
            position.z = rest.z;
        }

        self.positions_dirty = true;
    }

    /// Find the triangle under `ray`, if any
    pub fn pick(&self, ray: &Ray) -> Option<Hit> {
        pick_triangle(&self.geometry.positions, &self.geometry.indices, ray)
    }

    /// Highlight a triangle and start its fade back to the base color.
    /// Returns false for a face outside the current mesh.
    pub fn highlight(&mut self, face: [u32; 3]) -> bool {
        if face.iter().any(|&v| v as usize >= self.colors.len()) {
            return false;
        }

        let highlight = self.hover.highlight_color;
        for &vertex in &face {
            self.colors[vertex as usize] = highlight;
        }
        self.colors_dirty = true;

        self.eases.spawn(
            face,
            highlight,
            self.hover.base_color,
            self.hover.ease_duration,
            self.hover.easing,
        );
        true
    }

    /// Pick with `ray` and highlight the hit triangle
    pub fn hover(&mut self, ray: &Ray) -> Option<Hit> {
        let hit = self.pick(ray)?;
        self.highlight(hit.face);
        Some(hit)
    }

    /// Step every running ease by `delta_time` seconds
    pub fn update_eases(&mut self, delta_time: f32) {
        if self.eases.is_empty() {
            return;
        }
        self.eases.update(delta_time, &mut self.colors);
        self.colors_dirty = true;
    }

    /// Apply new hover colors/timing; takes effect on the next hover
    pub fn set_hover_settings(&mut self, hover: HoverSettings) {
        self.hover = hover;
    }

    pub fn params(&self) -> &GridParams {
        &self.params
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.geometry.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.geometry.indices
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    pub fn phases(&self) -> &[VertexPhase] {
        &self.phases
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }

    pub fn active_eases(&self) -> usize {
        self.eases.len()
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether positions or colors changed since the last upload
    pub fn is_dirty(&self) -> bool {
        self.positions_dirty || self.colors_dirty
    }

    /// Mark the current positions and colors as uploaded
    pub fn mark_uploaded(&mut self) {
        self.positions_dirty = false;
        self.colors_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_params() -> GridParams {
        GridParams {
            width: 20.0,
            height: 10.0,
            width_segments: 4,
            height_segments: 2,
        }
    }

    fn animator(params: GridParams) -> MeshAnimator {
        let mut rng = StdRng::seed_from_u64(7);
        MeshAnimator::new(
            params,
            AnimationSettings::default(),
            HoverSettings::default(),
            &mut rng,
        )
    }

    #[test]
    fn test_arrays_match_vertex_count() {
        let animator = animator(small_params());
        assert_eq!(animator.vertex_count(), 15); // 5 * 3
        assert_eq!(animator.rest_positions().len(), 15);
        assert_eq!(animator.phases().len(), 15);
        assert_eq!(animator.colors().len(), 15);
        assert_eq!(animator.generation(), 1);
    }

    #[test]
    fn test_first_vertex_unperturbed() {
        let animator = animator(small_params());
        let flat = PlaneGeometry::new(&small_params());
        assert_eq!(animator.positions()[0], flat.positions[0]);
        assert_eq!(animator.positions()[0], Vec3::new(-10.0, 5.0, 0.0));

        // Every other vertex stays within the jitter bounds and most move
        let mut moved = 0;
        for (jittered, original) in animator.positions().iter().zip(&flat.positions).skip(1) {
            let offset = *jittered - *original;
            assert!(offset.abs().max_element() <= 1.5 + 1e-4);
            if offset != Vec3::ZERO {
                moved += 1;
            }
        }
        assert!(moved > 0);
    }

    #[test]
    fn test_phases_in_range() {
        let animator = animator(GridParams::default());
        assert!(animator
            .phases()
            .iter()
            .all(|p| (0.0..TAU).contains(&p.x) && (0.0..TAU).contains(&p.y)));
    }

    #[test]
    fn test_base_color_assigned() {
        let animator = animator(small_params());
        assert!(animator.colors().iter().all(|c| *c == Rgb::BASE));
    }

    #[test]
    fn test_displacement_at_time_zero() {
        let mut animator = animator(small_params());
        animator.displace(0.0);

        for ((position, rest), phase) in animator
            .positions()
            .iter()
            .zip(animator.rest_positions())
            .zip(animator.phases())
        {
            assert!((position.x - (rest.x + phase.x.cos() * 0.01)).abs() < 1e-6);
            assert!((position.y - (rest.y + phase.y.sin() * 0.001)).abs() < 1e-6);
            assert_eq!(position.z, rest.z);
        }
    }

    #[test]
    fn test_tick_advances_virtual_time() {
        let mut animator = animator(small_params());
        animator.tick();
        animator.tick();
        assert!((animator.time() - 0.02).abs() < 1e-6);

        // Displacement never accumulates into the rest positions
        let rest = animator.rest_positions().to_vec();
        for _ in 0..100 {
            animator.tick();
        }
        assert_eq!(animator.rest_positions(), rest.as_slice());
        for (position, rest) in animator.positions().iter().zip(&rest) {
            assert!((position.x - rest.x).abs() <= 0.01 + 1e-5);
            assert!((position.y - rest.y).abs() <= 0.001 + 1e-5);
        }
    }

    #[test]
    fn test_highlight_sets_face_colors() {
        let mut animator = animator(small_params());
        let face = [0, 5, 1];
        assert!(animator.highlight(face));
        for &v in &face {
            assert_eq!(animator.colors()[v as usize], Rgb::HIGHLIGHT);
        }
        assert_eq!(animator.colors()[2], Rgb::BASE);
        assert_eq!(animator.active_eases(), 1);
    }

    #[test]
    fn test_highlight_fades_to_base_after_duration() {
        let mut animator = animator(small_params());
        let face = [0, 5, 1];
        animator.highlight(face);

        animator.update_eases(0.25);
        assert_ne!(animator.colors()[0], Rgb::BASE);

        animator.update_eases(0.75);
        for &v in &face {
            assert_eq!(animator.colors()[v as usize], Rgb::BASE);
        }
        assert_eq!(animator.active_eases(), 0);
    }

    #[test]
    fn test_repeat_hover_overlaps() {
        let mut animator = animator(small_params());
        animator.highlight([0, 5, 1]);
        animator.update_eases(0.5);
        animator.highlight([0, 5, 1]);
        assert_eq!(animator.active_eases(), 2);
        assert_eq!(animator.colors()[0], Rgb::HIGHLIGHT);
    }

    #[test]
    fn test_highlight_rejects_stale_face() {
        let mut animator = animator(small_params());
        assert!(!animator.highlight([0, 1, 999]));
        assert_eq!(animator.active_eases(), 0);
    }

    #[test]
    fn test_hover_picks_triangle_under_ray() {
        let mut animator = animator(small_params());
        animator.displace(0.0);

        // Straight down the Z axis through the plane center
        let ray = Ray::new(Vec3::new(0.0, 0.0, 50.0), Vec3::NEG_Z);
        let hit = animator.hover(&ray).expect("center of the plane should be hit");
        for &v in &hit.face {
            assert_eq!(animator.colors()[v as usize], Rgb::HIGHLIGHT);
        }

        let miss = Ray::new(Vec3::new(500.0, 500.0, 50.0), Vec3::NEG_Z);
        assert!(animator.hover(&miss).is_none());
        assert_eq!(animator.active_eases(), 1);
    }

    #[test]
    fn test_reconfigure_width() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut animator = animator(GridParams::default());
        let before = animator.generation();
        animator.highlight([0, 51, 1]);

        let params = GridParams {
            width: 200.0,
            ..GridParams::default()
        };
        animator.regenerate(params, &mut rng);

        assert_eq!(animator.generation(), before + 1);
        assert_eq!(animator.vertex_count(), 2601);
        assert_eq!(animator.active_eases(), 0);
        assert_eq!(animator.positions()[0], Vec3::new(-100.0, 200.0, 0.0));
        assert!(animator.positions().iter().all(|p| p.x.abs() <= 100.0 + 1.5 + 1e-3));
    }

    #[test]
    fn test_reconfigure_height_segments() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut animator = animator(GridParams::default());
        assert_eq!(animator.vertex_count(), 2601);

        let params = GridParams {
            height_segments: 10,
            ..GridParams::default()
        };
        animator.regenerate(params, &mut rng);

        assert_eq!(animator.vertex_count(), 561);
        assert_eq!(animator.rest_positions().len(), 561);
        assert_eq!(animator.phases().len(), 561);
        assert_eq!(animator.colors().len(), 561);
        assert_eq!(animator.indices().len(), 50 * 10 * 6);
    }

    #[test]
    fn test_regenerate_clamps_params() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut animator = animator(small_params());
        let params = GridParams {
            width: 10_000.0,
            height: 10.0,
            width_segments: 0,
            height_segments: 1,
        };
        animator.regenerate(params, &mut rng);
        assert_eq!(animator.params().width, 500.0);
        assert_eq!(animator.params().width_segments, 1);
        assert_eq!(animator.vertex_count(), 4);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut animator = animator(small_params());
        assert!(animator.is_dirty());
        animator.mark_uploaded();
        assert!(!animator.is_dirty());
        animator.tick();
        assert!(animator.is_dirty());
    }
}
