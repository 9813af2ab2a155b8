//! Color eases for hovered triangles
//!
//! Each ease owns the three vertex-color slots of one triangle and
//! interpolates them from a start color to a target color over a fixed
//! duration. Eases are independent: a new hover on the same triangle adds a
//! second ease instead of replacing the first.

use serde::{Deserialize, Serialize};

use super::color::Rgb;

/// Fraction of the duration treated as rounding error when stepping.
/// Summing per-frame deltas in f32 lands a few ulps short of the end.
const FINISH_TOLERANCE: f32 = 1e-4;

/// Easing curve applied to linear progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out, fast start and gentle landing
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress in [0, 1] to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Easing::Linear => "Linear",
            Easing::EaseOut => "Ease Out",
            Easing::EaseInOut => "Ease In/Out",
        }
    }

    /// Get all easings for iteration
    pub fn all() -> &'static [Easing] {
        &[Easing::Linear, Easing::EaseOut, Easing::EaseInOut]
    }
}

/// One in-flight color interpolation targeting a single triangle
#[derive(Debug, Clone)]
pub struct ColorEase {
    /// Vertex indices whose colors this ease writes
    face: [u32; 3],
    from: Rgb,
    to: Rgb,
    /// Seconds elapsed since the ease started
    elapsed: f32,
    /// Total duration in seconds
    duration: f32,
    easing: Easing,
}

impl ColorEase {
    /// Linear progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    /// Color at the current progress
    pub fn current(&self) -> Rgb {
        self.from.lerp(self.to, self.easing.apply(self.progress()))
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    fn advance(&mut self, delta_time: f32) {
        self.elapsed += delta_time.max(0.0);
        if self.duration - self.elapsed <= self.duration * FINISH_TOLERANCE {
            self.elapsed = self.duration;
        }
    }

    fn write(&self, colors: &mut [Rgb]) {
        let color = self.current();
        for &vertex in &self.face {
            if let Some(slot) = colors.get_mut(vertex as usize) {
                *slot = color;
            }
        }
    }
}

/// Collection of independent color eases, stepped together
#[derive(Debug, Default)]
pub struct EaseSet {
    eases: Vec<ColorEase>,
}

impl EaseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new ease on `face`
    pub fn spawn(&mut self, face: [u32; 3], from: Rgb, to: Rgb, duration: f32, easing: Easing) {
        self.eases.push(ColorEase {
            face,
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
            easing,
        });
    }

    /// Advance every ease and write its color into `colors`.
    ///
    /// Eases are applied in creation order, so the most recent one wins when
    /// several target the same vertex. Finished eases write their target
    /// color one last time and are dropped. Returns the number that finished.
    pub fn update(&mut self, delta_time: f32, colors: &mut [Rgb]) -> usize {
        for ease in &mut self.eases {
            ease.advance(delta_time);
            ease.write(colors);
        }

        let before = self.eases.len();
        self.eases.retain(|ease| !ease.is_finished());
        before - self.eases.len()
    }

    /// Number of eases still running
    pub fn len(&self) -> usize {
        self.eases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eases.is_empty()
    }

    /// Drop every running ease
    pub fn clear(&mut self) {
        self.eases.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in Easing::all() {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_ease_out_shape() {
        // Quadratic ease-out is ahead of linear halfway through
        assert!((Easing::EaseOut.apply(0.5) - 0.75).abs() < 1e-6);
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::Linear.apply(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_ease_completes_after_duration() {
        let mut colors = vec![Rgb::HIGHLIGHT; 4];
        let mut set = EaseSet::new();
        set.spawn([0, 1, 2], Rgb::HIGHLIGHT, Rgb::BASE, 1.0, Easing::EaseOut);

        let finished = set.update(0.5, &mut colors);
        assert_eq!(finished, 0);
        assert_eq!(set.len(), 1);
        assert_ne!(colors[0], Rgb::BASE);
        assert_ne!(colors[0], Rgb::HIGHLIGHT);

        let finished = set.update(0.5, &mut colors);
        assert_eq!(finished, 1);
        assert!(set.is_empty());
        assert_eq!(colors[0], Rgb::BASE);
        assert_eq!(colors[1], Rgb::BASE);
        assert_eq!(colors[2], Rgb::BASE);
        // Untouched vertex
        assert_eq!(colors[3], Rgb::HIGHLIGHT);
    }

    #[test]
    fn test_overlapping_eases_latest_wins() {
        let mut colors = vec![Rgb::BASE; 3];
        let mut set = EaseSet::new();
        set.spawn([0, 1, 2], Rgb::HIGHLIGHT, Rgb::BASE, 1.0, Easing::Linear);
        set.update(0.5, &mut colors);
        set.spawn([0, 1, 2], Rgb::HIGHLIGHT, Rgb::BASE, 1.0, Easing::Linear);
        assert_eq!(set.len(), 2);

        // First is at 0.6, second at 0.1; the second writes last
        set.update(0.1, &mut colors);
        let expected = Rgb::HIGHLIGHT.lerp(Rgb::BASE, 0.1);
        assert!((colors[0].g - expected.g).abs() < 1e-5);

        // First finishes, second keeps running
        let finished = set.update(0.5, &mut colors);
        assert_eq!(finished, 1);
        assert_eq!(set.len(), 1);
        let expected = Rgb::HIGHLIGHT.lerp(Rgb::BASE, 0.6);
        assert!((colors[0].g - expected.g).abs() < 1e-5);
    }

    #[test]
    fn test_frame_steps_finish_on_last_frame() {
        for fps in [60u32, 144] {
            let mut colors = vec![Rgb::HIGHLIGHT; 3];
            let mut set = EaseSet::new();
            set.spawn([0, 1, 2], Rgb::HIGHLIGHT, Rgb::BASE, 1.0, Easing::EaseOut);

            let delta = 1.0 / fps as f32;
            let mut finished = 0;
            for _ in 0..fps {
                finished += set.update(delta, &mut colors);
            }
            assert_eq!(finished, 1, "{fps} fps");
            assert!(set.is_empty());
            assert_eq!(colors[0], Rgb::BASE);
        }
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut colors = vec![Rgb::HIGHLIGHT; 3];
        let mut set = EaseSet::new();
        set.spawn([0, 1, 2], Rgb::HIGHLIGHT, Rgb::BASE, 0.0, Easing::EaseOut);
        assert_eq!(set.update(0.0, &mut colors), 1);
        assert_eq!(colors[2], Rgb::BASE);
    }

    #[test]
    fn test_out_of_range_face_is_ignored() {
        let mut colors = vec![Rgb::HIGHLIGHT; 2];
        let mut set = EaseSet::new();
        set.spawn([0, 1, 9], Rgb::HIGHLIGHT, Rgb::BASE, 1.0, Easing::Linear);
        set.update(1.0, &mut colors);
        assert_eq!(colors, vec![Rgb::BASE; 2]);
    }
}
