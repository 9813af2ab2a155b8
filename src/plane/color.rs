//! Linear RGB vertex colors

use serde::{Deserialize, Serialize};

/// RGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    #[serde(rename = "r")]
    pub r: f32,
    #[serde(rename = "g")]
    pub g: f32,
    #[serde(rename = "b")]
    pub b: f32,
}

impl Rgb {
    /// Dark blue resting color of the plane
    pub const BASE: Rgb = Rgb::new(0.0, 0.19, 0.4);

    /// Light blue applied to a hovered triangle
    pub const HIGHLIGHT: Rgb = Rgb::new(0.1, 0.5, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Interpolate toward `other`; `t = 1` returns `other` exactly
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        if t >= 1.0 {
            return other;
        }
        if t <= 0.0 {
            return self;
        }
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Convert to an egui color for swatches in the debug panel
    pub fn to_color32(self) -> egui::Color32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        egui::Color32::from_rgb(channel(self.r), channel(self.g), channel(self.b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::HIGHLIGHT;
        let b = Rgb::BASE;
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 1.5), b);
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = Rgb::new(0.0, 0.0, 0.0).lerp(Rgb::new(1.0, 0.5, 0.2), 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.25).abs() < 1e-6);
        assert!((mid.b - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_to_color32() {
        assert_eq!(Rgb::new(1.0, 0.0, 2.0).to_color32(), egui::Color32::from_rgb(255, 0, 255));
    }
}
