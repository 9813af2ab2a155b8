//! Plane animation and hover settings
//!
//! Serialized as part of the scene settings file.

use serde::{Deserialize, Serialize};

use super::color::Rgb;
use super::ease::Easing;

/// Vertex jitter and per-frame oscillation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    /// Virtual time added per animation tick
    #[serde(rename = "timeStep", default = "default_time_step")]
    pub time_step: f32,
    /// Amplitude of the cosine offset on X
    #[serde(rename = "xAmplitude", default = "default_x_amplitude")]
    pub x_amplitude: f32,
    /// Amplitude of the sine offset on Y
    #[serde(rename = "yAmplitude", default = "default_y_amplitude")]
    pub y_amplitude: f32,
    /// Half-width of the uniform jitter applied at construction
    #[serde(rename = "jitter", default = "default_jitter")]
    pub jitter: f32,
}

fn default_time_step() -> f32 {
    0.01
}
fn default_x_amplitude() -> f32 {
    0.01
}
fn default_y_amplitude() -> f32 {
    0.001
}
fn default_jitter() -> f32 {
    1.5
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            time_step: default_time_step(),
            x_amplitude: default_x_amplitude(),
            y_amplitude: default_y_amplitude(),
            jitter: default_jitter(),
        }
    }
}

impl AnimationSettings {
    /// Replace negative or non-finite values with defaults
    pub fn sanitize(&mut self) {
        if !self.time_step.is_finite() {
            self.time_step = default_time_step();
        }
        if !self.x_amplitude.is_finite() {
            self.x_amplitude = default_x_amplitude();
        }
        if !self.y_amplitude.is_finite() {
            self.y_amplitude = default_y_amplitude();
        }
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            self.jitter = default_jitter();
        }
    }
}

/// Colors and timing of the hover highlight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverSettings {
    /// Resting vertex color
    #[serde(rename = "baseColor", default = "default_base_color")]
    pub base_color: Rgb,
    /// Color applied to a hovered triangle
    #[serde(rename = "highlightColor", default = "default_highlight_color")]
    pub highlight_color: Rgb,
    /// Seconds for the highlight to fade back to the base color
    #[serde(rename = "easeDuration", default = "default_ease_duration")]
    pub ease_duration: f32,
    /// Fade curve
    #[serde(rename = "easing", default)]
    pub easing: Easing,
}

fn default_base_color() -> Rgb {
    Rgb::BASE
}
fn default_highlight_color() -> Rgb {
    Rgb::HIGHLIGHT
}
fn default_ease_duration() -> f32 {
    1.0
}

impl Default for HoverSettings {
    fn default() -> Self {
        Self {
            base_color: default_base_color(),
            highlight_color: default_highlight_color(),
            ease_duration: default_ease_duration(),
            easing: Easing::default(),
        }
    }
}

impl HoverSettings {
    /// Replace a negative or non-finite duration with the default
    pub fn sanitize(&mut self) {
        if !self.ease_duration.is_finite() || self.ease_duration < 0.0 {
            self.ease_duration = default_ease_duration();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let animation = AnimationSettings::default();
        assert_eq!(animation.time_step, 0.01);
        assert_eq!(animation.x_amplitude, 0.01);
        assert_eq!(animation.y_amplitude, 0.001);
        assert_eq!(animation.jitter, 1.5);

        let hover = HoverSettings::default();
        assert_eq!(hover.base_color, Rgb::new(0.0, 0.19, 0.4));
        assert_eq!(hover.highlight_color, Rgb::new(0.1, 0.5, 1.0));
        assert_eq!(hover.ease_duration, 1.0);
        assert_eq!(hover.easing, Easing::EaseOut);
    }

    #[test]
    fn test_sanitize() {
        let mut animation = AnimationSettings {
            jitter: -2.0,
            time_step: f32::INFINITY,
            ..Default::default()
        };
        animation.sanitize();
        assert_eq!(animation.jitter, 1.5);
        assert_eq!(animation.time_step, 0.01);

        let mut hover = HoverSettings {
            ease_duration: f32::NAN,
            ..Default::default()
        };
        hover.sanitize();
        assert_eq!(hover.ease_duration, 1.0);
    }
}
