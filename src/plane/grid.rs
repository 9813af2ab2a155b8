//! Grid parameters and flat plane geometry
//!
//! Generates the row-major vertex grid and triangle indices for the plane.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Allowed range for plane width and height (world units)
pub const SIZE_RANGE: std::ops::RangeInclusive<f32> = 1.0..=500.0;

/// Allowed range for segment counts along either axis
pub const SEGMENT_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Dimensions and resolution of the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Plane width along X
    #[serde(rename = "width", default = "default_size")]
    pub width: f32,
    /// Plane height along Y
    #[serde(rename = "height", default = "default_size")]
    pub height: f32,
    /// Number of cells along X
    #[serde(rename = "widthSegments", default = "default_segments")]
    pub width_segments: u32,
    /// Number of cells along Y
    #[serde(rename = "heightSegments", default = "default_segments")]
    pub height_segments: u32,
}

fn default_size() -> f32 {
    400.0
}

fn default_segments() -> u32 {
    50
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            width: default_size(),
            height: default_size(),
            width_segments: default_segments(),
            height_segments: default_segments(),
        }
    }
}

impl GridParams {
    /// Clamp every field into its configured range
    pub fn clamp(&mut self) {
        let (min_size, max_size) = (*SIZE_RANGE.start(), *SIZE_RANGE.end());
        let (min_seg, max_seg) = (*SEGMENT_RANGE.start(), *SEGMENT_RANGE.end());

        // NaN would survive f32::clamp
        if self.width.is_nan() {
            self.width = default_size();
        }
        if self.height.is_nan() {
            self.height = default_size();
        }

        self.width = self.width.clamp(min_size, max_size);
        self.height = self.height.clamp(min_size, max_size);
        self.width_segments = self.width_segments.clamp(min_seg, max_seg);
        self.height_segments = self.height_segments.clamp(min_seg, max_seg);
    }

    /// Return a clamped copy
    pub fn clamped(mut self) -> Self {
        self.clamp();
        self
    }

    /// Vertex count for these parameters
    pub fn vertex_count(&self) -> usize {
        (self.width_segments as usize + 1) * (self.height_segments as usize + 1)
    }

    /// Triangle count for these parameters
    pub fn triangle_count(&self) -> usize {
        self.width_segments as usize * self.height_segments as usize * 2
    }
}

/// Flat plane positions and triangle indices
#[derive(Debug, Clone)]
pub struct PlaneGeometry {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl PlaneGeometry {
    /// Build a flat grid on the XY plane centered at the origin.
    ///
    /// Rows run from the top edge (+Y) downward and columns from the left
    /// edge (-X) rightward, so vertex 0 is the top-left corner.
    pub fn new(params: &GridParams) -> Self {
        let grid_x = params.width_segments.max(1);
        let grid_y = params.height_segments.max(1);
        let grid_x1 = grid_x + 1;
        let grid_y1 = grid_y + 1;

        let half_width = params.width / 2.0;
        let half_height = params.height / 2.0;
        let cell_width = params.width / grid_x as f32;
        let cell_height = params.height / grid_y as f32;

        let mut positions = Vec::with_capacity(params.vertex_count());
        for iy in 0..grid_y1 {
            let y = iy as f32 * cell_height - half_height;
            for ix in 0..grid_x1 {
                let x = ix as f32 * cell_width - half_width;
                positions.push(Vec3::new(x, -y, 0.0));
            }
        }

        let mut indices = Vec::with_capacity(params.triangle_count() * 3);
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + grid_x1 * iy;
                let b = ix + grid_x1 * (iy + 1);
                let c = (ix + 1) + grid_x1 * (iy + 1);
                let d = (ix + 1) + grid_x1 * iy;

                indices.extend_from_slice(&[a, b, d]);
                indices.extend_from_slice(&[b, c, d]);
            }
        }

        Self { positions, indices }
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_and_index_counts() {
        let params = GridParams {
            width: 10.0,
            height: 6.0,
            width_segments: 4,
            height_segments: 3,
        };
        let geometry = PlaneGeometry::new(&params);
        assert_eq!(geometry.vertex_count(), 20); // 5 * 4
        assert_eq!(geometry.vertex_count(), params.vertex_count());
        assert_eq!(geometry.triangle_count(), 24); // 4 * 3 * 2
        assert_eq!(geometry.triangle_count(), params.triangle_count());
    }

    #[test]
    fn test_default_counts() {
        let geometry = PlaneGeometry::new(&GridParams::default());
        assert_eq!(geometry.vertex_count(), 2601); // 51 * 51
    }

    #[test]
    fn test_corner_layout() {
        let params = GridParams {
            width: 4.0,
            height: 2.0,
            width_segments: 2,
            height_segments: 1,
        };
        let geometry = PlaneGeometry::new(&params);

        // Top-left first, bottom-right last
        assert_eq!(geometry.positions[0], Vec3::new(-2.0, 1.0, 0.0));
        assert_eq!(geometry.positions[2], Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(geometry.positions[5], Vec3::new(2.0, -1.0, 0.0));
        assert!(geometry.positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_cell_winding() {
        let params = GridParams {
            width: 1.0,
            height: 1.0,
            width_segments: 1,
            height_segments: 1,
        };
        let geometry = PlaneGeometry::new(&params);
        assert_eq!(geometry.indices, vec![0, 2, 1, 2, 3, 1]);
        assert_eq!(geometry.triangle_count(), 2);
    }

    #[test]
    fn test_clamp() {
        let mut params = GridParams {
            width: 900.0,
            height: 0.0,
            width_segments: 0,
            height_segments: 250,
        };
        params.clamp();
        assert_eq!(params.width, 500.0);
        assert_eq!(params.height, 1.0);
        assert_eq!(params.width_segments, 1);
        assert_eq!(params.height_segments, 100);

        let mut nan = GridParams {
            width: f32::NAN,
            ..GridParams::default()
        };
        nan.clamp();
        assert_eq!(nan.width, 400.0);
    }

    #[test]
    fn test_height_segments_change() {
        let mut params = GridParams::default();
        assert_eq!(params.vertex_count(), 2601);
        params.height_segments = 10;
        assert_eq!(params.vertex_count(), 561); // 51 * 11
    }
}
