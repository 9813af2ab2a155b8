//! GPU vertex layout for the plane mesh

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::plane::Rgb;

/// Vertex for the plane mesh
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct PlaneVertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Linear RGB color
    pub color: [f32; 3],
}

impl PlaneVertex {
    /// Size of vertex in bytes
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(position: Vec3, color: Rgb) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    /// Vertex buffer layout for wgpu
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // color
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Interleave positions and colors into GPU vertices
pub fn build_vertices(positions: &[Vec3], colors: &[Rgb], out: &mut Vec<PlaneVertex>) {
    out.clear();
    out.extend(
        positions
            .iter()
            .zip(colors.iter())
            .map(|(&position, &color)| PlaneVertex::new(position, color)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        assert_eq!(PlaneVertex::SIZE, 24);
    }

    #[test]
    fn test_build_vertices() {
        let positions = [Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO];
        let colors = [Rgb::BASE, Rgb::HIGHLIGHT];
        let mut out = vec![PlaneVertex::zeroed(); 7];
        build_vertices(&positions, &colors, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(out[0].color, [0.0, 0.19, 0.4]);
        assert_eq!(out[1].color, [0.1, 0.5, 1.0]);
    }
}
