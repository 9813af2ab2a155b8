//! Ray picking against the plane triangles

use glam::Vec3;

/// Parallel rays closer than this to the triangle plane are treated as misses
const EPSILON: f32 = 1e-7;

/// A ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to triangle `(a, b, c)`, from either side.
    ///
    /// Möller–Trumbore; returns `None` for misses and hits behind the origin.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t > EPSILON).then_some(t)
    }
}

/// Nearest triangle hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the triangle in the index buffer (not the vertex index)
    pub triangle: usize,
    /// Vertex indices of the hit triangle
    pub face: [u32; 3],
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
}

/// Find the nearest triangle of an indexed mesh hit by `ray`
pub fn pick_triangle(positions: &[Vec3], indices: &[u32], ray: &Ray) -> Option<Hit> {
    if ray.direction == Vec3::ZERO || !ray.origin.is_finite() {
        return None;
    }

    let mut nearest: Option<Hit> = None;

    for (triangle, tri) in indices.chunks_exact(3).enumerate() {
        let face = [tri[0], tri[1], tri[2]];
        let (Some(&a), Some(&b), Some(&c)) = (
            positions.get(face[0] as usize),
            positions.get(face[1] as usize),
            positions.get(face[2] as usize),
        ) else {
            continue;
        };

        if let Some(distance) = ray.intersect_triangle(a, b, c) {
            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(Hit {
                    triangle,
                    face,
                    distance,
                    point: ray.at(distance),
                });
            }
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle(z: f32) -> [Vec3; 3] {
        [
            Vec3::new(-1.0, -1.0, z),
            Vec3::new(1.0, -1.0, z),
            Vec3::new(0.0, 1.0, z),
        ]
    }

    #[test]
    fn test_ray_hits_triangle() {
        let [a, b, c] = unit_triangle(0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray.intersect_triangle(a, b, c).expect("should hit");
        assert!((t - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_triangle() {
        let [a, b, c] = unit_triangle(0.0);
        let ray = Ray::new(Vec3::new(5.0, 5.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray.intersect_triangle(a, b, c).is_none());
    }

    #[test]
    fn test_double_sided() {
        let [a, b, c] = unit_triangle(0.0);
        let from_front = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let from_back = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);
        assert!(from_front.intersect_triangle(a, b, c).is_some());
        assert!(from_back.intersect_triangle(a, b, c).is_some());
    }

    #[test]
    fn test_behind_origin_is_ignored() {
        let [a, b, c] = unit_triangle(0.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray.intersect_triangle(a, b, c).is_none());
    }

    #[test]
    fn test_pick_nearest() {
        let far = unit_triangle(0.0);
        let near = unit_triangle(2.0);
        let positions: Vec<Vec3> = far.iter().chain(near.iter()).copied().collect();
        let indices = vec![0, 1, 2, 3, 4, 5];

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hit = pick_triangle(&positions, &indices, &ray).expect("should hit");
        assert_eq!(hit.triangle, 1);
        assert_eq!(hit.face, [3, 4, 5]);
        assert!((hit.distance - 8.0).abs() < 1e-5);
        assert!((hit.point.z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_pick_nothing() {
        let positions = unit_triangle(0.0).to_vec();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::Z);
        assert!(pick_triangle(&positions, &[0, 1, 2], &ray).is_none());
        assert!(pick_triangle(&positions, &[], &Ray::new(Vec3::ZERO, Vec3::NEG_Z)).is_none());
    }
}
