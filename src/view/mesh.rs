use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::model::Shape;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

const SPHERE_RINGS: u32 = 16;
const SPHERE_SEGMENTS: u32 = 24;
const CYLINDER_SEGMENTS: u32 = 20;

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    pub fn from_shape(shape: &Shape) -> Self {
        match *shape {
            Shape::Sphere { radius } => Self::sphere(radius, SPHERE_RINGS, SPHERE_SEGMENTS),
            Shape::Box { size } => Self::cuboid(size),
            Shape::Cylinder { radius_top, radius_bottom, height } => {
                Self::cylinder(radius_top, radius_bottom, height, CYLINDER_SEGMENTS)
            }
        }
    }

    /// UV sphere centered on the origin
    pub fn sphere(radius: f32, rings: u32, segments: u32) -> Self {
        let mut mesh = Mesh::default();
        for ring in 0..=rings {
            let theta = ring as f32 / rings as f32 * PI;
            for seg in 0..=segments {
                let phi = seg as f32 / segments as f32 * TAU;
                let n = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                mesh.vertices.push(Vertex { pos: (n * radius).into(), normal: n.into() });
            }
        }

        let stride = segments + 1;
        for ring in 0..rings {
            for seg in 0..segments {
                let a = ring * stride + seg;
                let b = a + stride;
                mesh.indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }
        mesh
    }

    /// Axis-aligned box centered on the origin, flat-shaded
    pub fn cuboid(size: Vec3) -> Self {
        let h = size / 2.0;
        let faces: [(Vec3, Vec3, Vec3); 6] = [
            (Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut mesh = Mesh::default();
        for (normal, u, v) in faces {
            // u x v points along the normal, so corners run counter-clockwise
            let u = if u.cross(v).dot(normal) > 0.0 { u } else { -u };
            let base = mesh.vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = (normal + u * su + v * sv) * h;
                mesh.vertices.push(Vertex { pos: p.into(), normal: normal.into() });
            }
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Capped cylinder along local Y, centered on the origin
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let half = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;
        let mut mesh = Mesh::default();

        for seg in 0..=segments {
            let a = seg as f32 / segments as f32 * TAU;
            let (s, c) = a.sin_cos();
            let normal = Vec3::new(c, slope, s).normalize();
            mesh.vertices.push(Vertex { pos: [radius_top * c, half, radius_top * s], normal: normal.into() });
            mesh.vertices.push(Vertex { pos: [radius_bottom * c, -half, radius_bottom * s], normal: normal.into() });
        }
        for seg in 0..segments {
            let top = seg * 2;
            let bottom = top + 1;
            mesh.indices.extend_from_slice(&[top, top + 2, bottom, top + 2, bottom + 2, bottom]);
        }

        for (y, radius, normal) in [(half, radius_top, Vec3::Y), (-half, radius_bottom, Vec3::NEG_Y)] {
            let center = mesh.vertices.len() as u32;
            mesh.vertices.push(Vertex { pos: [0.0, y, 0.0], normal: normal.into() });
            for seg in 0..=segments {
                let (s, c) = (seg as f32 / segments as f32 * TAU).sin_cos();
                mesh.vertices.push(Vertex { pos: [radius * c, y, radius * s], normal: normal.into() });
            }
            for seg in 0..segments {
                let rim = center + 1 + seg;
                if normal.y > 0.0 {
                    mesh.indices.extend_from_slice(&[center, rim + 1, rim]);
                } else {
                    mesh.indices.extend_from_slice(&[center, rim, rim + 1]);
                }
            }
        }
        mesh
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_well_formed(mesh: &Mesh) {
        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        let n = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < n), "index out of range");
        for v in &mesh.vertices {
            let len = Vec3::from(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "normal not unit length: {len}");
        }
    }

    /// Counter-clockwise seen from outside: the face normal agrees with the
    /// direction from the center to the triangle.
    fn assert_outward(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.vertices[i as usize].pos));
            let face = (b - a).cross(c - a);
            if face.length_squared() < 1e-10 {
                continue; // degenerate pole triangles
            }
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn test_sphere_mesh() {
        let mesh = Mesh::sphere(2.0, 8, 12);
        assert_well_formed(&mesh);
        assert_outward(&mesh);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.pos).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cuboid_mesh() {
        let mesh = Mesh::cuboid(Vec3::new(2.0, 4.0, 6.0));
        assert_well_formed(&mesh);
        assert_outward(&mesh);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for v in &mesh.vertices {
            let p = Vec3::from(v.pos).abs();
            assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
        }
    }

    #[test]
    fn test_cylinder_mesh() {
        let mesh = Mesh::cylinder(1.0, 1.0, 8.0, 10);
        assert_well_formed(&mesh);
        assert_outward(&mesh);
        for v in &mesh.vertices {
            assert!(v.pos[1].abs() <= 4.0 + 1e-6);
        }
    }

    #[test]
    fn test_from_shape_dispatch() {
        let mesh = Mesh::from_shape(&Shape::Box { size: Vec3::ONE });
        assert_eq!(mesh.indices.len(), 36);
        let mesh = Mesh::from_shape(&Shape::Sphere { radius: 1.0 });
        assert_eq!(mesh.vertices.len() as u32, (SPHERE_RINGS + 1) * (SPHERE_SEGMENTS + 1));
    }
}
