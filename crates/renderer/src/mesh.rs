//! Mesh data structures and primitive generation.

use crate::vertex::{LineVertex, Vertex};
use glam::Vec3;
use std::ops::Range;
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    /// Create a UV sphere.
    pub fn sphere(device: &wgpu::Device, radius: f32, segments: u32, rings: u32) -> Self {
        MeshData::uv_sphere(radius, segments, rings).upload(device)
    }
}

/// Mesh data before GPU upload (for procedural generation).
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// UV sphere centered at the origin.
    pub fn uv_sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

        for ring in 0..=rings {
            let phi = std::f32::consts::PI * ring as f32 / rings as f32;
            let y = radius * phi.cos();
            let ring_radius = radius * phi.sin();

            for segment in 0..=segments {
                let theta = 2.0 * std::f32::consts::PI * segment as f32 / segments as f32;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                let normal = Vec3::new(x, y, z).normalize_or_zero();
                let uv = [
                    segment as f32 / segments as f32,
                    ring as f32 / rings as f32,
                ];

                vertices.push(Vertex::new([x, y, z], normal.into(), uv));
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;

                indices.push(current);
                indices.push(current + 1);
                indices.push(next);

                indices.push(current + 1);
                indices.push(next + 1);
                indices.push(next);
            }
        }

        Self { vertices, indices }
    }

    pub fn upload(&self, device: &wgpu::Device) -> Mesh {
        Mesh::new(device, &self.vertices, &self.indices)
    }
}

/// Points drawn with a point-list pipeline.
pub struct PointCloud {
    pub buffer: wgpu::Buffer,
    pub count: u32,
}

impl PointCloud {
    pub fn new(device: &wgpu::Device, points: &[Vec3], color: [f32; 4]) -> Self {
        let vertices: Vec<LineVertex> = points
            .iter()
            .map(|p| LineVertex::new(p.to_array(), color))
            .collect();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Cloud Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            count: vertices.len() as u32,
        }
    }
}

/// Closed polylines packed into one buffer, drawn as line strips.
pub struct LineLoops {
    pub buffer: wgpu::Buffer,
    /// Vertex range of each loop.
    pub ranges: Vec<Range<u32>>,
}

impl LineLoops {
    pub fn new(device: &wgpu::Device, loops: &[Vec<Vec3>], color: [f32; 4]) -> Self {
        let (vertices, ranges) = close_loops(loops, color);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Line Loop Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { buffer, ranges }
    }
}

/// Flatten loops into strip vertices, repeating each first point at the end.
/// Empty loops are skipped.
pub fn close_loops(loops: &[Vec<Vec3>], color: [f32; 4]) -> (Vec<LineVertex>, Vec<Range<u32>>) {
    let mut vertices = Vec::new();
    let mut ranges = Vec::with_capacity(loops.len());
    for points in loops {
        let Some(first) = points.first() else {
            continue;
        };
        let start = vertices.len() as u32;
        vertices.extend(points.iter().map(|p| LineVertex::new(p.to_array(), color)));
        vertices.push(LineVertex::new(first.to_array(), color));
        ranges.push(start..vertices.len() as u32);
    }
    (vertices, ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_surface() {
        let mesh = MeshData::uv_sphere(2.0, 16, 8);
        assert_eq!(mesh.vertices.len(), 17 * 9);
        assert_eq!(mesh.indices.len(), 16 * 8 * 6);
        for v in &mesh.vertices {
            let r = Vec3::from(v.position).length();
            assert!((r - 2.0).abs() < 1e-4);
        }
        let max = *mesh.indices.iter().max().unwrap();
        assert!((max as usize) < mesh.vertices.len());
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let mesh = MeshData::uv_sphere(1.0, 16, 8);
        // Check a triangle from the middle band (the poles are degenerate).
        let tri = &mesh.indices[(4 * 16) * 6..(4 * 16) * 6 + 3];
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.vertices[i as usize].position));
        let normal = (b - a).cross(c - a);
        assert!(normal.dot(a + b + c) > 0.0);
    }

    #[test]
    fn loops_are_closed() {
        let square = vec![Vec3::X, Vec3::Z, -Vec3::X, -Vec3::Z];
        let (vertices, ranges) = close_loops(&[square.clone(), Vec::new(), square], [1.0; 4]);
        assert_eq!(ranges, vec![0..5, 5..10]);
        assert_eq!(vertices[4].position, vertices[0].position);
        assert_eq!(vertices[9].position, vertices[5].position);
    }
}
