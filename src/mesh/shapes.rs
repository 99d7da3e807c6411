//! Triangle-list generation for track primitives

use glam::Vec3;

use super::vertex::{Vertex, colors};
use crate::track::{Primitive, Segment, Track};

/// Quad faces of a hexahedron as corner indices (bottom 0..4, top 4..8)
const FACES: [[usize; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
];

/// Vertices per tessellated primitive (6 faces, 2 triangles each)
pub const VERTICES_PER_PRIMITIVE: usize = FACES.len() * 6;

/// Generate flat-shaded triangles for one primitive
///
/// Each triangle's winding and normal are flipped as needed so the normal
/// points away from the solid's centroid.
pub fn primitive_vertices(primitive: &Primitive) -> Vec<Vertex> {
    let corners = primitive.shape.corners();
    let centroid = primitive.shape.centroid();
    let color = colors::for_surface(primitive.surface);
    let mut vertices = Vec::with_capacity(VERTICES_PER_PRIMITIVE);

    for face in FACES {
        let [a, b, c, d] = face.map(|i| corners[i]);
        for tri in [[a, b, c], [a, c, d]] {
            push_triangle(&mut vertices, tri, centroid, color);
        }
    }
    vertices
}

fn push_triangle(out: &mut Vec<Vertex>, tri: [Vec3; 3], centroid: Vec3, color: [f32; 4]) {
    let [a, mut b, mut c] = tri;
    let mut normal = (b - a).cross(c - a).normalize_or_zero();
    let face_center = (a + b + c) / 3.0;
    if normal.dot(face_center - centroid) < 0.0 {
        std::mem::swap(&mut b, &mut c);
        normal = -normal;
    }
    out.push(Vertex::new(a, normal, color));
    out.push(Vertex::new(b, normal, color));
    out.push(Vertex::new(c, normal, color));
}

/// Triangles for every render primitive of one segment
pub fn segment_vertices(segment: &Segment) -> Vec<Vertex> {
    segment.render.iter().flat_map(primitive_vertices).collect()
}

/// Triangles for the whole track, in segment order
pub fn track_vertices(track: &Track) -> Vec<Vertex> {
    let count: usize = track.segments.iter().map(|s| s.render.len()).sum();
    let mut vertices = Vec::with_capacity(count * VERTICES_PER_PRIMITIVE);
    for segment in &track.segments {
        vertices.extend(segment_vertices(segment));
    }
    vertices
}
