//! Mesh export for the rendering collaborator
//!
//! Flattens render primitives into a triangle list of GPU-ready vertices.
//! No pipeline lives here; callers upload the buffer with `Vertex::desc()`.

pub mod shapes;
pub mod vertex;

pub use shapes::{primitive_vertices, segment_vertices, track_vertices};
pub use vertex::{Vertex, colors};
