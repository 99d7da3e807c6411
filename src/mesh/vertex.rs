//! Vertex types for 3D track meshes

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Lit vertex with position, normal and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for track surfaces
pub mod colors {
    use crate::track::SurfaceKind;

    pub const ROAD: [f32; 4] = [0.25, 0.25, 0.3, 1.0];
    pub const WALL: [f32; 4] = [0.7, 0.7, 0.8, 1.0];
    pub const TURBO: [f32; 4] = [1.0, 0.4, 0.2, 1.0];
    pub const START_RING: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const FINISH_RING: [f32; 4] = [0.9, 0.85, 0.3, 1.0]; // Gold
    pub const CHECKPOINT_RING: [f32; 4] = [0.4, 0.7, 1.0, 1.0];

    pub fn for_surface(surface: SurfaceKind) -> [f32; 4] {
        match surface {
            SurfaceKind::Road => ROAD,
            SurfaceKind::Wall => WALL,
            SurfaceKind::Turbo => TURBO,
            SurfaceKind::StartRing => START_RING,
            SurfaceKind::FinishRing => FINISH_RING,
            SurfaceKind::CheckpointRing => CHECKPOINT_RING,
        }
    }
}
