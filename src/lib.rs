//! Track Forge - seeded procedural race tracks
//!
//! Core modules:
//! - `track`: Deterministic generator (walker, collision field, block catalog)
//! - `config`: Designer-tunable pacing and rarity
//! - `mesh`: Vertex export for the rendering collaborator
//! - `error`: Config and validation errors

pub mod config;
pub mod error;
pub mod mesh;
pub mod track;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use config::{MoveWeights, TrackConfig, TrackLength};
pub use error::{ConfigError, TrackError};
pub use track::{Segment, Track, TrackWalker, generate};

/// Track geometry constants
///
/// These are fixed for every generation so that collision sampling stays
/// consistent with the block builders.
pub mod consts {
    /// Road surface width (wall to wall)
    pub const TRACK_WIDTH: f32 = 12.0;
    /// Floor slab thickness (top surface sits at local y = 0)
    pub const FLOOR_THICKNESS: f32 = 0.5;
    pub const WALL_HEIGHT: f32 = 1.5;
    pub const WALL_THICKNESS: f32 = 0.5;

    /// Length of one straight-class block
    pub const BLOCK_LENGTH: f32 = 20.0;

    /// Centerline radii offered for every turn
    pub const TIGHT_TURN_RADIUS: f32 = 15.0;
    pub const WIDE_TURN_RADIUS: f32 = 30.0;

    /// Sub-segments per curved/sloped/rolled block
    pub const TURN_SUBDIVISIONS: usize = 8;
    pub const RAMP_SUBDIVISIONS: usize = 8;
    pub const BANK_SUBDIVISIONS: usize = 8;

    /// Occupancy samples per committed move
    pub const OCCUPANCY_SAMPLES: usize = 4;
    /// Influence radius of one occupancy sample (covers half the road plus walls)
    pub const OCCUPIED_RADIUS: f32 = 7.5;
    /// Samples further apart than this vertically never collide
    pub const HEIGHT_TOLERANCE: f32 = 6.0;

    /// Ramps may not climb above / drop below these heights
    pub const RAMP_CEILING: f32 = 40.0;
    pub const RAMP_FLOOR: f32 = 0.0;

    /// Gate arch dimensions (start, finish, checkpoint)
    pub const GATE_HEIGHT: f32 = 6.0;
    pub const GATE_POST_SIZE: f32 = 0.6;
    pub const STRIPE_DEPTH: f32 = 1.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
