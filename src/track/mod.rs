//! Deterministic track generation
//!
//! Everything here is pure and seeded:
//! - One `SeededRng` per generation, derived from the seed string only
//! - Cardinal headings with exact component swaps (no trig drift)
//! - No rendering or platform dependencies

pub mod assembler;
pub mod catalog;
pub mod cursor;
pub mod field;
pub mod generated;
pub mod history;
pub mod moves;
pub mod rng;
pub mod shape;
pub mod state;
pub mod walker;

pub use assembler::{GateKind, Segment, TriggerInfo, assemble};
pub use cursor::{Cursor, Heading};
pub use field::{CollisionField, OccupiedPoint};
pub use generated::{Track, TrackStats};
pub use history::{TrackHistory, TrackHistoryEntry};
pub use moves::{Candidate, CandidateList, Move, MoveKind};
pub use rng::SeededRng;
pub use shape::{Primitive, Shape, SurfaceKind, Transform};
pub use state::{BankingState, TrackWalkerState, WalkerPhase};
pub use walker::{StepOutcome, TrackWalker, generate};
