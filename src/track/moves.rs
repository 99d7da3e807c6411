//! Moves (placement requests) and weighted candidate selection

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::cursor::{Cursor, Heading};
use crate::consts::OCCUPANCY_SAMPLES;

/// Segment kinds known to the block catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Start,
    Straight,
    TurnLeft,
    TurnRight,
    RampUp,
    RampDown,
    BankTransition,
    Turbo,
    Checkpoint,
    Finish,
}

impl MoveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::Start => "start",
            MoveKind::Straight => "straight",
            MoveKind::TurnLeft => "turn-left",
            MoveKind::TurnRight => "turn-right",
            MoveKind::RampUp => "ramp-up",
            MoveKind::RampDown => "ramp-down",
            MoveKind::BankTransition => "bank-transition",
            MoveKind::Turbo => "turbo",
            MoveKind::Checkpoint => "checkpoint",
            MoveKind::Finish => "finish",
        }
    }

    /// Kinds built by the straight builder (allowed during a turbo run)
    pub fn is_straight_class(&self) -> bool {
        matches!(
            self,
            MoveKind::Start
                | MoveKind::Straight
                | MoveKind::Turbo
                | MoveKind::Checkpoint
                | MoveKind::Finish
        )
    }

    pub fn is_turn(&self) -> bool {
        matches!(self, MoveKind::TurnLeft | MoveKind::TurnRight)
    }

    pub fn is_ramp(&self) -> bool {
        matches!(self, MoveKind::RampUp | MoveKind::RampDown)
    }
}

/// A placement request with its kind-specific parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Move {
    Start { length: f32 },
    Straight { length: f32 },
    TurnLeft { radius: f32 },
    TurnRight { radius: f32 },
    RampUp { length: f32, height: f32 },
    RampDown { length: f32, height: f32 },
    BankTransition {
        length: f32,
        start_bank: f32,
        end_bank: f32,
    },
    Turbo { length: f32 },
    Checkpoint { length: f32 },
    Finish { length: f32 },
}

/// sin/cos of 22.5°, 45°, 67.5°, 90°: turn samples at quarter sweeps
const TURN_SIN: [f32; OCCUPANCY_SAMPLES] = [0.382_683_43, 0.707_106_77, 0.923_879_5, 1.0];
const TURN_COS: [f32; OCCUPANCY_SAMPLES] = [0.923_879_5, 0.707_106_77, 0.382_683_43, 0.0];
/// (1 - cos(πt)) / 2 at t = 1/4..4/4: ramp height profile samples
const RAMP_EASE: [f32; OCCUPANCY_SAMPLES] = [0.146_446_6, 0.5, 0.853_553_4, 1.0];

impl Move {
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Start { .. } => MoveKind::Start,
            Move::Straight { .. } => MoveKind::Straight,
            Move::TurnLeft { .. } => MoveKind::TurnLeft,
            Move::TurnRight { .. } => MoveKind::TurnRight,
            Move::RampUp { .. } => MoveKind::RampUp,
            Move::RampDown { .. } => MoveKind::RampDown,
            Move::BankTransition { .. } => MoveKind::BankTransition,
            Move::Turbo { .. } => MoveKind::Turbo,
            Move::Checkpoint { .. } => MoveKind::Checkpoint,
            Move::Finish { .. } => MoveKind::Finish,
        }
    }

    /// Block length for straight-class moves
    pub fn straight_length(&self) -> Option<f32> {
        match *self {
            Move::Start { length }
            | Move::Straight { length }
            | Move::Turbo { length }
            | Move::Checkpoint { length }
            | Move::Finish { length } => Some(length),
            _ => None,
        }
    }

    /// Exit point relative to the entry, in the block's local frame
    pub fn local_travel(&self) -> Vec3 {
        match *self {
            Move::Start { length }
            | Move::Straight { length }
            | Move::Turbo { length }
            | Move::Checkpoint { length }
            | Move::Finish { length }
            | Move::BankTransition { length, .. } => Vec3::new(0.0, 0.0, length),
            Move::TurnLeft { radius } => Vec3::new(radius, 0.0, radius),
            Move::TurnRight { radius } => Vec3::new(-radius, 0.0, radius),
            Move::RampUp { length, height } => Vec3::new(0.0, height, length),
            Move::RampDown { length, height } => Vec3::new(0.0, -height, length),
        }
    }

    pub fn heading_after(&self, heading: Heading) -> Heading {
        match self {
            Move::TurnLeft { .. } => heading.left(),
            Move::TurnRight { .. } => heading.right(),
            _ => heading,
        }
    }

    /// Cursor at the end of this move when started from `cursor`
    pub fn end_cursor(&self, cursor: &Cursor) -> Cursor {
        let bank = match *self {
            Move::BankTransition { end_bank, .. } => end_bank,
            _ => cursor.bank,
        };
        Cursor::new(
            cursor.local_to_world(self.local_travel()),
            self.heading_after(cursor.heading),
            bank,
        )
    }

    /// World positions sampled along the move's centerline, excluding the entry
    pub fn sample_path(&self, cursor: &Cursor) -> [Vec3; OCCUPANCY_SAMPLES] {
        let mut out = [Vec3::ZERO; OCCUPANCY_SAMPLES];
        for (i, slot) in out.iter_mut().enumerate() {
            let t = (i + 1) as f32 / OCCUPANCY_SAMPLES as f32;
            let local = match *self {
                Move::TurnLeft { radius } => {
                    Vec3::new(radius * (1.0 - TURN_COS[i]), 0.0, radius * TURN_SIN[i])
                }
                Move::TurnRight { radius } => {
                    Vec3::new(-radius * (1.0 - TURN_COS[i]), 0.0, radius * TURN_SIN[i])
                }
                Move::RampUp { length, height } => {
                    Vec3::new(0.0, height * RAMP_EASE[i], length * t)
                }
                Move::RampDown { length, height } => {
                    Vec3::new(0.0, -height * RAMP_EASE[i], length * t)
                }
                _ => self.local_travel() * t,
            };
            *slot = cursor.local_to_world(local);
        }
        out
    }
}

/// A move offered to the roulette with its selection weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub mv: Move,
    pub weight: f32,
}

/// Weighted candidate list built for one walker attempt
#[derive(Debug, Clone, Default)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
    total_weight: f32,
}

impl CandidateList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate; non-positive weights are dropped
    pub fn push(&mut self, mv: Move, weight: f32) {
        if weight > 0.0 {
            self.candidates.push(Candidate { mv, weight });
            self.total_weight += weight;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn contains(&self, kind: MoveKind) -> bool {
        self.candidates.iter().any(|c| c.mv.kind() == kind)
    }

    /// Roulette selection: `roll` in [0, 1) scaled by the total weight, then
    /// subtracted weight by weight until it drops below zero
    pub fn select(&self, roll: f32) -> Option<Move> {
        if self.candidates.is_empty() || self.total_weight <= 0.0 {
            return None;
        }
        let mut remaining = roll * self.total_weight;
        for candidate in &self.candidates {
            remaining -= candidate.weight;
            if remaining < 0.0 {
                return Some(candidate.mv);
            }
        }
        // Float rounding can leave a sliver past the last bucket
        self.candidates.last().map(|c| c.mv)
    }
}
