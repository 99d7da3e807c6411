//! Walker state
//!
//! Everything one generation mutates lives in `TrackWalkerState`. It is
//! created per call and consumed into the returned `Track`.

use serde::{Deserialize, Serialize};

use super::assembler::Segment;
use super::cursor::Cursor;
use super::field::CollisionField;
use super::history::{TrackHistory, TrackHistoryEntry};
use super::moves::Move;
use super::rng::SeededRng;

/// Current phase of the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalkerPhase {
    /// Proposing and committing moves
    Walking,
    /// Stuck; rolling back to the last turn
    Backtracking,
    /// Finish committed
    Finished,
}

/// Road roll tracking
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BankingState {
    /// The road currently carries a non-zero roll
    pub active: bool,
    /// Current roll (radians)
    pub angle: f32,
    /// Segments committed since the roll began
    pub counter: u32,
    /// Segments left before a new roll may begin
    pub cooldown: u32,
}

impl BankingState {
    pub fn can_start(&self) -> bool {
        !self.active && self.cooldown == 0
    }

    pub fn can_end(&self, min_segments: u32) -> bool {
        self.active && self.counter >= min_segments
    }

    /// Update after `mv` commits
    pub fn advance(&mut self, mv: &Move, cooldown: u32) {
        match *mv {
            Move::BankTransition { end_bank, .. } if end_bank != 0.0 => {
                self.active = true;
                self.angle = end_bank;
                self.counter = 0;
            }
            Move::BankTransition { .. } => {
                *self = BankingState {
                    cooldown,
                    ..Default::default()
                };
            }
            _ if self.active => self.counter += 1,
            _ => self.cooldown = self.cooldown.saturating_sub(1),
        }
    }
}

/// Aggregate state of one generation
#[derive(Debug, Clone)]
pub struct TrackWalkerState {
    pub seed: String,
    pub rng: SeededRng,
    pub cursor: Cursor,
    pub banking: BankingState,
    /// Straight-class segments still owed after a turbo
    pub forced_straight: u32,
    /// The last commit was a ramp
    pub after_ramp: bool,
    /// Chance a straight becomes a checkpoint
    pub checkpoint_chance: f32,
    /// Chance the chosen move becomes the finish
    pub finish_chance: f32,
    /// Walker steps taken (never rolled back)
    pub step_count: u32,
    /// Length after which the finish chance starts growing
    pub preferred_length: u32,
    pub next_checkpoint: u32,
    pub backtracks: u32,
    pub forced_finish: bool,
    pub phase: WalkerPhase,
    pub field: CollisionField,
    pub segments: Vec<Segment>,
    pub history: TrackHistory,
}

impl TrackWalkerState {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            rng: SeededRng::new(seed),
            cursor: Cursor::default(),
            banking: BankingState::default(),
            forced_straight: 0,
            after_ramp: false,
            checkpoint_chance: 0.0,
            finish_chance: 0.0,
            step_count: 0,
            preferred_length: 0,
            next_checkpoint: 0,
            backtracks: 0,
            forced_finish: false,
            phase: WalkerPhase::Walking,
            field: CollisionField::new(),
            segments: Vec::new(),
            history: TrackHistory::new(),
        }
    }

    pub fn snapshot(&self, was_turn: bool) -> TrackHistoryEntry {
        TrackHistoryEntry {
            cursor: self.cursor,
            banking: self.banking,
            forced_straight: self.forced_straight,
            after_ramp: self.after_ramp,
            next_checkpoint: self.next_checkpoint,
            occupied_len: self.field.len(),
            segment_len: self.segments.len(),
            was_turn,
        }
    }

    /// Roll back to a snapshot (history itself is trimmed by the caller)
    pub fn restore(&mut self, entry: &TrackHistoryEntry) {
        self.cursor = entry.cursor;
        self.banking = entry.banking;
        self.forced_straight = entry.forced_straight;
        self.after_ramp = entry.after_ramp;
        self.next_checkpoint = entry.next_checkpoint;
        self.field.truncate(entry.occupied_len);
        self.segments.truncate(entry.segment_len);
    }
}
