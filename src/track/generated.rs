//! The finished track handed to callers

use serde::{Deserialize, Serialize};

use super::assembler::Segment;
use super::field::{OccupiedPoint, find_overlap};
use super::moves::MoveKind;
use super::state::TrackWalkerState;
use crate::config::TrackConfig;
use crate::error::TrackError;

/// Summary counts for logging and tests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackStats {
    pub segments: usize,
    pub checkpoints: usize,
    pub turbos: usize,
    pub turns: usize,
    pub ramps: usize,
    pub bank_transitions: usize,
    /// Walker steps taken, including those later rolled back
    pub steps: u32,
    pub backtracks: u32,
    /// Closed by a cap or an exhausted backtrack rather than the finish roll
    pub forced_finish: bool,
    pub preferred_length: u32,
}

impl TrackStats {
    pub fn collect(state: &TrackWalkerState) -> Self {
        let count = |pred: fn(MoveKind) -> bool| {
            state.segments.iter().filter(|s| pred(s.kind)).count()
        };
        Self {
            segments: state.segments.len(),
            checkpoints: count(|k| k == MoveKind::Checkpoint),
            turbos: count(|k| k == MoveKind::Turbo),
            turns: count(|k| k.is_turn()),
            ramps: count(|k| k.is_ramp()),
            bank_transitions: count(|k| k == MoveKind::BankTransition),
            steps: state.step_count,
            backtracks: state.backtracks,
            forced_finish: state.forced_finish,
            preferred_length: state.preferred_length,
        }
    }
}

/// A generated track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub seed: String,
    pub config: TrackConfig,
    pub segments: Vec<Segment>,
    /// Occupancy samples of every placed segment
    pub occupancy: Vec<OccupiedPoint>,
    pub stats: TrackStats,
}

impl Track {
    pub fn start(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn finish(&self) -> Option<&Segment> {
        self.segments.last().filter(|s| s.is_finish())
    }

    /// Checkpoint segments in lap order
    pub fn checkpoints(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_checkpoint())
    }

    /// Re-check the layout invariants of a generated track
    pub fn validate(&self) -> Result<(), TrackError> {
        let (first, last) = match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(TrackError::Empty),
        };
        if !first.is_start() {
            return Err(TrackError::MissingStart(first.kind.as_str()));
        }
        if !last.is_finish() {
            return Err(TrackError::MissingFinish(last.kind.as_str()));
        }
        if self.segments.len() > self.config.max_segments {
            return Err(TrackError::TooLong {
                count: self.segments.len(),
                cap: self.config.max_segments,
            });
        }

        let end = self.segments.len() - 1;
        let mut expected = 0;
        for (i, seg) in self.segments.iter().enumerate() {
            if (seg.is_start() && i != 0) || (seg.is_finish() && i != end) {
                return Err(TrackError::ExtraGate {
                    index: i,
                    kind: seg.kind.as_str(),
                });
            }
            if let Some(found) = seg.checkpoint_order() {
                if found != expected {
                    return Err(TrackError::CheckpointOrder {
                        index: i,
                        found,
                        expected,
                    });
                }
                expected += 1;
            }
            if i > 0 && seg.entry != self.segments[i - 1].exit {
                return Err(TrackError::Disconnected { index: i, prev: i - 1 });
            }
        }

        if last.entry.bank != 0.0 {
            return Err(TrackError::BankedFinish {
                bank: last.entry.bank,
            });
        }

        if let Some((a, b)) = find_overlap(&self.occupancy) {
            return Err(TrackError::Overlap {
                a: a.segment,
                b: b.segment,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
