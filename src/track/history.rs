//! Rollback snapshots
//!
//! A snapshot is taken right before each commit. Restoring one means copying
//! the scalars back and truncating the segment and occupancy lists to the
//! recorded lengths; no geometry is cloned.

use serde::{Deserialize, Serialize};

use super::cursor::Cursor;
use super::state::BankingState;

/// Walker state just before a committed step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackHistoryEntry {
    pub cursor: Cursor,
    pub banking: BankingState,
    pub forced_straight: u32,
    pub after_ramp: bool,
    pub next_checkpoint: u32,
    pub occupied_len: usize,
    pub segment_len: usize,
    /// The step committed a turn (a backtracking target)
    pub was_turn: bool,
}

/// Stack of snapshots, oldest first
#[derive(Debug, Clone, Default)]
pub struct TrackHistory {
    entries: Vec<TrackHistoryEntry>,
}

impl TrackHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TrackHistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TrackHistoryEntry] {
        &self.entries
    }

    /// Remove the most recent snapshot
    pub fn pop(&mut self) -> Option<TrackHistoryEntry> {
        self.entries.pop()
    }

    /// Remove the most recent turn snapshot and everything after it
    ///
    /// Returns the removed turn snapshot, or `None` (history untouched) when
    /// no turn was ever committed.
    pub fn pop_to_last_turn(&mut self) -> Option<TrackHistoryEntry> {
        let idx = self.entries.iter().rposition(|e| e.was_turn)?;
        let entry = self.entries[idx];
        self.entries.truncate(idx);
        Some(entry)
    }
}
