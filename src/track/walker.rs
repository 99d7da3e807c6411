//! Track walker: the step-by-step generator
//!
//! Each step grows the pacing chances, builds a weighted list of placeable
//! candidates, rolls one, applies checkpoint/finish upgrades and commits it.
//! A step with nothing placeable rolls back to the last turn and takes the
//! other direction; with no turn left the track is closed with a finish.

use super::assembler::assemble;
use super::cursor::Cursor;
use super::field::CollisionField;
use super::generated::{Track, TrackStats};
use super::moves::{CandidateList, Move, MoveKind};
use super::state::{TrackWalkerState, WalkerPhase};
use crate::config::TrackConfig;
use crate::consts::*;

/// What a call to `TrackWalker::step` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A move was rolled and committed
    Committed(MoveKind),
    /// Rolled back to segment `to_segment` and took the other turn there
    Backtracked { to_segment: usize, turn: MoveKind },
    /// Finish committed (naturally or forced); further steps do nothing
    Finished,
}

/// True if every sample of `mv` from `cursor` clears the field
fn placeable(field: &CollisionField, cursor: &Cursor, mv: &Move) -> bool {
    !field.test_path(&mv.sample_path(cursor))
}

/// Seeded generator for one track
#[derive(Debug, Clone)]
pub struct TrackWalker {
    config: TrackConfig,
    state: TrackWalkerState,
}

impl TrackWalker {
    /// Start a walk: draws the preferred length and commits the start block
    pub fn new(seed: &str, config: TrackConfig) -> Self {
        let mut state = TrackWalkerState::new(seed);
        state.preferred_length = state
            .rng
            .range_u32(config.preferred_length_min, config.preferred_length_max);
        log::debug!("Track '{}': preferred length {}", seed, state.preferred_length);

        let mut walker = Self { config, state };
        walker.commit(Move::Start { length: BLOCK_LENGTH }, false);
        walker
    }

    pub fn state(&self) -> &TrackWalkerState {
        &self.state
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    pub fn phase(&self) -> WalkerPhase {
        self.state.phase
    }

    /// Advance the walk by one step
    pub fn step(&mut self) -> StepOutcome {
        if self.state.phase == WalkerPhase::Finished {
            return StepOutcome::Finished;
        }

        // Keep room for a closing bank transition plus the finish
        if self.state.segments.len() + 2 >= self.config.max_segments
            || self.state.step_count >= self.config.max_steps
        {
            log::warn!(
                "Track '{}': cap reached at {} segments / {} steps, forcing finish",
                self.state.seed,
                self.state.segments.len(),
                self.state.step_count
            );
            return self.force_finish(true);
        }

        self.state.step_count += 1;
        self.state.checkpoint_chance += self.config.checkpoint_increment;
        if self.state.step_count > self.state.preferred_length {
            self.state.finish_chance += self.config.finish_increment;
        }

        for attempt in 0..self.config.attempts_per_step {
            let (candidates, straight_clear) = self.propose(attempt);
            if candidates.is_empty() {
                continue;
            }
            let roll = self.state.rng.next_f32();
            let Some(chosen) = candidates.select(roll) else {
                continue;
            };

            let mv = self.upgrade(chosen, straight_clear);
            let kind = mv.kind();
            self.commit(mv, kind.is_turn());
            if kind == MoveKind::Finish {
                self.state.phase = WalkerPhase::Finished;
                log::info!(
                    "Track '{}': finish after {} segments ({} steps)",
                    self.state.seed,
                    self.state.segments.len(),
                    self.state.step_count
                );
                return StepOutcome::Finished;
            }
            return StepOutcome::Committed(kind);
        }

        self.backtrack()
    }

    /// Build the weighted candidate list for one attempt
    ///
    /// Returns the list and whether a plain straight is placeable (finish
    /// upgrades reuse the straight placement).
    pub(crate) fn propose(&mut self, attempt: u32) -> (CandidateList, bool) {
        let cfg = &self.config;
        let w = &cfg.weights;
        let cursor = self.state.cursor;
        let forced = self.state.forced_straight > 0;
        let banking = self.state.banking;
        let after_ramp = self.state.after_ramp;
        let mut list = CandidateList::new();

        if !forced && banking.can_start() {
            let angle = self.state.rng.sign() * self.state.rng.range(cfg.bank_min, cfg.bank_max);
            let mv = Move::BankTransition {
                length: BLOCK_LENGTH,
                start_bank: cursor.bank,
                end_bank: angle,
            };
            if placeable(&self.state.field, &cursor, &mv) {
                list.push(mv, w.start_bank);
            }
        }

        if !forced && banking.can_end(cfg.bank_min_segments) {
            let mv = Move::BankTransition {
                length: BLOCK_LENGTH,
                start_bank: cursor.bank,
                end_bank: 0.0,
            };
            if placeable(&self.state.field, &cursor, &mv) {
                list.push(mv, w.end_bank);
            }
        }

        let straight = Move::Straight { length: BLOCK_LENGTH };
        let straight_clear = placeable(&self.state.field, &cursor, &straight);
        if straight_clear {
            list.push(straight, if forced { w.forced_straight } else { w.straight });
        }

        // Later attempts drop ramps so a stuck step stops re-rolling them
        let ramps_allowed = attempt < cfg.attempts_per_step.div_ceil(2);
        if !forced && !banking.active && !after_ramp && ramps_allowed {
            let length = BLOCK_LENGTH * self.state.rng.range(1.0, 2.0);
            let height = self.state.rng.range(cfg.ramp_height_min, cfg.ramp_height_max);
            if cursor.position.y + height <= RAMP_CEILING {
                let mv = Move::RampUp { length, height };
                if placeable(&self.state.field, &cursor, &mv) {
                    list.push(mv, w.ramp);
                }
            }
            if cursor.position.y - height >= RAMP_FLOOR {
                let mv = Move::RampDown { length, height };
                if placeable(&self.state.field, &cursor, &mv) {
                    list.push(mv, w.ramp);
                }
            }
        }

        if !forced && !after_ramp {
            for radius in [TIGHT_TURN_RADIUS, WIDE_TURN_RADIUS] {
                for mv in [Move::TurnLeft { radius }, Move::TurnRight { radius }] {
                    if placeable(&self.state.field, &cursor, &mv) {
                        list.push(mv, w.turn);
                    }
                }
            }
        }

        if !forced
            && !banking.active
            && !after_ramp
            && straight_clear
            && self.state.rng.chance(cfg.turbo_chance)
        {
            list.push(Move::Turbo { length: BLOCK_LENGTH }, w.turbo);
        }

        (list, straight_clear)
    }

    /// Finish and checkpoint upgrades of the rolled move
    fn upgrade(&mut self, chosen: Move, straight_clear: bool) -> Move {
        let state = &mut self.state;
        let finish_roll = state.rng.next_f32();
        if finish_roll < state.finish_chance && straight_clear && !state.banking.active {
            return Move::Finish { length: BLOCK_LENGTH };
        }

        if let Move::Straight { length } = chosen {
            if state.rng.chance(state.checkpoint_chance) {
                state.checkpoint_chance = 0.0;
                return Move::Checkpoint { length };
            }
        }
        chosen
    }

    /// Place `mv` at the cursor and advance all walker state past it
    ///
    /// `was_turn` marks the snapshot as a backtracking target.
    fn commit(&mut self, mv: Move, was_turn: bool) {
        let kind = mv.kind();
        let state = &mut self.state;
        let entry = state.snapshot(was_turn);
        state.history.push(entry);

        let index = state.segments.len();
        let segment = assemble(&mv, &state.cursor, index, state.next_checkpoint);
        state.field.commit(index, &mv.sample_path(&state.cursor));

        if kind == MoveKind::Checkpoint {
            state.next_checkpoint += 1;
        }
        if kind == MoveKind::Turbo {
            state.forced_straight = self.config.turbo_run;
        } else if kind.is_straight_class() {
            state.forced_straight = state.forced_straight.saturating_sub(1);
        }
        state.after_ramp = kind.is_ramp();
        state.banking.advance(&mv, self.config.bank_cooldown);
        state.cursor = segment.exit;

        log::debug!(
            "segment {index}: {} at ({:.1}, {:.1}, {:.1}) heading {}",
            kind.as_str(),
            segment.entry.position.x,
            segment.entry.position.y,
            segment.entry.position.z,
            segment.entry.heading.index()
        );
        state.segments.push(segment);
    }

    /// Roll back to the most recent turn and take the opposite direction
    fn backtrack(&mut self) -> StepOutcome {
        self.state.phase = WalkerPhase::Backtracking;
        self.state.backtracks += 1;

        while let Some(entry) = self.state.history.pop_to_last_turn() {
            let taken = self.state.segments.get(entry.segment_len).map(|s| s.kind);
            self.state.restore(&entry);

            for radius in [WIDE_TURN_RADIUS, TIGHT_TURN_RADIUS] {
                let mv = match taken {
                    Some(MoveKind::TurnLeft) => Move::TurnRight { radius },
                    _ => Move::TurnLeft { radius },
                };
                if !placeable(&self.state.field, &self.state.cursor, &mv) {
                    continue;
                }
                log::warn!(
                    "Track '{}': stuck, backtracked to segment {} and turned {}",
                    self.state.seed,
                    entry.segment_len,
                    mv.kind().as_str()
                );
                // Not a turn snapshot, so the next dead end reaches further back
                self.commit(mv, false);
                self.state.phase = WalkerPhase::Walking;
                return StepOutcome::Backtracked {
                    to_segment: entry.segment_len,
                    turn: mv.kind(),
                };
            }
        }

        log::warn!(
            "Track '{}': no turn left to retry, closing at {} segments",
            self.state.seed,
            self.state.segments.len()
        );
        self.force_finish(false)
    }

    /// Close the track (unbanking first if needed)
    ///
    /// The closing pieces are collision-checked like any other commit. With
    /// `roll_back`, segments are undone one at a time until a clean closing
    /// fits; one always does right after the start. Without it a closing
    /// that does not fit is placed at the cursor anyway.
    fn force_finish(&mut self, roll_back: bool) -> StepOutcome {
        while !self.try_close() {
            if !roll_back || self.state.segments.len() <= 1 {
                log::warn!(
                    "Track '{}': boxed in, closing over placed track at {} segments",
                    self.state.seed,
                    self.state.segments.len()
                );
                if self.state.banking.active {
                    let close = self.closing_bank();
                    self.commit(close, false);
                }
                self.commit(Move::Finish { length: BLOCK_LENGTH }, false);
                break;
            }
            self.undo_last();
        }
        self.state.forced_finish = true;
        self.state.phase = WalkerPhase::Finished;
        StepOutcome::Finished
    }

    fn closing_bank(&self) -> Move {
        Move::BankTransition {
            length: BLOCK_LENGTH,
            start_bank: self.state.cursor.bank,
            end_bank: 0.0,
        }
    }

    /// Commit the closing pieces if they all fit; otherwise leave state as is
    fn try_close(&mut self) -> bool {
        let mark = self.state.history.len();
        if self.state.banking.active {
            let close = self.closing_bank();
            if !placeable(&self.state.field, &self.state.cursor, &close) {
                return false;
            }
            self.commit(close, false);
        }

        let finish = Move::Finish { length: BLOCK_LENGTH };
        if placeable(&self.state.field, &self.state.cursor, &finish) {
            self.commit(finish, false);
            return true;
        }
        while self.state.history.len() > mark {
            self.undo_last();
        }
        false
    }

    /// Drop the most recent segment
    fn undo_last(&mut self) {
        if let Some(entry) = self.state.history.pop() {
            log::debug!(
                "Track '{}': undoing segment {} to make room for the finish",
                self.state.seed,
                entry.segment_len
            );
            self.state.restore(&entry);
        }
    }

    /// Consume the walker into the finished track
    pub fn into_track(self) -> Track {
        let stats = TrackStats::collect(&self.state);
        Track {
            seed: self.state.seed,
            config: self.config,
            segments: self.state.segments,
            occupancy: self.state.field.points,
            stats,
        }
    }
}

/// Generate the complete track for `seed`
pub fn generate(seed: &str, config: &TrackConfig) -> Track {
    let mut walker = TrackWalker::new(seed, config.clone());
    while walker.step() != StepOutcome::Finished {}
    let track = walker.into_track();
    log::info!(
        "Track '{}': {} segments, {} checkpoints, {} backtracks{}",
        track.seed,
        track.segments.len(),
        track.stats.checkpoints,
        track.stats.backtracks,
        if track.stats.forced_finish { " (forced finish)" } else { "" }
    );
    track
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::field::OccupiedPoint;
    use glam::Vec3;

    fn no_banking() -> TrackConfig {
        let mut config = TrackConfig::default();
        config.weights.start_bank = 0.0;
        config
    }

    #[test]
    fn test_new_commits_start() {
        let walker = TrackWalker::new("start", TrackConfig::default());
        let state = walker.state();
        assert_eq!(state.segments.len(), 1);
        assert!(state.segments[0].is_start());
        assert_eq!(state.cursor.position, Vec3::new(0.0, 0.0, BLOCK_LENGTH));
        assert_eq!(walker.phase(), WalkerPhase::Walking);
        assert!((30..=50).contains(&state.preferred_length));
    }

    #[test]
    fn test_forced_run_offers_only_straights() {
        let mut walker = TrackWalker::new("forced", TrackConfig::default());
        walker.state.forced_straight = 3;
        for attempt in 0..walker.config.attempts_per_step {
            let (list, _) = walker.propose(attempt);
            assert!(list.iter().all(|c| c.mv.kind() == MoveKind::Straight));
            assert!(!list.contains(MoveKind::TurnLeft));
            assert!(!list.contains(MoveKind::TurnRight));
        }
    }

    #[test]
    fn test_no_turns_after_ramp() {
        let mut walker = TrackWalker::new("ramp", TrackConfig::default());
        walker.state.after_ramp = true;
        let (list, _) = walker.propose(0);
        assert!(list.iter().all(|c| !c.mv.kind().is_turn() && !c.mv.kind().is_ramp()));
    }

    #[test]
    fn test_finish_chance_forces_finish_on_fifth_segment() {
        let mut config = no_banking();
        config.weights.turn = 0.0;
        let mut walker = TrackWalker::new("pace", config);
        for _ in 0..3 {
            assert!(matches!(walker.step(), StepOutcome::Committed(_)));
        }
        assert_eq!(walker.state.segments.len(), 4);
        walker.state.finish_chance = 1.0;
        assert_eq!(walker.step(), StepOutcome::Finished);

        let track = walker.into_track();
        assert_eq!(track.segments.len(), 5);
        assert!(track.segments[4].is_finish());
        assert!(!track.stats.forced_finish);
    }

    #[test]
    fn test_boxed_in_without_turn_forces_finish() {
        let mut walker = TrackWalker::new("boxed", no_banking());
        let before = walker.state.segments.len();
        let cursor = walker.state.cursor;

        // Ring of obstacles around the cursor at every reachable height
        let mut obstacles = Vec::new();
        for gx in -8..=8 {
            for gz in -8..=8 {
                let offset = Vec3::new(gx as f32 * 5.0, 0.0, gz as f32 * 5.0);
                if offset.length() < 8.0 {
                    continue;
                }
                for y in [0.0, 6.0, 12.0] {
                    obstacles.push(OccupiedPoint {
                        position: cursor.position + offset + Vec3::Y * y,
                        radius: OCCUPIED_RADIUS,
                        segment: usize::MAX,
                    });
                }
            }
        }
        walker.state.field.points.extend(obstacles);

        assert_eq!(walker.step(), StepOutcome::Finished);
        let state = walker.state();
        assert_eq!(state.segments.len(), before + 1);
        let last = state.segments.last().map(|s| (s.kind, s.entry.position));
        assert_eq!(last, Some((MoveKind::Finish, cursor.position)));
        assert!(state.forced_finish);
    }

    #[test]
    fn test_backtrack_takes_other_turn() {
        let mut walker = TrackWalker::new("backtrack", no_banking());
        // Commit a left turn by hand, then wall in its exit
        walker.commit(Move::TurnLeft { radius: WIDE_TURN_RADIUS }, true);
        let turn_index = walker.state.segments.len() - 1;
        let exit = walker.state.cursor.position;
        for gx in -8..=8 {
            for gz in -8..=8 {
                let offset = Vec3::new(gx as f32 * 5.0, 0.0, gz as f32 * 5.0);
                if offset.length() < 8.0 || offset.length() > 30.0 {
                    continue;
                }
                walker.state.field.points.push(OccupiedPoint {
                    position: exit + offset,
                    radius: OCCUPIED_RADIUS,
                    segment: usize::MAX,
                });
            }
        }
        // Ramps could still climb over the wall
        walker.config.weights.ramp = 0.0;

        let outcome = walker.step();
        assert_eq!(
            outcome,
            StepOutcome::Backtracked {
                to_segment: turn_index,
                turn: MoveKind::TurnRight
            }
        );
        let state = walker.state();
        assert_eq!(state.segments.len(), turn_index + 1);
        assert_eq!(state.segments[turn_index].kind, MoveKind::TurnRight);
        assert_eq!(state.backtracks, 1);
        // The forced turn is not a backtracking target
        assert!(state.history.entries().iter().all(|e| !e.was_turn));
    }

    #[test]
    fn test_backtrack_skips_walled_turn() {
        let mut walker = TrackWalker::new("deeper", no_banking());
        walker.config.weights.ramp = 0.0;

        // Left turn A, a straight, then left turn B
        let first = Move::TurnLeft { radius: WIDE_TURN_RADIUS };
        let straight = Move::Straight { length: BLOCK_LENGTH };
        let second = Move::TurnLeft { radius: WIDE_TURN_RADIUS };
        let second_entry = straight.end_cursor(&first.end_cursor(&walker.state.cursor));
        let second_exit = second.end_cursor(&second_entry).position;

        // Tagged as start points: exempt while the start is the newest
        // segment, so they only bite at B and beyond
        let mut obstacles = Vec::new();
        for radius in [WIDE_TURN_RADIUS, TIGHT_TURN_RADIUS] {
            obstacles.push(Move::TurnRight { radius }.sample_path(&second_entry)[0]);
        }
        for gx in -8..=8 {
            for gz in -8..=8 {
                let offset = Vec3::new(gx as f32 * 5.0, 0.0, gz as f32 * 5.0);
                if offset.length() >= 8.0 && offset.length() <= 30.0 {
                    obstacles.push(second_exit + offset);
                }
            }
        }
        walker.state.field.points.extend(obstacles.into_iter().map(|position| OccupiedPoint {
            position,
            radius: OCCUPIED_RADIUS,
            segment: 0,
        }));

        walker.commit(first, true);
        let first_index = walker.state.segments.len() - 1;
        walker.commit(straight, false);
        walker.commit(second, true);

        assert_eq!(
            walker.step(),
            StepOutcome::Backtracked {
                to_segment: first_index,
                turn: MoveKind::TurnRight
            }
        );
        let state = walker.state();
        assert_eq!(state.segments.len(), first_index + 1);
        assert_eq!(state.segments[first_index].kind, MoveKind::TurnRight);
        assert_eq!(state.backtracks, 1);
    }

    #[test]
    fn test_capped_finish_rolls_back_to_clean_spot() {
        let mut config = no_banking();
        config.max_segments = 5;
        let mut walker = TrackWalker::new("rollback", config);
        let start_exit = walker.state.cursor;

        // Blocks a finish after two straights but clears one after the first
        walker.state.field.points.push(OccupiedPoint {
            position: start_exit.local_to_world(Vec3::new(0.0, 0.0, 57.0)),
            radius: OCCUPIED_RADIUS,
            segment: 0,
        });
        walker.commit(Move::Straight { length: BLOCK_LENGTH }, false);
        walker.commit(Move::Straight { length: BLOCK_LENGTH }, false);

        assert_eq!(walker.step(), StepOutcome::Finished);
        let track = walker.into_track();
        let kinds: Vec<MoveKind> = track.segments.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, [MoveKind::Start, MoveKind::Straight, MoveKind::Finish]);
        assert_eq!(
            track.segments[2].entry.position,
            start_exit.local_to_world(Vec3::new(0.0, 0.0, BLOCK_LENGTH))
        );
        assert!(track.stats.forced_finish);
        assert!(track.occupancy.iter().any(|p| p.segment == 2));
        assert_eq!(track.validate(), Ok(()));
    }

    #[test]
    fn test_capped_finish_is_audited() {
        let mut config = TrackConfig::default();
        config.max_segments = 25;
        config.preferred_length_min = 500;
        config.preferred_length_max = 500;
        config.finish_increment = 0.0;
        for i in 0..100 {
            let seed = format!("s{i}");
            let track = generate(&seed, &config);
            assert!(track.stats.forced_finish, "seed {seed}");
            let last = track.segments.len() - 1;
            assert!(
                track.occupancy.iter().any(|p| p.segment == last),
                "seed {seed}: finish left out of the occupancy"
            );
            assert_eq!(track.validate(), Ok(()), "seed {seed}");
        }
    }

    #[test]
    fn test_generate_terminates_within_cap() {
        let mut config = TrackConfig::default();
        config.max_segments = 12;
        config.preferred_length_min = 100;
        config.preferred_length_max = 100;
        let track = generate("cap", &config);
        assert!(track.segments.len() <= 12);
        assert!(track.segments.last().is_some_and(|s| s.is_finish()));
    }

    #[test]
    fn test_generate_validates() {
        for seed in ["AAAA", "hello", "", "🏁", "a much longer seed string"] {
            let track = generate(seed, &TrackConfig::default());
            assert_eq!(track.validate(), Ok(()), "seed {seed:?}");
        }
    }
}
