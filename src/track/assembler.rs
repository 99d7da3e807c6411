//! Block assembly: catalog geometry placed at the cursor
//!
//! Produces world-space segments and attaches gate metadata for the runtime
//! lap timer.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::catalog::build_local;
use super::cursor::Cursor;
use super::moves::{Move, MoveKind};
use super::shape::{Primitive, Transform, road_roll};

/// Which gate a segment carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    Start,
    Finish,
    Checkpoint { order: u32 },
}

/// Gate plane used by runtime crossing detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerInfo {
    pub gate: GateKind,
    /// Plane position along the block's local z, relative to `frame`
    pub plane_offset: f32,
    /// Block centre frame in world space
    pub frame: Transform,
}

impl TriggerInfo {
    /// World-space point at the centre of the gate plane
    pub fn plane_point(&self) -> Vec3 {
        self.frame.apply(Vec3::new(0.0, 0.0, self.plane_offset))
    }
}

/// One committed block of track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub kind: MoveKind,
    /// Placement parameters the block was built from
    pub placement: Move,
    pub entry: Cursor,
    pub exit: Cursor,
    pub render: Vec<Primitive>,
    pub collision: Vec<Primitive>,
    pub trigger: Option<TriggerInfo>,
}

impl Segment {
    pub fn is_start(&self) -> bool {
        matches!(self.trigger, Some(TriggerInfo { gate: GateKind::Start, .. }))
    }

    pub fn is_finish(&self) -> bool {
        matches!(self.trigger, Some(TriggerInfo { gate: GateKind::Finish, .. }))
    }

    pub fn is_checkpoint(&self) -> bool {
        self.checkpoint_order().is_some()
    }

    pub fn checkpoint_order(&self) -> Option<u32> {
        match self.trigger {
            Some(TriggerInfo {
                gate: GateKind::Checkpoint { order },
                ..
            }) => Some(order),
            _ => None,
        }
    }

    pub fn is_turbo(&self) -> bool {
        self.kind == MoveKind::Turbo
    }

    pub fn trigger_plane_offset(&self) -> Option<f32> {
        self.trigger.map(|t| t.plane_offset)
    }
}

/// Build the world-space segment for `mv` starting at `cursor`
///
/// `checkpoint_order` is only read for checkpoint moves.
pub fn assemble(mv: &Move, cursor: &Cursor, index: usize, checkpoint_order: u32) -> Segment {
    let block = build_local(mv, cursor.bank);
    let yaw = cursor.heading.yaw();
    let place = Transform::new(cursor.position, yaw);

    let gate = match mv.kind() {
        MoveKind::Start => Some(GateKind::Start),
        MoveKind::Finish => Some(GateKind::Finish),
        MoveKind::Checkpoint => Some(GateKind::Checkpoint {
            order: checkpoint_order,
        }),
        _ => None,
    };
    let trigger = match (gate, mv.straight_length()) {
        (Some(gate), Some(length)) => Some(TriggerInfo {
            gate,
            plane_offset: -length / 2.0,
            frame: Transform::new(
                cursor.local_to_world(Vec3::new(0.0, 0.0, length / 2.0)),
                road_roll(yaw, cursor.bank) * yaw,
            ),
        }),
        _ => None,
    };

    Segment {
        index,
        kind: mv.kind(),
        placement: *mv,
        entry: *cursor,
        exit: mv.end_cursor(cursor),
        render: block.render.iter().map(|p| p.transformed(&place)).collect(),
        collision: block.collision.iter().map(|p| p.transformed(&place)).collect(),
        trigger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::cursor::Heading;

    #[test]
    fn test_checkpoint_trigger() {
        let cursor = Cursor::new(Vec3::new(10.0, 2.0, 0.0), Heading::NORTH.left(), 0.0);
        let seg = assemble(&Move::Checkpoint { length: 20.0 }, &cursor, 7, 3);
        assert_eq!(seg.index, 7);
        assert!(seg.is_checkpoint());
        assert_eq!(seg.checkpoint_order(), Some(3));
        assert_eq!(seg.trigger_plane_offset(), Some(-10.0));
        // Gate plane sits on the entry edge
        let p = seg.trigger.map(|t| t.plane_point()).unwrap_or(Vec3::NAN);
        assert!((p - cursor.position).length() < 1e-4);
        assert_eq!(seg.exit.position, Vec3::new(30.0, 2.0, 0.0));
    }

    #[test]
    fn test_plain_blocks_have_no_trigger() {
        let cursor = Cursor::default();
        for mv in [
            Move::Straight { length: 20.0 },
            Move::Turbo { length: 20.0 },
            Move::TurnLeft { radius: 15.0 },
        ] {
            let seg = assemble(&mv, &cursor, 1, 0);
            assert!(seg.trigger.is_none());
            assert!(!seg.is_start() && !seg.is_finish() && !seg.is_checkpoint());
        }
        assert!(assemble(&Move::Turbo { length: 20.0 }, &cursor, 1, 0).is_turbo());
    }

    #[test]
    fn test_geometry_follows_heading() {
        // Facing -Z, a straight's floor lies at negative z
        let cursor = Cursor::new(Vec3::ZERO, Heading::new(2), 0.0);
        let seg = assemble(&Move::Straight { length: 20.0 }, &cursor, 1, 0);
        let floor = seg.collision[0].shape.centroid();
        assert!((floor - Vec3::new(0.0, -0.25, -10.0)).length() < 1e-4);
    }
}
