//! Block catalog: local-space geometry for every move kind
//!
//! Local frame: entry at the origin, travel along +Z, +X to the left of
//! travel, +Y up. The road surface sits at y = 0 with the floor slab below it.

use glam::{Quat, Vec3};

use super::moves::{Move, MoveKind};
use super::shape::{Primitive, Shape, SurfaceKind, road_roll};
use crate::consts::*;
use crate::lerp;

/// Geometry of one block before it is placed in the world
#[derive(Debug, Clone, Default)]
pub struct LocalBlock {
    /// Everything drawn (collision pieces plus decoration)
    pub render: Vec<Primitive>,
    /// Convex pieces handed to physics
    pub collision: Vec<Primitive>,
    /// Exit point relative to the entry
    pub travel: Vec3,
}

/// Ring surface for gate kinds
pub fn gate_surface(kind: MoveKind) -> Option<SurfaceKind> {
    match kind {
        MoveKind::Start => Some(SurfaceKind::StartRing),
        MoveKind::Finish => Some(SurfaceKind::FinishRing),
        MoveKind::Checkpoint => Some(SurfaceKind::CheckpointRing),
        _ => None,
    }
}

/// Build the local geometry of `mv`; `bank` is the roll the road carries in
pub fn build_local(mv: &Move, bank: f32) -> LocalBlock {
    let mut block = match *mv {
        Move::Start { length }
        | Move::Straight { length }
        | Move::Checkpoint { length }
        | Move::Finish { length } => {
            straight_block(length, SurfaceKind::Road, gate_surface(mv.kind()), bank)
        }
        Move::Turbo { length } => straight_block(length, SurfaceKind::Turbo, None, bank),
        Move::TurnLeft { radius } => turn_block(radius, true, bank),
        Move::TurnRight { radius } => turn_block(radius, false, bank),
        Move::RampUp { length, height } => ramp_block(length, height),
        Move::RampDown { length, height } => ramp_block(length, -height),
        Move::BankTransition {
            length,
            start_bank,
            end_bank,
        } => bank_block(length, start_bank, end_bank),
    };
    block.travel = mv.local_travel();
    block
}

/// Floor slab plus both walls spanning local z in [z0, z0 + length]
fn road_pieces(z0: f32, length: f32, floor: SurfaceKind) -> Vec<Primitive> {
    let zc = z0 + length / 2.0;
    let wall_x = TRACK_WIDTH / 2.0 + WALL_THICKNESS / 2.0;
    let wall_half = Vec3::new(WALL_THICKNESS / 2.0, WALL_HEIGHT / 2.0, length / 2.0);
    vec![
        Primitive::new(
            Shape::aligned_box(
                Vec3::new(0.0, -FLOOR_THICKNESS / 2.0, zc),
                Vec3::new(TRACK_WIDTH / 2.0, FLOOR_THICKNESS / 2.0, length / 2.0),
            ),
            floor,
        ),
        Primitive::new(
            Shape::aligned_box(Vec3::new(wall_x, WALL_HEIGHT / 2.0, zc), wall_half),
            SurfaceKind::Wall,
        ),
        Primitive::new(
            Shape::aligned_box(Vec3::new(-wall_x, WALL_HEIGHT / 2.0, zc), wall_half),
            SurfaceKind::Wall,
        ),
    ]
}

/// Arch over the entry edge plus a stripe across the road
fn gate_pieces(surface: SurfaceKind) -> Vec<Primitive> {
    let post_x = TRACK_WIDTH / 2.0 + WALL_THICKNESS + GATE_POST_SIZE / 2.0;
    let post_half = Vec3::new(GATE_POST_SIZE / 2.0, GATE_HEIGHT / 2.0, GATE_POST_SIZE / 2.0);
    vec![
        Primitive::new(
            Shape::aligned_box(Vec3::new(post_x, GATE_HEIGHT / 2.0, 0.0), post_half),
            surface,
        ),
        Primitive::new(
            Shape::aligned_box(Vec3::new(-post_x, GATE_HEIGHT / 2.0, 0.0), post_half),
            surface,
        ),
        Primitive::new(
            Shape::aligned_box(
                Vec3::new(0.0, GATE_HEIGHT, 0.0),
                Vec3::new(post_x + GATE_POST_SIZE / 2.0, GATE_POST_SIZE / 2.0, GATE_POST_SIZE / 2.0),
            ),
            surface,
        ),
        Primitive::new(
            Shape::aligned_box(
                Vec3::new(0.0, 0.01, STRIPE_DEPTH / 2.0),
                Vec3::new(TRACK_WIDTH / 2.0, 0.01, STRIPE_DEPTH / 2.0),
            ),
            surface,
        ),
    ]
}

fn straight_block(
    length: f32,
    floor: SurfaceKind,
    gate: Option<SurfaceKind>,
    bank: f32,
) -> LocalBlock {
    let collision = road_pieces(0.0, length, floor);
    let mut render = collision.clone();
    if let Some(surface) = gate {
        render.extend(gate_pieces(surface));
    }

    if bank == 0.0 {
        return LocalBlock {
            render,
            collision,
            travel: Vec3::ZERO,
        };
    }

    let roll = road_roll(Quat::IDENTITY, bank);
    let pivot = Vec3::new(0.0, 0.0, length / 2.0);
    LocalBlock {
        render: render.iter().map(|p| p.rotated_about(pivot, roll)).collect(),
        collision: collision.iter().map(|p| p.rotated_about(pivot, roll)).collect(),
        travel: Vec3::ZERO,
    }
}

/// cos of the sub-segment boundary angles i·(90°/8), i = 0..=8 (sin is the reverse)
const SWEEP_COS: [f32; TURN_SUBDIVISIONS + 1] = [
    1.0,
    0.980_785_3,
    0.923_879_5,
    0.831_469_6,
    0.707_106_77,
    0.555_570_24,
    0.382_683_43,
    0.195_090_32,
    0.0,
];

/// sin/cos of sub-segment mid angles (2i+1)·(90°/16)
const MID_SIN: [f32; TURN_SUBDIVISIONS] = [
    0.098_017_14,
    0.290_284_68,
    0.471_396_74,
    0.634_393_3,
    0.773_010_43,
    0.881_921_3,
    0.956_940_35,
    0.995_184_7,
];
const MID_COS: [f32; TURN_SUBDIVISIONS] = [
    0.995_184_7,
    0.956_940_35,
    0.881_921_3,
    0.773_010_43,
    0.634_393_3,
    0.471_396_74,
    0.290_284_68,
    0.098_017_14,
];

/// sin/cos of half the mid angles (yaw quaternion components)
const HALF_MID_SIN: [f32; TURN_SUBDIVISIONS] = [
    0.049_067_676,
    0.146_730_47,
    0.242_980_18,
    0.336_889_85,
    0.427_555_1,
    0.514_102_75,
    0.595_699_3,
    0.671_558_96,
];
const HALF_MID_COS: [f32; TURN_SUBDIVISIONS] = [
    0.998_795_45,
    0.989_176_5,
    0.970_031_25,
    0.941_544_06,
    0.903_989_3,
    0.857_728_6,
    0.803_207_5,
    0.740_951_1,
];

/// Sweep angle `i` of a turn as (cos, sin)
#[inline]
fn sweep(i: usize) -> (f32, f32) {
    (SWEEP_COS[i], SWEEP_COS[TURN_SUBDIVISIONS - i])
}

/// Point on a 90° turn at sweep angle `(cos, sin)` and distance `rho` from
/// the turn centre. `side` is +1 for left turns and -1 for right turns
/// (mirror in x).
#[inline]
fn turn_point(radius: f32, side: f32, (cos, sin): (f32, f32), rho: f32, y: f32) -> Vec3 {
    Vec3::new(side * (radius - rho * cos), y, rho * sin)
}

/// Annular sector between sweep indices `i` and `i + 1`
fn sector_prism(radius: f32, side: f32, i: usize, rho: (f32, f32), y: (f32, f32)) -> Shape {
    let (a0, a1) = (sweep(i), sweep(i + 1));
    let (rho_in, rho_out) = rho;
    let (y0, y1) = y;
    let p = |a: (f32, f32), rho: f32, y: f32| turn_point(radius, side, a, rho, y);
    Shape::Prism {
        corners: [
            p(a0, rho_in, y0),
            p(a0, rho_out, y0),
            p(a1, rho_out, y0),
            p(a1, rho_in, y0),
            p(a0, rho_in, y1),
            p(a0, rho_out, y1),
            p(a1, rho_out, y1),
            p(a1, rho_in, y1),
        ],
    }
}

fn turn_block(radius: f32, left: bool, bank: f32) -> LocalBlock {
    let side = if left { 1.0 } else { -1.0 };
    let inner = radius - TRACK_WIDTH / 2.0;
    let outer = radius + TRACK_WIDTH / 2.0;
    let mut collision = Vec::with_capacity(TURN_SUBDIVISIONS * 3);

    for i in 0..TURN_SUBDIVISIONS {
        let mut pieces = [
            Primitive::new(
                sector_prism(radius, side, i, (inner, outer), (-FLOOR_THICKNESS, 0.0)),
                SurfaceKind::Road,
            ),
            Primitive::new(
                sector_prism(radius, side, i, (inner - WALL_THICKNESS, inner), (0.0, WALL_HEIGHT)),
                SurfaceKind::Wall,
            ),
            Primitive::new(
                sector_prism(radius, side, i, (outer, outer + WALL_THICKNESS), (0.0, WALL_HEIGHT)),
                SurfaceKind::Wall,
            ),
        ];

        if bank != 0.0 {
            // Roll about this sub-segment's own tangent
            let pivot = turn_point(radius, side, (MID_COS[i], MID_SIN[i]), radius, 0.0);
            let tangent_yaw = Quat::from_xyzw(0.0, side * HALF_MID_SIN[i], 0.0, HALF_MID_COS[i]);
            let roll = road_roll(tangent_yaw, bank);
            for piece in pieces.iter_mut() {
                *piece = piece.rotated_about(pivot, roll);
            }
        }
        collision.extend(pieces);
    }

    LocalBlock {
        render: collision.clone(),
        collision,
        travel: Vec3::ZERO,
    }
}

/// (1 - cos(π·i/8)) / 2: cosine ease-in/ease-out at the ramp sub-segment ends
const RAMP_EASE_STEPS: [f32; RAMP_SUBDIVISIONS + 1] = [
    0.0,
    0.038_060_233,
    0.146_446_6,
    0.308_658_3,
    0.5,
    0.691_341_7,
    0.853_553_4,
    0.961_939_8,
    1.0,
];

/// Rotation about +X that tips local +Z up by the slope `rise / run`
///
/// Built from half-angle identities so no trig call is involved.
fn pitch_up(rise: f32, run: f32) -> Quat {
    let hyp = (rise * rise + run * run).sqrt();
    let half_cos = ((1.0 + run / hyp) / 2.0).sqrt();
    let half_sin = rise / hyp / (2.0 * half_cos);
    Quat::from_xyzw(-half_sin, 0.0, 0.0, half_cos)
}

/// S-curve ramp climbing `rise` (negative descends) over `length`
fn ramp_block(length: f32, rise: f32) -> LocalBlock {
    let sub_len = length / RAMP_SUBDIVISIONS as f32;
    let wall_x = TRACK_WIDTH / 2.0 + WALL_THICKNESS / 2.0;
    let mut collision = Vec::with_capacity(RAMP_SUBDIVISIONS * 3);

    for i in 0..RAMP_SUBDIVISIONS {
        let z0 = i as f32 * sub_len;
        let y0 = rise * RAMP_EASE_STEPS[i];
        let y1 = rise * RAMP_EASE_STEPS[i + 1];
        let dy = y1 - y0;
        let hyp = (dy * dy + sub_len * sub_len).sqrt();
        let tilt = pitch_up(dy, sub_len);
        let mid = Vec3::new(0.0, (y0 + y1) / 2.0, z0 + sub_len / 2.0);
        let wall_half = Vec3::new(WALL_THICKNESS / 2.0, WALL_HEIGHT / 2.0, hyp / 2.0);

        collision.push(Primitive::new(
            Shape::Box {
                center: mid + tilt * Vec3::new(0.0, -FLOOR_THICKNESS / 2.0, 0.0),
                half_extents: Vec3::new(TRACK_WIDTH / 2.0, FLOOR_THICKNESS / 2.0, hyp / 2.0),
                rotation: tilt,
            },
            SurfaceKind::Road,
        ));
        for x in [wall_x, -wall_x] {
            collision.push(Primitive::new(
                Shape::Box {
                    center: mid + tilt * Vec3::new(x, WALL_HEIGHT / 2.0, 0.0),
                    half_extents: wall_half,
                    rotation: tilt,
                },
                SurfaceKind::Wall,
            ));
        }
    }

    LocalBlock {
        render: collision.clone(),
        collision,
        travel: Vec3::ZERO,
    }
}

/// Road whose roll moves linearly from `start_bank` to `end_bank`
fn bank_block(length: f32, start_bank: f32, end_bank: f32) -> LocalBlock {
    let sub_len = length / BANK_SUBDIVISIONS as f32;
    let mut collision = Vec::with_capacity(BANK_SUBDIVISIONS * 3);

    for i in 0..BANK_SUBDIVISIONS {
        let z0 = i as f32 * sub_len;
        let t = (i as f32 + 0.5) / BANK_SUBDIVISIONS as f32;
        let roll = road_roll(Quat::IDENTITY, lerp(start_bank, end_bank, t));
        let pivot = Vec3::new(0.0, 0.0, z0 + sub_len / 2.0);
        collision.extend(
            road_pieces(z0, sub_len, SurfaceKind::Road)
                .iter()
                .map(|p| p.rotated_about(pivot, roll)),
        );
    }

    LocalBlock {
        render: collision.clone(),
        collision,
        travel: Vec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_tables_match_trig() {
        let step = FRAC_PI_2 / TURN_SUBDIVISIONS as f32;
        for i in 0..=TURN_SUBDIVISIONS {
            let (cos, sin) = sweep(i);
            let phi = i as f32 * step;
            assert!((cos - phi.cos()).abs() < 1e-6 && (sin - phi.sin()).abs() < 1e-6);
        }
        for i in 0..TURN_SUBDIVISIONS {
            let mid = (i as f32 + 0.5) * step;
            assert!((MID_COS[i] - mid.cos()).abs() < 1e-6);
            assert!((MID_SIN[i] - mid.sin()).abs() < 1e-6);
            let yaw = Quat::from_xyzw(0.0, HALF_MID_SIN[i], 0.0, HALF_MID_COS[i]);
            assert!(yaw.abs_diff_eq(Quat::from_rotation_y(mid), 1e-6));
        }
        for i in 0..=RAMP_SUBDIVISIONS {
            let t = i as f32 / RAMP_SUBDIVISIONS as f32;
            assert!((RAMP_EASE_STEPS[i] - (1.0 - (PI * t).cos()) / 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_pitch_up_matches_rotation() {
        for (rise, run) in [(0.0, 3.0), (1.5, 3.0), (-2.0, 4.0), (0.2, 5.0)] {
            let expected = Quat::from_rotation_x(-f32::atan2(rise, run));
            assert!(pitch_up(rise, run).abs_diff_eq(expected, 1e-6));
            // Local +Z ends up along the slope
            let dir = pitch_up(rise, run) * Vec3::Z;
            assert!((dir - Vec3::new(0.0, rise, run).normalize()).length() < 1e-5);
        }
    }

    fn floor_top_z_range(block: &LocalBlock) -> (f32, f32) {
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for p in block.collision.iter().filter(|p| p.surface != SurfaceKind::Wall) {
            for c in p.shape.corners() {
                lo = lo.min(c.z);
                hi = hi.max(c.z);
            }
        }
        (lo, hi)
    }

    #[test]
    fn test_straight_has_floor_and_walls() {
        let block = build_local(&Move::Straight { length: 20.0 }, 0.0);
        assert_eq!(block.collision.len(), 3);
        assert_eq!(block.render.len(), 3);
        assert_eq!(block.travel, Vec3::new(0.0, 0.0, 20.0));
        let (lo, hi) = floor_top_z_range(&block);
        assert!(lo.abs() < 1e-5 && (hi - 20.0).abs() < 1e-5);
    }

    #[test]
    fn test_gates_add_render_only_pieces() {
        for mv in [
            Move::Start { length: 20.0 },
            Move::Finish { length: 20.0 },
            Move::Checkpoint { length: 20.0 },
        ] {
            let block = build_local(&mv, 0.0);
            let ring = gate_surface(mv.kind());
            assert_eq!(block.collision.len(), 3);
            assert_eq!(block.render.len(), 7);
            assert!(block.render.iter().any(|p| Some(p.surface) == ring));
            assert!(block.collision.iter().all(|p| Some(p.surface) != ring));
        }
    }

    #[test]
    fn test_turbo_floor_surface() {
        let block = build_local(&Move::Turbo { length: 20.0 }, 0.0);
        assert_eq!(block.collision[0].surface, SurfaceKind::Turbo);
    }

    #[test]
    fn test_turn_subsegments_meet_exit() {
        let radius = 15.0;
        for (mv, side) in [
            (Move::TurnLeft { radius }, 1.0),
            (Move::TurnRight { radius }, -1.0),
        ] {
            let block = build_local(&mv, 0.0);
            assert_eq!(block.collision.len(), TURN_SUBDIVISIONS * 3);
            let last_floor = &block.collision[(TURN_SUBDIVISIONS - 1) * 3];
            let corners = last_floor.shape.corners();
            // Far edge of the last floor piece spans the exit across the road
            let exit_mid = (corners[6] + corners[7]) / 2.0;
            assert!((exit_mid - Vec3::new(side * radius, 0.0, radius)).length() < 1e-3);
            // Nothing reaches behind the entry or past the far wall on the outside
            let reach = TRACK_WIDTH / 2.0 + WALL_THICKNESS;
            for p in &block.collision {
                for c in p.shape.corners() {
                    assert!(c.z > -1e-3);
                    assert!(c.x * side > -reach - 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_ramp_reaches_height() {
        let block = build_local(&Move::RampUp { length: 30.0, height: 6.0 }, 0.0);
        let top = block
            .collision
            .iter()
            .flat_map(|p| p.shape.corners())
            .fold(f32::MIN, |acc, c| acc.max(c.y));
        assert!(top > 6.0 && top < 6.0 + WALL_HEIGHT + 0.5);
        assert_eq!(block.travel, Vec3::new(0.0, 6.0, 30.0));

        let down = build_local(&Move::RampDown { length: 30.0, height: 6.0 }, 0.0);
        assert_eq!(down.travel, Vec3::new(0.0, -6.0, 30.0));
    }

    #[test]
    fn test_ramp_pieces_meet_without_gaps() {
        let block = build_local(&Move::RampUp { length: 24.0, height: 8.0 }, 0.0);
        let floors: Vec<_> = block
            .collision
            .iter()
            .filter(|p| p.surface == SurfaceKind::Road)
            .collect();
        for pair in floors.windows(2) {
            // Top-far edge of one floor meets the top-near edge of the next
            let a = pair[0].shape.corners();
            let b = pair[1].shape.corners();
            let a_far = (a[6] + a[7]) / 2.0;
            let b_near = (b[4] + b[5]) / 2.0;
            assert!((a_far - b_near).length() < 1e-3, "{a_far} vs {b_near}");
        }
    }

    #[test]
    fn test_bank_transition_rolls_progressively() {
        let block = build_local(
            &Move::BankTransition {
                length: 20.0,
                start_bank: 0.0,
                end_bank: 0.5,
            },
            0.0,
        );
        let roll_of = |p: &Primitive| match p.shape {
            Shape::Box { rotation, .. } => (rotation * Vec3::X).y,
            Shape::Prism { .. } => 0.0,
        };
        let floors: Vec<f32> = block
            .collision
            .iter()
            .filter(|p| p.surface == SurfaceKind::Road)
            .map(roll_of)
            .collect();
        assert_eq!(floors.len(), BANK_SUBDIVISIONS);
        assert!(floors.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_banked_straight_tilts_walls() {
        let flat = build_local(&Move::Straight { length: 20.0 }, 0.0);
        let banked = build_local(&Move::Straight { length: 20.0 }, 0.3);
        // Left wall (+x) rises, right wall drops
        assert!(banked.collision[1].shape.centroid().y > flat.collision[1].shape.centroid().y);
        assert!(banked.collision[2].shape.centroid().y < flat.collision[2].shape.centroid().y);
    }
}
