//! Collision detection and response against the static board
//!
//! One falling ball at a time: pegs first, then bins, then the side walls and
//! floor that keep a stray ball on the board.

use glam::Vec2;

use super::board::{Bin, Board};
use super::bounce::BounceSource;
use super::state::{Ball, GameEvent};
use crate::settings::Settings;
use crate::{heading, polar_to_cartesian};

/// Overlap between a ball and a peg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PegContact {
    /// Direction from the peg center to the ball center (`atan2(dy, dx)`)
    pub angle: f32,
    /// How far the two circles overlap
    pub penetration: f32,
}

/// Check a ball against a single peg. Touching circles (`d == r1 + r2`) do not
/// count as a hit.
pub fn peg_contact(
    ball_pos: Vec2,
    ball_radius: f32,
    peg_pos: Vec2,
    peg_radius: f32,
) -> Option<PegContact> {
    let offset = ball_pos - peg_pos;
    let distance = offset.length();
    let reach = ball_radius + peg_radius;
    if distance < reach {
        Some(PegContact {
            angle: heading(offset),
            penetration: reach - distance,
        })
    } else {
        None
    }
}

/// Post-bounce velocity: fixed speed along the contact angle plus `offset`
#[inline]
pub fn bounce_velocity(contact_angle: f32, offset: f32, speed: f32) -> Vec2 {
    polar_to_cartesian(speed, contact_angle + offset)
}

/// First bin (in index order) that has captured the ball, if any
pub fn capturing_bin<'a>(board: &'a Board, ball: &Ball) -> Option<&'a Bin> {
    board
        .bins()
        .iter()
        .find(|bin| bin.contains_x(ball.pos.x) && ball.lower_edge() > bin.y)
}

/// Advance collision state for one ball that has already been integrated this
/// tick. Returns the bin index if the ball was captured.
///
/// Peg overlaps are handled in peg order and each one overwrites the
/// velocity, so a ball wedged between two pegs leaves along the last one's
/// normal. Captured balls are left untouched.
pub fn resolve_ball<S: BounceSource + ?Sized>(
    ball: &mut Ball,
    board: &Board,
    settings: &Settings,
    source: &mut S,
    events: &mut Vec<GameEvent>,
) -> Option<usize> {
    if !ball.is_falling() {
        return None;
    }

    // --- PEGS ---
    for (index, peg) in board.pegs().iter().enumerate() {
        if let Some(contact) = peg_contact(ball.pos, ball.radius, peg.pos, board.peg_radius()) {
            let offset = source.offset(settings.bounce_angle_spread);
            ball.vel = bounce_velocity(contact.angle, offset, settings.bounce_speed);
            events.push(GameEvent::PegHit {
                ball: ball.id,
                peg: index,
            });
        }
    }

    // --- BINS ---
    if let Some(bin) = capturing_bin(board, ball) {
        let (index, rest) = (bin.index, bin.center());
        if ball.capture(index, rest) {
            events.push(GameEvent::Captured {
                ball: ball.id,
                bin: index,
            });
            return Some(index);
        }
    }

    // --- SIDE WALLS ---
    let left = board.left_wall();
    let right = board.right_wall();
    if ball.pos.x - ball.radius < left && ball.vel.x < 0.0 {
        ball.vel.x = -ball.vel.x * settings.restitution;
        ball.pos.x = left + ball.radius;
        events.push(GameEvent::WallBounce { ball: ball.id });
    } else if ball.pos.x + ball.radius > right && ball.vel.x > 0.0 {
        ball.vel.x = -ball.vel.x * settings.restitution;
        ball.pos.x = right - ball.radius;
        events.push(GameEvent::WallBounce { ball: ball.id });
    }

    // --- FLOOR ---
    let floor = board.floor_y();
    if ball.lower_edge() > floor && ball.vel.y > 0.0 {
        ball.vel.y = -ball.vel.y * settings.restitution;
        ball.pos.y = floor - ball.radius;
        events.push(GameEvent::FloorBounce { ball: ball.id });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bounce::{FixedBounce, ScriptedBounce};
    use crate::sim::state::{BallId, BallState};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn small_board() -> (Board, Settings) {
        let mut settings = Settings::with_rows(5, vec![10.0, 1.0, 1.0, 10.0]);
        settings.board_width = 300.0;
        (Board::build(&settings).unwrap(), settings)
    }

    fn ball_at(x: f32, y: f32) -> Ball {
        Ball::new(BallId(0), Vec2::new(x, y), 10.0, 1.0)
    }

    #[test]
    fn test_peg_contact() {
        let peg = Vec2::new(100.0, 100.0);

        // Ball directly above the peg, overlapping by 3
        let hit = peg_contact(Vec2::new(100.0, 85.0), 10.0, peg, 8.0).unwrap();
        assert!((hit.angle + FRAC_PI_2).abs() < 1e-6, "Contact normal points up");
        assert!((hit.penetration - 3.0).abs() < 1e-5);

        // Exactly touching is not a hit
        assert!(peg_contact(Vec2::new(118.0, 100.0), 10.0, peg, 8.0).is_none());
        assert!(peg_contact(Vec2::new(150.0, 100.0), 10.0, peg, 8.0).is_none());
    }

    #[test]
    fn test_bounce_velocity_has_fixed_speed() {
        let vel = bounce_velocity(-FRAC_PI_2, 0.0, 75.0);
        assert!(vel.x.abs() < 1e-4);
        assert!((vel.y + 75.0).abs() < 1e-4);

        // Perturbation rotates but never rescales
        let vel = bounce_velocity(-FRAC_PI_2, -PI / 12.0, 75.0);
        assert!((vel.length() - 75.0).abs() < 1e-3);
        assert!(vel.x < 0.0, "Negative offset kicks the ball left");
    }

    #[test]
    fn test_peg_hit_sets_bounce() {
        let (board, settings) = small_board();
        // Middle peg of row 3 sits at (150, 200)
        let mut ball = ball_at(150.0, 185.0);
        ball.vel = Vec2::new(0.0, 400.0);
        let mut events = Vec::new();

        let captured =
            resolve_ball(&mut ball, &board, &settings, &mut FixedBounce(0.5), &mut events);
        assert_eq!(captured, None);
        assert!(ball.vel.x.abs() < 1e-3);
        assert!((ball.vel.y + settings.bounce_speed).abs() < 1e-3);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], GameEvent::PegHit { .. }));
    }

    #[test]
    fn test_multi_peg_overlap_last_write_wins() {
        let mut settings = Settings::with_rows(5, vec![10.0, 1.0, 1.0, 10.0]);
        settings.board_width = 300.0;
        settings.peg_radius = 20.0;
        let board = Board::build(&settings).unwrap();

        // Between the two top pegs (125, 150) and (175, 150), overlapping both
        let mut ball = ball_at(150.0, 150.0);
        let mut source = ScriptedBounce::new(vec![0.5]);
        let mut events = Vec::new();
        resolve_ball(&mut ball, &board, &settings, &mut source, &mut events);

        assert_eq!(source.draws(), 2, "One sample per overlapping peg");
        let hits: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PegHit { peg, .. } => Some(*peg),
                _ => None,
            })
            .collect();
        assert_eq!(hits, vec![0, 1]);
        // Right-hand peg was resolved last, so the ball heads left
        assert!(ball.vel.x < 0.0);
        assert!((ball.vel.length() - settings.bounce_speed).abs() < 1e-3);
    }

    #[test]
    fn test_bin_capture_snaps_to_center() {
        let (board, settings) = small_board();
        // Bin 1 spans [100, 150); lower edge just past y=325
        let mut ball = ball_at(120.0, 316.0);
        ball.vel = Vec2::new(-20.0, 300.0);
        let mut events = Vec::new();

        let captured =
            resolve_ball(&mut ball, &board, &settings, &mut FixedBounce(0.5), &mut events);
        assert_eq!(captured, Some(1));
        assert_eq!(ball.state, BallState::Captured { bin: 1 });
        assert_eq!(ball.vel, Vec2::ZERO);
        assert_eq!(ball.pos, Vec2::new(125.0, 350.0));
        assert_eq!(
            events,
            vec![GameEvent::Captured {
                ball: BallId(0),
                bin: 1
            }]
        );
    }

    #[test]
    fn test_bin_boundary_goes_right() {
        let (board, settings) = small_board();
        let mut ball = ball_at(100.0, 320.0);
        let mut events = Vec::new();
        let captured =
            resolve_ball(&mut ball, &board, &settings, &mut FixedBounce(0.5), &mut events);
        assert_eq!(captured, Some(1), "Shared edge belongs to the right bin");
    }

    #[test]
    fn test_captured_ball_is_never_reexamined() {
        let (board, settings) = small_board();
        let mut ball = ball_at(120.0, 320.0);
        let mut events = Vec::new();
        resolve_ball(&mut ball, &board, &settings, &mut FixedBounce(0.5), &mut events);
        let snapshot = (ball.pos, ball.vel, ball.state);

        events.clear();
        let mut source = ScriptedBounce::new(vec![0.3]);
        assert_eq!(
            resolve_ball(&mut ball, &board, &settings, &mut source, &mut events),
            None
        );
        assert_eq!((ball.pos, ball.vel, ball.state), snapshot);
        assert!(events.is_empty());
        assert_eq!(source.draws(), 0);
    }

    #[test]
    fn test_side_wall_reflects_and_damps() {
        let (board, settings) = small_board();
        // Left wall at x=50, well above the pegs
        let mut ball = ball_at(55.0, 20.0);
        ball.vel = Vec2::new(-40.0, 10.0);
        let mut events = Vec::new();
        resolve_ball(&mut ball, &board, &settings, &mut FixedBounce(0.5), &mut events);

        assert_eq!(ball.pos.x, 60.0);
        assert_eq!(ball.vel.x, 20.0);
        assert_eq!(ball.vel.y, 10.0);
        assert_eq!(events, vec![GameEvent::WallBounce { ball: BallId(0) }]);
    }

    #[test]
    fn test_right_wall_reflects_and_damps() {
        let (board, settings) = small_board();
        // Right wall at x=250
        let mut ball = ball_at(245.0, 20.0);
        ball.vel = Vec2::new(40.0, 10.0);
        let mut events = Vec::new();
        resolve_ball(&mut ball, &board, &settings, &mut FixedBounce(0.5), &mut events);

        assert_eq!(ball.pos.x, board.right_wall() - ball.radius);
        assert_eq!(ball.vel.x, -40.0 * settings.restitution);
        assert_eq!(ball.vel.y, 10.0);
        assert_eq!(events, vec![GameEvent::WallBounce { ball: BallId(0) }]);

        // Moving back inside, the wall leaves it alone
        events.clear();
        let mut inbound = ball_at(245.0, 20.0);
        inbound.vel = Vec2::new(-40.0, 10.0);
        resolve_ball(&mut inbound, &board, &settings, &mut FixedBounce(0.5), &mut events);
        assert_eq!(inbound.pos.x, 245.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_floor_outside_bins_reflects() {
        let (board, settings) = small_board();
        let mut ball = ball_at(30.0, 370.0);
        ball.vel = Vec2::new(0.0, 200.0);
        let mut events = Vec::new();
        let captured =
            resolve_ball(&mut ball, &board, &settings, &mut FixedBounce(0.5), &mut events);

        assert_eq!(captured, None);
        assert!(ball.is_falling());
        assert_eq!(ball.vel.y, -100.0);
        assert_eq!(ball.pos.y, board.floor_y() - ball.radius);
        assert!(events.contains(&GameEvent::FloorBounce { ball: BallId(0) }));
    }
}
