//! Autonomous pilot.
//!
//! Each pilot keeps a current target and a list of active threats, both
//! refreshed on randomized timers rather than every tick. With threats
//! present the pilot evades (turn away, keep thrusting, fire at anything dead
//! ahead); otherwise it pursues its target, closing to weapon range before
//! opening fire.

use rand::Rng;
use smallvec::SmallVec;

use crate::game::constants::ai::*;
use crate::game::constants::arena;
use crate::game::registry::Handle;
use crate::game::state::{Bullet, Intent, Ship, SimState};
use crate::util::angle::{bearing_degrees, degrees_between, normalize_degrees};
use crate::util::vec2::Vec2;

/// An entity currently threatening a ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreatRef {
    Ship(Handle<Ship>),
    Bullet(Handle<Bullet>),
}

#[derive(Debug, Clone)]
pub struct AiState {
    pub target: Option<Handle<Ship>>,
    pub threats: SmallVec<[ThreatRef; 8]>,
    /// Ticks until the next target scan
    pub select_target_timer: f32,
    /// Ticks until the next threat scan
    pub check_threats_timer: f32,
}

impl AiState {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            target: None,
            threats: SmallVec::new(),
            select_target_timer: rng.gen_range(SELECT_INITIAL_MIN..SELECT_INITIAL_MAX),
            check_threats_timer: rng.gen_range(THREAT_REARM_MIN..THREAT_REARM_MAX),
        }
    }
}

impl Default for AiState {
    fn default() -> Self {
        Self::new()
    }
}

/// One pilot decision against an immutable view of the world
pub fn decide(
    state: &SimState,
    ship_handle: Handle<Ship>,
    ai: &mut AiState,
    delta: f32,
) -> Intent {
    let Some(ship) = state.ships.get(ship_handle) else {
        return Intent::default();
    };

    ai.select_target_timer -= delta;
    ai.check_threats_timer -= delta;
    if ai.select_target_timer <= 0.0 {
        ai.target = select_target(state, ship);
        ai.select_target_timer = rand::thread_rng().gen_range(SELECT_REARM_MIN..SELECT_REARM_MAX);
    }
    if ai.check_threats_timer <= 0.0 {
        ai.threats = scan_threats(state, ship);
        ai.check_threats_timer = rand::thread_rng().gen_range(THREAT_REARM_MIN..THREAT_REARM_MAX);
    }
    ai.threats.retain(|threat| match threat {
        ThreatRef::Ship(handle) => state.ships.contains(*handle),
        ThreatRef::Bullet(handle) => state.bullets.contains(*handle),
    });

    let mut intent = Intent::default();
    if ai.threats.is_empty() {
        pursue(state, ship, ai, &mut intent);
    } else {
        evade(state, ship, ai, &mut intent);
    }
    intent
}

/// Nearest enemy ship, if any
fn select_target(state: &SimState, ship: &Ship) -> Option<Handle<Ship>> {
    state
        .ships
        .iter()
        .filter(|(_, other)| other.team != ship.team)
        .min_by(|(_, a), (_, b)| {
            let da = ship.position.distance_sq_to(a.position);
            let db = ship.position.distance_sq_to(b.position);
            da.total_cmp(&db)
        })
        .map(|(handle, _)| handle)
}

/// Enemy ships and bullets that are close and heading roughly at us
fn scan_threats(state: &SimState, ship: &Ship) -> SmallVec<[ThreatRef; 8]> {
    let mut threats = SmallVec::new();
    for (handle, other) in state.ships.iter() {
        if other.team != ship.team
            && approaching(other.position, other.travel_direction(), ship.position)
        {
            threats.push(ThreatRef::Ship(handle));
        }
    }
    for (handle, bullet) in state.bullets.iter() {
        if bullet.team != ship.team
            && approaching(bullet.position, bullet.velocity.angle_degrees(), ship.position)
        {
            threats.push(ThreatRef::Bullet(handle));
        }
    }
    threats
}

fn approaching(threat_position: Vec2, threat_direction: f32, position: Vec2) -> bool {
    threat_position.distance_to(position) <= DANGER_DISTANCE
        && degrees_between(bearing_degrees(threat_position, position), threat_direction)
            <= DANGER_ANGLE
}

/// Turn away from threats while keeping speed up; anything dead ahead gets
/// shot at instead of dodged
fn evade(state: &SimState, ship: &Ship, ai: &AiState, intent: &mut Intent) {
    let direction = ship.travel_direction();
    let mut thrust_ok = true;
    let mut left_ok = true;
    let mut right_ok = true;

    // Rule out turns that would swing the escape vector into a nearby wall.
    if ship.position.x <= DANGER_DISTANCE {
        if direction > 90.0 && direction < 180.0 {
            left_ok = false;
        }
        if direction > 180.0 && direction < 270.0 {
            right_ok = false;
        }
    }
    if ship.position.x >= arena::WIDTH - DANGER_DISTANCE {
        if direction > 0.0 && direction < 90.0 {
            right_ok = false;
        }
        if direction > 270.0 && direction < 360.0 {
            left_ok = false;
        }
    }
    if ship.position.y <= DANGER_DISTANCE {
        if direction > 180.0 && direction < 270.0 {
            left_ok = false;
        }
        if direction > 270.0 && direction < 360.0 {
            right_ok = false;
        }
    }
    if ship.position.y >= arena::HEIGHT - DANGER_DISTANCE {
        if direction > 0.0 && direction < 90.0 {
            left_ok = false;
        }
        if direction > 90.0 && direction < 180.0 {
            right_ok = false;
        }
    }

    for threat in &ai.threats {
        let threat_position = match threat {
            ThreatRef::Ship(handle) => state.ships.get(*handle).map(|s| s.position),
            ThreatRef::Bullet(handle) => state.bullets.get(*handle).map(|b| b.position),
        };
        let Some(threat_position) = threat_position else {
            continue;
        };
        let diff =
            normalize_degrees(bearing_degrees(ship.position, threat_position) - direction);
        if diff <= DANGER_ANGLE || diff >= 360.0 - DANGER_ANGLE {
            thrust_ok = false;
            intent.shoot = true;
        } else if diff <= 2.0 * DANGER_ANGLE {
            left_ok = false;
        } else if diff >= 360.0 - 2.0 * DANGER_ANGLE {
            right_ok = false;
        }
    }

    intent.thrust = thrust_ok;
    if left_ok {
        intent.turn_left = true;
    } else if right_ok {
        intent.turn_right = true;
    } else {
        intent.shoot = true;
    }
}

/// Steer toward the target; thrust until in weapon range, then fire
fn pursue(state: &SimState, ship: &Ship, ai: &mut AiState, intent: &mut Intent) {
    // Before the first scan there is nothing to chase and nothing to mourn;
    // the initial stagger stays intact.
    let Some(target_handle) = ai.target else {
        return;
    };
    let Some(target) = state.ships.get(target_handle) else {
        // Target died; pull the next scan forward.
        ai.select_target_timer = ai.select_target_timer.min(SELECT_TARGET_DEAD);
        return;
    };
    let direction = ship.travel_direction();
    let diff = normalize_degrees(bearing_degrees(ship.position, target.position) - direction);
    if diff > AIM_DEADZONE && diff < 180.0 {
        intent.turn_left = true;
    } else if diff >= 180.0 && diff < 360.0 - AIM_DEADZONE {
        intent.turn_right = true;
    }
    if diff <= AIM_TOLERANCE || diff >= 360.0 - AIM_TOLERANCE {
        if ship.position.distance_to(target.position) > TARGET_RANGE {
            intent.thrust = true;
        } else {
            intent.shoot = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Team;

    fn armed_state() -> AiState {
        AiState {
            target: None,
            threats: SmallVec::new(),
            select_target_timer: 0.0,
            check_threats_timer: 0.0,
        }
    }

    fn ship_at(x: f32, y: f32, heading: f32, team: Team) -> Ship {
        Ship::new(team, Vec2::new(x, y), heading, 0)
    }

    #[test]
    fn test_selects_nearest_enemy() {
        let mut state = SimState::new();
        // Heading 0 means travel direction 90 (straight up).
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        let near = state
            .ships
            .insert(ship_at(1100.0, 1000.0, 0.0, Team::Red));
        state
            .ships
            .insert(ship_at(1200.0, 1000.0, 0.0, Team::Red));
        let mut ai = armed_state();
        decide(&state, pilot, &mut ai, 1.0);
        assert_eq!(ai.target, Some(near));
    }

    #[test]
    fn test_teammates_are_never_targets() {
        let mut state = SimState::new();
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        state
            .ships
            .insert(ship_at(1050.0, 1000.0, 0.0, Team::Green));
        let mut ai = armed_state();
        decide(&state, pilot, &mut ai, 1.0);
        assert_eq!(ai.target, None);
    }

    #[test]
    fn test_incoming_bullet_dead_ahead_blocks_thrust_and_fires() {
        let mut state = SimState::new();
        // Pilot travels straight up; a bullet 200 units above is coming
        // straight down at it.
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        state.bullets.insert(Bullet::new(
            Team::Red,
            Vec2::new(1000.0, 1200.0),
            Vec2::new(0.0, -20.0),
        ));
        let mut ai = armed_state();
        let intent = decide(&state, pilot, &mut ai, 1.0);
        assert!(!ai.threats.is_empty());
        assert!(!intent.thrust);
        assert!(intent.shoot);
    }

    #[test]
    fn test_receding_bullet_is_not_a_threat() {
        let mut state = SimState::new();
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        state.bullets.insert(Bullet::new(
            Team::Red,
            Vec2::new(1000.0, 1200.0),
            Vec2::new(0.0, 20.0),
        ));
        let mut ai = armed_state();
        decide(&state, pilot, &mut ai, 1.0);
        assert!(ai.threats.is_empty());
    }

    #[test]
    fn test_steers_left_toward_target() {
        let mut state = SimState::new();
        // Pilot travels along +y; target sits to the upper left, a positive
        // bearing offset, so the pilot turns counterclockwise.
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        state
            .ships
            .insert(ship_at(600.0, 1400.0, 0.0, Team::Red));
        let mut ai = armed_state();
        let intent = decide(&state, pilot, &mut ai, 1.0);
        assert!(intent.turn_left);
        assert!(!intent.turn_right);
    }

    #[test]
    fn test_thrusts_when_aligned_and_out_of_range() {
        let mut state = SimState::new();
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        state
            .ships
            .insert(ship_at(1000.0, 1000.0 + TARGET_RANGE + 50.0, 0.0, Team::Red));
        let mut ai = armed_state();
        // Threat scan would also see the enemy ship only if it approaches;
        // it travels parallel, so pursuit applies.
        let intent = decide(&state, pilot, &mut ai, 1.0);
        assert!(intent.thrust);
        assert!(!intent.shoot);
    }

    #[test]
    fn test_fires_when_aligned_and_in_range() {
        let mut state = SimState::new();
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        state
            .ships
            .insert(ship_at(1000.0, 1000.0 + TARGET_RANGE - 100.0, 90.0, Team::Red));
        let mut ai = armed_state();
        let intent = decide(&state, pilot, &mut ai, 1.0);
        assert!(intent.shoot);
        assert!(!intent.thrust);
    }

    #[test]
    fn test_unscanned_pilot_keeps_initial_stagger() {
        let mut state = SimState::new();
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        state
            .ships
            .insert(ship_at(1500.0, 1000.0, 0.0, Team::Red));
        let mut ai = AiState {
            target: None,
            threats: SmallVec::new(),
            select_target_timer: 60.0,
            check_threats_timer: 60.0,
        };
        decide(&state, pilot, &mut ai, 1.0);
        // No target has ever been scanned for, so the arm timer only ticks.
        assert_eq!(ai.target, None);
        assert!(ai.select_target_timer > 50.0);
    }

    #[test]
    fn test_dead_target_accelerates_rescan() {
        let mut state = SimState::new();
        let pilot = state
            .ships
            .insert(ship_at(1000.0, 1000.0, 0.0, Team::Green));
        let enemy = state
            .ships
            .insert(ship_at(1500.0, 1000.0, 0.0, Team::Red));
        let mut ai = armed_state();
        ai.target = Some(enemy);
        ai.select_target_timer = 120.0;
        ai.check_threats_timer = 120.0;
        state.ships.remove(enemy);
        decide(&state, pilot, &mut ai, 1.0);
        assert!(ai.select_target_timer <= SELECT_TARGET_DEAD);
    }
}
