//! Ship and bullet kinematics.
//!
//! All motion integrates in tick units scaled by the fractional step
//! `delta`. Turning uses trapezoidal integration of the angular velocity so
//! the heading advances consistently across fractional steps; angular
//! friction snaps the spin to zero instead of oscillating around it.

use crate::game::constants::{arena, combat, ship};
use crate::game::state::{Effect, EffectKind, Ship, SimState};
use crate::util::angle::normalize_degrees;
use crate::util::vec2::Vec2;

pub fn update(state: &mut SimState, delta: f32) {
    move_ships(state, delta);
    update_exhausts(state);
    move_bullets(state, delta);
    age_explosions(state, delta);
}

fn move_ships(state: &mut SimState, delta: f32) {
    for handle in state.ships.handles() {
        let Some(ship) = state.ships.get_mut(handle) else {
            continue;
        };

        // Turning: accumulate angular acceleration from the turn keys, then
        // apply friction toward zero, snapping when friction would overshoot.
        let w0 = ship.angular_velocity;
        let steer = ship.intent.turn_left as i32 - ship.intent.turn_right as i32;
        let mut accel = steer as f32 * ship::TURN;
        ship.angular_velocity += accel * delta;
        if ship.angular_velocity != 0.0 {
            let friction = -(ship::TURN_FRICTION * delta).copysign(ship.angular_velocity);
            if ship.angular_velocity.abs() > friction.abs() {
                accel -= ship::TURN_FRICTION.copysign(ship.angular_velocity);
                ship.angular_velocity += friction;
            } else {
                accel -= ship.angular_velocity / delta;
                ship.angular_velocity = 0.0;
            }
        }
        ship.heading = normalize_degrees(ship.heading + w0 * delta + 0.5 * accel * delta * delta);
        ship.angular_velocity = ship.angular_velocity.clamp(-ship::TURN_MAX, ship::TURN_MAX);

        if ship.intent.thrust {
            ship.velocity += Vec2::from_degrees(ship.travel_direction()) * ship::THRUST * delta;
        }
        ship.velocity = ship.velocity.clamp_length(ship::THRUST_MAX);
        ship.position += ship.velocity * delta;

        bounce_off_walls(ship);
    }
}

/// Reflect the ship off the arena edges, preserving speed
fn bounce_off_walls(ship: &mut Ship) {
    let r = ship::RADIUS;
    if ship.position.x - r < 0.0 {
        ship.position.x = 2.0 * r - ship.position.x;
        ship.velocity.x = ship.velocity.x.abs();
    } else if ship.position.x + r > arena::WIDTH {
        ship.position.x = 2.0 * (arena::WIDTH - r) - ship.position.x;
        ship.velocity.x = -ship.velocity.x.abs();
    }
    if ship.position.y - r < 0.0 {
        ship.position.y = 2.0 * r - ship.position.y;
        ship.velocity.y = ship.velocity.y.abs();
    } else if ship.position.y + r > arena::HEIGHT {
        ship.position.y = 2.0 * (arena::HEIGHT - r) - ship.position.y;
        ship.velocity.y = -ship.velocity.y.abs();
    }
}

/// Keep exhaust flames attached to thrusting ships, one per ship
fn update_exhausts(state: &mut SimState) {
    for handle in state.ships.handles() {
        let Some(ship) = state.ships.get(handle) else {
            continue;
        };
        let tail = ship.position - Vec2::from_degrees(ship.travel_direction()) * ship::RADIUS;
        let heading = ship.heading;
        match (ship.intent.thrust, ship.exhaust) {
            (true, Some(effect_handle)) => {
                if let Some(effect) = state.effects.get_mut(effect_handle) {
                    effect.position = tail;
                    effect.heading = heading;
                }
            }
            (true, None) => {
                let effect = state.effects.insert(Effect::exhaust(handle, tail, heading));
                if let Some(ship) = state.ships.get_mut(handle) {
                    ship.exhaust = Some(effect);
                }
            }
            (false, Some(effect_handle)) => {
                state.effects.remove(effect_handle);
                if let Some(ship) = state.ships.get_mut(handle) {
                    ship.exhaust = None;
                }
            }
            (false, None) => {}
        }
    }
}

// Natural expiry is silent; only bullet-on-bullet contact dissipates audibly.
fn move_bullets(state: &mut SimState, delta: f32) {
    for handle in state.bullets.handles() {
        let Some(bullet) = state.bullets.get_mut(handle) else {
            continue;
        };
        bullet.position += bullet.velocity * delta;
        bullet.lifetime -= delta;
        if bullet.lifetime <= 0.0 {
            state.bullets.remove(handle);
        }
    }
}

fn age_explosions(state: &mut SimState, delta: f32) {
    for handle in state.effects.handles() {
        let Some(effect) = state.effects.get_mut(handle) else {
            continue;
        };
        if let EffectKind::Explosion { age } = &mut effect.kind {
            *age += delta;
            if *age >= combat::EXPLOSION_LIFE {
                state.effects.remove(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::bullet;
    use crate::game::state::{Bullet, Intent, Ship, Team};

    fn ship_at(x: f32, y: f32, heading: f32) -> Ship {
        Ship::new(Team::Red, Vec2::new(x, y), heading, 0)
    }

    fn center() -> Vec2 {
        Vec2::new(arena::WIDTH / 2.0, arena::HEIGHT / 2.0)
    }

    #[test]
    fn test_speed_never_exceeds_thrust_max() {
        let mut state = SimState::new();
        let mut ship = ship_at(center().x, center().y, 0.0);
        ship.intent.thrust = true;
        let handle = state.ships.insert(ship);
        for _ in 0..100 {
            update(&mut state, 1.0);
            let speed = state.ships.get(handle).unwrap().speed();
            assert!(speed <= ship::THRUST_MAX + 1e-3);
        }
        let speed = state.ships.get(handle).unwrap().speed();
        assert!((speed - ship::THRUST_MAX).abs() < 1e-3);
    }

    #[test]
    fn test_angular_velocity_clamped() {
        let mut state = SimState::new();
        let mut ship = ship_at(center().x, center().y, 0.0);
        ship.intent.turn_left = true;
        let handle = state.ships.insert(ship);
        for _ in 0..50 {
            update(&mut state, 1.0);
            let w = state.ships.get(handle).unwrap().angular_velocity;
            assert!(w.abs() <= ship::TURN_MAX + 1e-3);
        }
        assert!(state.ships.get(handle).unwrap().angular_velocity > 0.0);
    }

    #[test]
    fn test_friction_stops_spin_without_reversal() {
        let mut state = SimState::new();
        let mut ship = ship_at(center().x, center().y, 0.0);
        ship.angular_velocity = 2.0;
        let handle = state.ships.insert(ship);
        let mut previous = 2.0;
        for _ in 0..20 {
            update(&mut state, 1.0);
            let w = state.ships.get(handle).unwrap().angular_velocity;
            assert!(w >= 0.0);
            assert!(w <= previous);
            previous = w;
        }
        assert_eq!(previous, 0.0);
    }

    #[test]
    fn test_wall_bounce_reflects_position_and_velocity() {
        let mut state = SimState::new();
        let mut ship = ship_at(20.0, center().y, 0.0);
        ship.velocity = Vec2::new(-6.0, 0.0);
        let handle = state.ships.insert(ship);
        update(&mut state, 1.0);
        let ship = state.ships.get(handle).unwrap();
        // Crossed to x = 14, reflected about the radius line x = 16.
        assert!((ship.position.x - 18.0).abs() < 1e-3);
        assert!(ship.velocity.x > 0.0);
        assert!((ship.speed() - 6.0).abs() < 1e-3);
    }

    #[test]
    fn test_bullet_expires_silently_after_lifetime() {
        let mut state = SimState::new();
        let handle = state
            .bullets
            .insert(Bullet::new(Team::Green, center(), Vec2::new(1.0, 0.0)));
        for _ in 0..14 {
            update(&mut state, 1.0);
        }
        assert!(state.bullets.contains(handle));
        update(&mut state, 1.0);
        assert!(!state.bullets.contains(handle));
        // No effect or other trace is left behind.
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_two_half_steps_match_one_full_step_linearly() {
        let mut full = SimState::new();
        let mut split = SimState::new();
        let mut ship = ship_at(center().x, center().y, 45.0);
        ship.velocity = Vec2::new(3.0, -2.0);
        let fh = full.ships.insert(ship.clone());
        let sh = split.ships.insert(ship);
        update(&mut full, 1.0);
        update(&mut split, 0.5);
        update(&mut split, 0.5);
        let a = full.ships.get(fh).unwrap().position;
        let b = split.ships.get(sh).unwrap().position;
        assert!(a.approx_eq(b, 1e-3));
    }

    #[test]
    fn test_half_steps_accumulate_bullet_age() {
        let mut state = SimState::new();
        let handle = state
            .bullets
            .insert(Bullet::new(Team::Red, center(), Vec2::ZERO));
        update(&mut state, 0.5);
        update(&mut state, 0.5);
        let lifetime = state.bullets.get(handle).unwrap().lifetime;
        assert!((lifetime - (bullet::LIFE - 1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_exhaust_follows_thrust_state() {
        let mut state = SimState::new();
        let mut ship = ship_at(center().x, center().y, 0.0);
        ship.intent.thrust = true;
        let handle = state.ships.insert(ship);
        update(&mut state, 1.0);
        let exhaust = state.ships.get(handle).unwrap().exhaust;
        assert!(exhaust.is_some_and(|e| state.effects.contains(e)));
        state.ships.get_mut(handle).unwrap().intent = Intent::default();
        update(&mut state, 1.0);
        assert!(state.ships.get(handle).unwrap().exhaust.is_none());
        assert_eq!(state.effects.len(), 0);
    }
}
