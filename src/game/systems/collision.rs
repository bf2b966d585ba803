//! Collision resolution and ship destruction.
//!
//! Bullets destroy enemy ships on contact, and bullets from opposing teams
//! annihilate each other. Friendly fire does not exist; same-team contacts
//! are ignored entirely.

use crate::game::constants::{bullet, ship};
use crate::game::game_loop::GameLoopEvent;
use crate::game::registry::Handle;
use crate::game::state::{Effect, Ship, SimState};
use crate::game::systems::controller;

pub fn update(state: &mut SimState, events: &mut Vec<GameLoopEvent>) {
    resolve_bullet_ship(state, events);
    resolve_bullet_bullet(state, events);
}

fn resolve_bullet_ship(state: &mut SimState, events: &mut Vec<GameLoopEvent>) {
    let hit_range_sq = (ship::RADIUS + bullet::RADIUS).powi(2);
    for bullet_handle in state.bullets.handles() {
        let Some(shot) = state.bullets.get(bullet_handle) else {
            continue;
        };
        let hit = state.ships.iter().find_map(|(handle, target)| {
            (target.team != shot.team
                && target.position.distance_sq_to(shot.position) <= hit_range_sq)
                .then_some(handle)
        });
        if let Some(ship_handle) = hit {
            state.bullets.remove(bullet_handle);
            destroy_ship(state, ship_handle, events);
        }
    }
}

fn resolve_bullet_bullet(state: &mut SimState, events: &mut Vec<GameLoopEvent>) {
    let hit_range_sq = (2.0 * bullet::RADIUS).powi(2);
    let handles = state.bullets.handles();
    for (i, &a) in handles.iter().enumerate() {
        for &b in &handles[i + 1..] {
            let (Some(first), Some(second)) = (state.bullets.get(a), state.bullets.get(b)) else {
                continue;
            };
            if first.team == second.team
                || first.position.distance_sq_to(second.position) > hit_range_sq
            {
                continue;
            }
            for (handle, position) in [(a, first.position), (b, second.position)] {
                state.bullets.remove(handle);
                events.push(GameLoopEvent::BulletDissipated {
                    position,
                    in_view: state.in_any_view(position, bullet::RADIUS),
                });
            }
        }
    }
}

/// Remove a ship, spawn its explosion, and tear down its controller
pub fn destroy_ship(
    state: &mut SimState,
    handle: Handle<Ship>,
    events: &mut Vec<GameLoopEvent>,
) {
    let Some(destroyed) = state.ships.remove(handle) else {
        return;
    };
    if let Some(exhaust) = destroyed.exhaust {
        state.effects.remove(exhaust);
    }
    state.effects.insert(Effect::explosion(destroyed.position));
    events.push(GameLoopEvent::ShipDestroyed {
        team: destroyed.team,
        position: destroyed.position,
        in_view: state.in_any_view(destroyed.position, ship::RADIUS),
    });
    controller::on_ship_destroyed(state, destroyed.controller);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Bullet, Team};
    use crate::util::vec2::Vec2;

    #[test]
    fn test_bullet_destroys_enemy_ship() {
        let mut state = SimState::new();
        let target = state
            .ships
            .insert(Ship::new(Team::Green, Vec2::new(500.0, 500.0), 0.0, 0));
        state.bullets.insert(Bullet::new(
            Team::Red,
            Vec2::new(510.0, 500.0),
            Vec2::ZERO,
        ));
        let mut events = Vec::new();
        update(&mut state, &mut events);
        assert!(!state.ships.contains(target));
        assert!(state.bullets.is_empty());
        assert_eq!(state.effects.len(), 1);
        assert!(matches!(
            events.as_slice(),
            [GameLoopEvent::ShipDestroyed {
                team: Team::Green,
                ..
            }]
        ));
    }

    #[test]
    fn test_friendly_bullet_passes_through() {
        let mut state = SimState::new();
        let target = state
            .ships
            .insert(Ship::new(Team::Red, Vec2::new(500.0, 500.0), 0.0, 0));
        state.bullets.insert(Bullet::new(
            Team::Red,
            Vec2::new(500.0, 500.0),
            Vec2::ZERO,
        ));
        let mut events = Vec::new();
        update(&mut state, &mut events);
        assert!(state.ships.contains(target));
        assert_eq!(state.bullets.len(), 1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_opposing_bullets_annihilate() {
        let mut state = SimState::new();
        state.bullets.insert(Bullet::new(
            Team::Red,
            Vec2::new(300.0, 300.0),
            Vec2::ZERO,
        ));
        state.bullets.insert(Bullet::new(
            Team::Green,
            Vec2::new(305.0, 300.0),
            Vec2::ZERO,
        ));
        let mut events = Vec::new();
        update(&mut state, &mut events);
        assert!(state.bullets.is_empty());
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_same_team_bullets_coexist() {
        let mut state = SimState::new();
        state.bullets.insert(Bullet::new(
            Team::Green,
            Vec2::new(300.0, 300.0),
            Vec2::ZERO,
        ));
        state.bullets.insert(Bullet::new(
            Team::Green,
            Vec2::new(302.0, 300.0),
            Vec2::ZERO,
        ));
        let mut events = Vec::new();
        update(&mut state, &mut events);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_out_of_range_bullet_misses() {
        let mut state = SimState::new();
        let target = state
            .ships
            .insert(Ship::new(Team::Green, Vec2::new(500.0, 500.0), 0.0, 0));
        state.bullets.insert(Bullet::new(
            Team::Red,
            Vec2::new(500.0 + ship::RADIUS + bullet::RADIUS + 1.0, 500.0),
            Vec2::ZERO,
        ));
        let mut events = Vec::new();
        update(&mut state, &mut events);
        assert!(state.ships.contains(target));
        assert_eq!(state.bullets.len(), 1);
    }
}
