//! Weapon cooldowns and firing.

use crate::game::constants::{bullet, combat};
use crate::game::game_loop::GameLoopEvent;
use crate::game::spawn;
use crate::game::state::SimState;
use crate::util::vec2::Vec2;

pub fn update(state: &mut SimState, delta: f32, events: &mut Vec<GameLoopEvent>) {
    for handle in state.ships.handles() {
        let Some(ship) = state.ships.get_mut(handle) else {
            continue;
        };
        ship.shoot_cooldown = (ship.shoot_cooldown - delta).max(0.0);
        if !ship.intent.shoot || ship.shoot_cooldown > 0.0 {
            continue;
        }
        ship.shoot_cooldown = combat::SHOOT_WAIT;
        let team = ship.team;
        let position = ship.nose();
        // Muzzle velocity adds to the ship's own velocity.
        let velocity =
            ship.velocity + Vec2::from_degrees(ship.travel_direction()) * bullet::SPEED;
        spawn::spawn_bullet(state, team, position, velocity);
        events.push(GameLoopEvent::BulletFired {
            team,
            position,
            in_view: state.in_any_view(position, bullet::RADIUS),
        });
    }
}
