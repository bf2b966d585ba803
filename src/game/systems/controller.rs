//! Ship controllers.
//!
//! Every ship is driven by exactly one controller, either a human player
//! slot polling the input snapshot or an autonomous pilot. Controllers only
//! set intent flags; motion and weapons consume them later in the same tick.

use rand::Rng;

use crate::game::registry::Handle;
use crate::game::state::{Intent, Ship, SimState, Team};
use crate::game::systems::ai::{self, AiState};
use crate::input::bindings::{Action, Bindings, PlayerBindings};
use crate::input::snapshot::InputSnapshot;

/// Local player seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn index(&self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    pub ship: Handle<Ship>,
    pub team: Team,
    pub kind: ControllerKind,
}

#[derive(Debug, Clone)]
pub enum ControllerKind {
    Human { player: PlayerSlot },
    Ai(AiState),
}

impl Controller {
    pub fn is_human(&self) -> bool {
        matches!(self.kind, ControllerKind::Human { .. })
    }
}

/// Compute and apply every controller's intent for this tick.
///
/// Decisions are staged against an immutable view of the state, then applied,
/// so every controller observes the same pre-tick world.
pub fn update(state: &mut SimState, bindings: &Bindings, input: &InputSnapshot, delta: f32) {
    let mut staged: Vec<(Handle<Controller>, Intent, Option<AiState>)> =
        Vec::with_capacity(state.controllers.len());
    for (handle, controller) in state.controllers.iter() {
        match &controller.kind {
            ControllerKind::Human { player } => {
                let intent = human_intent(&bindings.players[player.index()], input);
                staged.push((handle, intent, None));
            }
            ControllerKind::Ai(ai_state) => {
                let mut ai_state = ai_state.clone();
                let intent = ai::decide(state, controller.ship, &mut ai_state, delta);
                staged.push((handle, intent, Some(ai_state)));
            }
        }
    }
    for (handle, intent, ai_state) in staged {
        let Some(controller) = state.controllers.get_mut(handle) else {
            continue;
        };
        if let Some(ai_state) = ai_state {
            controller.kind = ControllerKind::Ai(ai_state);
        }
        let ship = controller.ship;
        if let Some(ship) = state.ships.get_mut(ship) {
            ship.intent = intent;
        }
    }
}

fn human_intent(bindings: &PlayerBindings, input: &InputSnapshot) -> Intent {
    let held = |action: Action| {
        input.key_held(bindings.key(action))
            || bindings.js(action).is_some_and(|js| input.js_active(js))
    };
    Intent {
        thrust: held(Action::Thrust),
        turn_left: held(Action::Left),
        turn_right: held(Action::Right),
        // Firing is edge-triggered: one press, one fire attempt, this tick.
        shoot: input.key_pressed(bindings.key(Action::Shoot))
            || bindings
                .js(Action::Shoot)
                .is_some_and(|js| input.js_active(js)),
    }
}

/// Attach an autonomous pilot to an uncontrolled ship
pub fn attach_ai(state: &mut SimState, ship_handle: Handle<Ship>) {
    let Some(team) = state.ships.get(ship_handle).map(|s| s.team) else {
        return;
    };
    let controller = state.controllers.insert(Controller {
        ship: ship_handle,
        team,
        kind: ControllerKind::Ai(AiState::new()),
    });
    if let Some(ship) = state.ships.get_mut(ship_handle) {
        ship.controller = Some(controller);
    }
}

/// Give a player slot control of a ship, replacing its current controller
pub fn take_over(state: &mut SimState, player: PlayerSlot, ship_handle: Handle<Ship>) {
    let Some((team, old)) = state
        .ships
        .get(ship_handle)
        .map(|s| (s.team, s.controller))
    else {
        return;
    };
    if let Some(old) = old {
        state.controllers.remove(old);
    }
    let controller = state.controllers.insert(Controller {
        ship: ship_handle,
        team,
        kind: ControllerKind::Human { player },
    });
    if let Some(ship) = state.ships.get_mut(ship_handle) {
        ship.controller = Some(controller);
    }
}

/// Tear down a destroyed ship's controller. A human player moves to a random
/// surviving teammate, displacing that ship's autonomous pilot.
pub fn on_ship_destroyed(state: &mut SimState, controller: Option<Handle<Controller>>) {
    let Some(handle) = controller else {
        return;
    };
    let Some(removed) = state.controllers.remove(handle) else {
        return;
    };
    if let ControllerKind::Human { player } = removed.kind {
        let teammates = state.team_ship_handles(removed.team);
        if teammates.is_empty() {
            return;
        }
        let pick = teammates[rand::thread_rng().gen_range(0..teammates.len())];
        take_over(state, player, pick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::systems::collision;
    use crate::util::vec2::Vec2;

    fn spawn_ship(state: &mut SimState, team: Team) -> Handle<Ship> {
        let handle = state
            .ships
            .insert(Ship::new(team, Vec2::new(500.0, 500.0), 0.0, 0));
        attach_ai(state, handle);
        handle
    }

    #[test]
    fn test_every_ship_has_one_controller() {
        let mut state = SimState::new();
        for _ in 0..4 {
            spawn_ship(&mut state, Team::Red);
        }
        assert_eq!(state.controllers.len(), state.ships.len());
        for (_, ship) in state.ships.iter() {
            let controller = ship.controller.unwrap();
            assert!(state.controllers.contains(controller));
        }
    }

    #[test]
    fn test_take_over_replaces_ai_controller() {
        let mut state = SimState::new();
        let handle = spawn_ship(&mut state, Team::Green);
        take_over(&mut state, PlayerSlot::One, handle);
        assert_eq!(state.controllers.len(), 1);
        let controller = state.ships.get(handle).unwrap().controller.unwrap();
        assert!(state.controllers.get(controller).unwrap().is_human());
    }

    #[test]
    fn test_human_reassigned_on_destruction() {
        let mut state = SimState::new();
        let piloted = spawn_ship(&mut state, Team::Green);
        let teammate = spawn_ship(&mut state, Team::Green);
        take_over(&mut state, PlayerSlot::One, piloted);
        let mut events = Vec::new();
        collision::destroy_ship(&mut state, piloted, &mut events);
        assert_eq!(state.controllers.len(), 1);
        let controller = state.ships.get(teammate).unwrap().controller.unwrap();
        assert!(state.controllers.get(controller).unwrap().is_human());
    }

    #[test]
    fn test_human_slot_lost_when_team_wiped() {
        let mut state = SimState::new();
        let piloted = spawn_ship(&mut state, Team::Green);
        spawn_ship(&mut state, Team::Red);
        take_over(&mut state, PlayerSlot::One, piloted);
        let mut events = Vec::new();
        collision::destroy_ship(&mut state, piloted, &mut events);
        // The red ship keeps its own pilot; no human controller remains.
        assert_eq!(state.controllers.len(), 1);
        assert!(state.controllers.iter().all(|(_, c)| !c.is_human()));
    }

    #[test]
    fn test_human_intent_from_keys_and_joystick() {
        let mut state = SimState::new();
        let handle = spawn_ship(&mut state, Team::Green);
        take_over(&mut state, PlayerSlot::One, handle);
        let bindings = Bindings::default();
        let mut input = InputSnapshot::new();
        input.set_key("up", true);
        input.set_button(0, 0, true);
        update(&mut state, &bindings, &input, 1.0);
        let intent = state.ships.get(handle).unwrap().intent;
        assert!(intent.thrust);
        assert!(intent.shoot);
        assert!(!intent.turn_left);
        assert!(!intent.turn_right);
    }

    #[test]
    fn test_shoot_key_is_edge_triggered() {
        let mut state = SimState::new();
        let handle = spawn_ship(&mut state, Team::Green);
        take_over(&mut state, PlayerSlot::One, handle);
        let bindings = Bindings::default();
        let mut input = InputSnapshot::new();
        input.set_key("space", true);
        update(&mut state, &bindings, &input, 1.0);
        assert!(state.ships.get(handle).unwrap().intent.shoot);
        // Still held on the next tick, but no new press.
        input.end_tick();
        update(&mut state, &bindings, &input, 1.0);
        assert!(!state.ships.get(handle).unwrap().intent.shoot);
        // Thrust stays level-triggered while held.
        input.set_key("up", false);
        update(&mut state, &bindings, &input, 1.0);
        assert!(state.ships.get(handle).unwrap().intent.thrust);
    }
}
