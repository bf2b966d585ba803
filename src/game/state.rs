//! Simulation state definitions.
//!
//! All entities (ships, bullets, transient effects, controllers) plus the
//! score and round counter live in one `SimState` passed explicitly to every
//! system. There is no global state.

use serde::{Deserialize, Serialize};

use crate::game::constants::{arena, bullet, ship};
use crate::game::registry::{Handle, Registry};
use crate::game::systems::controller::Controller;
use crate::util::angle::normalize_degrees;
use crate::util::vec2::Vec2;

/// One of the two opposing sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Red,
    Green,
}

impl Team {
    pub fn opponent(&self) -> Team {
        match self {
            Team::Red => Team::Green,
            Team::Green => Team::Red,
        }
    }
}

/// The four control signals a controller sets for its ship each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub shoot: bool,
}

/// A ship in the arena
#[derive(Debug, Clone)]
pub struct Ship {
    pub team: Team,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Heading in degrees; the ship travels along heading + 90
    pub heading: f32,
    /// Angular velocity in degrees per tick
    pub angular_velocity: f32,
    pub intent: Intent,
    /// Fractional ticks until the next shot is allowed
    pub shoot_cooldown: f32,
    pub controller: Option<Handle<Controller>>,
    /// Hull sprite variant, chosen at spawn
    pub variant: u8,
    pub exhaust: Option<Handle<Effect>>,
}

impl Ship {
    pub fn new(team: Team, position: Vec2, heading: f32, variant: u8) -> Self {
        Self {
            team,
            position,
            velocity: Vec2::ZERO,
            heading,
            angular_velocity: 0.0,
            intent: Intent::default(),
            shoot_cooldown: 0.0,
            controller: None,
            variant,
            exhaust: None,
        }
    }

    /// Direction of travel in degrees, wrapped to [0, 360)
    pub fn travel_direction(&self) -> f32 {
        normalize_degrees(self.heading + 90.0)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Muzzle position, one radius ahead of the hull
    pub fn nose(&self) -> Vec2 {
        self.position + Vec2::from_degrees(self.travel_direction()) * ship::RADIUS
    }
}

/// A bullet in flight
#[derive(Debug, Clone)]
pub struct Bullet {
    pub team: Team,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining lifetime in fractional ticks
    pub lifetime: f32,
}

impl Bullet {
    pub fn new(team: Team, position: Vec2, velocity: Vec2) -> Self {
        Self {
            team,
            position,
            velocity,
            lifetime: bullet::LIFE,
        }
    }
}

/// Transient presentation entity
#[derive(Debug, Clone)]
pub struct Effect {
    pub position: Vec2,
    pub heading: f32,
    pub kind: EffectKind,
}

#[derive(Debug, Clone)]
pub enum EffectKind {
    /// Explosion animation; expires after `EXPLOSION_LIFE` ticks
    Explosion { age: f32 },
    /// Exhaust flame attached to a thrusting ship
    Exhaust { ship: Handle<Ship> },
}

impl Effect {
    pub fn explosion(position: Vec2) -> Self {
        Self {
            position,
            heading: 0.0,
            kind: EffectKind::Explosion { age: 0.0 },
        }
    }

    pub fn exhaust(ship: Handle<Ship>, position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading,
            kind: EffectKind::Exhaust { ship },
        }
    }

    pub fn is_explosion(&self) -> bool {
        matches!(self.kind, EffectKind::Explosion { .. })
    }
}

/// Camera region used only for the `in_view` flag on presentation events
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct View {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl View {
    pub fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    /// Whether a square of half-extent `radius` around `position` overlaps
    /// this view
    pub fn overlaps(&self, position: Vec2, radius: f32) -> bool {
        (position.x - self.center.x).abs() <= self.width / 2.0 + radius
            && (position.y - self.center.y).abs() <= self.height / 2.0 + radius
    }
}

/// All simulation state for one match
pub struct SimState {
    pub ships: Registry<Ship>,
    pub bullets: Registry<Bullet>,
    pub effects: Registry<Effect>,
    pub controllers: Registry<Controller>,
    /// Positive favors Green, negative favors Red
    pub score: i32,
    /// Cumulative round imbalance, drives the spawn handicap
    pub round_counter: i32,
    pub tick: u64,
    pub views: Vec<View>,
}

impl SimState {
    pub fn new() -> Self {
        Self {
            ships: Registry::new(),
            bullets: Registry::new(),
            effects: Registry::new(),
            controllers: Registry::new(),
            score: 0,
            round_counter: 0,
            tick: 0,
            views: Vec::new(),
        }
    }

    pub fn alive_count(&self, team: Team) -> usize {
        self.ships.iter().filter(|(_, s)| s.team == team).count()
    }

    pub fn team_ship_handles(&self, team: Team) -> Vec<Handle<Ship>> {
        self.ships
            .iter()
            .filter(|(_, s)| s.team == team)
            .map(|(h, _)| h)
            .collect()
    }

    /// Whether a position is within any active camera region, for event
    /// volume attenuation
    pub fn in_any_view(&self, position: Vec2, radius: f32) -> bool {
        self.views.iter().any(|v| v.overlaps(position, radius))
    }

    /// Remove every entity; used at round boundaries
    pub fn clear_entities(&mut self) {
        self.ships.clear();
        self.bullets.clear();
        self.effects.clear();
        self.controllers.clear();
    }

    /// Whether a position is inside the arena bounds
    pub fn in_bounds(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.x <= arena::WIDTH
            && position.y >= 0.0
            && position.y <= arena::HEIGHT
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}
