/// Arena dimensions. The playfield is three views wide and tall, matching
/// the 1280x720 camera the presentation layer uses.
pub mod arena {
    pub const VIEW_WIDTH: f32 = 1280.0;
    pub const VIEW_HEIGHT: f32 = 720.0;
    pub const WIDTH: f32 = VIEW_WIDTH * 3.0;
    pub const HEIGHT: f32 = VIEW_HEIGHT * 3.0;
}

/// Ship motion constants, in tick units (one tick = one 30 Hz frame)
pub mod ship {
    /// Linear acceleration per tick while thrusting
    pub const THRUST: f32 = 1.5;
    /// Maximum speed (units per tick)
    pub const THRUST_MAX: f32 = 8.0;
    /// Angular acceleration per tick while turning (degrees)
    pub const TURN: f32 = 1.25;
    /// Maximum angular velocity (degrees per tick)
    pub const TURN_MAX: f32 = 5.0;
    /// Angular friction removed per tick (degrees)
    pub const TURN_FRICTION: f32 = 0.5;
    /// Collision radius and bounce half-extent
    pub const RADIUS: f32 = 16.0;
    /// Number of hull sprite variants per team
    pub const VARIANTS: u8 = 3;
}

/// Bullet constants
pub mod bullet {
    /// Muzzle speed added along the firing direction (units per tick)
    pub const SPEED: f32 = 20.0;
    /// Lifetime in ticks
    pub const LIFE: f32 = 15.0;
    /// Collision radius
    pub const RADIUS: f32 = 5.0;
}

/// Combat constants
pub mod combat {
    /// Cooldown between shots in ticks
    pub const SHOOT_WAIT: f32 = 15.0;
    /// Explosion effect lifetime in ticks
    pub const EXPLOSION_LIFE: f32 = 30.0;
}

/// AI steering constants
pub mod ai {
    use super::bullet;

    /// Distance within which an approaching enemy counts as a threat
    pub const DANGER_DISTANCE: f32 = bullet::SPEED * bullet::LIFE * 1.25;
    /// Half-angle of the dead-ahead threat cone (degrees)
    pub const DANGER_ANGLE: f32 = 15.0;
    /// Effective weapon range; pursuit thrusts beyond it and fires inside it
    pub const TARGET_RANGE: f32 = bullet::SPEED * bullet::LIFE;
    /// Steering dead-zone around the target bearing (degrees)
    pub const AIM_DEADZONE: f32 = 2.0;
    /// Aim tolerance for thrusting/firing at the target (degrees)
    pub const AIM_TOLERANCE: f32 = 10.0;
    /// Initial delay before the first target scan (ticks)
    pub const SELECT_INITIAL_MIN: f32 = 30.0;
    pub const SELECT_INITIAL_MAX: f32 = 90.0;
    /// Re-arm window for periodic target scans (ticks)
    pub const SELECT_REARM_MIN: f32 = 90.0;
    pub const SELECT_REARM_MAX: f32 = 180.0;
    /// Accelerated re-scan delay when the current target died (ticks)
    pub const SELECT_TARGET_DEAD: f32 = 10.0;
    /// Re-arm window for threat scans (ticks)
    pub const THREAT_REARM_MIN: f32 = 5.0;
    pub const THREAT_REARM_MAX: f32 = 10.0;
}

/// Round and match constants
pub mod round {
    /// Ships per team at even strength
    pub const TEAM_SIZE: i32 = 8;
    /// Divisor applied to the round-counter surplus when computing the
    /// handicap penalty
    pub const ROUND_TICK: i32 = 2;
    /// Interval between win-condition polls (ticks)
    pub const WIN_POLL: f32 = 5.0;
    /// Delay between a decided round and the next round start (ticks)
    pub const TRANSITION_DELAY: f32 = 90.0;
}

/// Simulation clock constants
pub mod timing {
    /// Base tick rate in Hz
    pub const TICK_RATE: u32 = 30;
    /// Tick duration in milliseconds
    pub const TICK_DURATION_MS: u64 = 1000 / TICK_RATE as u64;
    /// Smallest accepted fractional step, to avoid degenerate integration
    pub const DELTA_MIN: f32 = 0.05;
    /// Largest accepted fractional step (15 fps floor on the driving clock)
    pub const DELTA_MAX: f32 = 2.0;
}

/// Input constants
pub mod input {
    /// Joystick axis magnitude treated as a press
    pub const JOYSTICK_THRESHOLD: f32 = 0.7;
}
