use serde::{Deserialize, Serialize};

use crate::config::{JumpConfig, MotionConfig, Params};
use crate::hitbox::Hitbox;
use crate::jump::{Footing, JumpEvents, JumpState};
use crate::movement::{probe_ground, resolve_movement};
use crate::time::{Frames, Millis, Tick};
use crate::vector::Vector;

/// Horizontal movement intent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Left,
    #[default]
    None,
    Right,
}

impl Intent {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Intent::Left => -1.0,
            Intent::None => 0.0,
            Intent::Right => 1.0,
        }
    }

    /// Sign of an integer axis value.
    pub fn from_axis(axis: i32) -> Self {
        match axis.signum() {
            -1 => Intent::Left,
            1 => Intent::Right,
            _ => Intent::None,
        }
    }
}

bitflags::bitflags! {
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MoveEvents: u8 {
        const JUMPED        = 1 << 0;
        const LANDED        = 1 << 1;
        const BONKED        = 1 << 2; // ceiling
        const WALLED        = 1 << 3;
        const DASHED        = 1 << 4;
        const OUT_OF_BOUNDS = 1 << 5;
    }
}

/// Movement facet of an actor: body, velocity and jump machine.
///
/// Velocity is in units per frame; `velocity.y` is negative while rising.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub hitbox: Hitbox,
    pub velocity: Vector,
    pub jump: JumpState,
    motion: MotionConfig,
}

impl Entity {
    pub fn new(hitbox: Hitbox, params: &Params) -> Self {
        Self::with_config(hitbox, params.motion, params.jump)
    }

    pub fn with_config(hitbox: Hitbox, motion: MotionConfig, jump: JumpConfig) -> Self {
        Self {
            hitbox,
            velocity: Vector::ZERO,
            jump: JumpState::new(jump),
            motion,
        }
    }

    pub fn motion(&self) -> &MotionConfig {
        &self.motion
    }

    pub fn set_motion(&mut self, motion: MotionConfig) {
        self.motion = motion;
    }

    pub fn max_horizontal_speed(&self) -> f64 {
        self.motion.max_speed
    }

    pub fn is_on_ground(&self, obstacles: &[Hitbox]) -> bool {
        probe_ground(&self.hitbox, self.velocity, obstacles)
    }

    /// Knockback and similar cross-entity pushes. The vertical part is handed
    /// to the jump machine so gravity carries on from it.
    pub fn apply_impulse(&mut self, impulse: Vector) {
        self.velocity = impulse;
        self.jump.jump_velocity = -impulse.y;
        self.jump.fall();
    }

    pub fn teleport(&mut self, position: Vector) {
        self.hitbox.position = position;
        self.velocity = Vector::ZERO;
        self.jump.halt();
    }

    /// Full per-tick update: ground probe, jump machine, horizontal
    /// integration, then the sweep through `obstacles`.
    ///
    /// `intent_y` is polled before `intent_x`.
    pub fn update_xy(
        &mut self,
        delta: Millis,
        obstacles: &[Hitbox],
        intent_x: impl FnOnce() -> Intent,
        intent_y: impl FnOnce() -> bool,
    ) -> MoveEvents {
        let tick = Tick::new(delta);
        let on_ground = self.is_on_ground(obstacles);
        let wants_jump = intent_y();
        let intent = intent_x();
        let mut events = self.integrate(tick, on_ground, wants_jump, intent);
        events |= self.resolve(tick, on_ground, obstacles);
        events
    }

    /// Advance the jump machine and recompute both velocity components.
    pub fn integrate(&mut self, tick: Tick, on_ground: bool, wants_jump: bool, intent: Intent) -> MoveEvents {
        let jump_events = self.jump.advance(wants_jump, tick, Footing::from(on_ground));
        self.velocity.y = -self.jump.jump_velocity;
        self.velocity.x = self.integrate_horizontal(tick.frames, intent, on_ground);

        let mut events = MoveEvents::empty();
        if jump_events.contains(JumpEvents::JUMPED) {
            events |= MoveEvents::JUMPED;
        }
        events
    }

    /// Next horizontal speed.
    ///
    /// Ground: square-root ease toward `intent * max_speed`, exponential
    /// friction with no input. Air: linear ease with a much smaller gain and a
    /// much weaker passive decay.
    pub fn integrate_horizontal(&self, frames: Frames, intent: Intent, on_ground: bool) -> f64 {
        let m = &self.motion;
        let v = self.velocity.x;
        let dt = frames.0;
        match (on_ground, intent) {
            (true, Intent::None) => v * (-m.ground_friction * dt).exp(),
            (true, dir) => dir.sign() * (v * v + m.ground_accel * dt).sqrt().min(m.max_speed),
            (false, Intent::None) => v * (-m.air_drag * dt).exp(),
            (false, dir) => {
                let next = v + m.air_accel * dt * (dir.sign() * m.max_speed - v);
                next.clamp(-m.max_speed, m.max_speed)
            }
        }
    }

    /// Sweep the hitbox by the current velocity and zero whatever got blocked.
    pub fn resolve(&mut self, tick: Tick, was_on_ground: bool, obstacles: &[Hitbox]) -> MoveEvents {
        let sweep = resolve_movement(&self.hitbox, self.velocity, tick.frames, obstacles);
        self.hitbox.position = sweep.position;

        let mut events = MoveEvents::empty();
        if sweep.blocked.x {
            self.velocity.x = 0.0;
            events |= MoveEvents::WALLED;
        }
        if sweep.blocked.y {
            if self.velocity.y < 0.0 {
                events |= MoveEvents::BONKED;
            }
            self.velocity.y = 0.0;
            self.jump.halt();
        }
        if !was_on_ground && self.is_on_ground(obstacles) {
            log::debug!("landed at {:?}", self.hitbox.position);
            events |= MoveEvents::LANDED;
        }
        events
    }
}
