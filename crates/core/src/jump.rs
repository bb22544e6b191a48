//! Jump state machine: charge jumps, gravity, coyote time and jump buffering.
//!
//! The grace windows (coyote time, jump buffer) are wall-clock timers and
//! advance in [`Millis`]. The charge timer and gravity are velocity
//! integrations and advance in [`Frames`](crate::time::Frames).

use serde::{Deserialize, Serialize};

use crate::config::JumpConfig;
use crate::time::{Countdown, Millis, Tick};

/// Launch-speed multiplier on springy ground.
pub const SPRING_MULTIPLIER: f64 = 1.5;

/// Falling speed never exceeds this many base jumps.
pub const TERMINAL_BASE_JUMPS: f64 = 6.0;

bitflags::bitflags! {
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct JumpEvents: u8 {
        /// A jump started this tick (hook for the jump sound).
        const JUMPED = 1 << 0;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JumpPhase {
    Grounded,
    /// Rising while the jump input is held. `charge` counts frames held.
    Charging { charge: f64 },
    Falling,
}

/// What the body is standing on this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Footing {
    Airborne,
    Solid,
    /// Reserved for bouncy surfaces; nothing in the world emits it yet.
    Springy,
}

impl Footing {
    #[inline]
    pub fn is_grounded(self) -> bool {
        !matches!(self, Footing::Airborne)
    }

    fn speed_multiplier(self) -> f64 {
        match self {
            Footing::Springy => SPRING_MULTIPLIER,
            _ => 1.0,
        }
    }
}

impl From<bool> for Footing {
    fn from(on_ground: bool) -> Self {
        if on_ground {
            Footing::Solid
        } else {
            Footing::Airborne
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    config: JumpConfig,
    phase: JumpPhase,
    /// Upward speed in units per frame; negative while falling.
    pub jump_velocity: f64,
    coyote_timer: Millis,
    jump_buffer: Countdown,
    speed_multiplier: f64,
}

impl JumpState {
    pub fn new(config: JumpConfig) -> Self {
        Self {
            config,
            phase: JumpPhase::Grounded,
            jump_velocity: 0.0,
            coyote_timer: Millis(0.0),
            jump_buffer: Countdown::new(config.jump_buffer),
            speed_multiplier: 1.0,
        }
    }

    pub fn config(&self) -> &JumpConfig {
        &self.config
    }

    /// Swap tuning in place. Timers keep running; the new buffer length applies
    /// to the next press.
    pub fn set_config(&mut self, config: JumpConfig) {
        self.config = config;
        self.jump_buffer.set_duration(config.jump_buffer);
    }

    pub fn phase(&self) -> JumpPhase {
        self.phase
    }

    pub fn is_charging(&self) -> bool {
        matches!(self.phase, JumpPhase::Charging { .. })
    }

    pub fn is_falling(&self) -> bool {
        self.phase == JumpPhase::Falling
    }

    /// Frames the current charge has been held, 0 outside `Charging`.
    pub fn charge_time(&self) -> f64 {
        match self.phase {
            JumpPhase::Charging { charge } => charge,
            _ => 0.0,
        }
    }

    pub fn coyote_timer(&self) -> Millis {
        self.coyote_timer
    }

    pub fn jump_buffer(&self) -> &Countdown {
        &self.jump_buffer
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Arm the jump buffer. Callers invoke this on a fresh jump press.
    pub fn buffer_jump(&mut self) {
        self.jump_buffer.start();
    }

    /// Stop rising and let gravity take over from the current speed.
    pub fn fall(&mut self) {
        self.phase = JumpPhase::Falling;
    }

    /// Landing or ceiling strike: kill vertical speed.
    pub fn halt(&mut self) {
        self.jump_velocity = 0.0;
    }

    /// One tick of the machine.
    pub fn advance(&mut self, wants_jump: bool, tick: Tick, footing: Footing) -> JumpEvents {
        let mut events = JumpEvents::empty();
        self.jump_buffer.tick(tick.ms);

        if footing.is_grounded() {
            self.coyote_timer = self.config.coyote_time;
            self.phase = JumpPhase::Grounded;
            self.speed_multiplier = footing.speed_multiplier();
            if !self.jump_buffer.expired() {
                events |= self.start_jump();
            }
        } else {
            let charging = self.is_charging();
            if !charging {
                self.phase = JumpPhase::Falling;
            }
            self.coyote_timer = Millis((self.coyote_timer.0 - tick.ms.0).max(0.0));
            if !charging && !self.jump_buffer.expired() && self.coyote_timer.0 > 0.0 {
                events |= self.start_jump();
            }
            // A held key keeps refilling the buffer so a press made before
            // landing still fires on the landing tick.
            if wants_jump {
                self.jump_buffer.start();
            }
        }

        match self.phase {
            JumpPhase::Charging { charge } => {
                let cap = self.config.max_jump * self.speed_multiplier;
                if wants_jump && charge < cap {
                    let charge = charge + tick.frames.0;
                    let base = self.config.base_jump;
                    let ratio = charge / self.config.max_jump * self.speed_multiplier;
                    self.jump_velocity = (base + ratio * (cap - base)).min(cap);
                    self.phase = JumpPhase::Charging { charge };
                } else {
                    self.phase = JumpPhase::Falling;
                    self.apply_gravity(tick);
                }
            }
            JumpPhase::Falling => self.apply_gravity(tick),
            JumpPhase::Grounded => {}
        }

        events
    }

    fn start_jump(&mut self) -> JumpEvents {
        self.phase = JumpPhase::Charging { charge: 0.0 };
        self.jump_buffer.reset();
        self.coyote_timer = Millis(0.0);
        log::debug!("jump started (multiplier {})", self.speed_multiplier);
        JumpEvents::JUMPED
    }

    fn apply_gravity(&mut self, tick: Tick) {
        let floor = -TERMINAL_BASE_JUMPS * self.config.base_jump;
        self.jump_velocity = (self.jump_velocity - self.config.gravity * tick.frames.0).max(floor);
    }
}
