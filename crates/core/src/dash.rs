use serde::{Deserialize, Serialize};

use crate::config::DashConfig;
use crate::time::{Countdown, Millis};
use crate::vector::Vector;

/// What the dash wants from the body this tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DashUpdate {
    Idle,
    /// Override the velocity and skip normal integration.
    Active(Vector),
    /// Last dash tick: the velocity is handed back to normal integration.
    Ended(Vector),
}

/// Short fixed-speed burst with charges that refill while grounded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dash {
    config: DashConfig,
    dashing: bool,
    direction: Vector,
    charges: u32,
    active: Countdown,
    recharge: Countdown,
}

impl Dash {
    pub fn new(config: DashConfig) -> Self {
        Self {
            config,
            dashing: false,
            direction: Vector::new(1.0, 0.0),
            charges: 0,
            active: Countdown::new(config.duration),
            recharge: Countdown::new(config.cooldown),
        }
    }

    pub fn config(&self) -> &DashConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DashConfig) {
        self.config = config;
        self.active.set_duration(config.duration);
        self.recharge.set_duration(config.cooldown);
        self.charges = self.charges.min(config.max_charges);
    }

    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    pub fn charges(&self) -> u32 {
        self.charges
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    /// Start a dash toward `direction`. Refused while already dashing, with no
    /// charge left, or with a zero direction.
    pub fn trigger(&mut self, direction: Vector) -> bool {
        if self.dashing || self.charges == 0 {
            return false;
        }
        let dir = direction.normalized();
        if dir == Vector::ZERO {
            return false;
        }
        self.direction = dir;
        self.dashing = true;
        self.active.start();
        self.charges -= 1;
        log::debug!("dash started toward {:?}, {} charges left", dir, self.charges);
        true
    }

    pub fn cancel(&mut self) {
        if self.dashing {
            log::debug!("dash cancelled");
        }
        self.dashing = false;
        self.active.reset();
    }

    pub fn update(&mut self, dt: Millis, on_ground: bool) -> DashUpdate {
        if on_ground {
            self.recharge.tick(dt);
            if self.recharge.expired() && self.charges < self.config.max_charges {
                self.charges += 1;
                self.recharge.start();
            }
        }

        if !self.dashing {
            return DashUpdate::Idle;
        }
        self.active.tick(dt);
        let velocity = self.direction.scale(self.config.speed);
        if self.active.expired() {
            self.dashing = false;
            log::debug!("dash finished");
            DashUpdate::Ended(velocity)
        } else {
            DashUpdate::Active(velocity)
        }
    }
}
