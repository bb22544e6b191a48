use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::time::Millis;

/// Horizontal movement tuning. Speeds are in units per frame; accelerations
/// and decay rates are per frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub max_speed: f64,
    // Ground: v' = intent * min(sqrt(v^2 + ground_accel * dt), max_speed)
    pub ground_accel: f64,
    // Ground, no input: v' = v * exp(-ground_friction * dt)
    pub ground_friction: f64,
    // Air: v' = v + air_accel * dt * (intent * max_speed - v)
    pub air_accel: f64,
    // Air, no input: v' = v * exp(-air_drag * dt)
    pub air_drag: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 6.0,
            ground_accel: 10.0,
            ground_friction: 0.5,
            air_accel: 0.3,
            air_drag: 0.05,
        }
    }
}

/// Jump tuning. `base_jump` and `max_jump` are launch speeds in units per
/// frame; `max_jump` doubles as the charge window in frames. Gravity is in
/// units per frame per frame. The two grace windows are wall-clock.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub base_jump: f64,
    pub max_jump: f64,
    pub gravity: f64,
    pub coyote_time: Millis,
    pub jump_buffer: Millis,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            base_jump: 4.0,
            max_jump: 9.0,
            gravity: 0.5,
            coyote_time: Millis(133.0),
            jump_buffer: Millis(250.0),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Units per frame.
    pub speed: f64,
    pub duration: Millis,
    /// Grounded time needed to regain one charge.
    pub cooldown: Millis,
    pub max_charges: u32,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            speed: 15.0,
            duration: Millis(200.0),
            cooldown: Millis(600.0),
            max_charges: 1,
        }
    }
}

/// Shots fired by the host. The sweep does one overlap scan per unit of
/// travel, so `max_speed` also bounds the per-tick cost of every projectile.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Units per frame; faster launches are scaled down to it.
    pub max_speed: f64,
    pub lifetime: Millis,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            max_speed: 40.0,
            lifetime: Millis(1000.0),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub motion: MotionConfig,
    pub jump: JumpConfig,
    pub dash: DashConfig,
    pub projectile: ProjectileConfig,
}

impl Params {
    /// Parse a (possibly partial) JSON document over the defaults, then
    /// validate it.
    pub fn from_json(json: &str) -> Result<Params, ConfigError> {
        let params: Params = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.motion;
        let j = &self.jump;
        let d = &self.dash;
        let p = &self.projectile;
        let checks: [(&'static str, f64); 15] = [
            ("motion.max_speed", m.max_speed),
            ("motion.ground_accel", m.ground_accel),
            ("motion.ground_friction", m.ground_friction),
            ("motion.air_accel", m.air_accel),
            ("motion.air_drag", m.air_drag),
            ("jump.base_jump", j.base_jump),
            ("jump.max_jump", j.max_jump),
            ("jump.gravity", j.gravity),
            ("jump.coyote_time", j.coyote_time.0),
            ("jump.jump_buffer", j.jump_buffer.0),
            ("dash.speed", d.speed),
            ("dash.duration", d.duration.0),
            ("dash.cooldown", d.cooldown.0),
            ("projectile.max_speed", p.max_speed),
            ("projectile.lifetime", p.lifetime.0),
        ];
        for (field, value) in checks {
            if !value.is_finite() {
                return Err(reject(field, "must be finite"));
            }
            if value < 0.0 {
                return Err(reject(field, "must not be negative"));
            }
        }
        if j.max_jump < j.base_jump {
            return Err(reject("jump.max_jump", "must be at least jump.base_jump"));
        }
        if j.max_jump == 0.0 {
            return Err(reject("jump.max_jump", "must be positive"));
        }
        Ok(())
    }
}

fn reject(field: &'static str, reason: &'static str) -> ConfigError {
    log::warn!("rejected params: {field} {reason}");
    ConfigError::Invalid { field, reason }
}
