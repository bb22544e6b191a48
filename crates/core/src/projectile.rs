use serde::{Deserialize, Serialize};

use crate::config::ProjectileConfig;
use crate::hitbox::Hitbox;
use crate::movement::resolve_movement;
use crate::time::{Countdown, Millis, Tick};
use crate::vector::Vector;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProjectileOutcome {
    Flying,
    Expired,
    HitWall,
    /// Index into the `targets` slice passed to `update`.
    HitTarget(usize),
}

/// Straight-flying body with no gravity. Dies on its first wall contact, its
/// first target hit, or when its lifetime runs out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub hitbox: Hitbox,
    pub velocity: Vector,
    lifetime: Countdown,
    alive: bool,
}

impl Projectile {
    /// Launch speed is capped at `config.max_speed`; a non-finite velocity
    /// leaves the projectile at rest.
    pub fn new(hitbox: Hitbox, velocity: Vector, config: &ProjectileConfig) -> Self {
        let velocity = if !velocity.is_finite() {
            log::warn!("projectile launched with non-finite velocity {velocity:?}");
            Vector::ZERO
        } else if velocity.length() > config.max_speed {
            velocity.normalized().scale(config.max_speed)
        } else {
            velocity
        };
        let mut lifetime = Countdown::new(config.lifetime);
        lifetime.start();
        Self { hitbox, velocity, lifetime, alive: true }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn update(&mut self, delta: Millis, obstacles: &[Hitbox], targets: &[Hitbox]) -> ProjectileOutcome {
        if !self.alive {
            return ProjectileOutcome::Expired;
        }
        let tick = Tick::new(delta);
        self.lifetime.tick(tick.ms);
        if self.lifetime.expired() {
            return self.die(ProjectileOutcome::Expired);
        }

        let start = self.hitbox.position;
        let sweep = resolve_movement(&self.hitbox, self.velocity, tick.frames, obstacles);
        self.hitbox.position = sweep.position;
        if sweep.blocked.any() {
            return self.die(ProjectileOutcome::HitWall);
        }

        // Unit stepping is fine for walls, but targets move too, so test the
        // whole path travelled this tick.
        let end = self.hitbox.position;
        if let Some(i) = targets.iter().position(|t| self.hitbox.swept_overlap(start, end, t)) {
            return self.die(ProjectileOutcome::HitTarget(i));
        }
        ProjectileOutcome::Flying
    }

    fn die(&mut self, outcome: ProjectileOutcome) -> ProjectileOutcome {
        self.alive = false;
        log::debug!("projectile at {:?} gone: {:?}", self.hitbox.position, outcome);
        outcome
    }
}
