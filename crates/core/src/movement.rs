//! Unit-step collision resolution against static obstacles.
//!
//! Displacement is walked one unit at a time, so a body can never tunnel
//! through an obstacle however thin, at O(|displacement|) overlap scans per
//! tick. The per-tick cost is bounded by the configured maximum speeds.

use crate::hitbox::Hitbox;
use crate::time::Frames;
use crate::vector::Vector;

/// Which axes hit something during a sweep.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Blocked {
    pub x: bool,
    pub y: bool,
}

impl Blocked {
    #[inline]
    pub fn any(self) -> bool {
        self.x || self.y
    }
}

/// Result of [`resolve_movement`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sweep {
    pub position: Vector,
    pub blocked: Blocked,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Move `hitbox` by `round(velocity * frames)` through `obstacles`.
///
/// The longer axis is primary (x wins ties) and advances one unit per
/// iteration; the shorter axis is interleaved with a Bresenham error term so
/// diagonal travel follows the true slope. Each unit step is kept only if the
/// moved box overlaps nothing. Once an axis is blocked it stops, while the
/// other axis keeps going, which is what lets bodies slide along walls and
/// floors.
///
/// Zero displacement returns the start position untouched. A non-finite
/// velocity is a caller bug: it trips a debug assertion, and in release builds
/// it is logged and the body stays put.
pub fn resolve_movement(hitbox: &Hitbox, velocity: Vector, frames: Frames, obstacles: &[Hitbox]) -> Sweep {
    debug_assert!(velocity.is_finite(), "non-finite velocity {velocity:?}");
    let delta = velocity.scale(frames.0).round();
    let mut sweep = Sweep { position: hitbox.position, blocked: Blocked::default() };

    if delta.x == 0.0 && delta.y == 0.0 {
        return sweep;
    }
    if !delta.is_finite() {
        log::warn!("non-finite displacement {delta:?}, body left in place");
        return sweep;
    }

    let (primary, secondary) = if delta.x.abs() >= delta.y.abs() { (Axis::X, Axis::Y) } else { (Axis::Y, Axis::X) };
    let primary_len = component(delta, primary).abs() as i64;
    let secondary_len = component(delta, secondary).abs() as i64;
    let primary_dir = component(delta, primary).signum();
    let secondary_dir = component(delta, secondary).signum();

    let mut probe = *hitbox;
    let mut err = primary_len / 2;
    let mut primary_blocked = false;
    let mut secondary_blocked = false;

    for _ in 0..primary_len {
        if !primary_blocked && !try_step(&mut probe, primary, primary_dir, obstacles) {
            primary_blocked = true;
        }
        err -= secondary_len;
        if err < 0 {
            if !secondary_blocked && !try_step(&mut probe, secondary, secondary_dir, obstacles) {
                secondary_blocked = true;
            }
            err += primary_len;
        }
        if primary_blocked && (secondary_blocked || secondary_len == 0) {
            break;
        }
    }

    sweep.position = probe.position;
    match primary {
        Axis::X => sweep.blocked = Blocked { x: primary_blocked, y: secondary_blocked },
        Axis::Y => sweep.blocked = Blocked { x: secondary_blocked, y: primary_blocked },
    }
    log::trace!("sweep {:?} -> {:?} {:?}", delta, sweep.position, sweep.blocked);
    sweep
}

/// True if a body at rest or descending has an obstacle directly beneath it.
///
/// Bodies moving up (`velocity.y < 0`) are never grounded. The test runs on a
/// copy shifted down by exactly one unit, so the hitbox itself is never seen
/// half-probed.
pub fn probe_ground(hitbox: &Hitbox, velocity: Vector, obstacles: &[Hitbox]) -> bool {
    if velocity.y < 0.0 {
        return false;
    }
    hitbox.translated(Vector::new(0.0, 1.0)).overlaps_any(obstacles)
}

#[inline]
fn component(v: Vector, axis: Axis) -> f64 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
    }
}

// Move one unit along `axis`; undo and report false if that overlaps.
fn try_step(probe: &mut Hitbox, axis: Axis, dir: f64, obstacles: &[Hitbox]) -> bool {
    let offset = match axis {
        Axis::X => Vector::new(dir, 0.0),
        Axis::Y => Vector::new(0.0, dir),
    };
    probe.position += offset;
    if probe.overlaps_any(obstacles) {
        probe.position -= offset;
        return false;
    }
    true
}
