use serde::{Deserialize, Serialize};

use crate::config::Params;
use crate::dash::{Dash, DashUpdate};
use crate::entity::{Entity, Intent, MoveEvents};
use crate::hitbox::Hitbox;
use crate::time::{Millis, Tick};
use crate::vector::Vector;
use crate::world::Room;

bitflags::bitflags! {
    #[repr(transparent)]
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const UP    = 1 << 2; // dash aim only
        const DOWN  = 1 << 3; // dash aim only
        const JUMP  = 1 << 4;
        const DASH  = 1 << 5;
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f64 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The player's movement state. There is exactly one per simulation; the host
/// owns it and passes it to [`step`] by reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    pub dash: Dash,
    facing: Facing,
    jump_was_down: bool,
    dash_was_down: bool,
}

impl Player {
    pub fn new(hitbox: Hitbox, params: &Params) -> Self {
        Self {
            entity: Entity::new(hitbox, params),
            dash: Dash::new(params.dash),
            facing: Facing::Right,
            jump_was_down: false,
            dash_was_down: false,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn position(&self) -> Vector {
        self.entity.hitbox.position
    }

    /// Push current tuning into every component.
    pub fn retune(&mut self, params: &Params) {
        self.entity.set_motion(params.motion);
        self.entity.jump.set_config(params.jump);
        self.dash.set_config(params.dash);
    }

    /// Back to a standing start at `position`, keeping size and tuning.
    pub fn respawn(&mut self, position: Vector) {
        let hitbox = Hitbox::new(position, self.entity.hitbox.size);
        let params = Params {
            motion: *self.entity.motion(),
            jump: *self.entity.jump.config(),
            dash: *self.dash.config(),
            ..Params::default()
        };
        *self = Player::new(hitbox, &params);
    }
}

/// One fixed tick of player movement. The host calls this once per tick.
/// Deterministic: the same inputs replay to bit-identical positions.
pub fn step(params: &Params, room: &Room<'_>, player: &mut Player, buttons: Buttons, delta: Millis) -> MoveEvents {
    let tick = Tick::new(delta);
    player.retune(params);
    let obstacles = room.blocks();
    let mut events = MoveEvents::empty();

    let left = buttons.contains(Buttons::LEFT);
    let right = buttons.contains(Buttons::RIGHT);
    let intent = Intent::from_axis(right as i32 - left as i32);
    match intent {
        Intent::Left => player.facing = Facing::Left,
        Intent::Right => player.facing = Facing::Right,
        Intent::None => {}
    }

    // Jump edge detection: a fresh press arms the buffer, holding charges.
    let jump = buttons.contains(Buttons::JUMP);
    if jump && !player.jump_was_down {
        player.entity.jump.buffer_jump();
    }
    player.jump_was_down = jump;

    let dash = buttons.contains(Buttons::DASH);
    let dash_pressed = dash && !player.dash_was_down;
    player.dash_was_down = dash;

    let on_ground = player.entity.is_on_ground(obstacles);

    if dash_pressed {
        let up = buttons.contains(Buttons::UP);
        let down = buttons.contains(Buttons::DOWN);
        let mut aim = Vector::new(intent.sign(), (down as i32 - up as i32) as f64);
        if aim == Vector::ZERO {
            aim.x = player.facing.sign();
        }
        if player.dash.trigger(aim) {
            events |= MoveEvents::DASHED;
        }
    }

    let dashing = match player.dash.update(tick.ms, on_ground) {
        DashUpdate::Active(v) => {
            player.entity.velocity = v;
            true
        }
        DashUpdate::Ended(v) => {
            player.entity.velocity = v;
            player.entity.jump.jump_velocity = -v.y;
            false
        }
        DashUpdate::Idle => false,
    };

    if !dashing {
        events |= player.entity.integrate(tick, on_ground, jump, intent);
    }
    events |= player.entity.resolve(tick, on_ground, obstacles);

    if events.contains(MoveEvents::WALLED) {
        player.dash.cancel();
    }
    if room.is_out_of_bounds(&player.entity.hitbox) {
        events |= MoveEvents::OUT_OF_BOUNDS;
    }

    events
}

#[cfg(test)]
mod tests {
    use super::{step, Buttons, Facing, Player};
    use crate::config::Params;
    use crate::entity::MoveEvents;
    use crate::hitbox::Hitbox;
    use crate::time::Millis;
    use crate::vector::Vector;
    use crate::world::Room;

    const FLOOR: Hitbox = Hitbox { position: Vector::new(0.0, 480.0), size: Vector::new(960.0, 60.0) };

    fn room(blocks: &[Hitbox]) -> Room<'_> {
        Room::new(blocks, Some(Hitbox::from_xywh(0.0, 0.0, 960.0, 540.0)))
    }

    fn spawn(params: &Params) -> Player {
        Player::new(Hitbox::from_xywh(80.0, 480.0 - 44.0, 28.0, 44.0), params)
    }

    fn run(frames: u32) -> (Player, u32, u32, u64) {
        let params = Params::default();
        let room = room(&[FLOOR]);
        let mut player = spawn(&params);

        let mut jumped = 0u32;
        let mut landed = 0u32;
        let mut trace_hash = 0xcbf29ce484222325u64;

        for frame in 0..frames {
            let mut buttons = Buttons::empty();
            if frame < 120 {
                buttons |= Buttons::RIGHT;
            }
            if frame == 10 {
                buttons |= Buttons::JUMP;
            }

            let ev = step(&params, &room, &mut player, buttons, Millis::FRAME);
            jumped += ev.contains(MoveEvents::JUMPED) as u32;
            landed += ev.contains(MoveEvents::LANDED) as u32;

            let e = &player.entity;
            for value in [e.hitbox.position.x, e.hitbox.position.y, e.velocity.x, e.velocity.y] {
                for b in value.to_bits().to_le_bytes() {
                    trace_hash ^= b as u64;
                    trace_hash = trace_hash.wrapping_mul(0x100000001b3);
                }
            }
        }
        (player, jumped, landed, trace_hash)
    }

    #[test]
    fn deterministic_fixed_input_sequence_180_frames() {
        let (a, jumped, landed, hash_a) = run(180);
        let (b, _, _, hash_b) = run(180);
        assert_eq!(hash_a, hash_b);
        assert_eq!(a, b);

        let room = room(&[FLOOR]);
        assert_eq!(jumped, 1);
        assert_eq!(landed, 1);
        assert!(a.entity.is_on_ground(room.blocks()));
        assert_eq!(a.position().y + 44.0, 480.0);
        assert_eq!(a.entity.velocity.y, 0.0);
        assert!(a.position().x > 500.0);
        assert_eq!(a.facing(), Facing::Right);
    }

    #[test]
    fn holding_jump_charges_a_single_jump() {
        let params = Params::default();
        let room = room(&[FLOOR]);
        let mut player = spawn(&params);
        let mut jumps = 0;
        // Still rising or falling when the window ends, so the held key has
        // no landing to re-launch from.
        for _ in 0..20 {
            let ev = step(&params, &room, &mut player, Buttons::JUMP, Millis::FRAME);
            jumps += ev.contains(MoveEvents::JUMPED) as u32;
        }
        assert_eq!(jumps, 1);
        assert!(player.position().y < 436.0);
    }

    #[test]
    fn dash_needs_a_fresh_press_and_a_charge() {
        let params = Params::default();
        let room = room(&[FLOOR]);
        let mut player = spawn(&params);
        step(&params, &room, &mut player, Buttons::empty(), Millis::FRAME);
        assert_eq!(player.dash.charges(), 1);

        let ev = step(&params, &room, &mut player, Buttons::DASH, Millis::FRAME);
        assert!(ev.contains(MoveEvents::DASHED));
        assert_eq!(player.entity.velocity, Vector::new(15.0, 0.0));
        let ev = step(&params, &room, &mut player, Buttons::DASH, Millis::FRAME);
        assert!(!ev.contains(MoveEvents::DASHED));
    }

    #[test]
    fn dash_aims_at_facing_without_direction() {
        let params = Params::default();
        let room = room(&[FLOOR]);
        let mut player = spawn(&params);
        step(&params, &room, &mut player, Buttons::LEFT, Millis::FRAME);
        assert_eq!(player.facing(), Facing::Left);
        let x = player.position().x;
        step(&params, &room, &mut player, Buttons::DASH, Millis::FRAME);
        assert_eq!(player.entity.velocity.x, -15.0);
        assert!(player.position().x < x);
    }

    #[test]
    fn dash_into_wall_is_cancelled() {
        let params = Params::default();
        let blocks = [FLOOR, Hitbox::from_xywh(115.0, 300.0, 20.0, 180.0)];
        let room = room(&blocks);
        let mut player = spawn(&params);
        step(&params, &room, &mut player, Buttons::empty(), Millis::FRAME);
        let ev = step(&params, &room, &mut player, Buttons::DASH, Millis::FRAME);
        assert!(ev.contains(MoveEvents::DASHED | MoveEvents::WALLED));
        assert!(!player.dash.is_dashing());
        assert_eq!(player.position().x + 28.0, 115.0);
    }

    #[test]
    fn falling_out_of_the_room_is_reported() {
        let params = Params::default();
        let room = Room::new(&[], Some(Hitbox::from_xywh(0.0, 0.0, 960.0, 540.0)));
        let mut player = spawn(&params);
        let mut out = false;
        for _ in 0..120 {
            if step(&params, &room, &mut player, Buttons::empty(), Millis::FRAME).contains(MoveEvents::OUT_OF_BOUNDS) {
                out = true;
                break;
            }
        }
        assert!(out);
        player.respawn(Vector::new(80.0, 100.0));
        assert_eq!(player.position(), Vector::new(80.0, 100.0));
        assert_eq!(player.entity.velocity, Vector::ZERO);
        assert_eq!(player.entity.hitbox.size, Vector::new(28.0, 44.0));
    }

    #[test]
    fn retune_applies_new_params_on_next_step() {
        let params = Params::default();
        let room = room(&[FLOOR]);
        let mut player = spawn(&params);
        let mut fast = Params::default();
        fast.motion.max_speed = 2.0;
        for _ in 0..10 {
            step(&fast, &room, &mut player, Buttons::RIGHT, Millis::FRAME);
        }
        assert_eq!(player.entity.velocity.x, 2.0);
    }
}
