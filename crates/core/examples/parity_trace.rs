use ledge_core::{step, Buttons, Hitbox, Millis, MoveEvents, Params, Player, Room};

fn main() {
    let params = Params::default();

    let blocks = [Hitbox::from_xywh(0.0, 480.0, 960.0, 60.0)];
    let room = Room::new(&blocks, Some(Hitbox::from_xywh(0.0, 0.0, 960.0, 540.0)));

    let mut player = Player::new(Hitbox::from_xywh(80.0, 480.0 - 44.0, 28.0, 44.0), &params);

    let mut jumped: u32 = 0;
    let mut landed: u32 = 0;
    let mut bonked: u32 = 0;
    let mut dashed: u32 = 0;

    for frame in 0..180 {
        let mut buttons = Buttons::empty();
        if frame < 100 {
            buttons |= Buttons::RIGHT;
        }
        if frame == 10 {
            buttons |= Buttons::JUMP;
        }
        if frame == 60 {
            buttons |= Buttons::DASH;
        }

        let ev = step(&params, &room, &mut player, buttons, Millis::FRAME);
        jumped += ev.contains(MoveEvents::JUMPED) as u32;
        landed += ev.contains(MoveEvents::LANDED) as u32;
        bonked += ev.contains(MoveEvents::BONKED) as u32;
        dashed += ev.contains(MoveEvents::DASHED) as u32;
    }

    let e = &player.entity;
    let summary = serde_json::json!({
        "x": e.hitbox.position.x,
        "y": e.hitbox.position.y,
        "vx": e.velocity.x,
        "vy": e.velocity.y,
        "grounded": e.is_on_ground(room.blocks()),
        "jumped": jumped,
        "landed": landed,
        "bonked": bonked,
        "dashed": dashed,
    });
    println!("{summary}");
}
