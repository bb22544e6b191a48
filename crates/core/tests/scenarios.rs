use ledge_core::{step, Buttons, Hitbox, Millis, MoveEvents, Params, Player, Room};

const FRAME: Millis = Millis::FRAME;

fn player_at(x: f64, y: f64) -> Player {
    Player::new(Hitbox::from_xywh(x, y, 28.0, 44.0), &Params::default())
}

fn tick(room: &Room<'_>, player: &mut Player, buttons: Buttons) -> MoveEvents {
    step(&Params::default(), room, player, buttons, FRAME)
}

/// Ledge ending at x = 100 above a far-away floor.
fn ledge() -> [Hitbox; 2] {
    [
        Hitbox::from_xywh(0.0, 480.0, 100.0, 60.0),
        Hitbox::from_xywh(-500.0, 2000.0, 2000.0, 60.0),
    ]
}

fn floor() -> [Hitbox; 1] {
    [Hitbox::from_xywh(0.0, 480.0, 960.0, 60.0)]
}

/// Walk right until the ledge is gone from under the player.
fn walk_off(room: &Room<'_>) -> Player {
    let mut player = player_at(40.0, 436.0);
    for _ in 0..60 {
        tick(room, &mut player, Buttons::RIGHT);
        if !player.entity.is_on_ground(room.blocks()) {
            return player;
        }
    }
    panic!("never walked off the ledge");
}

#[test]
fn coyote_jump_inside_the_window() {
    let blocks = ledge();
    let room = Room::new(&blocks, None);
    let mut player = walk_off(&room);
    for _ in 0..3 {
        assert!(!tick(&room, &mut player, Buttons::RIGHT).contains(MoveEvents::JUMPED));
    }
    let ev = tick(&room, &mut player, Buttons::RIGHT | Buttons::JUMP);
    assert!(ev.contains(MoveEvents::JUMPED));
    assert!(player.entity.velocity.y < 0.0);
}

#[test]
fn coyote_jump_after_the_window_fails() {
    let blocks = ledge();
    let room = Room::new(&blocks, None);
    let mut player = walk_off(&room);
    for _ in 0..12 {
        tick(&room, &mut player, Buttons::RIGHT);
    }
    let ev = tick(&room, &mut player, Buttons::RIGHT | Buttons::JUMP);
    assert!(!ev.contains(MoveEvents::JUMPED));
    assert!(player.entity.velocity.y > 0.0);
}

#[test]
fn jump_pressed_before_landing_fires_on_touchdown() {
    let blocks = floor();
    let room = Room::new(&blocks, None);
    let mut player = player_at(80.0, 300.0);

    while player.position().y + 44.0 < 450.0 {
        assert!(tick(&room, &mut player, Buttons::empty()).is_empty());
    }
    // Pressed while still airborne and held from then on.
    let events: Vec<MoveEvents> = (0..11).map(|_| tick(&room, &mut player, Buttons::JUMP)).collect();

    let landed = events.iter().position(|e| e.contains(MoveEvents::LANDED)).expect("never landed");
    let jumped = events.iter().position(|e| e.contains(MoveEvents::JUMPED)).expect("buffered jump lost");
    assert_eq!(jumped, landed + 1);
    assert_eq!(events.iter().filter(|e| e.contains(MoveEvents::JUMPED)).count(), 1);
    assert!(player.position().y < 436.0);
}

#[test]
fn jumping_against_a_wall_slides_up_it() {
    let blocks = [
        Hitbox::from_xywh(0.0, 480.0, 960.0, 60.0),
        Hitbox::from_xywh(108.0, 0.0, 20.0, 480.0),
    ];
    let room = Room::new(&blocks, None);
    let mut player = player_at(80.0, 436.0);

    let ev = tick(&room, &mut player, Buttons::RIGHT);
    assert!(ev.contains(MoveEvents::WALLED));
    assert_eq!(player.position().x, 80.0);

    let ev = tick(&room, &mut player, Buttons::RIGHT | Buttons::JUMP);
    assert!(ev.contains(MoveEvents::JUMPED | MoveEvents::WALLED));
    assert_eq!(player.position().x, 80.0);
    assert_eq!(player.position().y, 431.0);
    assert_eq!(player.entity.velocity.x, 0.0);
}

#[test]
fn upward_dash_carries_into_a_normal_arc() {
    let blocks = floor();
    let room = Room::new(&blocks, None);
    let mut player = player_at(80.0, 436.0);
    tick(&room, &mut player, Buttons::empty());

    let ev = tick(&room, &mut player, Buttons::RIGHT | Buttons::UP | Buttons::DASH);
    assert!(ev.contains(MoveEvents::DASHED));
    while player.dash.is_dashing() {
        tick(&room, &mut player, Buttons::empty());
    }

    // The vertical dash speed is now the jump velocity, so the body keeps
    // rising under gravity instead of dropping straight away.
    let y = player.position().y;
    tick(&room, &mut player, Buttons::empty());
    assert!(player.position().y < y);

    let mut landed = false;
    for _ in 0..300 {
        if tick(&room, &mut player, Buttons::empty()).contains(MoveEvents::LANDED) {
            landed = true;
            break;
        }
    }
    assert!(landed);
    assert_eq!(player.position().y, 436.0);
    assert_eq!(player.dash.charges(), 0);
}

#[test]
fn partial_json_params_change_the_jump() {
    let blocks = floor();
    let room = Room::new(&blocks, None);
    let floaty = Params::from_json(r#"{"jump": {"gravity": 0.25}}"#).expect("valid params");
    assert_eq!(floaty.jump.base_jump, Params::default().jump.base_jump);

    let apex = |params: &Params| {
        let mut player = player_at(80.0, 436.0);
        step(params, &room, &mut player, Buttons::JUMP, FRAME);
        let mut top = player.position().y;
        for _ in 0..120 {
            step(params, &room, &mut player, Buttons::empty(), FRAME);
            top = top.min(player.position().y);
        }
        top
    };
    assert!(apex(&floaty) < apex(&Params::default()));
}
