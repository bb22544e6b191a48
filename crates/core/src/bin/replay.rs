use std::error::Error;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use ledge_core::{step, Buttons, Hitbox, Millis, MoveEvents, Params, Player, Room};

#[derive(Copy, Clone, Debug, Deserialize)]
struct RectDef {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl From<RectDef> for Hitbox {
    fn from(r: RectDef) -> Self {
        Hitbox::from_xywh(r.x, r.y, r.w, r.h)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RoomDef {
    blocks: Vec<RectDef>,
    bounds: Option<RectDef>,
}

#[derive(Debug, Deserialize)]
struct Replay {
    #[serde(default)]
    params: Params,
    #[serde(default)]
    room: RoomDef,
    initial_state: RectDef,
    inputs: Vec<u8>,
    #[serde(default = "default_frame_ms")]
    frame_ms: f64,
}

fn default_frame_ms() -> f64 {
    Millis::FRAME.0
}

fn event_names(ev: MoveEvents) -> String {
    ev.iter_names().map(|(name, _)| name).collect::<Vec<_>>().join("|")
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: cargo run -p ledge_core --features replay --bin replay -- <replay.json>")?;
    let raw = fs::read_to_string(&path)?;
    let replay: Replay = serde_json::from_str(&raw)?;
    replay.params.validate()?;

    let blocks: Vec<Hitbox> = replay.room.blocks.into_iter().map(Hitbox::from).collect();
    let room = Room::new(&blocks, replay.room.bounds.map(Hitbox::from));
    let mut player = Player::new(replay.initial_state.into(), &replay.params);
    let delta = Millis(replay.frame_ms);
    log::info!(
        "replaying {} frames from {} against {} blocks",
        replay.inputs.len(),
        path.display(),
        room.blocks().len()
    );

    println!("frame,x,y,vx,vy,grounded,events");
    for (frame, bits) in replay.inputs.iter().enumerate() {
        let buttons = Buttons::from_bits_truncate(*bits);
        let ev = step(&replay.params, &room, &mut player, buttons, delta);
        let e = &player.entity;
        println!(
            "{},{},{},{},{},{},{}",
            frame,
            e.hitbox.position.x,
            e.hitbox.position.y,
            e.velocity.x,
            e.velocity.y,
            e.is_on_ground(room.blocks()) as u8,
            event_names(ev)
        );
    }
    Ok(())
}
