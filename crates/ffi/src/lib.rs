use ledge_core::{Buttons, Hitbox, Millis, Params, Player, Room, Vector};

/// Opaque to C: only ever handled through the pointer from `ledge_player_new`.
pub struct LedgePlayer {
    player: Player,
}

#[no_mangle]
pub extern "C" fn ledge_default_params(out: *mut Params) {
    unsafe { *out = Params::default(); }
}

#[no_mangle]
pub extern "C" fn ledge_player_new(params: *const Params, x: f64, y: f64, w: f64, h: f64) -> *mut LedgePlayer {
    let p = unsafe { &*params };
    let player = Player::new(Hitbox::from_xywh(x, y, w.max(0.0), h.max(0.0)), p);
    Box::into_raw(Box::new(LedgePlayer { player }))
}

#[no_mangle]
pub extern "C" fn ledge_player_free(handle: *mut LedgePlayer) {
    if handle.is_null() {
        return;
    }
    drop(unsafe { Box::from_raw(handle) });
}

/// Step once. `blocks` is only read for the duration of the call and `bounds`
/// may be null for an unbounded room. Returns the `MoveEvents` bits.
#[no_mangle]
pub extern "C" fn ledge_step(
    params: *const Params,
    blocks: *const Hitbox,
    blocks_len: usize,
    bounds: *const Hitbox,
    handle: *mut LedgePlayer,
    input_bits: u8,
    delta_ms: f64,
) -> u8 {
    let p = unsafe { &*params };
    let h = unsafe { &mut *handle };
    let blocks: &[Hitbox] = if blocks_len == 0 {
        &[]
    } else {
        unsafe { std::slice::from_raw_parts(blocks, blocks_len) }
    };
    let bounds = unsafe { bounds.as_ref() }.copied();
    let room = Room::new(blocks, bounds);
    let buttons = Buttons::from_bits_truncate(input_bits);

    ledge_core::step(p, &room, &mut h.player, buttons, Millis(delta_ms)).bits()
}

#[no_mangle]
pub extern "C" fn ledge_player_position(handle: *const LedgePlayer) -> Vector {
    let h = unsafe { &*handle };
    h.player.position()
}

#[no_mangle]
pub extern "C" fn ledge_player_velocity(handle: *const LedgePlayer) -> Vector {
    let h = unsafe { &*handle };
    h.player.entity.velocity
}
