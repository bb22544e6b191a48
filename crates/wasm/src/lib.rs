use wasm_bindgen::prelude::*;
use ledge_core::{
    Buttons, FixedTimestep, Hitbox, Millis, MoveEvents, Params, Player, Projectile, ProjectileOutcome, Room, Vector,
};

const PROJECTILE_SIZE: f64 = 4.0;

#[wasm_bindgen]
pub struct Core {
    params: Params,
    player: Player,
    blocks: Vec<Hitbox>,
    bounds: Option<Hitbox>,
    clock: FixedTimestep,
    projectiles: Vec<Projectile>,
}

#[wasm_bindgen]
impl Core {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Core {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let params = Params::default();
        let player = Player::new(Hitbox::from_xywh(80.0, 480.0 - 44.0, 28.0, 44.0), &params);
        let blocks = vec![Hitbox::from_xywh(0.0, 480.0, 960.0, 60.0)];
        let bounds = Some(Hitbox::from_xywh(0.0, 0.0, 960.0, 540.0));

        Core { params, player, blocks, bounds, clock: FixedTimestep::new(Millis::FRAME), projectiles: Vec::new() }
    }

    pub fn reset(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.player = Player::new(Hitbox::from_xywh(x, y, w.max(0.0), h.max(0.0)), &self.params);
        self.clock = FixedTimestep::new(Millis::FRAME);
        self.projectiles.clear();
    }

    /// Packed rects: [x,y,w,h, x,y,w,h, ...]
    pub fn set_world(&mut self, rects: Box<[f64]>) {
        self.blocks = rects
            .chunks_exact(4)
            .map(|c| Hitbox::from_xywh(c[0], c[1], c[2].max(0.0), c[3].max(0.0)))
            .collect();
    }

    /// Zero width or height removes the bounds.
    pub fn set_bounds(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.bounds = (w > 0.0 && h > 0.0).then(|| Hitbox::from_xywh(x, y, w, h));
    }

    /// Partial JSON: only the named fields change, the rest keep defaults.
    pub fn set_params_json(&mut self, json: &str) -> Result<(), JsValue> {
        let params = Params::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.params = params;
        Ok(())
    }

    /// Step once (60Hz) and return state+events as a JS object.
    pub fn step(&mut self, input_bits: u8) -> Result<JsValue, JsValue> {
        let ev = self.tick(Buttons::from_bits_truncate(input_bits));
        self.snapshot(ev)
    }

    /// Run as many fixed ticks as `elapsed_ms` of wall time covers, holding
    /// the same buttons, and return the merged events.
    pub fn advance(&mut self, elapsed_ms: f64, input_bits: u8) -> Result<JsValue, JsValue> {
        let buttons = Buttons::from_bits_truncate(input_bits);
        let mut ev = MoveEvents::empty();
        for _ in 0..self.clock.accumulate(Millis(elapsed_ms)) {
            ev |= self.tick(buttons);
        }
        self.snapshot(ev)
    }

    /// Spawn a projectile from the player's center. Speeds above the
    /// configured projectile max are scaled down to it.
    pub fn fire(&mut self, vx: f64, vy: f64) -> Result<(), JsValue> {
        if !vx.is_finite() || !vy.is_finite() {
            return Err(JsValue::from_str("projectile velocity must be finite"));
        }
        let half = PROJECTILE_SIZE / 2.0;
        let origin = self.player.entity.hitbox.center() - Vector::new(half, half);
        let hitbox = Hitbox::new(origin, Vector::new(PROJECTILE_SIZE, PROJECTILE_SIZE));
        self.projectiles.push(Projectile::new(hitbox, Vector::new(vx, vy), &self.params.projectile));
        Ok(())
    }

    pub fn x(&self) -> f64 {
        self.player.position().x
    }

    pub fn y(&self) -> f64 {
        self.player.position().y
    }

    pub fn vx(&self) -> f64 {
        self.player.entity.velocity.x
    }

    pub fn vy(&self) -> f64 {
        self.player.entity.velocity.y
    }

    pub fn grounded(&self) -> bool {
        self.player.entity.is_on_ground(&self.blocks)
    }

    pub fn dash_charges(&self) -> u32 {
        self.player.dash.charges()
    }

    /// Render interpolation factor left over by `advance`.
    pub fn alpha(&self) -> f64 {
        self.clock.alpha()
    }

    /// Packed live projectile positions: [x,y, x,y, ...]
    pub fn projectiles(&self) -> Box<[f64]> {
        self.projectiles
            .iter()
            .flat_map(|p| [p.hitbox.position.x, p.hitbox.position.y])
            .collect()
    }
}

impl Core {
    fn tick(&mut self, buttons: Buttons) -> MoveEvents {
        let room = Room::new(&self.blocks, self.bounds);
        let ev = ledge_core::step(&self.params, &room, &mut self.player, buttons, Millis::FRAME);

        let blocks = room.blocks();
        self.projectiles.retain_mut(|p| p.update(Millis::FRAME, blocks, &[]) == ProjectileOutcome::Flying);
        ev
    }

    fn snapshot(&self, ev: MoveEvents) -> Result<JsValue, JsValue> {
        let obj = js_sys::Object::new();
        let set = |k: &str, v: JsValue| js_sys::Reflect::set(&obj, &k.into(), &v).map(|_| ());
        set("x", JsValue::from_f64(self.x()))?;
        set("y", JsValue::from_f64(self.y()))?;
        set("vx", JsValue::from_f64(self.vx()))?;
        set("vy", JsValue::from_f64(self.vy()))?;
        set("grounded", JsValue::from_bool(self.grounded()))?;
        set("events", JsValue::from(ev.bits()))?;
        set("jumped", JsValue::from_bool(ev.contains(MoveEvents::JUMPED)))?;
        set("landed", JsValue::from_bool(ev.contains(MoveEvents::LANDED)))?;
        set("bonked", JsValue::from_bool(ev.contains(MoveEvents::BONKED)))?;
        set("dashed", JsValue::from_bool(ev.contains(MoveEvents::DASHED)))?;
        set("out_of_bounds", JsValue::from_bool(ev.contains(MoveEvents::OUT_OF_BOUNDS)))?;

        Ok(JsValue::from(obj))
    }
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}
