use crate::hitbox::Hitbox;

/// View of the current room's static geometry. The host keeps the blocks and
/// lends them for each tick; they are never edited mid-tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Room<'a> {
    pub blocks: &'a [Hitbox],
    /// Playable area. A body that stops overlapping it has left the room.
    pub bounds: Option<Hitbox>,
}

impl<'a> Room<'a> {
    pub fn new(blocks: &'a [Hitbox], bounds: Option<Hitbox>) -> Self {
        Self { blocks, bounds }
    }

    #[inline]
    pub fn blocks(&self) -> &'a [Hitbox] {
        self.blocks
    }

    pub fn is_out_of_bounds(&self, hitbox: &Hitbox) -> bool {
        self.bounds.is_some_and(|b| !hitbox.overlaps(&b))
    }
}
