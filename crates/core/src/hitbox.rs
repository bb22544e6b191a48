use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// Axis-aligned rectangle: `position` is the top-left corner.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub position: Vector,
    pub size: Vector,
}

impl Hitbox {
    #[inline]
    pub fn new(position: Vector, size: Vector) -> Self {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0, "negative hitbox size {size:?}");
        Self { position, size }
    }

    /// Shorthand for `new` from the four scalars `x, y, w, h`.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(Vector::new(x, y), Vector::new(w, h))
    }

    #[inline]
    pub fn top_left(&self) -> Vector {
        self.position
    }

    #[inline]
    pub fn bottom_right(&self) -> Vector {
        self.position + self.size
    }

    #[inline]
    pub fn center(&self) -> Vector {
        self.position + self.size.scale(0.5)
    }

    /// Copy moved by `offset`; size unchanged.
    #[inline]
    pub fn translated(&self, offset: Vector) -> Hitbox {
        Hitbox { position: self.position + offset, size: self.size }
    }

    /// Copy moved by `offset` and resized by `size_delta`.
    ///
    /// The resulting size must stay non-negative; a shrink past zero trips the
    /// size assertion in debug builds.
    pub fn grown(&self, offset: Vector, size_delta: Vector) -> Hitbox {
        Hitbox::new(self.position + offset, self.size + size_delta)
    }

    /// Inclusive: a point on the boundary is contained.
    pub fn contains(&self, point: Vector) -> bool {
        let tl = self.top_left();
        let br = self.bottom_right();
        point.x >= tl.x && point.x <= br.x && point.y >= tl.y && point.y <= br.y
    }

    /// Strict overlap: rectangles sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        let a = self.bottom_right();
        let b = other.bottom_right();
        !(a.x <= other.position.x
            || self.position.x >= b.x
            || self.position.y >= b.y
            || a.y <= other.position.y)
    }

    /// First obstacle this hitbox overlaps, scanning in slice order.
    pub fn first_overlap<'a>(&self, obstacles: &'a [Hitbox]) -> Option<&'a Hitbox> {
        obstacles.iter().find(|o| self.overlaps(o))
    }

    #[inline]
    pub fn overlaps_any(&self, obstacles: &[Hitbox]) -> bool {
        self.first_overlap(obstacles).is_some()
    }

    /// True if the segment `p1..p2` touches this rectangle: either endpoint is
    /// inside, or the segment crosses one of the four edges.
    pub fn segment_intersects(&self, p1: Vector, p2: Vector) -> bool {
        if self.contains(p1) || self.contains(p2) {
            return true;
        }
        let tl = self.top_left();
        let br = self.bottom_right();
        let tr = Vector::new(br.x, tl.y);
        let bl = Vector::new(tl.x, br.y);
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
            .iter()
            .any(|&(a, b)| segments_intersect(p1, p2, a, b))
    }

    /// Swept test of `self` (size only) travelling from `start` to `end` against
    /// `other`. The box touches `other` somewhere on the path exactly when its
    /// top-left corner path touches `other` grown by the box size, whatever
    /// their relative sizes. Edge contact counts as a hit here, so it can
    /// report a graze that `overlaps` would reject, but it never misses one.
    pub fn swept_overlap(&self, start: Vector, end: Vector, other: &Hitbox) -> bool {
        let hull = Hitbox { position: other.position - self.size, size: other.size + self.size };
        hull.segment_intersects(start, end)
    }

    /// Smallest rectangle covering both.
    pub fn merge(&self, other: &Hitbox) -> Hitbox {
        let a = self.bottom_right();
        let b = other.bottom_right();
        let tl = Vector::new(self.position.x.min(other.position.x), self.position.y.min(other.position.y));
        let br = Vector::new(a.x.max(b.x), a.y.max(b.y));
        Hitbox::new(tl, br - tl)
    }

    /// Intersection, or `None` when the rectangles do not overlap.
    pub fn clip(&self, other: &Hitbox) -> Option<Hitbox> {
        let a = self.bottom_right();
        let b = other.bottom_right();
        let tl = Vector::new(self.position.x.max(other.position.x), self.position.y.max(other.position.y));
        let br = Vector::new(a.x.min(b.x), a.y.min(b.y));
        if tl.x >= br.x || tl.y >= br.y {
            return None;
        }
        Some(Hitbox::new(tl, br - tl))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: Vector, q: Vector, r: Vector) -> Orientation {
    let v = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if v == 0.0 {
        Orientation::Collinear
    } else if v > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

// q is collinear with p..r; is it inside the bounding box of p..r?
fn on_segment(p: Vector, q: Vector, r: Vector) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Closed segment test; collinear overlap counts as an intersection.
pub fn segments_intersect(p1: Vector, q1: Vector, p2: Vector, q2: Vector) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}
