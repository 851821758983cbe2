/// Axis-aligned pixel rectangle used as the broad-phase collision box.
///
/// Coordinates are whole screen pixels with `(x, y)` at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxCollider {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl BoxCollider {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Intersection rectangle with `other`, or `None` when it has zero width or height.
    pub fn clip(&self, other: &Self) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Self::new(x, y, right - x, bottom - y))
    }
}
