/// A unit step along the vertical and horizontal axes.
///
/// Negative `v` points up, negative `h` points left.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Direction {
    pub v: i32,
    pub h: i32,
}

impl Direction {
    pub const NONE: Self = Self {
        v: 0,
        h: 0,
    };
    pub const UP: Self = Self {
        v: -1,
        h: 0,
    };
    pub const DOWN: Self = Self {
        v: 1,
        h: 0,
    };
    pub const LEFT: Self = Self {
        v: 0,
        h: -1,
    };
    pub const RIGHT: Self = Self {
        v: 0,
        h: 1,
    };
}
