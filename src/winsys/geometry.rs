#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Default for Pos {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
        }
    }
}

/// Width and height; a zero extent leaves that extent to the server.
#[derive(Debug, Copy, Clone, Hash, PartialOrd, Ord, PartialEq, Eq)]
pub struct Dim {
    pub w: u32,
    pub h: u32,
}

impl Default for Dim {
    fn default() -> Self {
        Self {
            w: 0,
            h: 0,
        }
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct Region {
    pub pos: Pos,
    pub dim: Dim,
}

impl Default for Region {
    fn default() -> Self {
        Self {
            pos: Default::default(),
            dim: Default::default(),
        }
    }
}

impl Region {
    pub fn new(
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    ) -> Self {
        Self {
            pos: Pos {
                x,
                y,
            },
            dim: Dim {
                w,
                h,
            },
        }
    }

    pub fn values(&self) -> (Pos, Dim) {
        (self.pos, self.dim)
    }
}
