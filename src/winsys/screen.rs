use crate::geometry::Region;

/// One physical output the workspaces can be bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Screen {
    number: usize,
    region: Region,
}

impl Screen {
    pub fn new(
        region: Region,
        number: usize,
    ) -> Self {
        Self {
            number,
            region,
        }
    }

    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }
}
