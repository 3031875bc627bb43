pub type Window = u32;
pub type Timestamp = u32;

#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum StackMode {
    Above,
    Below,
    TopIf,
    BottomIf,
    Opposite,
}

impl Default for StackMode {
    fn default() -> Self {
        StackMode::Above
    }
}

/// ICCCM protocols a client may advertise in its WM_PROTOCOLS property.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub enum Protocol {
    DeleteWindow,
    TakeFocus,
}

/// The subset of a window's configuration to change; `None` fields are
/// left out of the request's value mask.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct WindowChanges {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub border_width: Option<u32>,
    pub stack_mode: Option<StackMode>,
}

impl WindowChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
