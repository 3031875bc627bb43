pub use crate::Result;

use crate::geometry::Region;
use crate::input::KeyCode;
use crate::window::Timestamp;
use crate::window::Window;
use crate::window::WindowChanges;

#[derive(Debug, Clone)]
pub enum Event {
    Key {
        key_code: KeyCode,
    },
    MapRequest {
        window: Window,
        ignore: bool,
    },
    Map {
        window: Window,
    },
    Enter {
        window: Window,
        time: Timestamp,
    },
    Destroy {
        window: Window,
    },
    Unmap {
        window: Window,
    },
    ConfigureRequest {
        window: Window,
        region: Region,
        border_width: u32,
        changes: WindowChanges,
    },
    Configure {
        window: Window,
        region: Region,
        on_root: bool,
    },
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Key {
                ..
            } => "KEY_PRESS",
            Event::MapRequest {
                ..
            } => "MAP_REQUEST",
            Event::Map {
                ..
            } => "MAP",
            Event::Enter {
                ..
            } => "ENTER",
            Event::Destroy {
                ..
            } => "DESTROY",
            Event::Unmap {
                ..
            } => "UNMAP",
            Event::ConfigureRequest {
                ..
            } => "CONFIGURE_REQUEST",
            Event::Configure {
                ..
            } => "CONFIGURE",
        }
    }
}
