use crate::client::Client;
use crate::model::Model;

use winsys::geometry::Pos;

#[macro_export]
macro_rules! WM_NAME (
    () => { "colwm" };
);

impl Client {
    pub const DEFAULT_BORDER_WIDTH: u32 = 1;

    pub const POINTER_WARP_OFFSET: Pos = Pos {
        x: 10,
        y: 10,
    };
}

impl Model<'_> {
    pub const WORKSPACE_NAMES: [&'static str; 8] = ["1", "2", "3", "4", "5", "6", "7", "8"];
    pub const TERMINAL: &'static str = "x-terminal-emulator";
}
