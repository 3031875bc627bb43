use crate::event::Event;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::input::KeyCode;
use crate::input::KeyboardMapping;
use crate::screen::Screen;
use crate::window::Protocol;
use crate::window::Timestamp;
use crate::window::Window;
use crate::window::WindowChanges;
use crate::Result;

/// Requests returning `Result` are checked round trips; the rest are
/// fire-and-forget and only surface failures as asynchronous errors.
pub trait Connection {
    fn flush(&self) -> bool;
    fn step(&self) -> Result<Option<Event>>;
    fn connected_outputs(&self) -> Result<Vec<Screen>>;
    fn top_level_windows(&self) -> Result<Vec<Window>>;
    fn keyboard_mapping(&self) -> Result<KeyboardMapping>;
    fn grab_key(
        &self,
        key_code: KeyCode,
    );
    fn cleanup(&self);

    // Window manipulation
    fn init_window(
        &self,
        window: Window,
    ) -> Result<()>;
    fn configure_window(
        &self,
        window: Window,
        changes: &WindowChanges,
    ) -> Result<()>;
    fn map_window(
        &self,
        window: Window,
    );
    fn unmap_window(
        &self,
        window: Window,
    );
    fn destroy_window(
        &self,
        window: Window,
    );
    fn focus_window(
        &self,
        window: Window,
    );
    fn unfocus(&self);
    fn warp_pointer(
        &self,
        window: Window,
        pos: Pos,
    ) -> Result<()>;
    fn window_is_override_redirect(
        &self,
        window: Window,
    ) -> bool;

    // Synthetic events
    fn send_configure_notify(
        &self,
        window: Window,
        region: Region,
        border_width: u32,
    );
    fn send_protocol_message(
        &self,
        window: Window,
        protocol: Protocol,
        time: Timestamp,
    ) -> Result<()>;

    // ICCCM
    fn get_icccm_window_protocols(
        &self,
        window: Window,
    ) -> Result<Option<Vec<Protocol>>>;
    fn get_icccm_window_name(
        &self,
        window: Window,
    ) -> String;

    // EWMH
    fn get_ewmh_window_name(
        &self,
        window: Window,
    ) -> String;
}
