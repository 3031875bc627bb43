use winsys::connection::Connection;
use winsys::geometry::Region;
use winsys::window::Protocol;
use winsys::window::StackMode;
use winsys::window::Timestamp;
use winsys::window::Window;
use winsys::window::WindowChanges;
use winsys::Result;

use std::cell::Cell;
use std::cell::RefCell;

/// A managed top-level window.
///
/// The geometry held here is the intended state; it reaches the server
/// through [`Client::configure`].
#[derive(Debug, Clone)]
pub struct Client {
    window: Window,
    region: Region,
    border_width: u32,
    stack_mode: StackMode,
    name: RefCell<Option<String>>,
    expected_unmap_count: Cell<u8>,
}

impl Client {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            region: Default::default(),
            border_width: Self::DEFAULT_BORDER_WIDTH,
            stack_mode: Default::default(),
            name: RefCell::new(None),
            expected_unmap_count: Cell::new(0),
        }
    }

    #[inline]
    pub fn window(&self) -> Window {
        self.window
    }

    #[inline]
    pub fn region(&self) -> Region {
        self.region
    }

    #[inline]
    pub fn set_region(
        &mut self,
        region: Region,
    ) {
        self.region = region;
    }

    #[inline]
    pub fn border_width(&self) -> u32 {
        self.border_width
    }

    #[inline]
    pub fn set_border_width(
        &mut self,
        border_width: u32,
    ) {
        self.border_width = border_width;
    }

    #[inline]
    pub fn stack_mode(&self) -> StackMode {
        self.stack_mode
    }

    #[inline]
    pub fn set_stack_mode(
        &mut self,
        stack_mode: StackMode,
    ) {
        self.stack_mode = stack_mode;
    }

    /// The configuration request for the current geometry. A zero extent
    /// is left out so the server keeps the window's own size.
    pub fn changes(&self) -> WindowChanges {
        let (pos, dim) = self.region.values();

        WindowChanges {
            x: Some(pos.x),
            y: Some(pos.y),
            width: Some(dim.w).filter(|&w| w > 0),
            height: Some(dim.h).filter(|&h| h > 0),
            border_width: Some(self.border_width),
            stack_mode: Some(self.stack_mode),
        }
    }

    /// Configures the window, then subscribes to its structure and
    /// crossing events. A window the server refuses to configure is never
    /// subscribed to.
    pub fn init(
        &self,
        conn: &dyn Connection,
    ) -> Result<()> {
        self.configure(conn)?;
        conn.init_window(self.window)
    }

    pub fn configure(
        &self,
        conn: &dyn Connection,
    ) -> Result<()> {
        conn.configure_window(self.window, &self.changes())?;

        // moves that keep the size produce no real notify
        if self.region.dim.w > 0 && self.region.dim.h > 0 {
            conn.send_configure_notify(self.window, self.region, self.border_width);
        }

        Ok(())
    }

    pub fn warp_pointer(
        &self,
        conn: &dyn Connection,
    ) {
        if let Err(err) = conn.warp_pointer(self.window, Self::POINTER_WARP_OFFSET) {
            warn!(
                "unable to warp pointer into window {:#0x}: {}",
                self.window, err
            );
        }
    }

    /// Asks the client to close itself through WM_DELETE_WINDOW, destroying
    /// the window only when it does not take part in that protocol.
    pub fn close_gracefully(
        &self,
        conn: &dyn Connection,
    ) -> Result<()> {
        match conn.get_icccm_window_protocols(self.window)? {
            Some(protocols) if protocols.contains(&Protocol::DeleteWindow) => {
                info!("requesting close of window {:#0x}", self.window);
                conn.send_protocol_message(
                    self.window,
                    Protocol::DeleteWindow,
                    x11rb::CURRENT_TIME,
                )
            },
            _ => {
                self.close_forcefully(conn);
                Ok(())
            },
        }
    }

    pub fn close_forcefully(
        &self,
        conn: &dyn Connection,
    ) {
        info!("destroying window {:#0x}", self.window);
        conn.destroy_window(self.window);
    }

    #[inline]
    pub fn hide(
        &self,
        conn: &dyn Connection,
    ) {
        self.expect_unmap();
        conn.unmap_window(self.window);
    }

    #[inline]
    pub fn show(
        &self,
        conn: &dyn Connection,
    ) {
        conn.map_window(self.window);
    }

    pub fn name(
        &self,
        conn: &dyn Connection,
    ) -> String {
        if let Some(name) = self.name.borrow().as_ref() {
            return name.clone();
        }

        let mut name = conn.get_ewmh_window_name(self.window);
        if name.is_empty() {
            name = conn.get_icccm_window_name(self.window);
        }

        self.name.replace(Some(name.clone()));
        name
    }

    #[inline]
    pub fn focus(
        &self,
        conn: &dyn Connection,
    ) {
        conn.focus_window(self.window);
    }

    /// Hands input focus to the client, through WM_TAKE_FOCUS when the
    /// client asks to assign focus itself.
    pub fn take_focus(
        &self,
        conn: &dyn Connection,
        time: Timestamp,
    ) -> Result<()> {
        let protocols = conn.get_icccm_window_protocols(self.window)?;

        match protocols {
            Some(protocols) if protocols.contains(&Protocol::TakeFocus) => {
                conn.send_protocol_message(self.window, Protocol::TakeFocus, time)
            },
            _ => {
                self.focus(conn);
                Ok(())
            },
        }
    }

    #[inline]
    pub fn expect_unmap(&self) {
        self.expected_unmap_count
            .set(self.expected_unmap_count.get().saturating_add(1));
    }

    #[inline]
    pub fn consume_unmap_if_expecting(&self) -> bool {
        let expected_unmap_count = self.expected_unmap_count.get();
        let expecting = expected_unmap_count > 0;

        if expecting {
            self.expected_unmap_count.set(expected_unmap_count - 1);
        }

        expecting
    }
}

impl PartialEq for Client {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.window == other.window
    }
}

impl Eq for Client {}
