use winsys::connection::Connection;
use winsys::event::Event;
use winsys::geometry::Pos;
use winsys::geometry::Region;
use winsys::input::KeyCode;
use winsys::input::KeyboardMapping;
use winsys::screen::Screen;
use winsys::window::Protocol;
use winsys::window::Timestamp;
use winsys::window::Window;
use winsys::window::WindowChanges;
use winsys::Result;

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::anyhow;
use winsys::error::WinsysError;

/// Every request a handler issued, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Init(Window),
    Configure(Window, WindowChanges),
    ConfigureNotify(Window, Region, u32),
    Map(Window),
    Unmap(Window),
    Destroy(Window),
    Focus(Window),
    Unfocus,
    Warp(Window, Pos),
    ProtocolMessage(Window, Protocol, Timestamp),
    GrabKey(KeyCode),
    Cleanup,
}

pub type RequestLog = Rc<RefCell<Vec<Request>>>;

/// A display server stand-in that records requests instead of sending them.
pub struct FakeConnection {
    log: RequestLog,
    events: RefCell<VecDeque<Event>>,
    screens: Rc<RefCell<Vec<Screen>>>,
    pub windows: Vec<Window>,
    pub protocols: HashMap<Window, Vec<Protocol>>,
    pub names: HashMap<Window, (String, String)>,
    pub override_redirect: HashSet<Window>,
    pub rejected: HashSet<Window>,
    pub unconfigurable: HashSet<Window>,
    pub unwarpable: HashSet<Window>,
    pub mapping: KeyboardMapping,
}

impl FakeConnection {
    pub const ROOT: Window = 0x100;

    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            events: RefCell::new(VecDeque::new()),
            screens: Rc::new(RefCell::new(vec![Screen::new(
                Region::new(0, 0, 1920, 1080),
                0,
            )])),
            windows: Vec::new(),
            protocols: HashMap::new(),
            names: HashMap::new(),
            override_redirect: HashSet::new(),
            rejected: HashSet::new(),
            unconfigurable: HashSet::new(),
            unwarpable: HashSet::new(),
            // keycode 24: q, 25: w, 36: Return
            mapping: KeyboardMapping::new(
                24,
                1,
                [vec![0x71, 0x77], vec![0; 10], vec![0xff0d]].concat(),
            ),
        }
    }

    pub fn log(&self) -> RequestLog {
        Rc::clone(&self.log)
    }

    /// Shared handle to the outputs reported by `connected_outputs`.
    pub fn screens(&self) -> Rc<RefCell<Vec<Screen>>> {
        Rc::clone(&self.screens)
    }

    pub fn push_event(
        &self,
        event: Event,
    ) {
        self.events.borrow_mut().push_back(event);
    }

    fn record(
        &self,
        request: Request,
    ) {
        self.log.borrow_mut().push(request);
    }

    fn check(
        &self,
        window: Window,
    ) -> Result<()> {
        if self.rejected.contains(&window) {
            return Err(WinsysError::protocol(window, "BadWindow").into());
        }

        Ok(())
    }
}

impl Connection for FakeConnection {
    fn flush(&self) -> bool {
        true
    }

    fn step(&self) -> Result<Option<Event>> {
        self.events
            .borrow_mut()
            .pop_front()
            .map(Some)
            .ok_or_else(|| anyhow!("connection closed"))
    }

    fn connected_outputs(&self) -> Result<Vec<Screen>> {
        let screens = self.screens.borrow();

        if screens.is_empty() {
            return Err(WinsysError::NoScreens.into());
        }

        Ok(screens.clone())
    }

    fn top_level_windows(&self) -> Result<Vec<Window>> {
        Ok(self.windows.clone())
    }

    fn keyboard_mapping(&self) -> Result<KeyboardMapping> {
        Ok(self.mapping.clone())
    }

    fn grab_key(
        &self,
        key_code: KeyCode,
    ) {
        self.record(Request::GrabKey(key_code));
    }

    fn cleanup(&self) {
        self.record(Request::Cleanup);
    }

    fn init_window(
        &self,
        window: Window,
    ) -> Result<()> {
        self.check(window)?;
        self.record(Request::Init(window));
        Ok(())
    }

    fn configure_window(
        &self,
        window: Window,
        changes: &WindowChanges,
    ) -> Result<()> {
        self.check(window)?;

        if self.unconfigurable.contains(&window) {
            return Err(WinsysError::protocol(window, "BadMatch").into());
        }

        self.record(Request::Configure(window, *changes));
        Ok(())
    }

    fn map_window(
        &self,
        window: Window,
    ) {
        self.record(Request::Map(window));
    }

    fn unmap_window(
        &self,
        window: Window,
    ) {
        self.record(Request::Unmap(window));
    }

    fn destroy_window(
        &self,
        window: Window,
    ) {
        self.record(Request::Destroy(window));
    }

    fn focus_window(
        &self,
        window: Window,
    ) {
        self.record(Request::Focus(window));
    }

    fn unfocus(&self) {
        self.record(Request::Unfocus);
    }

    fn warp_pointer(
        &self,
        window: Window,
        pos: Pos,
    ) -> Result<()> {
        self.check(window)?;

        if self.unwarpable.contains(&window) {
            return Err(WinsysError::protocol(window, "BadMatch").into());
        }

        self.record(Request::Warp(window, pos));
        Ok(())
    }

    fn window_is_override_redirect(
        &self,
        window: Window,
    ) -> bool {
        self.override_redirect.contains(&window)
    }

    fn send_configure_notify(
        &self,
        window: Window,
        region: Region,
        border_width: u32,
    ) {
        self.record(Request::ConfigureNotify(window, region, border_width));
    }

    fn send_protocol_message(
        &self,
        window: Window,
        protocol: Protocol,
        time: Timestamp,
    ) -> Result<()> {
        self.check(window)?;
        self.record(Request::ProtocolMessage(window, protocol, time));
        Ok(())
    }

    fn get_icccm_window_protocols(
        &self,
        window: Window,
    ) -> Result<Option<Vec<Protocol>>> {
        Ok(self.protocols.get(&window).cloned())
    }

    fn get_icccm_window_name(
        &self,
        window: Window,
    ) -> String {
        self.names
            .get(&window)
            .map_or(String::new(), |(icccm, _)| icccm.clone())
    }

    fn get_ewmh_window_name(
        &self,
        window: Window,
    ) -> String {
        self.names
            .get(&window)
            .map_or(String::new(), |(_, ewmh)| ewmh.clone())
    }
}
