use crate::connection::Connection;
use crate::error::WinsysError;
use crate::event::Event;
use crate::geometry::Pos;
use crate::geometry::Region;
use crate::input::KeyCode;
use crate::input::KeyboardMapping;
use crate::input::Modifier;
use crate::screen::Screen;
use crate::window::Protocol;
use crate::window::StackMode;
use crate::window::Timestamp;
use crate::window::Window;
use crate::window::WindowChanges;
use crate::Result;

use std::collections::HashMap;

use x11rb::connection;
use x11rb::errors::ReplyError;
use x11rb::protocol::xinerama;
use x11rb::protocol::xproto;
use x11rb::protocol::xproto::ConnectionExt;
use x11rb::protocol::xproto::EventMask;
use x11rb::protocol::xproto::ModMask;
use x11rb::protocol::xproto::CLIENT_MESSAGE_EVENT;
use x11rb::protocol::xproto::CONFIGURE_NOTIFY_EVENT;
use x11rb::protocol::ErrorKind;
use x11rb::protocol::Event as XEvent;

type Atom = u32;

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        ATOM,
        UTF8_STRING,

        // ICCCM client properties
        WM_NAME,
        WM_PROTOCOLS,
        WM_DELETE_WINDOW,
        WM_TAKE_FOCUS,

        // EWMH application properties
        _NET_WM_NAME,
    }
}

pub struct XConnection<'conn, Conn: connection::Connection> {
    conn: &'conn Conn,
    atoms: Atoms,
    protocol_map: HashMap<Atom, Protocol>,
    screen: xproto::Screen,
    window_event_mask: EventMask,
}

impl<'conn, Conn: connection::Connection> XConnection<'conn, Conn> {
    pub fn new(
        conn: &'conn Conn,
        screen_num: usize,
    ) -> Result<Self> {
        let screen = conn
            .setup()
            .roots
            .get(screen_num)
            .cloned()
            .ok_or(WinsysError::InvalidSetup)?;

        let root_event_mask: EventMask =
            EventMask::SUBSTRUCTURE_REDIRECT | EventMask::STRUCTURE_NOTIFY;

        let window_event_mask: EventMask = EventMask::STRUCTURE_NOTIFY | EventMask::ENTER_WINDOW;

        let aux = xproto::ChangeWindowAttributesAux::default().event_mask(root_event_mask);

        match conn.change_window_attributes(screen.root, &aux)?.check() {
            Ok(()) => {},
            Err(ReplyError::X11Error(err)) if err.error_kind == ErrorKind::Access => {
                return Err(WinsysError::AnotherWmRunning.into());
            },
            Err(_) => return Err(WinsysError::SetupFailed.into()),
        }

        let atoms = Atoms::new(conn)?.reply()?;

        let protocol_map: HashMap<Atom, Protocol> = map!(
            atoms.WM_DELETE_WINDOW => Protocol::DeleteWindow,
            atoms.WM_TAKE_FOCUS => Protocol::TakeFocus,
        );

        Ok(Self {
            conn,
            atoms,
            protocol_map,
            screen,
            window_event_mask,
        })
    }

    #[inline]
    fn get_atom_from_protocol(
        &self,
        protocol: Protocol,
    ) -> Atom {
        match protocol {
            Protocol::DeleteWindow => self.atoms.WM_DELETE_WINDOW,
            Protocol::TakeFocus => self.atoms.WM_TAKE_FOCUS,
        }
    }

    #[inline]
    fn get_stack_mode(stack_mode: StackMode) -> xproto::StackMode {
        match stack_mode {
            StackMode::Above => xproto::StackMode::ABOVE,
            StackMode::Below => xproto::StackMode::BELOW,
            StackMode::TopIf => xproto::StackMode::TOP_IF,
            StackMode::BottomIf => xproto::StackMode::BOTTOM_IF,
            StackMode::Opposite => xproto::StackMode::OPPOSITE,
        }
    }

    fn get_string_property(
        &self,
        window: Window,
        property: Atom,
        type_: Atom,
    ) -> Option<String> {
        let reply = self
            .conn
            .get_property(false, window, property, type_, 0, std::u32::MAX)
            .ok()?
            .reply()
            .ok()?;

        reply
            .value8()
            .map(|bytes| String::from_utf8_lossy(&bytes.collect::<Vec<u8>>()).into_owned())
    }

    #[inline]
    fn on_key_press(
        &self,
        event: &xproto::KeyPressEvent,
    ) -> Option<Event> {
        Some(Event::Key {
            key_code: KeyCode {
                mask: Modifier::clean_mask(event.state),
                code: event.detail,
            },
        })
    }

    #[inline]
    fn on_map_request(
        &self,
        event: &xproto::MapRequestEvent,
    ) -> Option<Event> {
        Some(Event::MapRequest {
            window: event.window,
            ignore: self.window_is_override_redirect(event.window),
        })
    }

    #[inline]
    fn on_map_notify(
        &self,
        event: &xproto::MapNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Map {
            window: event.window,
        })
    }

    #[inline]
    fn on_enter_notify(
        &self,
        event: &xproto::EnterNotifyEvent,
    ) -> Option<Event> {
        // pointer grabs and ungrabs generate crossings the user did not cause
        if event.mode != xproto::NotifyMode::NORMAL {
            return None;
        }

        Some(Event::Enter {
            window: event.event,
            time: event.time,
        })
    }

    #[inline]
    fn on_destroy_notify(
        &self,
        event: &xproto::DestroyNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Destroy {
            window: event.window,
        })
    }

    #[inline]
    fn on_unmap_notify(
        &self,
        event: &xproto::UnmapNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Unmap {
            window: event.window,
        })
    }

    fn on_configure_request(
        &self,
        event: &xproto::ConfigureRequestEvent,
    ) -> Option<Event> {
        let has = |flag: xproto::ConfigWindow| event.value_mask & u16::from(flag) != 0;
        let mut changes = WindowChanges::default();

        if has(xproto::ConfigWindow::X) {
            changes.x = Some(event.x as i32);
        }

        if has(xproto::ConfigWindow::Y) {
            changes.y = Some(event.y as i32);
        }

        if has(xproto::ConfigWindow::WIDTH) {
            changes.width = Some(event.width as u32);
        }

        if has(xproto::ConfigWindow::HEIGHT) {
            changes.height = Some(event.height as u32);
        }

        if has(xproto::ConfigWindow::BORDER_WIDTH) {
            changes.border_width = Some(event.border_width as u32);
        }

        // restacking relative to a sibling is not expressible here
        if has(xproto::ConfigWindow::STACK_MODE) && event.sibling == x11rb::NONE {
            changes.stack_mode = match event.stack_mode {
                xproto::StackMode::ABOVE => Some(StackMode::Above),
                xproto::StackMode::BELOW => Some(StackMode::Below),
                xproto::StackMode::TOP_IF => Some(StackMode::TopIf),
                xproto::StackMode::BOTTOM_IF => Some(StackMode::BottomIf),
                xproto::StackMode::OPPOSITE => Some(StackMode::Opposite),
                _ => None,
            };
        }

        Some(Event::ConfigureRequest {
            window: event.window,
            region: Region::new(
                event.x as i32,
                event.y as i32,
                event.width as u32,
                event.height as u32,
            ),
            border_width: event.border_width as u32,
            changes,
        })
    }

    #[inline]
    fn on_configure_notify(
        &self,
        event: &xproto::ConfigureNotifyEvent,
    ) -> Option<Event> {
        Some(Event::Configure {
            window: event.window,
            region: Region::new(
                event.x as i32,
                event.y as i32,
                event.width as u32,
                event.height as u32,
            ),
            on_root: event.window == self.screen.root,
        })
    }
}

impl<'conn, Conn: connection::Connection> Connection for XConnection<'conn, Conn> {
    #[inline]
    fn flush(&self) -> bool {
        self.conn.flush().is_ok()
    }

    fn step(&self) -> Result<Option<Event>> {
        Ok(match self.conn.wait_for_event()? {
            XEvent::KeyPress(e) => self.on_key_press(&e),
            XEvent::MapRequest(e) => self.on_map_request(&e),
            XEvent::MapNotify(e) => self.on_map_notify(&e),
            XEvent::EnterNotify(e) => self.on_enter_notify(&e),
            XEvent::DestroyNotify(e) => self.on_destroy_notify(&e),
            XEvent::UnmapNotify(e) => self.on_unmap_notify(&e),
            XEvent::ConfigureRequest(e) => self.on_configure_request(&e),
            XEvent::ConfigureNotify(e) => self.on_configure_notify(&e),
            XEvent::Error(err) => {
                warn!(
                    "asynchronous {:?} error on resource {:#x}",
                    err.error_kind, err.bad_value
                );
                None
            },
            _ => None,
        })
    }

    fn connected_outputs(&self) -> Result<Vec<Screen>> {
        let mut screens: Vec<Screen> = xinerama::query_screens(self.conn)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map_or(Vec::with_capacity(0), |reply| {
                reply
                    .screen_info
                    .into_iter()
                    .filter(|info| info.width > 0 && info.height > 0)
                    .enumerate()
                    .map(|(i, info)| {
                        Screen::new(
                            Region::new(
                                info.x_org as i32,
                                info.y_org as i32,
                                info.width as u32,
                                info.height as u32,
                            ),
                            i,
                        )
                    })
                    .collect()
            });

        if screens.is_empty() {
            let (w, h) = (
                self.screen.width_in_pixels as u32,
                self.screen.height_in_pixels as u32,
            );

            if w > 0 && h > 0 {
                screens.push(Screen::new(Region::new(0, 0, w, h), 0));
            }
        }

        if screens.is_empty() {
            return Err(WinsysError::NoScreens.into());
        }

        Ok(screens)
    }

    fn top_level_windows(&self) -> Result<Vec<Window>> {
        let reply = self.conn.query_tree(self.screen.root)?.reply()?;

        Ok(reply
            .children
            .into_iter()
            .filter(|&window| {
                self.conn
                    .get_window_attributes(window)
                    .ok()
                    .and_then(|cookie| cookie.reply().ok())
                    .map_or(false, |attrs| {
                        !attrs.override_redirect && attrs.map_state == xproto::MapState::VIEWABLE
                    })
            })
            .collect())
    }

    fn keyboard_mapping(&self) -> Result<KeyboardMapping> {
        let setup = self.conn.setup();
        let (min_keycode, max_keycode) = (setup.min_keycode, setup.max_keycode);

        if max_keycode < min_keycode {
            return Err(WinsysError::NoKeyboardMapping.into());
        }

        let reply = self
            .conn
            .get_keyboard_mapping(min_keycode, max_keycode - min_keycode + 1)?
            .reply()
            .map_err(|_| WinsysError::NoKeyboardMapping)?;

        Ok(KeyboardMapping::new(
            min_keycode,
            reply.keysyms_per_keycode,
            reply.keysyms,
        ))
    }

    fn grab_key(
        &self,
        key_code: KeyCode,
    ) {
        for lock in Modifier::lock_combinations() {
            drop(self.conn.grab_key(
                false,
                self.screen.root,
                key_code.mask | lock,
                key_code.code,
                xproto::GrabMode::ASYNC,
                xproto::GrabMode::ASYNC,
            ));
        }
    }

    fn cleanup(&self) {
        drop(
            self.conn
                .ungrab_key(0u8, self.screen.root, u16::from(ModMask::ANY)),
        );

        drop(self.conn.set_input_focus(
            xproto::InputFocus::POINTER_ROOT,
            self.screen.root,
            x11rb::CURRENT_TIME,
        ));

        drop(self.conn.flush());
    }

    fn init_window(
        &self,
        window: Window,
    ) -> Result<()> {
        let aux = xproto::ChangeWindowAttributesAux::default().event_mask(self.window_event_mask);

        self.conn
            .change_window_attributes(window, &aux)?
            .check()
            .map_err(|err| WinsysError::protocol(window, err))?;

        Ok(())
    }

    fn configure_window(
        &self,
        window: Window,
        changes: &WindowChanges,
    ) -> Result<()> {
        let aux = xproto::ConfigureWindowAux::default()
            .x(changes.x)
            .y(changes.y)
            .width(changes.width)
            .height(changes.height)
            .border_width(changes.border_width)
            .stack_mode(changes.stack_mode.map(Self::get_stack_mode));

        self.conn
            .configure_window(window, &aux)?
            .check()
            .map_err(|err| WinsysError::protocol(window, err))?;

        Ok(())
    }

    #[inline]
    fn map_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.map_window(window));
    }

    #[inline]
    fn unmap_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.unmap_window(window));
    }

    #[inline]
    fn destroy_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.destroy_window(window));
    }

    #[inline]
    fn focus_window(
        &self,
        window: Window,
    ) {
        drop(self.conn.set_input_focus(
            xproto::InputFocus::POINTER_ROOT,
            window,
            x11rb::CURRENT_TIME,
        ));
    }

    #[inline]
    fn unfocus(&self) {
        drop(self.conn.set_input_focus(
            xproto::InputFocus::POINTER_ROOT,
            self.screen.root,
            x11rb::CURRENT_TIME,
        ));
    }

    fn warp_pointer(
        &self,
        window: Window,
        pos: Pos,
    ) -> Result<()> {
        self.conn
            .warp_pointer(
                x11rb::NONE,
                window,
                0,
                0,
                0,
                0,
                pos.x as i16,
                pos.y as i16,
            )?
            .check()
            .map_err(|err| WinsysError::protocol(window, err))?;

        Ok(())
    }

    fn window_is_override_redirect(
        &self,
        window: Window,
    ) -> bool {
        self.conn
            .get_window_attributes(window)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map_or(false, |attrs| attrs.override_redirect)
    }

    fn send_configure_notify(
        &self,
        window: Window,
        region: Region,
        border_width: u32,
    ) {
        let event = xproto::ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: window,
            window,
            above_sibling: x11rb::NONE,
            x: region.pos.x as i16,
            y: region.pos.y as i16,
            width: region.dim.w as u16,
            height: region.dim.h as u16,
            border_width: border_width as u16,
            override_redirect: false,
        };

        drop(
            self.conn
                .send_event(false, window, EventMask::STRUCTURE_NOTIFY, &event),
        );
    }

    fn send_protocol_message(
        &self,
        window: Window,
        protocol: Protocol,
        time: Timestamp,
    ) -> Result<()> {
        let data = [self.get_atom_from_protocol(protocol), time, 0, 0, 0];

        let event = xproto::ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window,
            type_: self.atoms.WM_PROTOCOLS,
            data: data.into(),
        };

        self.conn
            .send_event(false, window, EventMask::NO_EVENT, &event)?
            .check()
            .map_err(|err| WinsysError::protocol(window, err))?;

        Ok(())
    }

    fn get_icccm_window_protocols(
        &self,
        window: Window,
    ) -> Result<Option<Vec<Protocol>>> {
        let reply = self
            .conn
            .get_property(
                false,
                window,
                self.atoms.WM_PROTOCOLS,
                self.atoms.ATOM,
                0,
                std::u32::MAX,
            )?
            .reply()
            .map_err(|err| WinsysError::protocol(window, err))?;

        if reply.type_ == x11rb::NONE {
            return Ok(None);
        }

        Ok(reply.value32().map(|protocols| {
            protocols
                .filter_map(|atom| self.protocol_map.get(&atom).copied())
                .collect()
        }))
    }

    #[inline]
    fn get_icccm_window_name(
        &self,
        window: Window,
    ) -> String {
        self.get_string_property(
            window,
            self.atoms.WM_NAME,
            u32::from(xproto::AtomEnum::ANY),
        )
        .unwrap_or_default()
    }

    #[inline]
    fn get_ewmh_window_name(
        &self,
        window: Window,
    ) -> String {
        self.get_string_property(window, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING)
            .unwrap_or_default()
    }
}
