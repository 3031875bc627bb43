use crate::binding::KeyBindings;
use crate::client::Client;
use crate::direction::Direction;
use crate::error::StateChangeError;
use crate::layout::LayoutKind;
use crate::workspace::Workspace;

use winsys::connection::Connection;
use winsys::error::WinsysError;
use winsys::event::Event;
use winsys::geometry::Region;
use winsys::input::KeyCode;
use winsys::screen::Screen;
use winsys::window::Timestamp;
use winsys::window::Window;
use winsys::window::WindowChanges;
use winsys::Result;

pub struct Model<'a> {
    conn: &'a mut dyn Connection,
    screens: Vec<Screen>,
    workspaces: Vec<Workspace>,
    active_workspace: usize,
    focus: Option<Window>,
    running: bool,
}

impl<'a> Model<'a> {
    pub fn new(
        conn: &'a mut dyn Connection,
        key_bindings: &mut KeyBindings,
    ) -> Result<Self> {
        let workspaces = Self::WORKSPACE_NAMES
            .iter()
            .enumerate()
            .map(|(i, &name)| Workspace::new(name, i, LayoutKind::Column.new_layout()))
            .collect();

        Self::init(
            Self {
                conn,
                screens: Vec::new(),
                workspaces,
                active_workspace: 0,
                focus: None,
                running: true,
            },
            key_bindings,
        )
    }

    fn init(
        mut model: Self,
        key_bindings: &mut KeyBindings,
    ) -> Result<Self> {
        info!("initializing window manager");

        model.acquire_screens()?;
        model.init_keys(key_bindings)?;

        for window in model.conn.top_level_windows()? {
            if let Err(err) = model.manage(window, false) {
                warn!(
                    "unable to manage pre-existing window {:#0x}: {}",
                    window, err
                );
            }
        }

        Ok(model)
    }

    pub fn run(
        &mut self,
        mut key_bindings: KeyBindings,
    ) -> Result<()> {
        while self.running {
            if let Some(event) = self.conn.step()? {
                trace!("received event: {:?}", event);

                let kind = event.kind();
                if let Err(err) = self.handle_event(event, &mut key_bindings) {
                    Self::report(kind, &err);
                }
            }

            self.conn.flush();
        }

        info!("releasing grabs and closing connection");
        self.conn.cleanup();

        Ok(())
    }

    fn report(
        kind: &str,
        err: &anyhow::Error,
    ) {
        match err.downcast_ref::<StateChangeError>() {
            Some(err) => debug!("{} not handled: {}", kind, err),
            None => warn!("{} failed: {:#}", kind, err),
        }
    }

    pub fn handle_event(
        &mut self,
        event: Event,
        key_bindings: &mut KeyBindings,
    ) -> Result<()> {
        let result = match event {
            Event::Key {
                key_code,
            } => self.handle_key(key_code, key_bindings),
            Event::MapRequest {
                window,
                ignore,
            } => self.handle_map_request(window, ignore),
            Event::Map {
                window,
            } => self.handle_map(window),
            Event::Enter {
                window,
                time,
            } => self.handle_enter(window, time),
            Event::Destroy {
                window,
            } => self.handle_destroy(window),
            Event::Unmap {
                window,
            } => self.handle_unmap(window),
            Event::ConfigureRequest {
                window,
                region,
                border_width,
                changes,
            } => self.handle_configure_request(window, region, border_width, changes),
            Event::Configure {
                window,
                region,
                on_root,
            } => self.handle_configure(window, region, on_root),
        };

        self.check_focus();
        result
    }

    fn check_focus(&self) {
        if let Some(focus) = self.focus {
            if !self.workspaces[self.active_workspace].has_window(focus) {
                panic!(
                    "active client with window {:#0x} is not on workspace {}",
                    focus, self.active_workspace
                );
            }
        }
    }

    fn acquire_screens(&mut self) -> Result<()> {
        info!("acquiring screens");

        let screens = match self.conn.connected_outputs() {
            Ok(screens) => screens,
            Err(err) => {
                self.screens.clear();
                self.workspaces.iter_mut().for_each(Workspace::detach);
                return Err(err);
            },
        };

        let primary = *screens.first().ok_or(WinsysError::NoScreens)?;

        for screen in &screens {
            info!(
                "screen {} with region {:?}",
                screen.number(),
                screen.region()
            );
        }

        self.screens = screens;
        self.workspaces
            .iter_mut()
            .for_each(|workspace| workspace.attach(primary));

        Ok(())
    }

    fn init_keys(
        &mut self,
        key_bindings: &mut KeyBindings,
    ) -> Result<()> {
        info!("initializing key grabs");

        if key_bindings.is_empty() {
            warn!("no key bindings registered");
        }

        let mapping = self.conn.keyboard_mapping()?;
        let key_codes = key_bindings.resolve(&mapping);

        debug!(
            "resolved {} bindings to {} key codes, {} unresolved",
            key_bindings.len(),
            key_codes.len(),
            key_bindings
                .grabs()
                .iter()
                .filter(|grab| grab.codes().is_empty())
                .count()
        );

        for key_code in key_codes {
            self.conn.grab_key(key_code);
        }

        Ok(())
    }

    #[inline]
    pub fn active_workspace(&self) -> usize {
        self.active_workspace
    }

    #[inline]
    pub fn workspace(
        &self,
        index: usize,
    ) -> Option<&Workspace> {
        self.workspaces.get(index)
    }

    #[inline]
    pub fn focus(&self) -> Option<Window> {
        self.focus
    }

    #[inline]
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    fn window_workspace(
        &self,
        window: Window,
    ) -> Option<usize> {
        self.workspaces
            .iter()
            .position(|workspace| workspace.has_window(window))
    }

    fn active_client(
        &self,
        window: Window,
    ) -> &Client {
        match self.workspaces[self.active_workspace].get_client(window) {
            Some(client) => client,
            None => panic!(
                "window {:#0x} is not managed on the active workspace",
                window
            ),
        }
    }

    fn focused_client(&self) -> std::result::Result<&Client, StateChangeError> {
        let window = self.focus.ok_or(StateChangeError::NoActiveClient)?;
        Ok(self.active_client(window))
    }

    fn arrange(
        &mut self,
        index: usize,
    ) -> Result<()> {
        self.workspaces[index].arrange(&*self.conn)
    }

    /// Takes `window` under management on the active workspace. With
    /// `map`, the window is mapped once it has been subscribed to, or
    /// regardless when it could not be.
    fn manage(
        &mut self,
        window: Window,
        map: bool,
    ) -> Result<()> {
        let client = Client::new(window);
        let init = client.init(&*self.conn);

        if map {
            self.conn.map_window(window);
        }

        init?;

        let index = self.active_workspace;

        info!(
            "managing client {:?} with window {:#0x} on workspace {}",
            client.name(&*self.conn),
            window,
            self.workspaces[index].name()
        );

        self.workspaces[index].add_client(client);

        if self.focus.is_none() {
            self.focus = Some(window);
            self.active_client(window).focus(&*self.conn);
        }

        self.arrange(index)
    }

    fn unmanage(
        &mut self,
        index: usize,
        window: Window,
    ) -> Result<()> {
        let workspace = &mut self.workspaces[index];

        if workspace.remove_client(window).is_some() {
            info!(
                "unmanaging client with window {:#0x} on workspace {}, {} left",
                window,
                workspace.name(),
                workspace.len()
            );
        }

        self.arrange(index)
    }

    fn handle_key(
        &mut self,
        key_code: KeyCode,
        key_bindings: &mut KeyBindings,
    ) -> Result<()> {
        debug!("KEY_PRESS for key code {:?}", key_code);

        match key_bindings.get_mut(key_code) {
            Some(action) => action(self),
            None => Ok(()),
        }
    }

    fn handle_map_request(
        &mut self,
        window: Window,
        ignore: bool,
    ) -> Result<()> {
        debug!("MAP_REQUEST for window {:#0x}", window);

        if ignore {
            return Ok(());
        }

        match self.window_workspace(window) {
            Some(index) if index != self.active_workspace => {
                debug!(
                    "window {:#0x} is managed on hidden workspace {}",
                    window, index
                );
                Ok(())
            },
            Some(_) => {
                self.conn.map_window(window);
                debug!("window {:#0x} is already managed", window);
                Ok(())
            },
            None => self.manage(window, true),
        }
    }

    fn handle_map(
        &mut self,
        window: Window,
    ) -> Result<()> {
        debug!("MAP for window {:#0x}", window);

        if !self.workspaces[self.active_workspace].has_window(window) {
            return Ok(());
        }

        self.focus = Some(window);
        self.active_client(window).focus(&*self.conn);

        Ok(())
    }

    fn handle_enter(
        &mut self,
        window: Window,
        time: Timestamp,
    ) -> Result<()> {
        debug!("ENTER for window {:#0x}", window);

        match self.window_workspace(window) {
            None => panic!("entered window {:#0x} is not managed", window),
            Some(index) if index != self.active_workspace => return Ok(()),
            Some(_) => {},
        }

        self.focus = Some(window);
        self.active_client(window).take_focus(&*self.conn, time)
    }

    fn handle_destroy(
        &mut self,
        window: Window,
    ) -> Result<()> {
        debug!("DESTROY for window {:#0x}", window);

        if self.focus == Some(window) {
            self.focus = None;
            self.conn.unfocus();
        }

        match self.window_workspace(window) {
            Some(index) => self.unmanage(index, window),
            None => Ok(()),
        }
    }

    fn handle_unmap(
        &mut self,
        window: Window,
    ) -> Result<()> {
        debug!("UNMAP for window {:#0x}", window);

        let index = match self.window_workspace(window) {
            Some(index) => index,
            None => return Ok(()),
        };

        if self.focus == Some(window) {
            self.focus = None;
        }

        let expected = self.workspaces[index]
            .get_client(window)
            .map_or(false, Client::consume_unmap_if_expecting);

        if expected {
            return Ok(());
        }

        info!("client with window {:#0x} withdrew itself", window);
        self.unmanage(index, window)
    }

    fn handle_configure_request(
        &mut self,
        window: Window,
        region: Region,
        border_width: u32,
        changes: WindowChanges,
    ) -> Result<()> {
        debug!("CONFIGURE_REQUEST for window {:#0x}", window);

        if self.window_workspace(window).is_some() {
            self.conn.send_configure_notify(window, region, border_width);
            return Ok(());
        }

        if changes.is_empty() {
            return Ok(());
        }

        self.conn.configure_window(window, &changes)
    }

    fn handle_configure(
        &mut self,
        window: Window,
        region: Region,
        on_root: bool,
    ) -> Result<()> {
        if !on_root {
            return Ok(());
        }

        debug!(
            "CONFIGURE for root window {:#0x} with region {:?}",
            window, region
        );

        self.acquire_screens()?;
        self.arrange(self.active_workspace)
    }

    pub fn exit(&mut self) -> Result<()> {
        info!("exit called, shutting down {}", WM_NAME!());
        self.running = false;

        Ok(())
    }

    pub fn close_focus(&mut self) -> Result<()> {
        self.focused_client()?.close_gracefully(&*self.conn)
    }

    pub fn kill_focus(&mut self) -> Result<()> {
        self.focused_client()?.close_forcefully(&*self.conn);

        Ok(())
    }

    pub fn move_focus(
        &mut self,
        dir: Direction,
    ) -> Result<()> {
        let window = self.focus.ok_or(StateChangeError::NoActiveClient)?;

        self.workspaces[self.active_workspace].move_client(window, dir)?;
        self.arrange(self.active_workspace)?;
        self.active_client(window).warp_pointer(&*self.conn);

        Ok(())
    }

    pub fn add_column(&mut self) -> Result<()> {
        let supported = match self.workspaces[self.active_workspace]
            .layout_mut()
            .as_column_mut()
        {
            Some(layout) => {
                layout.add_column();
                true
            },
            None => false,
        };

        self.arrange(self.active_workspace)?;

        if supported {
            Ok(())
        } else {
            Err(StateChangeError::Unsupported.into())
        }
    }

    pub fn cleanup_columns(&mut self) -> Result<()> {
        let supported = match self.workspaces[self.active_workspace]
            .layout_mut()
            .as_column_mut()
        {
            Some(layout) => {
                layout.cleanup_columns();
                true
            },
            None => false,
        };

        self.arrange(self.active_workspace)?;

        if supported {
            Ok(())
        } else {
            Err(StateChangeError::Unsupported.into())
        }
    }

    pub fn set_layout(
        &mut self,
        kind: LayoutKind,
    ) -> Result<()> {
        let index = self.active_workspace;
        let workspace = &mut self.workspaces[index];

        if workspace.layout_kind() == kind {
            return Err(StateChangeError::StateUnchanged.into());
        }

        info!(
            "activating layout {} on workspace {}",
            kind.to_string(),
            index
        );

        workspace.set_layout(kind.new_layout());
        self.arrange(index)
    }

    pub fn activate_workspace(
        &mut self,
        index: usize,
    ) -> Result<()> {
        if index >= self.workspaces.len() {
            return Err(StateChangeError::InvalidWorkspace(index).into());
        }

        if index == self.active_workspace {
            return Err(StateChangeError::StateUnchanged.into());
        }

        info!(
            "activating workspace {} ({})",
            self.workspaces[index].number(),
            self.workspaces[index].name()
        );

        self.workspaces[self.active_workspace].hide(&*self.conn);
        self.focus = None;
        self.conn.unfocus();

        self.active_workspace = index;
        self.workspaces[index].show(&*self.conn);
        self.arrange(index)
    }
}
