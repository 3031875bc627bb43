use crate::client::Client;
use crate::direction::Direction;
use crate::error::StateChangeError;
use crate::layout::Layout;
use crate::layout::LayoutKind;

use winsys::connection::Connection;
use winsys::screen::Screen;
use winsys::window::Window;
use winsys::Result;

pub struct Workspace {
    number: usize,
    name: String,
    screen: Option<Screen>,
    layout: Box<dyn Layout>,
}

impl Workspace {
    pub fn new(
        name: impl Into<String>,
        number: usize,
        layout: Box<dyn Layout>,
    ) -> Self {
        Self {
            number,
            name: name.into(),
            screen: None,
            layout,
        }
    }

    #[inline]
    pub fn number(&self) -> usize {
        self.number
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn screen(&self) -> Option<Screen> {
        self.screen
    }

    #[inline]
    pub fn attach(
        &mut self,
        screen: Screen,
    ) {
        self.screen = Some(screen);
    }

    #[inline]
    pub fn detach(&mut self) {
        self.screen = None;
    }

    #[inline]
    pub fn layout_kind(&self) -> LayoutKind {
        self.layout.kind()
    }

    #[inline]
    pub fn layout_mut(&mut self) -> &mut dyn Layout {
        self.layout.as_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn clients(&self) -> Vec<&Client> {
        self.layout.clients()
    }

    #[inline]
    pub fn get_client(
        &self,
        window: Window,
    ) -> Option<&Client> {
        self.layout.get_client(window)
    }

    #[inline]
    pub fn has_window(
        &self,
        window: Window,
    ) -> bool {
        self.layout.has_window(window)
    }

    #[inline]
    pub fn add_client(
        &mut self,
        client: Client,
    ) {
        self.layout.add_client(client);
    }

    #[inline]
    pub fn remove_client(
        &mut self,
        window: Window,
    ) -> Option<Client> {
        self.layout.remove_client(window)
    }

    pub fn move_client(
        &mut self,
        window: Window,
        dir: Direction,
    ) -> std::result::Result<(), StateChangeError> {
        if self.layout.move_client(window, dir) {
            Ok(())
        } else {
            Err(StateChangeError::StateUnchanged)
        }
    }

    /// Computes geometry for every member and pushes it to the server. A
    /// rejected configure is logged and does not hold up the others.
    pub fn arrange(
        &mut self,
        conn: &dyn Connection,
    ) -> Result<()> {
        let screen = self.screen.ok_or(StateChangeError::NotAttached)?;
        self.layout.arrange(screen.region());

        for client in self.layout.clients() {
            if let Err(err) = client.configure(conn) {
                warn!(
                    "unable to configure client with window {:#0x}: {}",
                    client.window(),
                    err
                );
            }
        }

        Ok(())
    }

    /// Moves every member into `layout`, keeping their relative order, and
    /// hands back the emptied previous layout.
    pub fn set_layout(
        &mut self,
        mut layout: Box<dyn Layout>,
    ) -> Box<dyn Layout> {
        self.layout
            .take_clients()
            .into_iter()
            .for_each(|client| layout.add_client(client));

        std::mem::replace(&mut self.layout, layout)
    }

    pub fn show(
        &self,
        conn: &dyn Connection,
    ) {
        self.layout
            .clients()
            .into_iter()
            .for_each(|client| client.show(conn));
    }

    pub fn hide(
        &self,
        conn: &dyn Connection,
    ) {
        self.layout
            .clients()
            .into_iter()
            .for_each(|client| client.hide(conn));
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("number", &self.number)
            .field("name", &self.name)
            .field("screen", &self.screen)
            .field("layout", &self.layout.kind())
            .field("clients", &self.layout.clients())
            .finish()
    }
}
