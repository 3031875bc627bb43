use crate::client::Client;
use crate::direction::Direction;

use winsys::geometry::Region;
use winsys::window::StackMode;
use winsys::window::Window;

use strum_macros::EnumIter;
use strum_macros::ToString;

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, EnumIter, ToString)]
pub enum LayoutKind {
    Column,
    Monocle,
}

impl LayoutKind {
    pub fn new_layout(self) -> Box<dyn Layout> {
        match self {
            LayoutKind::Column => Box::new(ColumnLayout::new()),
            LayoutKind::Monocle => Box::new(MonocleLayout::new()),
        }
    }
}

/// An arrangement strategy that owns the membership of its clients.
///
/// `arrange` only computes geometry; pushing it to the server is left to
/// the caller.
pub trait Layout {
    fn kind(&self) -> LayoutKind;

    fn arrange(
        &mut self,
        region: Region,
    );

    /// Members in layout order.
    fn clients(&self) -> Vec<&Client>;

    fn add_client(
        &mut self,
        client: Client,
    );

    fn remove_client(
        &mut self,
        window: Window,
    ) -> Option<Client>;

    /// Returns whether membership order changed.
    fn move_client(
        &mut self,
        window: Window,
        dir: Direction,
    ) -> bool;

    /// Empties the layout, yielding its members in layout order.
    fn take_clients(&mut self) -> Vec<Client>;

    fn as_column_mut(&mut self) -> Option<&mut ColumnLayout> {
        None
    }

    fn len(&self) -> usize {
        self.clients().len()
    }

    fn get_client(
        &self,
        window: Window,
    ) -> Option<&Client> {
        self.clients()
            .into_iter()
            .find(|client| client.window() == window)
    }

    fn has_window(
        &self,
        window: Window,
    ) -> bool {
        self.get_client(window).is_some()
    }
}

/// Side-by-side columns, each split evenly between its members.
#[derive(Debug, Default)]
pub struct ColumnLayout {
    columns: Vec<Vec<Client>>,
}

impl ColumnLayout {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn columns(&self) -> &[Vec<Client>] {
        &self.columns
    }

    #[inline]
    pub fn add_column(&mut self) {
        self.columns.push(Vec::new());
    }

    pub fn cleanup_columns(&mut self) {
        self.columns.retain(|column| !column.is_empty());
    }

    fn position(
        &self,
        window: Window,
    ) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(i, column)| {
                column
                    .iter()
                    .position(|client| client.window() == window)
                    .map(|j| (i, j))
            })
    }
}

impl Layout for ColumnLayout {
    #[inline]
    fn kind(&self) -> LayoutKind {
        LayoutKind::Column
    }

    fn arrange(
        &mut self,
        region: Region,
    ) {
        if self.columns.is_empty() {
            self.add_column();
        }

        let (pos, dim) = region.values();
        let column_width = dim.w / self.columns.len() as u32;

        for (i, column) in self.columns.iter_mut().enumerate() {
            if column.is_empty() {
                continue;
            }

            let row_height = dim.h / column.len() as u32;

            for (j, client) in column.iter_mut().enumerate() {
                client.set_region(Region::new(
                    pos.x + (i as u32 * column_width) as i32,
                    pos.y + (j as u32 * row_height) as i32,
                    column_width,
                    row_height,
                ));

                client.set_border_width(Client::DEFAULT_BORDER_WIDTH);
                client.set_stack_mode(StackMode::Above);
            }
        }
    }

    fn clients(&self) -> Vec<&Client> {
        self.columns.iter().flatten().collect()
    }

    fn add_client(
        &mut self,
        client: Client,
    ) {
        if let Some(column) = self.columns.iter_mut().find(|column| column.is_empty()) {
            column.push(client);
        } else if let Some(column) = self.columns.last_mut() {
            column.push(client);
        } else {
            self.columns.push(vec![client]);
        }
    }

    fn remove_client(
        &mut self,
        window: Window,
    ) -> Option<Client> {
        let (i, j) = self.position(window)?;
        Some(self.columns[i].remove(j))
    }

    fn move_client(
        &mut self,
        window: Window,
        dir: Direction,
    ) -> bool {
        let (i, j) = match self.position(window) {
            Some(position) => position,
            None => return false,
        };

        match dir {
            Direction::UP if j > 0 => {
                self.columns[i].swap(j, j - 1);
            },
            Direction::DOWN if j + 1 < self.columns[i].len() => {
                self.columns[i].swap(j, j + 1);
            },
            Direction::LEFT if i > 0 => {
                let client = self.columns[i].remove(j);
                self.columns[i - 1].push(client);
            },
            Direction::RIGHT if i + 1 < self.columns.len() => {
                let client = self.columns[i].remove(j);
                self.columns[i + 1].push(client);
            },
            _ => return false,
        }

        true
    }

    fn take_clients(&mut self) -> Vec<Client> {
        self.columns.drain(..).flatten().collect()
    }

    #[inline]
    fn as_column_mut(&mut self) -> Option<&mut ColumnLayout> {
        Some(self)
    }
}

/// Every member covers the whole region; the last one arranged ends up on
/// top.
#[derive(Debug, Default)]
pub struct MonocleLayout {
    clients: Vec<Client>,
}

impl MonocleLayout {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Layout for MonocleLayout {
    #[inline]
    fn kind(&self) -> LayoutKind {
        LayoutKind::Monocle
    }

    fn arrange(
        &mut self,
        region: Region,
    ) {
        for client in self.clients.iter_mut() {
            client.set_region(region);
            client.set_border_width(0);
            client.set_stack_mode(StackMode::Above);
        }
    }

    fn clients(&self) -> Vec<&Client> {
        self.clients.iter().collect()
    }

    #[inline]
    fn add_client(
        &mut self,
        client: Client,
    ) {
        self.clients.push(client);
    }

    fn remove_client(
        &mut self,
        window: Window,
    ) -> Option<Client> {
        let index = self
            .clients
            .iter()
            .position(|client| client.window() == window)?;

        Some(self.clients.remove(index))
    }

    #[inline]
    fn move_client(
        &mut self,
        _: Window,
        _: Direction,
    ) -> bool {
        false
    }

    fn take_clients(&mut self) -> Vec<Client> {
        self.clients.drain(..).collect()
    }
}
