#![deny(clippy::all)]
#![allow(dead_code)]

#[macro_use]
extern crate log;

use simplelog::LevelFilter;
use simplelog::SimpleLogger;

use winsys::error::WinsysError;
use winsys::xdata::xconnection::XConnection;
pub use winsys::Result;

#[macro_use]
mod macros;

#[macro_use]
mod defaults;

#[cfg(test)]
mod fake;

mod binding;
mod client;
mod direction;
mod error;
mod layout;
mod model;
mod util;
mod workspace;

use binding::KeyBindings;
use direction::Direction;
use layout::LayoutKind;
use model::Model;

pub fn main() -> Result<()> {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    SimpleLogger::init(level, simplelog::Config::default())?;

    let (conn, screen_num) = x11rb::connect(None)?;
    let mut xconn = match XConnection::new(&conn, screen_num) {
        Ok(xconn) => xconn,
        Err(err) => {
            if let Some(WinsysError::AnotherWmRunning) = err.downcast_ref::<WinsysError>() {
                error!("another window manager is running, {} cannot start", WM_NAME!());
            }

            return Err(err);
        },
    };

    let mut key_bindings = init_bindings();

    Model::new(&mut xconn, &mut key_bindings)?.run(key_bindings)
}

fn init_bindings() -> KeyBindings {
    // "[modifiers]-keysym" => action
    build_key_bindings!(
        "1-C-S-q" => do_internal!(exit),

        // client closers
        "1-q" => do_internal!(close_focus),
        "1-S-q" => do_internal!(kill_focus),

        // client order modifiers
        "1-h" => do_internal!(move_focus, Direction::LEFT),
        "1-l" => do_internal!(move_focus, Direction::RIGHT),
        "1-j" => do_internal!(move_focus, Direction::DOWN),
        "1-k" => do_internal!(move_focus, Direction::UP),

        // column modifiers
        "1-n" => do_internal!(add_column),
        "1-d" => do_internal!(cleanup_columns),

        // layout setters
        "1-m" => do_internal!(set_layout, LayoutKind::Monocle),
        "1-t" => do_internal!(set_layout, LayoutKind::Column),

        // workspace activators
        "1-1" => do_internal!(activate_workspace, 0),
        "1-2" => do_internal!(activate_workspace, 1),
        "1-3" => do_internal!(activate_workspace, 2),
        "1-4" => do_internal!(activate_workspace, 3),
        "1-5" => do_internal!(activate_workspace, 4),
        "1-6" => do_internal!(activate_workspace, 5),
        "1-7" => do_internal!(activate_workspace, 6),
        "1-8" => do_internal!(activate_workspace, 7),

        // external spawn commands
        "1-Return" => spawn_external!(Model::TERMINAL),
    )
}
