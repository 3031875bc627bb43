use winsys::input::keysym_from_name;
use winsys::input::KeyInput;
use winsys::input::Modifier;

use std::convert::TryFrom;
use std::process::Command;
use std::process::Stdio;

pub struct Util;

impl Util {
    /// Launches `cmd` detached from the window manager. The child is reaped
    /// on a separate thread so it never lingers as a zombie.
    pub fn spawn<S: Into<String>>(cmd: S) {
        let cmd = cmd.into();
        let mut args = cmd.split_whitespace();

        let program = match args.next() {
            Some(program) => program,
            None => return,
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match child {
            Ok(mut child) => {
                debug!("spawned {} with pid {}", cmd, child.id());
                std::thread::spawn(move || drop(child.wait()));
            },
            Err(err) => warn!("unable to spawn {}: {}", cmd, err),
        }
    }

    /// Parses `"[modifiers]-keysym"`, e.g. `"1-S-q"`.
    pub fn parse_key_binding(key_binding: impl Into<String>) -> Option<KeyInput> {
        let s = key_binding.into();
        let mut constituents: Vec<&str> = s.split('-').collect();

        let keysym = keysym_from_name(constituents.pop()?)?;
        let mut mask = 0;

        for constituent in constituents {
            mask |= Modifier::try_from(constituent).ok()?.mask();
        }

        Some(KeyInput {
            keysym,
            mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifiers_and_keysym() {
        assert_eq!(
            Util::parse_key_binding("1-S-q"),
            Some(KeyInput {
                keysym: 0x71,
                mask: Modifier::Alt.mask() | Modifier::Shift.mask(),
            })
        );

        assert_eq!(
            Util::parse_key_binding("1-C-S-Return"),
            Some(KeyInput {
                keysym: 0xff0d,
                mask: Modifier::Alt.mask() | Modifier::Ctrl.mask() | Modifier::Shift.mask(),
            })
        );

        assert_eq!(
            Util::parse_key_binding("2-8"),
            Some(KeyInput {
                keysym: 0x38,
                mask: Modifier::Super.mask(),
            })
        );
    }

    #[test]
    fn bare_keysym_has_empty_mask() {
        assert_eq!(
            Util::parse_key_binding("F1"),
            Some(KeyInput {
                keysym: 0xffbe,
                mask: 0,
            })
        );
    }

    #[test]
    fn rejects_unknown_parts() {
        assert_eq!(Util::parse_key_binding("1-NoSuchKey"), None);
        assert_eq!(Util::parse_key_binding("X-q"), None);
        assert_eq!(Util::parse_key_binding(""), None);
    }

    #[test]
    fn spawning_nothing_is_harmless() {
        Util::spawn("");
        Util::spawn("   ");
    }
}
