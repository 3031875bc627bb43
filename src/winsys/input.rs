pub use crate::Result;

use std::convert::TryFrom;

use anyhow::anyhow;
use strum::EnumIter;
use strum::IntoEnumIterator;

use x11rb::protocol::xproto::ModMask;

pub type Keysym = u32;

#[repr(u8)]
#[derive(Debug, PartialEq, EnumIter, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl = 1 << 0,
    Shift = 1 << 1,
    Alt = 1 << 2,
    Super = 1 << 3,
    CapsLock = 1 << 4,
    NumLock = 1 << 5,
    ScrollLock = 1 << 6,
}

impl Modifier {
    pub fn mask(self) -> u16 {
        u16::from(match self {
            Modifier::Ctrl => ModMask::CONTROL,
            Modifier::Shift => ModMask::SHIFT,
            Modifier::Alt => ModMask::M1,
            Modifier::Super => ModMask::M4,
            Modifier::CapsLock => ModMask::LOCK,
            Modifier::NumLock => ModMask::M2,
            Modifier::ScrollLock => ModMask::M5,
        })
    }

    pub fn is_lock(self) -> bool {
        matches!(
            self,
            Modifier::CapsLock | Modifier::NumLock | Modifier::ScrollLock
        )
    }

    /// Every combination of lock modifiers, including none at all.
    pub fn lock_combinations() -> Vec<u16> {
        let locks: Vec<u16> = Self::iter()
            .filter(|m| m.is_lock())
            .map(Self::mask)
            .collect();

        (0..(1u16 << locks.len()))
            .map(|bits| {
                locks
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| bits & (1 << i) != 0)
                    .fold(0u16, |acc, (_, &mask)| acc | mask)
            })
            .collect()
    }

    /// Strips lock and pointer-button bits from a protocol modifier state.
    pub fn clean_mask(state: u16) -> u16 {
        Self::iter()
            .filter(|m| !m.is_lock())
            .map(Self::mask)
            .fold(0u16, |acc, mask| acc | (state & mask))
    }
}

impl TryFrom<&str> for Modifier {
    type Error = anyhow::Error;

    fn try_from(val: &str) -> Result<Self> {
        match val {
            "1" | "A" | "Alt" | "Mod" => Ok(Self::Alt),
            "2" | "M" | "Super" | "Sec" => Ok(Self::Super),
            "C" | "Ctrl" | "Control" => Ok(Self::Ctrl),
            "S" | "Shift" => Ok(Self::Shift),
            "Caps" => Ok(Self::CapsLock),
            "Num" => Ok(Self::NumLock),
            "Scroll" => Ok(Self::ScrollLock),
            _ => Err(anyhow!("unable to resolve \"{}\" to modifier", val)),
        }
    }
}

/// A physical key combination as the server reports it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct KeyCode {
    pub mask: u16,
    pub code: u8,
}

/// A symbolic key combination, resolved to physical key codes at startup.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct KeyInput {
    pub keysym: Keysym,
    pub mask: u16,
}

pub fn keysym_from_name(name: &str) -> Option<Keysym> {
    let mut chars = name.chars();

    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Some(c.to_ascii_lowercase() as Keysym);
        }
    }

    Some(match name {
        "space" => 0x0020,
        "comma" => 0x002c,
        "minus" => 0x002d,
        "period" => 0x002e,
        "slash" => 0x002f,
        "semicolon" => 0x003b,
        "equal" => 0x003d,
        "bracketleft" => 0x005b,
        "bracketright" => 0x005d,
        "BackSpace" => 0xff08,
        "Tab" => 0xff09,
        "Return" => 0xff0d,
        "Escape" => 0xff1b,
        "Delete" => 0xffff,
        "Home" => 0xff50,
        "Left" => 0xff51,
        "Up" => 0xff52,
        "Right" => 0xff53,
        "Down" => 0xff54,
        "End" => 0xff57,
        "Print" => 0xff61,
        "F1" => 0xffbe,
        "F2" => 0xffbf,
        "F3" => 0xffc0,
        "F4" => 0xffc1,
        "F5" => 0xffc2,
        "F6" => 0xffc3,
        "F7" => 0xffc4,
        "F8" => 0xffc5,
        "F9" => 0xffc6,
        "F10" => 0xffc7,
        "F11" => 0xffc8,
        "F12" => 0xffc9,
        _ => return None,
    })
}

/// The server's keycode to keysym table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardMapping {
    min_keycode: u8,
    keysyms_per_keycode: u8,
    keysyms: Vec<Keysym>,
}

impl KeyboardMapping {
    pub fn new(
        min_keycode: u8,
        keysyms_per_keycode: u8,
        keysyms: Vec<Keysym>,
    ) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    pub fn keysyms(
        &self,
        keycode: u8,
    ) -> &[Keysym] {
        let per = self.keysyms_per_keycode as usize;

        if keycode < self.min_keycode || per == 0 {
            return &[];
        }

        let start = (keycode - self.min_keycode) as usize * per;
        self.keysyms
            .get(start..start + per)
            .unwrap_or(&[])
    }

    /// All key codes that produce `keysym` in any of their columns.
    pub fn keycodes_for(
        &self,
        keysym: Keysym,
    ) -> Vec<u8> {
        let per = self.keysyms_per_keycode as usize;

        if per == 0 {
            return Vec::with_capacity(0);
        }

        (0..self.keysyms.len() / per)
            .filter_map(|i| u8::try_from(i + self.min_keycode as usize).ok())
            .filter(|&keycode| self.keysyms(keycode).contains(&keysym))
            .collect()
    }
}
