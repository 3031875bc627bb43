use crate::model::Model;

use winsys::input::KeyCode;
use winsys::input::KeyInput;
use winsys::input::KeyboardMapping;
use winsys::Result;

pub type KeyAction = Box<dyn FnMut(&mut Model<'_>) -> Result<()>>;

/// A symbolic binding together with the physical key codes it resolved to.
pub struct Grab {
    input: KeyInput,
    codes: Vec<u8>,
    action: KeyAction,
}

impl Grab {
    #[inline]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }
}

#[derive(Default)]
pub struct KeyBindings {
    grabs: Vec<Grab>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.grabs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.grabs.is_empty()
    }

    /// Registers `action` for `input`, replacing an earlier binding of the
    /// same combination.
    pub fn insert(
        &mut self,
        input: KeyInput,
        action: KeyAction,
    ) {
        match self.grabs.iter_mut().find(|grab| grab.input == input) {
            Some(grab) => grab.action = action,
            None => self.grabs.push(Grab {
                input,
                codes: Vec::new(),
                action,
            }),
        }
    }

    #[inline]
    pub fn grabs(&self) -> &[Grab] {
        &self.grabs
    }

    /// Resolves every binding against `mapping`, returning the physical
    /// combinations to grab. Keysyms absent from the mapping leave their
    /// binding without codes.
    pub fn resolve(
        &mut self,
        mapping: &KeyboardMapping,
    ) -> Vec<KeyCode> {
        let mut key_codes = Vec::with_capacity(self.grabs.len());

        for grab in self.grabs.iter_mut() {
            grab.codes = mapping.keycodes_for(grab.input.keysym);

            if grab.codes.is_empty() {
                debug!("keysym {:#0x} has no key code", grab.input.keysym);
            }

            key_codes.extend(grab.codes.iter().map(|&code| KeyCode {
                mask: grab.input.mask,
                code,
            }));
        }

        key_codes
    }

    pub fn get_mut(
        &mut self,
        key_code: KeyCode,
    ) -> Option<&mut KeyAction> {
        self.grabs
            .iter_mut()
            .find(|grab| grab.input.mask == key_code.mask && grab.codes.contains(&key_code.code))
            .map(|grab| &mut grab.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use winsys::input::Modifier;

    fn noop() -> KeyAction {
        Box::new(|_: &mut Model<'_>| -> Result<()> { Ok(()) })
    }

    fn input(
        keysym: u32,
        mask: u16,
    ) -> KeyInput {
        KeyInput {
            keysym,
            mask,
        }
    }

    #[test]
    fn resolve_maps_keysyms_to_codes() {
        // keycode 10: q, 11: w, 12: q
        let mapping = KeyboardMapping::new(10, 1, vec![0x71, 0x77, 0x71]);
        let alt = Modifier::Alt.mask();

        let mut bindings = KeyBindings::new();
        bindings.insert(input(0x71, alt), noop());
        bindings.insert(input(0x7a, alt), noop());

        let key_codes = bindings.resolve(&mapping);

        assert_eq!(key_codes, vec![
            KeyCode {
                mask: alt,
                code: 10
            },
            KeyCode {
                mask: alt,
                code: 12
            },
        ]);
        assert!(bindings.grabs()[1].codes().is_empty());
    }

    #[test]
    fn lookup_requires_matching_mask() {
        let mapping = KeyboardMapping::new(10, 1, vec![0x71]);
        let alt = Modifier::Alt.mask();

        let mut bindings = KeyBindings::new();
        bindings.insert(input(0x71, alt), noop());
        bindings.resolve(&mapping);

        assert!(bindings
            .get_mut(KeyCode {
                mask: alt,
                code: 10
            })
            .is_some());
        assert!(bindings
            .get_mut(KeyCode {
                mask: alt | Modifier::Shift.mask(),
                code: 10
            })
            .is_none());
        assert!(bindings
            .get_mut(KeyCode {
                mask: alt,
                code: 11
            })
            .is_none());
    }

    #[test]
    fn rebinding_replaces_action() {
        let mut bindings = KeyBindings::new();
        bindings.insert(input(0x71, 0), noop());
        bindings.insert(input(0x71, 0), noop());
        bindings.insert(input(0x71, Modifier::Ctrl.mask()), noop());

        assert_eq!(bindings.len(), 2);
    }
}
