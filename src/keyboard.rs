use log::trace;
use pc_keyboard::{DecodedKey, KeyCode};
use crate::constants::keyboard::{
    ARROW_DOWN, ARROW_LEFT, ARROW_RIGHT, ARROW_UP, CAPS_LOCK, DATA_PORT, DELETE, ESCAPE, F1, F2,
    LEFT_SHIFT, RELEASE_BIT, RIGHT_SHIFT, STATUS_COMMAND_PORT, STATUS_OUTPUT_BUFFER_FULL,
};
use crate::hardware::Hardware;

const fn scancode_table(prefix: &[u8]) -> [u8; 128] {
    let mut table = [0u8; 128];
    let mut i = 0;
    while i < prefix.len() {
        table[i] = prefix[i];
        i += 1;
    }
    table
}

/// US layout, Set 1 press codes. Zero means unmapped.
pub(crate) static SCANCODE_TO_ASCII: [u8; 128] = scancode_table(
    b"\0\x1b1234567890-=\x08\tqwertyuiop[]\n\0asdfghjkl;'`\0\\zxcvbnm,./\0*\0 ",
);

pub(crate) static SHIFTED_SCANCODE_TO_ASCII: [u8; 128] = scancode_table(
    b"\0\x1b!@#$%^&*()_+\x08\tQWERTYUIOP{}\n\0ASDFGHJKL:\"~\0|ZXCVBNM<>?\0*\0 ",
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModifierState {
    pub shift_active: bool,
    pub caps_lock_active: bool,
}

fn is_alphabetic(scancode: u8) -> bool {
    SCANCODE_TO_ASCII
        .get(usize::from(scancode))
        .map_or(false, |b| b.is_ascii_lowercase())
}

/// Keys that decode the same way whatever the modifiers are.
fn special_key(scancode: u8) -> Option<DecodedKey> {
    let key = match scancode {
        ESCAPE => DecodedKey::Unicode('\u{1b}'),
        DELETE => DecodedKey::Unicode('\u{7f}'),
        ARROW_LEFT => DecodedKey::RawKey(KeyCode::ArrowLeft),
        ARROW_RIGHT => DecodedKey::RawKey(KeyCode::ArrowRight),
        ARROW_UP => DecodedKey::RawKey(KeyCode::ArrowUp),
        ARROW_DOWN => DecodedKey::RawKey(KeyCode::ArrowDown),
        F1 => DecodedKey::RawKey(KeyCode::F1),
        F2 => DecodedKey::RawKey(KeyCode::F2),
        _ => return None,
    };
    Some(key)
}

/// Translate one scancode under the given modifiers. Modifier keys, key
/// releases and unmapped codes produce no event.
pub fn decode(scancode: u8, modifiers: ModifierState) -> Option<DecodedKey> {
    if scancode & RELEASE_BIT != 0 {
        return None;
    }
    if matches!(scancode, LEFT_SHIFT | RIGHT_SHIFT | CAPS_LOCK) {
        return None;
    }
    if let Some(key) = special_key(scancode) {
        return Some(key);
    }

    // caps lock only inverts letters, so shift + caps lock gives lowercase
    let use_shifted = if is_alphabetic(scancode) {
        modifiers.shift_active != modifiers.caps_lock_active
    } else {
        modifiers.shift_active
    };

    let table = if use_shifted {
        &SHIFTED_SCANCODE_TO_ASCII
    } else {
        &SCANCODE_TO_ASCII
    };
    match table[usize::from(scancode)] {
        0 => None,
        byte => Some(DecodedKey::Unicode(char::from(byte))),
    }
}

/// Tracks shift and caps lock across scancodes.
#[derive(Debug, Default)]
pub struct ScancodeDecoder {
    modifiers: ModifierState,
}

impl ScancodeDecoder {
    pub const fn new() -> Self {
        ScancodeDecoder {
            modifiers: ModifierState {
                shift_active: false,
                caps_lock_active: false,
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn modifiers(&self) -> ModifierState {
        self.modifiers
    }

    pub fn feed(&mut self, scancode: u8) -> Option<DecodedKey> {
        match scancode {
            LEFT_SHIFT | RIGHT_SHIFT => {
                self.modifiers.shift_active = true;
                trace!("shift pressed");
                None
            }
            code if code == LEFT_SHIFT | RELEASE_BIT || code == RIGHT_SHIFT | RELEASE_BIT => {
                self.modifiers.shift_active = false;
                trace!("shift released");
                None
            }
            CAPS_LOCK => {
                self.modifiers.caps_lock_active = !self.modifiers.caps_lock_active;
                trace!("caps lock {}", self.modifiers.caps_lock_active);
                None
            }
            code => decode(code, self.modifiers),
        }
    }
}

/// Check the controller once; returns the pending scancode, if any.
pub fn poll_scancode<H: Hardware>(hardware: &mut H) -> Option<u8> {
    let status = hardware.read_port(STATUS_COMMAND_PORT);
    if status & STATUS_OUTPUT_BUFFER_FULL != 0 {
        Some(hardware.read_port(DATA_PORT))
    } else {
        None
    }
}
