use core::str;
use log::trace;
use pc_keyboard::DecodedKey;
use crate::console::Console;
use crate::constants::vga::{BUFFER_HEIGHT, BUFFER_WIDTH};
use crate::hardware::Hardware;
use crate::keyboard::{poll_scancode, ScancodeDecoder};

/// Polled line editor: keyboard in, echo to the console.
#[derive(Debug, Default)]
pub struct InputReader {
    decoder: ScancodeDecoder,
}

impl InputReader {
    pub const fn new() -> Self {
        InputReader {
            decoder: ScancodeDecoder::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn decoder(&self) -> &ScancodeDecoder {
        &self.decoder
    }

    /// Spin on the keyboard controller until a scancode decodes to a key.
    pub fn read_key<H: Hardware>(&mut self, console: &mut Console<H>) -> DecodedKey {
        loop {
            if let Some(scancode) = poll_scancode(console.hardware_mut()) {
                if let Some(key) = self.decoder.feed(scancode) {
                    return key;
                }
            }
        }
    }

    /// Read one line into `buffer`, echoing it from column 0 of the current
    /// console row.
    ///
    /// At most `buffer.len() - 1` characters are kept and a `0` sentinel is
    /// written after them. Extra characters, and characters that would run
    /// past the end of the row, are dropped. Backspace only erases within
    /// the editing row.
    pub fn read_line<'a, H: Hardware>(
        &mut self,
        console: &mut Console<H>,
        buffer: &'a mut [u8],
    ) -> &'a str {
        if console.cursor().line >= BUFFER_HEIGHT {
            console.scroll();
        }
        let row = console.cursor().line;
        let mut col = 0usize;
        let limit = buffer.len().saturating_sub(1);
        let mut len = 0usize;

        console.set_cursor(row, col);

        loop {
            match self.read_key(console) {
                DecodedKey::Unicode('\n') => break,
                DecodedKey::Unicode('\u{8}') => {
                    if len > 0 && col > 0 {
                        len -= 1;
                        col -= 1;
                        console.framebuffer_mut().write_char(row, col, b' ');
                        console.set_cursor(row, col);
                    }
                }
                DecodedKey::Unicode(c) => {
                    if len < limit && col < BUFFER_WIDTH && c.is_ascii() {
                        buffer[len] = c as u8;
                        len += 1;
                        console.framebuffer_mut().write_char(row, col, c as u8);
                        col += 1;
                        console.set_cursor(row, col);
                    } else {
                        trace!("dropping {:?}, line full", c);
                    }
                }
                DecodedKey::RawKey(_) => {}
            }
        }

        if let Some(end) = buffer.get_mut(len) {
            *end = 0;
        }
        console.new_line();
        console.sync_hardware_cursor();

        str::from_utf8(&buffer[..len]).unwrap_or("")
    }
}
