use volatile::Volatile;
use crate::constants::vga::{BUFFER_HEIGHT, BUFFER_WIDTH};
use crate::hardware::Hardware;

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorCode(u8);

impl ColorCode {
    pub const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode((background as u8) << 4 | (foreground as u8))
    }

    #[cfg(test)]
    pub(crate) const fn as_u8(self) -> u8 {
        self.0
    }
}

/// Light text on black, the only attribute the console ever writes.
pub const CONSOLE_COLOR: ColorCode = ColorCode::new(Color::LightGray, Color::Black);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ScreenChar {
    pub ascii_character: u8,
    pub color_code: ColorCode,
}

impl ScreenChar {
    pub const fn blank(color_code: ColorCode) -> ScreenChar {
        ScreenChar {
            ascii_character: b' ',
            color_code,
        }
    }
}

/// Memory layout of the text-mode buffer, row-major.
#[repr(transparent)]
pub struct Buffer {
    pub chars: [Volatile<ScreenChar>; BUFFER_WIDTH * BUFFER_HEIGHT],
}

#[inline]
fn cell_index(row: usize, col: usize) -> usize {
    debug_assert!(row < BUFFER_HEIGHT && col < BUFFER_WIDTH, "cell ({}, {}) out of range", row, col);
    row * BUFFER_WIDTH + col
}

/// The 80x25 character grid. Trusts its caller for bounds; the console never
/// hands it coordinates outside the grid.
pub struct Framebuffer<H: Hardware> {
    hardware: H,
    color_code: ColorCode,
}

impl<H: Hardware> Framebuffer<H> {
    pub fn new(hardware: H) -> Self {
        Framebuffer {
            hardware,
            color_code: CONSOLE_COLOR,
        }
    }

    pub fn write_char(&mut self, row: usize, col: usize, byte: u8) {
        self.hardware.write_cell(
            cell_index(row, col),
            ScreenChar {
                ascii_character: byte,
                color_code: self.color_code,
            },
        );
    }

    pub fn read_char(&self, row: usize, col: usize) -> u8 {
        self.hardware.read_cell(cell_index(row, col)).ascii_character
    }

    pub fn clear_row(&mut self, row: usize) {
        let blank = ScreenChar::blank(self.color_code);
        for col in 0..BUFFER_WIDTH {
            self.hardware.write_cell(cell_index(row, col), blank);
        }
    }

    pub fn clear(&mut self) {
        for row in 0..BUFFER_HEIGHT {
            self.clear_row(row);
        }
    }

    /// Move every row up by one, dropping row 0 and blanking the last row.
    pub fn shift_rows_up(&mut self) {
        for row in 1..BUFFER_HEIGHT {
            for col in 0..BUFFER_WIDTH {
                let character = self.hardware.read_cell(cell_index(row, col));
                self.hardware.write_cell(cell_index(row - 1, col), character);
            }
        }
        self.clear_row(BUFFER_HEIGHT - 1);
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::fake::FakeHardware;

    fn row_text(fb: &Framebuffer<FakeHardware>, row: usize) -> Vec<u8> {
        (0..BUFFER_WIDTH).map(|col| fb.read_char(row, col)).collect()
    }

    #[test]
    fn console_color_is_light_gray_on_black() {
        assert_eq!(CONSOLE_COLOR.as_u8(), 0x07);
    }

    #[test]
    fn write_char_uses_linear_row_major_index() {
        let mut fb = Framebuffer::new(FakeHardware::new());
        fb.write_char(2, 5, b'q');
        let cell = fb.hardware().cells[2 * BUFFER_WIDTH + 5];
        assert_eq!(cell.ascii_character, b'q');
        assert_eq!(cell.color_code, CONSOLE_COLOR);
    }

    #[test]
    fn clear_blanks_every_cell() {
        let mut fb = Framebuffer::new(FakeHardware::new());
        fb.write_char(0, 0, b'a');
        fb.write_char(BUFFER_HEIGHT - 1, BUFFER_WIDTH - 1, b'z');
        fb.clear();
        assert!(fb
            .hardware()
            .cells
            .iter()
            .all(|c| *c == ScreenChar::blank(CONSOLE_COLOR)));
    }

    #[test]
    fn shift_rows_up_discards_first_row_and_blanks_last() {
        let mut fb = Framebuffer::new(FakeHardware::new());
        fb.clear();
        for row in 0..BUFFER_HEIGHT {
            fb.write_char(row, 0, b'A' + row as u8);
        }
        fb.shift_rows_up();
        for row in 0..BUFFER_HEIGHT - 1 {
            assert_eq!(fb.read_char(row, 0), b'A' + row as u8 + 1);
        }
        assert_eq!(row_text(&fb, BUFFER_HEIGHT - 1), vec![b' '; BUFFER_WIDTH]);
    }
}
