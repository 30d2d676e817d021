use core::fmt;
use log::trace;
use crate::constants::vga::{
    BUFFER_HEIGHT, BUFFER_WIDTH, COMMAND_PORT, CURSOR_LOCATION_HIGH, CURSOR_LOCATION_LOW,
    DATA_PORT, UNPRINTABLE_GLYPH,
};
use crate::hardware::Hardware;
use crate::vga_buffer::Framebuffer;

/// Where the next character lands. `line` stays below `BUFFER_HEIGHT`
/// after every public console operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorState {
    pub line: usize,
    pub column: usize,
}

/// Line-oriented text output over the framebuffer, with wrapping, scrolling
/// and a hardware cursor that mirrors [`CursorState`].
pub struct Console<H: Hardware> {
    framebuffer: Framebuffer<H>,
    cursor: CursorState,
}

impl<H: Hardware> Console<H> {
    pub fn new(hardware: H) -> Self {
        Console {
            framebuffer: Framebuffer::new(hardware),
            cursor: CursorState::default(),
        }
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    pub fn framebuffer(&self) -> &Framebuffer<H> {
        &self.framebuffer
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<H> {
        &mut self.framebuffer
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        self.framebuffer.hardware_mut()
    }

    pub fn clear(&mut self) {
        self.framebuffer.clear();
        self.cursor = CursorState::default();
        self.sync_hardware_cursor();
    }

    /// Writes `text` from column 0 of the current line and leaves the
    /// hardware cursor after it. Always returns 1.
    pub fn print(&mut self, text: &str) -> u32 {
        self.cursor.column = 0;
        self.write_text(text);
        1
    }

    fn write_text(&mut self, text: &str) {
        for byte in text.bytes() {
            match byte {
                b'\n' => self.new_line(),
                0x20..=0x7e => self.put_byte(byte),
                _ => self.put_byte(UNPRINTABLE_GLYPH),
            }
        }
        self.sync_hardware_cursor();
    }

    fn put_byte(&mut self, byte: u8) {
        let CursorState { line, column } = self.cursor;
        self.framebuffer.write_char(line, column, byte);
        self.cursor.column += 1;
        if self.cursor.column >= BUFFER_WIDTH {
            self.new_line();
        }
    }

    /// Moves to column 0 of the next line, scrolling if that line would
    /// fall off the bottom of the grid. Does not touch the hardware cursor.
    pub fn new_line(&mut self) {
        self.cursor.line += 1;
        self.cursor.column = 0;
        if self.cursor.line >= BUFFER_HEIGHT {
            self.scroll();
        }
    }

    pub fn scroll(&mut self) {
        trace!("scrolling console");
        self.framebuffer.shift_rows_up();
        self.cursor.line = BUFFER_HEIGHT - 1;
    }

    /// Places the cursor without drawing anything. Used by the line editor,
    /// which owns the column while a line is being typed.
    pub fn set_cursor(&mut self, line: usize, column: usize) {
        debug_assert!(line < BUFFER_HEIGHT && column <= BUFFER_WIDTH);
        self.cursor = CursorState { line, column };
        self.sync_hardware_cursor();
    }

    pub fn sync_hardware_cursor(&mut self) {
        let CursorState { line, column } = self.cursor;
        self.set_hardware_cursor(line, column);
    }

    /// Programs the CRT controller with the linear position `line * WIDTH + col`,
    /// low byte first.
    pub fn set_hardware_cursor(&mut self, line: usize, col: usize) {
        let position = (line * BUFFER_WIDTH + col) as u16;
        let hw = self.framebuffer.hardware_mut();
        hw.write_port(COMMAND_PORT, CURSOR_LOCATION_LOW);
        hw.write_port(DATA_PORT, (position & 0xff) as u8);
        hw.write_port(COMMAND_PORT, CURSOR_LOCATION_HIGH);
        hw.write_port(DATA_PORT, (position >> 8) as u8);
    }
}

// Formatted output continues from the current column so the pieces of one
// `write!` land next to each other.
impl<H: Hardware> fmt::Write for Console<H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_text(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use crate::hardware::fake::FakeHardware;

    fn cleared() -> Console<FakeHardware> {
        let mut console = Console::new(FakeHardware::new());
        console.clear();
        console
    }

    fn row_string(console: &Console<FakeHardware>, row: usize) -> String {
        (0..BUFFER_WIDTH)
            .map(|col| console.framebuffer().read_char(row, col) as char)
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    fn last_cursor_write(console: &Console<FakeHardware>) -> u16 {
        console.framebuffer().hardware().cursor_position()
    }

    #[test]
    fn clear_resets_cursor_and_hardware_cursor() {
        let mut console = cleared();
        console.print("hello\nworld");
        console.clear();
        assert_eq!(console.cursor(), CursorState { line: 0, column: 0 });
        assert_eq!(last_cursor_write(&console), 0);
        assert_eq!(row_string(&console, 0), "");
    }

    #[test]
    fn short_text_stays_on_the_line() {
        let mut console = cleared();
        console.print("\n\n");
        let status = console.print("console");
        assert_eq!(status, 1);
        assert_eq!(console.cursor(), CursorState { line: 2, column: 7 });
        for (col, byte) in "console".bytes().enumerate() {
            assert_eq!(console.framebuffer().read_char(2, col), byte);
        }
        assert_eq!(last_cursor_write(&console), 2 * 80 + 7);
    }

    #[test]
    fn each_print_starts_at_column_zero() {
        let mut console = cleared();
        console.print("Choice: ");
        console.print(&"x".repeat(75));
        assert_eq!(console.cursor(), CursorState { line: 0, column: 75 });
        assert_eq!(row_string(&console, 0), "x".repeat(75));
        assert_eq!(row_string(&console, 1), "");
        assert_eq!(last_cursor_write(&console), 75);
    }

    #[test]
    fn empty_print_moves_cursor_to_line_start() {
        let mut console = cleared();
        console.print("\nab");
        console.print("");
        assert_eq!(console.cursor(), CursorState { line: 1, column: 0 });
        assert_eq!(row_string(&console, 1), "ab");
        assert_eq!(last_cursor_write(&console), 80);
    }

    #[test]
    fn formatted_output_keeps_its_pieces_together() {
        let mut console = cleared();
        write!(console, "result {} of {}", 3, 4).unwrap();
        assert_eq!(row_string(&console, 0), "result 3 of 4");
        assert_eq!(console.cursor(), CursorState { line: 0, column: 13 });
    }

    #[test]
    fn full_width_line_wraps_without_newline() {
        let mut console = cleared();
        let line = "x".repeat(BUFFER_WIDTH);
        console.print(&line);
        assert_eq!(console.cursor(), CursorState { line: 1, column: 0 });
        assert_eq!(row_string(&console, 0), line);
        console.print("y");
        assert_eq!(console.framebuffer().read_char(1, 0), b'y');
    }

    #[test]
    fn overflowing_the_last_line_scrolls_exactly_once() {
        let mut console = cleared();
        for row in 0..BUFFER_HEIGHT - 1 {
            write!(console, "row{}\n", row).unwrap();
        }
        console.print("last");
        assert_eq!(console.cursor().line, BUFFER_HEIGHT - 1);

        console.print("\n");
        assert_eq!(console.cursor(), CursorState { line: BUFFER_HEIGHT - 1, column: 0 });
        assert_eq!(row_string(&console, 0), "row1");
        for row in 0..BUFFER_HEIGHT - 2 {
            assert_eq!(row_string(&console, row), format!("row{}", row + 1));
        }
        assert_eq!(row_string(&console, BUFFER_HEIGHT - 2), "last");
        assert_eq!(row_string(&console, BUFFER_HEIGHT - 1), "");
    }

    #[test]
    fn wrapping_on_the_last_line_scrolls() {
        let mut console = cleared();
        console.print(&"\n".repeat(BUFFER_HEIGHT - 1));
        console.print(&format!("top?{}", "w".repeat(BUFFER_WIDTH)));
        assert_eq!(console.cursor(), CursorState { line: BUFFER_HEIGHT - 1, column: 4 });
        assert_eq!(row_string(&console, BUFFER_HEIGHT - 2), format!("top?{}", "w".repeat(76)));
        assert_eq!(row_string(&console, BUFFER_HEIGHT - 1), "wwww");
    }

    #[test]
    fn second_print_continues_after_newline() {
        let mut console = cleared();
        console.print("ab\n");
        console.print("cd");
        assert_eq!(console.framebuffer().read_char(0, 0), b'a');
        assert_eq!(console.framebuffer().read_char(0, 1), b'b');
        assert_eq!(console.framebuffer().read_char(1, 0), b'c');
        assert_eq!(console.framebuffer().read_char(1, 1), b'd');
        assert_eq!(console.cursor(), CursorState { line: 1, column: 2 });
    }

    #[test]
    fn steady_state_after_many_lines() {
        let mut console = cleared();
        for _ in 0..BUFFER_HEIGHT {
            console.print("x\n");
        }
        assert_eq!(console.cursor(), CursorState { line: BUFFER_HEIGHT - 1, column: 0 });
        for row in 0..BUFFER_HEIGHT - 1 {
            assert_eq!(row_string(&console, row), "x");
        }
        assert_eq!(row_string(&console, BUFFER_HEIGHT - 1), "");
    }

    #[test]
    fn unprintable_bytes_render_as_block() {
        let mut console = cleared();
        console.print("a\u{e9}");
        assert_eq!(console.framebuffer().read_char(0, 0), b'a');
        // two-byte UTF-8 sequence, one block per byte
        assert_eq!(console.framebuffer().read_char(0, 1), UNPRINTABLE_GLYPH);
        assert_eq!(console.framebuffer().read_char(0, 2), UNPRINTABLE_GLYPH);
    }

    #[test]
    fn hardware_cursor_splits_position_into_low_and_high_bytes() {
        let mut console = cleared();
        console.set_hardware_cursor(24, 79);
        let writes = &console.framebuffer().hardware().port_writes;
        let position: u16 = 24 * 80 + 79;
        assert_eq!(
            &writes[writes.len() - 4..],
            &[
                (COMMAND_PORT, 0x0F),
                (DATA_PORT, (position & 0xff) as u8),
                (COMMAND_PORT, 0x0E),
                (DATA_PORT, (position >> 8) as u8),
            ]
        );
    }
}
