use x86_64::instructions::port::Port;
use crate::constants::vga::BUFFER_ADDR;
use crate::vga_buffer::{Buffer, ScreenChar};

/// Port I/O and text buffer access. Everything that touches the machine goes
/// through here, so the console and keyboard run against an in-memory fake
/// in tests.
pub trait Hardware {
    fn read_port(&mut self, port: u16) -> u8;
    fn write_port(&mut self, port: u16, value: u8);

    /// `index` is the linear cell index `row * WIDTH + col`.
    fn read_cell(&self, index: usize) -> ScreenChar;
    fn write_cell(&mut self, index: usize, cell: ScreenChar);
}

/// The real machine: x86 port I/O and the memory-mapped VGA text buffer.
pub struct Machine {
    buffer: &'static mut Buffer,
}

impl Machine {
    /// # Safety
    ///
    /// The VGA text buffer must be identity-mapped at `BUFFER_ADDR`. Only one
    /// `Machine` may be in use at a time: creating a new one hands the buffer
    /// over, and the previous one must never be touched again (the panic
    /// handler relies on this to take over the screen).
    pub unsafe fn new() -> Self {
        Machine {
            buffer: &mut *(BUFFER_ADDR as *mut Buffer),
        }
    }
}

impl Hardware for Machine {
    fn read_port(&mut self, port: u16) -> u8 {
        let mut port = Port::<u8>::new(port);
        unsafe { port.read() }
    }

    fn write_port(&mut self, port: u16, value: u8) {
        let mut port = Port::<u8>::new(port);
        unsafe { port.write(value) }
    }

    fn read_cell(&self, index: usize) -> ScreenChar {
        self.buffer.chars[index].read()
    }

    fn write_cell(&mut self, index: usize, cell: ScreenChar) {
        self.buffer.chars[index].write(cell);
    }
}
