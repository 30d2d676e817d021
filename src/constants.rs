/// System-wide constants to avoid magic numbers

/// VGA text mode constants
pub mod vga {
    /// VGA text buffer physical address
    pub const BUFFER_ADDR: usize = 0xb8000;

    /// VGA text mode dimensions
    pub const BUFFER_HEIGHT: usize = 25;
    pub const BUFFER_WIDTH: usize = 80;

    /// VGA control ports
    pub const COMMAND_PORT: u16 = 0x3D4;
    pub const DATA_PORT: u16 = 0x3D5;

    /// Cursor control registers
    pub const CURSOR_LOCATION_HIGH: u8 = 0x0E;
    pub const CURSOR_LOCATION_LOW: u8 = 0x0F;

    /// Glyph drawn for bytes outside printable ASCII
    pub const UNPRINTABLE_GLYPH: u8 = 0xfe;
}

/// PS/2 Keyboard controller constants
pub mod keyboard {
    /// PS/2 keyboard data port
    pub const DATA_PORT: u16 = 0x60;

    /// PS/2 keyboard status/command port
    pub const STATUS_COMMAND_PORT: u16 = 0x64;

    /// Status register bit flags
    pub const STATUS_OUTPUT_BUFFER_FULL: u8 = 0x01;

    /// Set 1 scancodes with dedicated handling
    pub const LEFT_SHIFT: u8 = 0x2A;
    pub const RIGHT_SHIFT: u8 = 0x36;
    pub const CAPS_LOCK: u8 = 0x3A;
    pub const ESCAPE: u8 = 0x01;
    pub const ARROW_UP: u8 = 0x48;
    pub const ARROW_LEFT: u8 = 0x4B;
    pub const ARROW_RIGHT: u8 = 0x4D;
    pub const ARROW_DOWN: u8 = 0x50;
    pub const DELETE: u8 = 0x53;
    pub const F1: u8 = 0x3B;
    pub const F2: u8 = 0x3C;

    /// Set on every key release code
    pub const RELEASE_BIT: u8 = 0x80;
}

/// Serial port used for log output
pub mod serial {
    /// COM1 base port
    pub const COM1: u16 = 0x3F8;

    /// Most verbose level forwarded to the serial log
    pub const LOG_LEVEL: log::LevelFilter = log::LevelFilter::Debug;
}

/// Menu / calculator application
pub mod shell {
    /// Capacity of menu choice input lines
    pub const MENU_INPUT_LEN: usize = 20;

    /// Capacity of calculator choice and operand lines
    pub const CALC_INPUT_LEN: usize = 10;

    /// Largest exponent accepted by the power operation
    pub const MAX_POWER: i32 = 12;
}
