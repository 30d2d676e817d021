#![cfg_attr(not(test), no_std)]

pub mod constants;
pub mod hardware;
pub mod vga_buffer;
pub mod console;
pub mod keyboard;
pub mod input;
pub mod shell;
pub mod serial;
pub mod logger;

pub use console::{Console, CursorState};
pub use hardware::{Hardware, Machine};
pub use input::InputReader;
pub use keyboard::{decode, ModifierState, ScancodeDecoder};
pub use shell::{Shell, State};
