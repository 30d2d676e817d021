#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod kernel {
    use core::fmt::Write;
    use core::panic::PanicInfo;
    use log::info;
    use pollcon::constants::serial::LOG_LEVEL;
    use pollcon::{logger, Console, Machine, Shell};

    #[panic_handler]
    fn panic(info: &PanicInfo) -> ! {
        // SAFETY: the shell never runs again after a panic, so its Machine is
        // abandoned and this one becomes the only user of the buffer.
        let mut console = Console::new(unsafe { Machine::new() });
        console.clear();
        let _ = writeln!(console, "{}", info);
        loop {
            x86_64::instructions::hlt();
        }
    }

    #[no_mangle]
    pub extern "C" fn _start() -> ! {
        let logging = logger::init(LOG_LEVEL);
        if logging.is_ok() {
            info!("starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }

        let mut console = Console::new(unsafe { Machine::new() });
        console.clear();
        info!("console ready, polling keyboard");

        Shell::new(console).run()
    }
}

#[cfg(not(target_os = "none"))]
fn main() {
    eprintln!("{} is a bare-metal kernel; build a boot image with `cargo bootimage`", env!("CARGO_PKG_NAME"));
}
