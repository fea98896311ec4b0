//! Console print utilities.
//!
//! Both the kernel side and the user-level thread library report through
//! these macros. Output goes to whatever sink was installed with
//! [`set_console`]; until one is installed, it is discarded.

use alloc::boxed::Box;
use core::fmt::Write;
use spin::Mutex;

/// A console sink.
pub type Console = Box<dyn Write + Send>;

static CONSOLE: Mutex<Option<Console>> = Mutex::new(None);

/// Install `console` as the sink of the print macros.
///
/// Returns the previously installed sink.
pub fn set_console(console: Console) -> Option<Console> {
    CONSOLE.lock().replace(console)
}

/// Uninstall the current sink. Later output is discarded.
pub fn take_console() -> Option<Console> {
    CONSOLE.lock().take()
}

#[doc(hidden)]
pub fn _print(fmt: core::fmt::Arguments<'_>) {
    if let Some(console) = CONSOLE.lock().as_mut() {
        let _ = console.write_fmt(fmt);
    }
}

/// Prints out the message.
///
/// Use the format! syntax to write data to the console.
/// This first holds the lock for console device.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::kprint::_print(format_args!($($arg)*)));
}

/// Prints out the message with a newline.
///
/// Use the format! syntax to write data to the console.
/// This first holds the lock for console device.
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

/// Display an information message.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => ($crate::kprint::_print(
            format_args!(
                "[INFO] {}\n",
                format_args!($($arg)*)
            )
        )
    );
}

/// Display a warning message.
#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => ($crate::kprint::_print(
            format_args!(
                "[WARNING] {}\n",
                format_args!($($arg)*)
            )
        )
    );
}

/// Print msg if debug build
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::kprint::_print(
                format_args!(
                    "[DEBUG] {}\n",
                    format_args!($($arg)*)
                )
            )
        }
    }
}
