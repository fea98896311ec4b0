//! Kernel side of the `thrdstop` lab.
//!
//! A process can ask the kernel: "after N more timer ticks, divert me to
//! handler H, and save my current registers into slot S so I can come back
//! later". This crate implements that request on top of the trap path:
//!
//! - [`slot`]: the fixed per-process table of saved user register records.
//! - [`deadline`]: the per-process one-shot deadline and its tick handler.
//! - [`trap`]: the user and kernel trap paths that feed timer ticks in.
//! - [`syscall`]: the system call surface (`thrdstop`, `cancelthrdstop`,
//!   `thrdresume`, and the few xv6 calls the labs use alongside them).
//!
//! Virtual memory, process creation and device drivers are not part of this
//! crate. The [`proc::Process`] here carries only what the facility needs.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

pub mod clock;
pub mod deadline;
pub mod proc;
pub mod slot;
pub mod syscall;
pub mod trap;

pub use hart::{debug, info, print, println, warning};

/// Number of context slots per process.
pub const MAX_SLOTS: usize = 20;

/// Possible error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Every context slot is in use.
    ResourceExhausted,
    /// An argument is out of range.
    InvalidArgument,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ResourceExhausted => write!(f, "no free context slot"),
            Error::InvalidArgument => write!(f, "invalid argument"),
        }
    }
}
