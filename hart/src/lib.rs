//! The hart layer of the thrdstop labs.
//!
//! This crate contains the pieces that talk to the machine: the RISC-V
//! trap frame the kernel saves on every trap, decoding of the `scause` and
//! `sstatus` registers, and the execution-context switch the user-level
//! thread library runs on. Everything above this crate treats the register
//! records here as opaque blobs.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
pub mod kprint;
pub mod context;
pub mod interrupt;

pub use interrupt::{InterruptKind, SStatus, Scause, TrapFrame, UserRegisters};
