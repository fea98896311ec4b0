//! Execution context switch.
//!
//! An [`ExecutionContext`] is the resumption point of a suspended thread of
//! control: its stack pointer, the address to continue at, and the
//! registers the host calling convention requires a callee to preserve.
//!
//! There are exactly two ways to obtain a resumable context:
//! - [`switch`] captures the caller into its `save` argument, and
//! - [`ExecutionContext::bootstrap`] builds the first activation of a fresh
//!   stack, which starts running an entry function on that stack.
//!
//! A capture is consumed by resuming it. Resuming a context that has not
//! been re-captured since its last resumption is undefined behavior.

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "none"
)))]
compile_error!("context switch is only implemented for ELF targets");

#[cfg(target_arch = "x86_64")]
#[path = "x86_64.rs"]
mod arch;

#[cfg(target_arch = "aarch64")]
#[path = "aarch64.rs"]
mod arch;

#[cfg(target_arch = "riscv64")]
#[path = "riscv64.rs"]
mod arch;

#[cfg(not(any(
    target_arch = "x86_64",
    target_arch = "aarch64",
    target_arch = "riscv64"
)))]
compile_error!("context switch is not implemented for this architecture");

pub use arch::ExecutionContext;

/// Alignment the stack top handed to [`ExecutionContext::bootstrap`] is
/// rounded down to.
pub const STACK_ALIGN: usize = 16;

extern "C" {
    fn hart_switch_context(save: *mut ExecutionContext, resume: *const ExecutionContext);
}

/// Capture the caller into `save`, then resume `resume`.
///
/// Returns when another [`switch`] resumes `save`.
///
/// # Safety
/// `save` must be valid for writes and stay at the same address until it is
/// resumed. `resume` must hold either a capture made by [`switch`] that has
/// not been resumed yet, or a context built by
/// [`ExecutionContext::bootstrap`] whose stack is still alive. `save` and
/// `resume` may be the same context.
#[inline(never)]
pub unsafe fn switch(save: *mut ExecutionContext, resume: *const ExecutionContext) {
    hart_switch_context(save, resume)
}
