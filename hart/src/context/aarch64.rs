//! AArch64 AAPCS64 context.
use core::arch::global_asm;

global_asm!(include_str!("aarch64.s"));

extern "C" {
    fn hart_context_start();
}

/// Callee-preserved state of AAPCS64.
///
/// DO NOT REORDER THE FIELDS.
/// `aarch64.s` addresses them by hard-coded offsets.
#[repr(C)]
#[derive(Debug, Default)]
pub struct ExecutionContext {
    /// x19 ~ x28, fp (x29), lr (x30).
    x: [u64; 12],
    sp: u64,
    /// d8 ~ d15.
    d: [u64; 8],
}

impl ExecutionContext {
    /// An empty capture target.
    pub const fn new() -> Self {
        Self {
            x: [0; 12],
            sp: 0,
            d: [0; 8],
        }
    }

    /// Build the first activation of the stack ending at `stack_top`.
    ///
    /// Resuming the returned context runs `entry` on that stack.
    ///
    /// # Safety
    /// The stack must outlive every resumption of the returned context.
    pub unsafe fn bootstrap(stack_top: *mut u8, entry: extern "C" fn() -> !) -> Self {
        let mut this = Self::new();
        // hart_context_start clears fp/lr and branches to x19.
        this.x[0] = entry as usize as u64;
        this.x[11] = hart_context_start as usize as u64;
        this.sp = (stack_top as usize & !(super::STACK_ALIGN - 1)) as u64;
        this
    }
}
