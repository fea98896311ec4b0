//! RISC-V LP64D context.
use core::arch::global_asm;

global_asm!(include_str!("riscv64.s"));

extern "C" {
    fn hart_context_start();
}

/// Callee-preserved state of the LP64D ABI.
///
/// DO NOT REORDER THE FIELDS.
/// `riscv64.s` addresses them by hard-coded offsets.
#[repr(C)]
#[derive(Debug, Default)]
pub struct ExecutionContext {
    ra: u64,
    sp: u64,
    /// s0 ~ s11.
    s: [u64; 12],
    /// fs0 ~ fs11.
    fs: [u64; 12],
}

impl ExecutionContext {
    /// An empty capture target.
    pub const fn new() -> Self {
        Self {
            ra: 0,
            sp: 0,
            s: [0; 12],
            fs: [0; 12],
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
        // hart_context_start clears ra/fp and jumps to s1.
        this.ra = hart_context_start as usize as u64;
        this.sp = (stack_top as usize & !(super::STACK_ALIGN - 1)) as u64;
        this.s[1] = entry as usize as u64;
        this
    }
}
