//! x86_64 System V context.
use core::arch::global_asm;

global_asm!(include_str!("x86_64.s"));

/// Callee-preserved state of the System V ABI.
///
/// DO NOT REORDER THE FIELDS.
/// `x86_64.s` addresses them by hard-coded offsets.
#[repr(C)]
#[derive(Debug)]
pub struct ExecutionContext {
    rsp: u64,
    rbp: u64,
    rbx: u64,
    r12: u64,
    r13: u64,
    r14: u64,
    r15: u64,
    mxcsr: u32,
    fpu_cw: u16,
    _pad: u16,
}

impl ExecutionContext {
    /// Power-on value of MXCSR: all exceptions masked, round to nearest.
    const MXCSR_INIT: u32 = 0x1f80;
    /// Power-on value of the x87 control word.
    const FPU_CW_INIT: u16 = 0x037f;

    /// An empty capture target.
    pub const fn new() -> Self {
        Self {
            rsp: 0,
            rbp: 0,
            rbx: 0,
            r12: 0,
            r13: 0,
            r14: 0,
            r15: 0,
            mxcsr: Self::MXCSR_INIT,
            fpu_cw: Self::FPU_CW_INIT,
            _pad: 0,
        }
    }

    /// Build the first activation of the stack ending at `stack_top`.
    ///
    /// Resuming the returned context runs `entry` on that stack.
    ///
    /// # Safety
    /// At least 16 bytes below `stack_top` must be writable, and the stack
    /// must outlive every resumption of the returned context.
    pub unsafe fn bootstrap(stack_top: *mut u8, entry: extern "C" fn() -> !) -> Self {
        let top = stack_top as usize & !(super::STACK_ALIGN - 1);
        // [top - 16]: consumed by `ret` in the switch.
        // [top - 8]: return address of `entry`. Zero ends the call chain.
        let frame = (top - 16) as *mut u64;
        frame.write(entry as usize as u64);
        frame.add(1).write(0);
        Self {
            rsp: frame as u64,
            ..Self::new()
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}
