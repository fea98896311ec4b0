//! Trap dispatch.
//!
//! Every trap enters the kernel through one of two paths: [`usertrap`] when
//! the hart was running user code, [`kerneltrap`] when it was already in the
//! kernel. Both classify the cause with [`devintr`], and both forward timer
//! interrupts to [`Process::timer_tick`], which is the only place a deadline
//! is counted.
//!
//! [`usertrap`]: TrapDispatch::usertrap
//! [`kerneltrap`]: TrapDispatch::kerneltrap
//! [`devintr`]: TrapDispatch::devintr
use crate::{
    clock::Clock,
    proc::{ProcState, Process},
    syscall,
};
use hart::{InterruptKind, SStatus, Scause};

/// What the trap path does after handling a trap from user space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapOutcome {
    /// Return to user space.
    Return,
    /// Give up the hart, then return to user space.
    Yield,
    /// Terminate the process.
    Exit,
}

/// Trap dispatcher of a hart.
pub struct TrapDispatch<'a> {
    clock: &'a Clock,
    hartid: usize,
}

impl<'a> TrapDispatch<'a> {
    /// Create the dispatcher of hart `hartid`.
    pub fn new(clock: &'a Clock, hartid: usize) -> Self {
        Self { clock, hartid }
    }

    /// Classify an interrupt and acknowledge it.
    ///
    /// A timer interrupt advances the clock when taken on hart 0.
    pub fn devintr(&self, scause: Scause) -> InterruptKind {
        let kind = InterruptKind::classify(scause);
        match kind {
            InterruptKind::Timer if self.hartid == 0 => {
                self.clock.tick();
            }
            InterruptKind::Device => crate::debug!("hart {}: device interrupt", self.hartid),
            _ => (),
        }
        kind
    }

    /// Handle an interrupt, exception, or system call from user space.
    pub fn usertrap(&self, p: &mut Process, scause: Scause, sstatus: SStatus) -> TrapOutcome {
        if sstatus.contains(SStatus::SPP) {
            panic!("usertrap: not from user mode");
        }

        let mut kind = InterruptKind::Unrecognized;
        if scause == Scause::USER_ECALL {
            if p.killed {
                return TrapOutcome::Exit;
            }
            // sepc points to the ecall instruction.
            p.trapframe.epc += 4;
            syscall::syscall(p, self.clock);
        } else {
            kind = self.devintr(scause);
            if kind == InterruptKind::Unrecognized {
                crate::warning!(
                    "usertrap(): unexpected scause {:#x} pid={} sepc={:#x}",
                    scause.0,
                    p.pid,
                    p.trapframe.epc
                );
                p.killed = true;
            }
        }

        if p.killed {
            return TrapOutcome::Exit;
        }
        if kind == InterruptKind::Timer {
            p.timer_tick();
            return TrapOutcome::Yield;
        }
        TrapOutcome::Return
    }

    /// Handle an interrupt taken while the hart runs kernel code.
    ///
    /// `p` is the process the hart is running on behalf of, if any. Returns
    /// whether the hart should give up the CPU.
    pub fn kerneltrap(&self, p: Option<&mut Process>, scause: Scause, sstatus: SStatus) -> bool {
        if !sstatus.contains(SStatus::SPP) {
            panic!("kerneltrap: not from supervisor mode");
        }

        let kind = self.devintr(scause);
        if kind == InterruptKind::Unrecognized {
            panic!("kerneltrap: scause {:#x}", scause.0);
        }

        match p {
            Some(p) if kind == InterruptKind::Timer && p.state == ProcState::Running => {
                p.timer_tick();
                true
            }
            _ => false,
        }
    }
}
