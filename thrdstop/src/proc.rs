//! Process.
use crate::{deadline::DeadlineHook, Error};
use hart::TrapFrame;

/// A possible state of the process.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ProcState {
    /// Process is runnable.
    Runnable,
    /// Process is running on a hart.
    Running,
    /// Process is sleeping.
    Sleeping,
    /// Process has exited and waits for its parent.
    Zombie,
}

/// The part of a process the deadline facility works on.
pub struct Process {
    /// Process id.
    pub pid: u32,
    /// State of the process.
    pub state: ProcState,
    /// Whether the process has been killed.
    pub killed: bool,
    /// User registers saved on the last trap.
    pub trapframe: TrapFrame,
    deadline: DeadlineHook,
}

impl Process {
    /// Create a runnable process.
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            state: ProcState::Runnable,
            killed: false,
            trapframe: TrapFrame::default(),
            deadline: DeadlineHook::new(),
        }
    }

    /// The deadline facility of this process.
    pub fn deadline(&self) -> &DeadlineHook {
        &self.deadline
    }

    /// Arm a deadline of `ticks` ticks diverting to `handler`.
    ///
    /// See [`DeadlineHook::arm`].
    pub fn arm_deadline(&mut self, ticks: u32, slot_id: i32, handler: u64) -> Result<usize, Error> {
        self.deadline.arm(ticks, slot_id, handler)
    }

    /// Cancel the pending deadline, saving the current registers into
    /// `slot_id` if it is not negative.
    ///
    /// See [`DeadlineHook::cancel`].
    pub fn cancel_deadline(&mut self, slot_id: i32) -> Result<u32, Error> {
        self.deadline.cancel(slot_id, &self.trapframe)
    }

    /// Continue from or drop the context saved in `slot_id`.
    ///
    /// See [`DeadlineHook::resume`].
    pub fn resume_or_drop(&mut self, slot_id: i32, is_exit: bool) -> Result<(), Error> {
        self.deadline.resume(slot_id, is_exit, &mut self.trapframe)
    }

    /// Count one timer tick against the pending deadline.
    ///
    /// Both trap paths come through here. Returns true if the deadline fired.
    pub fn timer_tick(&mut self) -> bool {
        let fired = self.deadline.on_tick(&mut self.trapframe);
        if fired {
            crate::debug!("pid {}: diverted to {:#x}", self.pid, self.trapframe.epc);
        }
        fired
    }
}
