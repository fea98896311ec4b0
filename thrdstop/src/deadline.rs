//! One-shot deadline diversion.
//!
//! ## The deadline model
//!
//! A process arms a deadline with an interval, a slot and a handler
//! address. Every timer tick the process receives afterwards is counted
//! against the interval. When the count reaches the interval, the tick
//! handler
//!
//! 1. disarms the deadline and resets the count,
//! 2. saves the interrupted user registers into the slot, and
//! 3. rewrites the saved program counter to the handler.
//!
//! When the trap returns, the process runs the handler. The interrupted
//! state stays in the slot until the process resumes it or drops it with
//! [`DeadlineHook::resume`].
//!
//! The disarm in step 1 happens before anything else, so a tick that
//! arrives while the firing is still in progress finds the deadline
//! disarmed. That ordering is the only guard against firing one arming
//! twice; no lock is involved.
use crate::{slot::ContextSlotManager, Error};
use hart::TrapFrame;

/// Deadline state of a process.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessDeadlineState {
    /// Whether a deadline is pending.
    pub active: bool,
    /// Ticks counted since the last arming.
    pub elapsed: u32,
    /// Ticks after which the deadline fires.
    pub interval: u32,
    /// User address the process is diverted to.
    pub handler: u64,
    /// Slot the interrupted context is saved into.
    pub slot_id: usize,
}

/// The per-process deadline facility.
#[derive(Default)]
pub struct DeadlineHook {
    state: ProcessDeadlineState,
    slots: ContextSlotManager,
}

impl DeadlineHook {
    /// Create a disarmed hook with every slot free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current deadline state.
    pub fn state(&self) -> &ProcessDeadlineState {
        &self.state
    }

    /// The slot table.
    pub fn slots(&self) -> &ContextSlotManager {
        &self.slots
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.state.active
    }

    /// Arm a deadline that fires after `interval` ticks.
    ///
    /// A negative `slot_id` picks the first free slot. Returns the slot the
    /// context will be saved into. On error, nothing changes.
    pub fn arm(&mut self, interval: u32, slot_id: i32, handler: u64) -> Result<usize, Error> {
        if interval == 0 {
            return Err(Error::InvalidArgument);
        }
        let slot_id = self.slots.allocate_or_use(slot_id)?;
        self.state = ProcessDeadlineState {
            active: true,
            elapsed: 0,
            interval,
            handler,
            slot_id,
        };
        crate::debug!(
            "thrdstop: armed {} ticks, slot {}, handler {:#x}",
            interval,
            slot_id,
            handler
        );
        Ok(slot_id)
    }

    /// Disarm the deadline and return the ticks counted since it was armed.
    ///
    /// A non-negative `slot_id` also saves `frame` into that slot, whether a
    /// deadline was pending or not.
    pub fn cancel(&mut self, slot_id: i32, frame: &TrapFrame) -> Result<u32, Error> {
        if slot_id >= 0 {
            let slot_id = ContextSlotManager::check(slot_id)?;
            self.slots.write(slot_id, &frame.user_registers())?;
            self.state.slot_id = slot_id;
        }
        self.state.active = false;
        Ok(self.state.elapsed)
    }

    /// Count one timer tick against the pending deadline.
    ///
    /// Returns true if the deadline fired on this tick. `frame` then holds
    /// the handler as its program counter.
    pub fn on_tick(&mut self, frame: &mut TrapFrame) -> bool {
        if !self.state.active {
            return false;
        }
        self.state.elapsed += 1;
        if self.state.elapsed != self.state.interval {
            return false;
        }

        // Disarm first.
        self.state.active = false;
        self.state.elapsed = 0;

        let ProcessDeadlineState {
            slot_id, handler, ..
        } = self.state;
        if self.slots.write(slot_id, &frame.user_registers()).is_err() {
            // arm() only stores validated slots.
            unreachable!("deadline armed with invalid slot {}", slot_id);
        }
        frame.epc = handler;
        crate::debug!("thrdstop: fired, slot {}, handler {:#x}", slot_id, handler);
        true
    }

    /// Continue from or drop the context saved in `slot_id`.
    ///
    /// If `is_exit` is false, the user registers of `frame` are replaced by
    /// the saved ones. Otherwise the slot is freed and any pending deadline
    /// is cancelled.
    pub fn resume(&mut self, slot_id: i32, is_exit: bool, frame: &mut TrapFrame) -> Result<(), Error> {
        let slot_id = ContextSlotManager::check(slot_id)?;
        if is_exit {
            self.slots.release(slot_id)?;
            self.state.active = false;
        } else {
            frame.set_user_registers(&self.slots.read(slot_id)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::MAX_SLOTS;

    const HANDLER: u64 = 0x1c4;

    fn frame(pc: u64) -> TrapFrame {
        TrapFrame {
            epc: pc,
            sp: 0x2fd0,
            s0: 0x2ff0,
            a0: 7,
            ..Default::default()
        }
    }

    #[test]
    fn fires_once_after_interval() {
        let mut hook = DeadlineHook::new();
        let mut tf = frame(0x100);
        assert_eq!(hook.arm(3, -1, HANDLER), Ok(0));

        assert!(!hook.on_tick(&mut tf));
        assert!(!hook.on_tick(&mut tf));
        assert_eq!(tf.epc, 0x100);
        assert!(hook.on_tick(&mut tf));
        assert_eq!(tf.epc, HANDLER);
        assert!(!hook.is_armed());
        assert_eq!(hook.state().elapsed, 0);

        for _ in 0..10 {
            assert!(!hook.on_tick(&mut tf));
        }
        assert_eq!(hook.slots().read(0).unwrap().epc, 0x100);
    }

    #[test]
    fn rearm_resets_count() {
        let mut hook = DeadlineHook::new();
        let mut tf = frame(0x100);
        hook.arm(4, 2, HANDLER).unwrap();
        hook.on_tick(&mut tf);
        hook.on_tick(&mut tf);
        hook.arm(2, 2, HANDLER).unwrap();
        assert!(!hook.on_tick(&mut tf));
        assert!(hook.on_tick(&mut tf));
    }

    #[test]
    fn cancel_returns_elapsed() {
        let mut hook = DeadlineHook::new();
        let mut tf = frame(0x100);
        let slot = hook.arm(5, -1, HANDLER).unwrap();
        hook.on_tick(&mut tf);
        hook.on_tick(&mut tf);

        tf.epc = 0x180;
        tf.a0 = slot as u64;
        assert_eq!(hook.cancel(slot as i32, &tf), Ok(2));
        assert!(!hook.is_armed());
        for _ in 0..5 {
            assert!(!hook.on_tick(&mut tf));
        }

        let snapshot = tf;
        let mut live = frame(0x400);
        hook.resume(slot as i32, false, &mut live).unwrap();
        assert_eq!(live, snapshot);
    }

    #[test]
    fn cancel_without_slot() {
        let mut hook = DeadlineHook::new();
        let tf = frame(0x100);
        assert_eq!(hook.cancel(-1, &tf), Ok(0));
        assert_eq!(hook.slots().used(), 0);
        assert_eq!(hook.cancel(MAX_SLOTS as i32, &tf), Err(Error::InvalidArgument));
    }

    #[test]
    fn drop_frees_slot() {
        let mut hook = DeadlineHook::new();
        let mut tf = frame(0x100);
        for id in 0..MAX_SLOTS {
            assert_eq!(hook.arm(1, -1, HANDLER), Ok(id));
        }
        let before = *hook.state();
        assert_eq!(hook.arm(1, -1, HANDLER), Err(Error::ResourceExhausted));
        assert_eq!(*hook.state(), before);

        hook.resume(6, true, &mut tf).unwrap();
        assert!(!hook.is_armed());
        assert_eq!(hook.arm(1, -1, HANDLER), Ok(6));
    }

    #[test]
    fn invalid_arguments() {
        let mut hook = DeadlineHook::new();
        let mut tf = frame(0x100);
        assert_eq!(hook.arm(0, -1, HANDLER), Err(Error::InvalidArgument));
        assert_eq!(hook.arm(3, 20, HANDLER), Err(Error::InvalidArgument));
        assert_eq!(hook.resume(-2, false, &mut tf), Err(Error::InvalidArgument));
        assert_eq!(hook.resume(1, false, &mut tf), Err(Error::InvalidArgument));
        assert_eq!(tf, frame(0x100));
        assert_eq!(hook.slots().used(), 0);
    }
}
