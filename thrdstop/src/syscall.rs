//! System calls.
//!
//! The system call number is in `a7`, the arguments in `a0`, `a1`, ... and
//! the result goes back into `a0`. A failed call returns `-1`.
use crate::{clock::Clock, proc::Process, Error};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// System call numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u64)]
pub enum Syscall {
    /// `int getpid(void)`
    Getpid = 11,
    /// `int uptime(void)`
    Uptime = 14,
    /// `int thrdstop(int ticks, int thrdstop_context_id, void (*handler)())`
    Thrdstop = 22,
    /// `int cancelthrdstop(int thrdstop_context_id)`
    Cancelthrdstop = 23,
    /// `int thrdresume(int thrdstop_context_id, int is_exit)`
    Thrdresume = 24,
}

/// The value user space sees for a failed call.
pub const SYSCALL_FAILED: u64 = -1i64 as u64;

/// Fetch the `n`-th argument as an int.
fn argint(p: &Process, n: usize) -> i32 {
    p.trapframe.arg(n).unwrap_or(0) as i32
}

/// Fetch the `n`-th argument as an address.
fn argaddr(p: &Process, n: usize) -> u64 {
    p.trapframe.arg(n).unwrap_or(0)
}

/// Run the system call the process trapped with.
pub fn syscall(p: &mut Process, clock: &Clock) {
    let num = p.trapframe.a7;
    let ret = match Syscall::try_from_primitive(num) {
        Ok(Syscall::Getpid) => Ok(u64::from(p.pid)),
        Ok(Syscall::Uptime) => Ok(clock.uptime()),
        Ok(Syscall::Thrdstop) => sys_thrdstop(p),
        Ok(Syscall::Cancelthrdstop) => sys_cancelthrdstop(p),
        Ok(Syscall::Thrdresume) => sys_thrdresume(p),
        Err(_) => {
            crate::println!("{}: unknown sys call {}", p.pid, num);
            Err(Error::InvalidArgument)
        }
    };
    p.trapframe.a0 = ret.unwrap_or(SYSCALL_FAILED);
}

/// After `ticks` ticks, divert to `handler`, saving the context into a slot.
///
/// Returns the slot.
pub fn sys_thrdstop(p: &mut Process) -> Result<u64, Error> {
    let ticks = u32::try_from(argint(p, 0)).map_err(|_| Error::InvalidArgument)?;
    let slot_id = argint(p, 1);
    let handler = argaddr(p, 2);
    match p.arm_deadline(ticks, slot_id, handler) {
        Ok(slot_id) => Ok(slot_id as u64),
        Err(e) => {
            crate::debug!("pid {}: thrdstop failed: {}", p.pid, e);
            Err(e)
        }
    }
}

/// Cancel the pending `thrdstop`, saving the context into a slot if the
/// given one is not negative.
///
/// Returns the ticks counted since `thrdstop`.
pub fn sys_cancelthrdstop(p: &mut Process) -> Result<u64, Error> {
    let slot_id = argint(p, 0);
    p.cancel_deadline(slot_id).map(u64::from)
}

/// Continue from, or drop, a saved context.
///
/// Continuing returns the saved `a0`, so every register of the saved
/// context is live again once the call returns.
pub fn sys_thrdresume(p: &mut Process) -> Result<u64, Error> {
    let slot_id = argint(p, 0);
    let is_exit = argint(p, 1) != 0;
    p.resume_or_drop(slot_id, is_exit)?;
    Ok(if is_exit { 0 } else { p.trapframe.a0 })
}
