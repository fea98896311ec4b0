//! User-level threads.
//!
//! ## The threading model
//!
//! A program creates threads with [`create`] (or a [`ThreadBuilder`]),
//! makes them runnable with [`enqueue`], and hands the CPU over with
//! [`run`]. From then on exactly one thread runs at a time. A thread keeps
//! the CPU until it calls [`yield_now`], which passes it to the next thread
//! in round-robin order, or until it finishes, either by returning from its
//! body or by calling [`exit`]. When the last thread finishes, [`run`]
//! returns to its caller.
//!
//! Every thread runs on its own stack. The first time a thread is
//! dispatched, the runtime points a fresh execution context at the top of
//! that stack and starts the body there; after that, dispatching a thread
//! resumes the context it captured when it last yielded.
//!
//! Nothing preempts a thread. One that never yields keeps every other
//! thread waiting.
//!
//! ```no_run
//! use std::{cell::RefCell, rc::Rc};
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! for name in ["a", "b"] {
//!     let log = log.clone();
//!     uthread::ThreadBuilder::new(name)
//!         .spawn(
//!             move |rounds: usize| {
//!                 for i in 0..rounds {
//!                     log.borrow_mut().push(format!("{name}{i}"));
//!                     uthread::yield_now();
//!                 }
//!             },
//!             2,
//!         )
//!         .unwrap();
//! }
//! uthread::run();
//! assert_eq!(*log.borrow(), ["a0", "b0", "a1", "b1"]);
//! ```

mod queue;
mod runtime;
mod stack;
mod thread;

pub use queue::ReadyQueue;
pub use runtime::{current, enqueue, exit, queued, run, yield_now};
pub use stack::{MIN_STACK_SIZE, STACK_SIZE, THREAD_MAGIC};
pub use thread::{create, ThreadBuilder, ThreadHandle, ThreadId};

/// Possible error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The stack of the given size could not be allocated.
    StackAllocation(usize),
    /// The requested stack size is unusable.
    InvalidStackSize(usize),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::StackAllocation(size) => write!(f, "failed to allocate a {:#x}-byte stack", size),
            Error::InvalidStackSize(size) => write!(f, "invalid stack size {:#x}", size),
        }
    }
}

impl std::error::Error for Error {}
