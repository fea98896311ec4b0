//! The runtime: ready queue, scheduler and dispatcher.
//!
//! Each OS thread hosts its own runtime. All of its user-level threads run
//! on that OS thread, one at a time, and switch only in [`yield_now`] and
//! [`exit`].
use crate::{queue::ReadyQueue, thread::Thread, ThreadHandle, ThreadId};
use hart::context::{self, ExecutionContext};
use std::any::Any;
use std::cell::UnsafeCell;
use std::panic::{self, AssertUnwindSafe};

pub(crate) struct Runtime {
    queue: ReadyQueue<Box<Thread>>,
    /// Where [`run`] resumes once the last thread exited.
    outer: ExecutionContext,
    running: bool,
    /// A thread that exited on its own stack, released by the next context.
    finished: Option<Box<Thread>>,
    /// The first panic raised by a thread body.
    panic: Option<Box<dyn Any + Send>>,
}

thread_local! {
    static RUNTIME: UnsafeCell<Runtime> = const { UnsafeCell::new(Runtime::new()) };
}

/// Run `f` with the runtime of this OS thread.
///
/// `f` must neither switch contexts nor call back into `with_runtime`.
fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> R {
    // SAFETY: the runtime is only reached through this function, which is
    // never re-entered, so there is one live reference at a time.
    RUNTIME.with(|rt| f(unsafe { &mut *rt.get() }))
}

impl Runtime {
    const fn new() -> Self {
        Self {
            queue: ReadyQueue::new(),
            outer: ExecutionContext::new(),
            running: false,
            finished: None,
            panic: None,
        }
    }

    /// Plain round robin.
    fn schedule(&mut self) {
        self.queue.advance();
    }

    /// Prepare the current thread to be switched to.
    ///
    /// A thread that never ran gets a fresh context on its own stack, which
    /// starts in [`trampoline`]. Any other thread resumes its last capture.
    fn dispatch(&mut self) -> *const ExecutionContext {
        let th = self
            .queue
            .current_mut()
            .expect("dispatch with an empty ready queue");
        if !th.bootstrapped {
            // SAFETY: the stack is owned by the thread, which is released
            // only after it stops running on it.
            th.context = unsafe { ExecutionContext::bootstrap(th.stack.top(), trampoline) };
            th.bootstrapped = true;
        }
        &th.context
    }
}

/// Switch contexts, then release the thread that finished in between.
///
/// # Safety
/// See [`context::switch`].
unsafe fn switch_to(save: *mut ExecutionContext, resume: *const ExecutionContext) {
    context::switch(save, resume);
    finish_switch();
}

fn finish_switch() {
    let finished = with_runtime(|rt| rt.finished.take());
    if let Some(th) = finished {
        hart::debug!("uthread: released {} ({})", th.name, th.id);
    }
}

/// The very beginning of every thread.
extern "C" fn trampoline() -> ! {
    finish_switch();
    let (id, entry) = with_runtime(|rt| {
        let th = rt.queue.current_mut().expect("bootstrapped without a thread");
        (th.id, th.entry.take())
    });
    if let Some(entry) = entry {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(entry)) {
            hart::warning!("uthread: thread {} panicked", id);
            with_runtime(|rt| {
                if rt.panic.is_none() {
                    rt.panic = Some(payload);
                }
            });
        }
    }
    // Returning from the body is an exit.
    exit()
}

/// Make `handle` runnable.
///
/// The thread is inserted right before the current one, so it runs after
/// every thread already queued. The first thread enqueued on an empty
/// runtime becomes the current one.
pub fn enqueue(handle: ThreadHandle) {
    with_runtime(|rt| rt.queue.push(handle.th));
}

/// Give up the CPU to the next thread.
///
/// Returns when the scheduler comes back to the calling thread. Outside a
/// running thread, this does nothing.
pub fn yield_now() {
    let switch = with_runtime(|rt| {
        if !rt.running {
            return None;
        }
        let current = rt.queue.current_mut()?;
        current.check_stack();
        let save: *mut ExecutionContext = &mut current.context;
        rt.schedule();
        Some((save, rt.dispatch()))
    });
    if let Some((save, resume)) = switch {
        // SAFETY: `save` lives in the boxed current thread, which stays
        // queued while it is suspended.
        unsafe { switch_to(save, resume) }
    }
}

/// Terminate the calling thread.
///
/// The next thread in the queue runs. If this was the last one, [`run`]
/// returns. Locals of the calling thread are not dropped.
///
/// # Panics
/// Panics if not called from a thread of a running runtime.
pub fn exit() -> ! {
    let (save, resume) = with_runtime(|rt| {
        assert!(rt.running, "exit() outside of a running thread");
        let th = rt
            .queue
            .remove_current()
            .expect("running runtime without a current thread");
        hart::debug!("uthread: {} ({}) exited", th.name, th.id);
        // Still running on its stack. The next context releases it.
        let th = rt.finished.insert(th);
        let save: *mut ExecutionContext = &mut th.context;
        let resume = if rt.queue.is_empty() {
            &rt.outer as *const ExecutionContext
        } else {
            rt.dispatch()
        };
        (save, resume)
    });
    // SAFETY: `save` is inside the finished thread, which is released only
    // after this switch completed.
    unsafe { context::switch(save, resume) };
    unreachable!("an exited thread was resumed");
}

/// Run the enqueued threads until every one of them exited.
///
/// Threads start in the order they were enqueued. If a thread body
/// panicked, the first panic is raised again here once all threads are
/// done.
///
/// # Panics
/// Panics if called from a thread of this runtime.
pub fn run() {
    let switch = with_runtime(|rt| {
        assert!(!rt.running, "run() called from a running thread");
        if rt.queue.is_empty() {
            return None;
        }
        rt.running = true;
        let save: *mut ExecutionContext = &mut rt.outer;
        Some((save, rt.dispatch()))
    });
    let Some((save, resume)) = switch else {
        return;
    };
    // SAFETY: the runtime is thread local and outlives this call.
    unsafe { switch_to(save, resume) };

    let raised = with_runtime(|rt| {
        rt.running = false;
        rt.panic.take()
    });
    if let Some(payload) = raised {
        panic::resume_unwind(payload);
    }
}

/// Id of the running thread, if called from one.
pub fn current() -> Option<ThreadId> {
    with_runtime(|rt| {
        if rt.running {
            rt.queue.current().map(|th| th.id)
        } else {
            None
        }
    })
}

/// Number of threads in the ready queue, including the running one.
pub fn queued() -> usize {
    with_runtime(|rt| rt.queue.len())
}
