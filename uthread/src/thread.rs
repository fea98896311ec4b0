//! Threads.
use crate::{
    stack::{Stack, STACK_SIZE},
    Error,
};
use hart::context::ExecutionContext;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A unique identifier of a thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThreadId(u64);

impl ThreadId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The numeric value of this id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-level thread.
pub(crate) struct Thread {
    pub(crate) id: ThreadId,
    pub(crate) name: String,
    /// Body of the thread. Taken on the first activation.
    pub(crate) entry: Option<Box<dyn FnOnce()>>,
    pub(crate) stack: Stack,
    /// Where to resume the thread. Meaningful once `bootstrapped`.
    pub(crate) context: ExecutionContext,
    /// Whether the thread has ever run.
    pub(crate) bootstrapped: bool,
}

impl Thread {
    /// Panic if the thread ran past the end of its stack.
    pub(crate) fn check_stack(&self) {
        if !self.stack.is_intact() {
            panic!(
                "Stack overflow detected! Thread: {} ({}), stack size: {:#x}",
                self.name,
                self.id,
                self.stack.size()
            );
        }
    }
}

/// A created thread that is not scheduled yet.
///
/// Hand it to [`enqueue`] to make it runnable.
///
/// [`enqueue`]: crate::enqueue
pub struct ThreadHandle {
    pub(crate) th: Box<Thread>,
}

impl ThreadHandle {
    /// Id of the thread.
    pub fn id(&self) -> ThreadId {
        self.th.id
    }

    /// Name of the thread.
    pub fn name(&self) -> &str {
        &self.th.name
    }
}

/// A struct to build a new thread.
pub struct ThreadBuilder {
    name: String,
    stack_size: usize,
}

impl ThreadBuilder {
    /// Create a new thread builder for thread `name`.
    pub fn new<I>(name: I) -> Self
    where
        String: From<I>,
    {
        Self {
            name: String::from(name),
            stack_size: STACK_SIZE,
        }
    }

    /// Set the stack size of the thread. Defaults to [`STACK_SIZE`].
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = size;
        self
    }

    /// Create the thread running `entry(arg)`.
    ///
    /// Only the stack is allocated; the thread is not scheduled.
    pub fn create<A, F>(self, entry: F, arg: A) -> Result<ThreadHandle, Error>
    where
        A: 'static,
        F: FnOnce(A) + 'static,
    {
        let stack = Stack::new(self.stack_size)?;
        let th = Box::new(Thread {
            id: ThreadId::next(),
            name: self.name,
            entry: Some(Box::new(move || entry(arg))),
            stack,
            context: ExecutionContext::new(),
            bootstrapped: false,
        });
        hart::debug!("uthread: created {} ({})", th.name, th.id);
        Ok(ThreadHandle { th })
    }

    /// Create the thread running `entry(arg)` and enqueue it.
    pub fn spawn<A, F>(self, entry: F, arg: A) -> Result<ThreadId, Error>
    where
        A: 'static,
        F: FnOnce(A) + 'static,
    {
        let handle = self.create(entry, arg)?;
        let id = handle.id();
        crate::enqueue(handle);
        Ok(id)
    }
}

/// Create an unnamed thread running `entry(arg)` on a [`STACK_SIZE`] stack.
///
/// The thread is not scheduled until it is passed to [`enqueue`].
///
/// [`enqueue`]: crate::enqueue
pub fn create<A, F>(entry: F, arg: A) -> Result<ThreadHandle, Error>
where
    A: 'static,
    F: FnOnce(A) + 'static,
{
    ThreadBuilder::new("thread").create(entry, arg)
}
