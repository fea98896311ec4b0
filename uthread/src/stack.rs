//! Thread stacks.
use crate::Error;
use hart::context::STACK_ALIGN;
use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

/// Default size of each thread's stack.
pub const STACK_SIZE: usize = 0x40000;
/// Smallest stack a thread can be created with.
pub const MIN_STACK_SIZE: usize = 0x1000;
/// Thread magic to detect stack overflow.
pub const THREAD_MAGIC: usize = 0xdeadbeefcafebabe;
/// Bytes left unused above the initial stack pointer.
const HEADROOM: usize = 2 * core::mem::size_of::<usize>();

/// A heap-allocated stack.
///
/// The lowest word holds [`THREAD_MAGIC`]. A stack that grew past its end
/// overwrites it first.
pub(crate) struct Stack {
    base: NonNull<u8>,
    layout: Layout,
}

impl Stack {
    /// Allocate a stack of `size` bytes, rounded up to the stack alignment.
    pub(crate) fn new(size: usize) -> Result<Self, Error> {
        if size < MIN_STACK_SIZE {
            return Err(Error::InvalidStackSize(size));
        }
        let layout = Layout::from_size_align(size, STACK_ALIGN)
            .map_err(|_| Error::InvalidStackSize(size))?
            .pad_to_align();
        // SAFETY: `layout` has a non-zero size.
        let base = NonNull::new(unsafe { alloc(layout) }).ok_or(Error::StackAllocation(size))?;
        // SAFETY: the allocation is at least MIN_STACK_SIZE bytes and aligned.
        unsafe { base.as_ptr().cast::<usize>().write(THREAD_MAGIC) };
        Ok(Self { base, layout })
    }

    /// The initial stack pointer.
    pub(crate) fn top(&self) -> *mut u8 {
        // SAFETY: HEADROOM is far below MIN_STACK_SIZE.
        unsafe { self.base.as_ptr().add(self.layout.size() - HEADROOM) }
    }

    /// Whether the magic at the bottom of the stack is intact.
    pub(crate) fn is_intact(&self) -> bool {
        // SAFETY: written in `new`, the allocation is still alive.
        unsafe { self.base.as_ptr().cast::<usize>().read() == THREAD_MAGIC }
    }

    /// Usable size in bytes.
    pub(crate) fn size(&self) -> usize {
        self.layout.size()
    }
}

impl Drop for Stack {
    fn drop(&mut self) {
        // SAFETY: allocated in `new` with the same layout.
        unsafe { dealloc(self.base.as_ptr(), self.layout) }
    }
}
