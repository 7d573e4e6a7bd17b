//! Hooks into the rest of the kernel.
//!
//! Address spaces, the scheduler, trap frames and user memory access live
//! outside this crate. The process operations reach them only through
//! [`Kernel`].

use crate::error::ProcResult;
use crate::process::Process;
use alloc::string::String;
use alloc::sync::Arc;

/// Saved user-mode register state of a thread.
pub trait UserContext: Clone + Send {
    /// Sets the value the thread sees as the return value of the syscall it
    /// is resuming from.
    fn set_retval(&mut self, value: usize);

    /// Sets the user stack pointer.
    fn set_sp(&mut self, sp: usize);
}

/// A queue of blocked threads, the condition variable of this crate.
pub trait WaitQueue: Send + Sync {
    /// Blocks the current thread until `condition` returns `true`.
    ///
    /// `condition` must be evaluated after the thread is queued, so that a
    /// [`notify_all`](WaitQueue::notify_all) racing with the check is not
    /// lost. It may be evaluated any number of times.
    fn wait_until<F: Fn() -> bool>(&self, condition: F);

    /// Wakes every thread blocked on this queue.
    fn notify_all(&self);
}

pub trait Kernel: Sized + Send + Sync + 'static {
    /// A user virtual address space.
    type AddrSpace: Send;
    /// A reference to a directory, e.g. the current working directory.
    type Dir: Clone + Send;
    /// Saved user registers, see [`UserContext`].
    type Context: UserContext;
    type WaitQueue: WaitQueue + Default;

    /// Duplicates `src` for a forked child.
    fn copy_addr_space(&self, src: &Self::AddrSpace) -> ProcResult<Self::AddrSpace>;

    fn destroy_addr_space(&self, aspace: Self::AddrSpace);

    /// Creates a thread in `process` that enters user mode with `ctx`.
    ///
    /// The thread is already accounted in `process` when this is called; on
    /// error it must not have run.
    fn spawn_thread(&self, process: Arc<Process<Self>>, ctx: Self::Context) -> ProcResult;

    /// Ends the calling thread. Called by the syscall layer after the process
    /// bookkeeping for `exit` is done.
    fn exit_current_thread(&self, exit_code: i32) -> !;

    /// Stores `value` at user address `addr` of `process`.
    fn write_user_i32(&self, process: &Process<Self>, addr: usize, value: i32) -> ProcResult;

    /// Reads a pointer-sized word at user address `addr` of `process`.
    fn read_user_usize(&self, process: &Process<Self>, addr: usize) -> ProcResult<usize>;

    /// Reads the NUL-terminated string at user address `addr` of `process`.
    fn read_user_str(&self, process: &Process<Self>, addr: usize) -> ProcResult<String>;

    /// Loads the program at `path` into a fresh address space and lays out
    /// `args` and `envs` on its stack.
    ///
    /// Returns the address space and the user entry state of the first
    /// thread. On error nothing is left behind.
    fn load_program(
        &self,
        path: &str,
        args: &[String],
        envs: &[String],
    ) -> ProcResult<(Self::AddrSpace, Self::Context)>;
}
