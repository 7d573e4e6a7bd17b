use crate::Pid;
use crate::error::{ProcError, ProcResult};
use crate::family::ChildState;
use crate::kernel::{Kernel, WaitQueue};
use crate::manager::ProcessManager;
use crate::process::Process;
use bitflags::bitflags;
use linux_raw_sys::general::{
    __WALL, __WCLONE, __WNOTHREAD, WCONTINUED, WEXITED, WNOHANG, WNOWAIT, WUNTRACED,
};

bitflags! {
    /// Flags a caller may pass to `wait`.
    ///
    /// None of them is supported: the only accepted value is the empty set,
    /// which blocks until the given child has exited and then reaps it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WaitOptions: u32 {
        /// Do not block when there are no processes wishing to report status.
        const WNOHANG = WNOHANG;
        /// Report the status of stopped children.
        const WUNTRACED = WUNTRACED;
        /// Report the status of children which have terminated.
        const WEXITED = WEXITED;
        /// Report the status of children that continued after a stop.
        const WCONTINUED = WCONTINUED;
        /// Don't reap, just poll status.
        const WNOWAIT = WNOWAIT;
        /// Don't wait on children of other threads in this group
        const WNOTHREAD = __WNOTHREAD;
        /// Wait on all children, regardless of type
        const WALL = __WALL;
        /// Wait for "clone" children only.
        const WCLONE = __WCLONE;
    }
}

impl<K: Kernel> ProcessManager<K> {
    /// Wait for the child `pid` of `current` to exit and reap it.
    ///
    /// Returns the child's PID and exit code. Blocks for as long as the child
    /// runs; there is no timeout.
    pub fn wait(&self, current: &Process<K>, pid: i32, options: u32) -> ProcResult<(Pid, i32)> {
        if options != 0 {
            debug!(
                "[wait] unsupported options {:?}",
                WaitOptions::from_bits_retain(options)
            );
            return Err(ProcError::InvalidArgument);
        }
        let pid = self.check_pid(pid)?;
        let caller = current.get_pid();

        loop {
            {
                let mut table = self.table.lock();
                match table.child_state(caller, pid) {
                    ChildState::Exited(_) => {
                        let exit_code = table.reap(caller, pid);
                        drop(table);
                        debug!(
                            "[wait] process {} reaped child {} with code {}",
                            caller, pid, exit_code
                        );
                        return Ok((pid, exit_code));
                    }
                    ChildState::Absent => return Err(table.absent_child_error(caller, pid)),
                    ChildState::Running => {}
                }
            }
            trace!("[wait] process {} blocks on child {}", caller, pid);
            self.child_exit.wait_until(|| {
                self.table.lock().child_state(caller, pid) != ChildState::Running
            });
        }
    }
}
