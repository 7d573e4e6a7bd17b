use alloc::sync::Arc;
use axerrno::{LinuxError, LinuxResult};
use bitflags::bitflags;
use linux_raw_sys::general::*;
use proc_core::{Kernel, Process, ProcessManager, UserContext};

bitflags! {
    /// Options for use with [`sys_clone`](crate::interface::task::sys_clone).
    ///
    /// Only the thread-creation options are named, for diagnostics. The
    /// process subsystem creates full copies, so any set bit is rejected,
    /// named or not.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct CloneFlags: u32 {
        const VM = CLONE_VM;
        const FILES = CLONE_FILES;
        const SIGHAND = CLONE_SIGHAND;
        const VFORK = CLONE_VFORK;
        const THREAD = CLONE_THREAD;
        const SETTLS = CLONE_SETTLS;
        const PARENT_SETTID = CLONE_PARENT_SETTID;
        const CHILD_CLEARTID = CLONE_CHILD_CLEARTID;
        const CHILD_SETTID = CLONE_CHILD_SETTID;
    }
}

/// Split the raw `clone` flags word into the option bits and the exit signal.
///
/// Unnamed option bits are kept so that they are rejected too.
pub fn parse_clone_flags(flags: u32) -> (CloneFlags, u32) {
    (CloneFlags::from_bits_retain(flags & !CSIGNAL), flags & CSIGNAL)
}

/// Fork `current`, the child resuming from `ctx`.
///
/// If `new_sp` is non-zero the child starts on that stack instead of the
/// copy of the parent's. Returns the child's PID to the parent.
pub fn sys_clone_impl<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Arc<Process<K>>,
    ctx: &K::Context,
    clone_flags: CloneFlags,
    exit_signal: u32,
    new_sp: usize,
) -> LinuxResult<isize> {
    if !clone_flags.is_empty() {
        debug!("[syscall] clone: unsupported flags {:?}", clone_flags);
        return Err(LinuxError::EINVAL);
    }
    if exit_signal != 0 && exit_signal != SIGCHLD {
        debug!("[syscall] clone: unsupported exit signal {}", exit_signal);
        return Err(LinuxError::EINVAL);
    }

    let pid = if new_sp != 0 {
        let mut child_ctx = ctx.clone();
        child_ctx.set_sp(new_sp);
        manager.fork(current, &child_ctx)?
    } else {
        manager.fork(current, ctx)?
    };
    Ok(pid as _)
}
