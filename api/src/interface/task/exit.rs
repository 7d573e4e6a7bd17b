use crate::imp::task::sys_exit_impl;
use core::ffi::c_int;
use proc_core::{Kernel, Process, ProcessManager};

pub fn sys_exit<K: Kernel>(manager: &ProcessManager<K>, current: &Process<K>, status: c_int) -> ! {
    debug!("[syscall] <= sys_exit(status = {})", status);
    sys_exit_impl(manager, current, status)
}

/// Same as [`sys_exit`]: a process ends as a whole whichever thread exits.
pub fn sys_exit_group<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Process<K>,
    status: c_int,
) -> ! {
    debug!("[syscall] <= sys_exit_group(status = {})", status);
    sys_exit_impl(manager, current, status)
}
