use axerrno::LinuxError;
use proc_api::imp::task::sys_exit_impl;
use proc_core::{Kernel, Process, ProcessManager};

/// Kill `current` after a user memory fault the address space could not
/// resolve. Its parent sees `EFAULT` as the exit code.
pub fn handle_user_fault<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Process<K>,
    vaddr: usize,
) -> ! {
    warn!(
        "process {}: segmentation fault at {:#x}, exit!",
        current.get_pid(),
        vaddr
    );
    sys_exit_impl(manager, current, LinuxError::EFAULT as _)
}
