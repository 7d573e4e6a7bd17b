use axerrno::LinuxResult;
use proc_core::{Kernel, Process, ProcessManager};
use syscall_trace::syscall_trace;

/// Encode an exit code the way `WEXITSTATUS` expects it.
pub fn exit_status(exit_code: i32) -> i32 {
    (exit_code & 0xff) << 8
}

/// Wait for the child `pid` of `current` and reap it.
///
/// The child is reaped before its status is copied out: a bad
/// `status_addr` reports `EFAULT`, but the exit code is gone all the same.
#[syscall_trace]
pub fn sys_wait4<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Process<K>,
    pid: i32,
    status_addr: usize,
    options: u32,
) -> LinuxResult<isize> {
    let (pid, exit_code) = manager.wait(current, pid, options)?;
    if status_addr != 0 {
        manager
            .kernel()
            .write_user_i32(current, status_addr, exit_status(exit_code))?;
    }
    Ok(pid as _)
}
