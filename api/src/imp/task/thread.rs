use axerrno::LinuxResult;
use proc_core::{Kernel, Process, ProcessManager};
use syscall_trace::syscall_trace;

#[syscall_trace]
pub fn sys_getpid<K: Kernel>(current: &Process<K>) -> LinuxResult<isize> {
    Ok(current.get_pid() as _)
}

#[syscall_trace]
pub fn sys_getppid<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Process<K>,
) -> LinuxResult<isize> {
    Ok(manager.get_ppid(current) as _)
}
