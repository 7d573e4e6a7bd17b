use alloc::sync::Arc;
use axerrno::{LinuxError, LinuxResult};
use proc_api::imp::task::*;
use proc_api::interface::task::*;
use proc_core::{Kernel, Process, ProcessManager};
use syscalls::Sysno;

/// Dispatch a syscall made by a thread of `current`.
///
/// `ctx` is the saved user state of the calling thread and `args` are the
/// syscall arguments in register order. Returns the value for the return
/// register: the result, or the negated errno on failure. A successful
/// `execve` overwrites `ctx` with the entry state of the new program.
pub fn handle_syscall<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Arc<Process<K>>,
    ctx: &mut K::Context,
    syscall_num: usize,
    args: [usize; 6],
) -> isize {
    let sysno = Sysno::from(syscall_num as u32);
    info!("[syscall] <{:?}> begin", sysno);
    let result: LinuxResult<isize> = match sysno {
        Sysno::getpid => sys_getpid(current),
        Sysno::getppid => sys_getppid(manager, current),
        #[cfg(target_arch = "x86_64")]
        Sysno::fork => sys_fork(manager, current, &*ctx),
        Sysno::clone => sys_clone(
            manager,
            current,
            &*ctx,
            args[0] as _,
            args[1] as _,
            args[2] as _,
            args[3] as _,
            args[4] as _,
        ),
        Sysno::execve => sys_execve(manager, current, ctx, args[0], args[1], args[2]),
        Sysno::wait4 => sys_wait4(manager, current, args[0] as _, args[1], args[2] as _),
        Sysno::exit => sys_exit(manager, current, args[0] as _),
        Sysno::exit_group => sys_exit_group(manager, current, args[0] as _),
        _ => stub_unimplemented(syscall_num),
    };
    let ans = result.unwrap_or_else(|err| -err.code() as _);
    info!("[syscall] <{:?}> return {:?}", sysno, ans);
    ans
}

fn stub_unimplemented(syscall_num: usize) -> LinuxResult<isize> {
    warn!(
        "Unimplemented syscall: {:?}, ENOSYS",
        Sysno::from(syscall_num as u32)
    );
    Err(LinuxError::ENOSYS)
}
