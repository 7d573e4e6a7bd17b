#[path = "../process/tests/common/mod.rs"]
mod common;

use axerrno::LinuxError;
use common::*;
use linux_raw_sys::general::{CLONE_THREAD, SIGCHLD};
use proc_core::PID_MAX;
use proc_kernel::{handle_syscall, handle_user_fault, run_user_app};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;
use std::time::Duration;
use syscalls::Sysno;

fn syscall(
    manager: &Manager,
    current: &std::sync::Arc<MockProcess>,
    sysno: Sysno,
    args: &[usize],
) -> isize {
    let mut regs = [0; 6];
    regs[..args.len()].copy_from_slice(args);
    handle_syscall(manager, current, &mut MockContext::at(0x2000), sysno as usize, regs)
}

fn errno(err: LinuxError) -> isize {
    -(err.code() as isize)
}

#[test]
fn process_queries() {
    let (manager, init) = boot(PID_MAX);
    assert_eq!(syscall(&manager, &init, Sysno::getpid, &[]), 1);
    assert_eq!(syscall(&manager, &init, Sysno::getppid, &[]), 0);
}

#[test]
fn clone_then_wait4() {
    let (manager, init) = boot(PID_MAX);
    assert_eq!(syscall(&manager, &init, Sysno::clone, &[SIGCHLD as usize]), 2);
    let child = manager.kernel().take_spawned().process;
    assert_eq!(syscall(&manager, &child, Sysno::getppid, &[]), 1);

    let exited = catch_unwind(AssertUnwindSafe(|| {
        syscall(&manager, &child, Sysno::exit, &[9]);
    }));
    assert!(exited.is_err());

    assert_eq!(syscall(&manager, &init, Sysno::wait4, &[2, 0x1000, 0]), 2);
    assert_eq!(manager.kernel().read_user(0x1000), Some(9 << 8));
    assert_eq!(
        syscall(&manager, &init, Sysno::wait4, &[2, 0x1000, 0]),
        errno(LinuxError::ECHILD)
    );
}

#[test]
fn errors_become_negative_errno() {
    let (manager, init) = boot(PID_MAX);
    assert_eq!(
        syscall(&manager, &init, Sysno::clone, &[CLONE_THREAD as usize]),
        errno(LinuxError::EINVAL)
    );
    assert_eq!(
        syscall(&manager, &init, Sysno::wait4, &[0, 0, 0]),
        errno(LinuxError::ESRCH)
    );
    assert_eq!(
        syscall(&manager, &init, Sysno::wait4, &[5, 0, 1]),
        errno(LinuxError::EINVAL)
    );
    assert_eq!(
        syscall(&manager, &init, Sysno::mmap, &[]),
        errno(LinuxError::ENOSYS)
    );
}

#[test]
fn execve_rewrites_saved_context() {
    let (manager, init) = boot(PID_MAX);
    let kernel = manager.kernel();
    kernel.install_program("/bin/init2", 0x50_0000);
    kernel.put_user_str(0x1000, "/bin/init2");
    kernel.put_user_argv(0x2000, &["init2"]);

    let mut ctx = MockContext::at(0x2000);
    let regs = [0x1000, 0x2000, 0, 0, 0, 0];
    assert_eq!(handle_syscall(&manager, &init, &mut ctx, Sysno::execve as usize, regs), 0);
    assert_eq!(ctx.pc, 0x50_0000);
    assert_eq!(init.name(), "/bin/init2");

    let regs = [0x1000, BAD_ADDR, 0, 0, 0, 0];
    assert_eq!(
        handle_syscall(&manager, &init, &mut ctx, Sysno::execve as usize, regs),
        errno(LinuxError::EFAULT)
    );
    assert_eq!(ctx.pc, 0x50_0000);
}

#[cfg(target_arch = "x86_64")]
#[test]
fn fork_syscall() {
    let (manager, init) = boot(PID_MAX);
    assert_eq!(syscall(&manager, &init, Sysno::fork, &[]), 2);
    assert_eq!(manager.kernel().take_spawned().ctx.retval, 0);
}

#[test]
fn user_fault_exits_with_efault() {
    let (manager, init) = boot(PID_MAX);
    let child = fork_child(&manager, &init);

    let payload = catch_unwind(AssertUnwindSafe(|| -> () {
        handle_user_fault(&manager, &child, 0xdead)
    }))
    .unwrap_err();
    let code = LinuxError::EFAULT as i32;
    assert_eq!(payload.downcast::<ThreadExit>().unwrap().0, code);
    assert_eq!(manager.wait(&init, 2, 0), Ok((2, code)));
}

#[test]
fn run_user_app_returns_when_everything_exited() {
    let manager = std::sync::Arc::new(Manager::new(MockKernel::default(), Default::default()));
    let runner = {
        let manager = manager.clone();
        thread::spawn(move || {
            let aspace = manager.kernel().new_aspace();
            run_user_app(&manager, "init", aspace, None, MockContext::at(0x1000))
        })
    };
    while manager.kernel().pending_threads() == 0 {
        thread::sleep(Duration::from_millis(5));
    }
    let init = manager.kernel().take_spawned().process;
    let child = fork_child(&manager, &init);

    manager.exit(&init, 0);
    thread::sleep(Duration::from_millis(20));
    assert!(!runner.is_finished());
    manager.exit(&child, 0);

    let stats = runner.join().unwrap().unwrap();
    assert_eq!(stats.live, 0);
    assert_eq!(stats.pids_in_use, 0);
}
