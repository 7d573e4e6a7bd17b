//! sys_clone:
//! # Arguments
//! - `new_sp`: New stack pointer, `0` to keep a copy of the parent's stack.
//! - `addr_parent_tid`, `addr_child_tid`, `tls`: only meaningful together
//!   with the thread-creation flags, which are not supported.
//!
//! # Archs
//! The argument order differs between architectures, see Linux
//! `kernel/fork.c`:
//! - riscv, aarch64: `CONFIG_CLONE_BACKWARDS`
//! - x86_64, loongarch: `NONE`
use crate::imp::task::{CloneFlags, parse_clone_flags, sys_clone_impl};
use alloc::sync::Arc;
use axerrno::{LinuxError, LinuxResult};
use core::ffi::c_ulong;
use linux_raw_sys::general::SIGCHLD;
use proc_core::{Kernel, Process, ProcessManager};
use syscall_trace::syscall_trace;

// definition for `NONE`
#[cfg(any(target_arch = "x86_64", target_arch = "loongarch64"))]
#[allow(clippy::too_many_arguments)]
#[syscall_trace]
pub fn sys_clone<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Arc<Process<K>>,
    ctx: &K::Context,
    clone_flags: c_ulong,
    new_sp: usize,
    addr_parent_tid: usize,
    addr_child_tid: usize,
    tls: c_ulong,
) -> LinuxResult<isize> {
    sys_clone_(manager, current, ctx, clone_flags, new_sp)
}

// definition for `CONFIG_CLONE_BACKWARDS`
#[cfg(not(any(target_arch = "x86_64", target_arch = "loongarch64")))]
#[allow(clippy::too_many_arguments)]
#[syscall_trace]
pub fn sys_clone<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Arc<Process<K>>,
    ctx: &K::Context,
    clone_flags: c_ulong,
    new_sp: usize,
    addr_parent_tid: usize,
    tls: c_ulong,
    addr_child_tid: usize,
) -> LinuxResult<isize> {
    sys_clone_(manager, current, ctx, clone_flags, new_sp)
}

fn sys_clone_<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Arc<Process<K>>,
    ctx: &K::Context,
    flags: c_ulong,
    new_sp: usize,
) -> LinuxResult<isize> {
    let flags = u32::try_from(flags).map_err(|_| LinuxError::EINVAL)?;
    let (clone_flags, exit_signal) = parse_clone_flags(flags);
    sys_clone_impl(manager, current, ctx, clone_flags, exit_signal, new_sp)
}

#[syscall_trace]
pub fn sys_fork<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Arc<Process<K>>,
    ctx: &K::Context,
) -> LinuxResult<isize> {
    // fork is a special case of clone
    sys_clone_impl(manager, current, ctx, CloneFlags::empty(), SIGCHLD, 0)
}
