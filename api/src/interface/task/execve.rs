use crate::imp::task::sys_execve_impl;
use alloc::string::String;
use alloc::vec::Vec;
use axerrno::{LinuxError, LinuxResult};
use core::mem::size_of;
use proc_core::{ARG_MAX, Kernel, Process, ProcessManager};
use syscall_trace::syscall_trace;

/// Read the NULL-terminated array of string pointers at `array`.
///
/// A null `array` is an empty list.
fn get_string_array<K: Kernel>(
    kernel: &K,
    current: &Process<K>,
    array: usize,
) -> LinuxResult<Vec<String>> {
    let mut strings = Vec::new();
    if array == 0 {
        return Ok(strings);
    }
    let mut addr = array;
    loop {
        let ptr = kernel.read_user_usize(current, addr)?;
        if ptr == 0 {
            return Ok(strings);
        }
        // every entry costs at least its terminating NUL
        if strings.len() >= ARG_MAX {
            return Err(LinuxError::E2BIG);
        }
        strings.push(kernel.read_user_str(current, ptr)?);
        addr = addr.checked_add(size_of::<usize>()).ok_or(LinuxError::EFAULT)?;
    }
}

#[syscall_trace]
pub fn sys_execve<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Process<K>,
    ctx: &mut K::Context,
    path: usize,
    argv: usize,
    envp: usize,
) -> LinuxResult<isize> {
    if path == 0 {
        return Err(LinuxError::EFAULT);
    }
    let kernel = manager.kernel();
    let path = kernel.read_user_str(current, path)?;
    let args = get_string_array(kernel, current, argv)?;
    let envs = get_string_array(kernel, current, envp)?;
    sys_execve_impl(manager, current, ctx, path, args, envs)
}
