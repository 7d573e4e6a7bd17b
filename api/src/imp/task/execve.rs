use alloc::string::String;
use alloc::vec::Vec;
use axerrno::LinuxResult;
use proc_core::{Kernel, Process, ProcessManager};

/// Replace the program of `current`; the calling thread resumes in the new
/// image through `ctx`.
///
/// On failure `ctx` is left alone and the caller keeps running the old
/// program.
pub fn sys_execve_impl<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Process<K>,
    ctx: &mut K::Context,
    path: String,
    args: Vec<String>,
    envs: Vec<String>,
) -> LinuxResult<isize> {
    debug!("[execve] args = {:?}, envs = {:?}", &args, &envs);
    *ctx = manager.exec(current, &path, &args, &envs)?;
    Ok(0)
}
