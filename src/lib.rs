//! Process lifecycle for a small teaching kernel: PID allocation, fork, exit
//! and wait, behind a Linux-style syscall interface.
//!
//! The kernel embedding this crate implements [`Kernel`] for its address
//! spaces, scheduler and user-memory access, creates one [`ProcessManager`]
//! at boot and routes syscall traps to [`handle_syscall`].
#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[macro_use]
extern crate log;

mod mm;
mod syscall;

pub use mm::handle_user_fault;
pub use proc_core::{Kernel, Process, ProcessConfig, ProcessManager, TableStats};
pub use syscall::handle_syscall;

use proc_core::ProcResult;

/// Start the first user program and block until every process has gone.
///
/// Returns the final table statistics; anything but an empty table means a
/// process was never collected.
pub fn run_user_app<K: Kernel>(
    manager: &ProcessManager<K>,
    name: &str,
    aspace: K::AddrSpace,
    cwd: Option<K::Dir>,
    ctx: K::Context,
) -> ProcResult<TableStats> {
    let init = manager.spawn(name, Some(aspace), cwd, ctx)?;
    info!("[task manager] running {} as process {}", name, init.get_pid());
    drop(init);
    manager.wait_idle();
    let stats = manager.stats();
    info!("[task manager] all processes exited, {:?}", stats);
    Ok(stats)
}
