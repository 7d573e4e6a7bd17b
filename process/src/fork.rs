use crate::Pid;
use crate::error::ProcResult;
use crate::kernel::{Kernel, UserContext};
use crate::manager::ProcessManager;
use crate::process::Process;
use alloc::sync::Arc;

impl<K: Kernel> ProcessManager<K> {
    /// Duplicate `parent` at the point of the syscall described by `ctx`.
    ///
    /// The child resumes from a copy of `ctx` whose return value is `0`. The
    /// parent gets the child's PID. On any error nothing of the child remains.
    pub fn fork(&self, parent: &Arc<Process<K>>, ctx: &K::Context) -> ProcResult<Pid> {
        // address space first, nothing global has been touched yet
        let aspace = parent
            .with_addr_space(|aspace| aspace.map(|aspace| self.kernel.copy_addr_space(aspace)))
            .transpose()
            .inspect_err(|err| {
                warn!(
                    "[fork] process {}: cannot copy address space: {}",
                    parent.get_pid(),
                    err
                )
            })?;

        let pid = match self.table.lock().insert_child(parent.get_pid()) {
            Ok(pid) => pid,
            Err(err) => {
                warn!("[fork] process {}: {}", parent.get_pid(), err);
                if let Some(aspace) = aspace {
                    self.kernel.destroy_addr_space(aspace);
                }
                return Err(err);
            }
        };

        let name = parent.name() + "_";
        let child = self.new_container(pid, name, aspace, parent.cwd());

        let mut child_ctx = ctx.clone();
        child_ctx.set_retval(0);
        self.start(&child, child_ctx)?;

        debug!("[fork] process {} forked child {}", parent.get_pid(), pid);
        Ok(pid)
    }
}
