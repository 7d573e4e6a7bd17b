use crate::Pid;
use crate::family::ExitOutcome;
use crate::kernel::{Kernel, WaitQueue};
use crate::manager::ProcessManager;
use crate::process::Process;

impl<K: Kernel> ProcessManager<K> {
    /// Terminate `process` with `exit_code` and detach the calling thread.
    ///
    /// Only the first call for a process updates its node; later calls from
    /// other threads of the same process just detach. Never fails.
    pub fn exit(&self, process: &Process<K>, exit_code: i32) {
        let pid = process.get_pid();
        if process.mark_exiting() {
            info!("[exit] process {} exiting with code {}", pid, exit_code);
            self.record_exit(pid, exit_code);
        } else {
            debug!("[exit] process {} is already exiting", pid);
        }
        self.detach_thread(process);
    }

    /// Move the node of `pid` to EXITED and wake waiting parents.
    pub(crate) fn record_exit(&self, pid: Pid, exit_code: i32) {
        let outcome = self.table.lock().exit(pid, exit_code);
        match outcome {
            Some(ExitOutcome::Zombie { parent }) => {
                trace!("[exit] process {} waits for parent {}", pid, parent);
                self.child_exit.notify_all();
            }
            Some(ExitOutcome::Reclaimed) => {
                debug!("[exit] process {} had no parent, reclaimed", pid);
            }
            None => error!("[exit] process {} has no process-info node", pid),
        }
    }
}
