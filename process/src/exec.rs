use crate::config::ARG_MAX;
use crate::error::{ProcError, ProcResult};
use crate::kernel::Kernel;
use crate::manager::ProcessManager;
use crate::process::Process;
use alloc::string::String;

impl<K: Kernel> ProcessManager<K> {
    /// Replace the program running in `process` with the one at `path`.
    ///
    /// The new image is loaded into a fresh address space, and the old one is
    /// only dropped once loading succeeded: on any error `process` keeps
    /// running its current program. Returns the user state the calling
    /// thread resumes with.
    ///
    /// The PID, the parent and the children are kept.
    pub fn exec(
        &self,
        process: &Process<K>,
        path: &str,
        args: &[String],
        envs: &[String],
    ) -> ProcResult<K::Context> {
        let pid = process.get_pid();
        if path.is_empty() {
            return Err(ProcError::NotFound);
        }
        let size: usize = args
            .iter()
            .chain(envs)
            .map(|arg| arg.len() + 1)
            .sum::<usize>()
            + path.len()
            + 1;
        if size > ARG_MAX {
            debug!("[exec] process {}: {} bytes of arguments", pid, size);
            return Err(ProcError::ArgumentListTooLong);
        }
        if process.thread_count() > 1 {
            // the other threads would keep running on the old image
            warn!("[exec] process {} is multi-threaded, refusing", pid);
            return Err(ProcError::InvalidArgument);
        }

        let (aspace, ctx) = self
            .kernel
            .load_program(path, args, envs)
            .inspect_err(|err| warn!("[exec] process {}: cannot load {}: {}", pid, path, err))?;
        if let Some(old) = process.replace_image(path, aspace) {
            self.kernel.destroy_addr_space(old);
        }
        info!("[exec] process {} now runs {}, args = {:?}", pid, path, args);
        Ok(ctx)
    }
}
