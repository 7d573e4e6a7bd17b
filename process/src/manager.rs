use crate::Pid;
use crate::config::ProcessConfig;
use crate::error::{ProcError, ProcResult};
use crate::family::{FamilyTree, TableStats};
use crate::kernel::{Kernel, WaitQueue};
use crate::process::Process;
use alloc::string::String;
use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};
use spin::Mutex;

/// The process subsystem: one instance per kernel, created at boot and
/// consumed by [`shutdown`](Self::shutdown).
///
/// `table` is the single lock of the subsystem. It guards the PID registry
/// and every process-info node; containers are outside of it.
pub struct ProcessManager<K: Kernel> {
    pub(crate) kernel: K,
    pub(crate) table: Mutex<FamilyTree>,
    /// Broadcast whenever a child becomes collectable or disappears.
    pub(crate) child_exit: K::WaitQueue,
    /// Broadcast when the last container goes away.
    idle: K::WaitQueue,
    containers: AtomicUsize,
    pid_max: Pid,
}

impl<K: Kernel> ProcessManager<K> {
    pub fn new(kernel: K, config: ProcessConfig) -> Self {
        info!("[process] pid table initialized, pid_max = {}", config.pid_max);
        Self {
            kernel,
            table: Mutex::new(FamilyTree::new(config.pid_max)),
            child_exit: K::WaitQueue::default(),
            idle: K::WaitQueue::default(),
            containers: AtomicUsize::new(0),
            pid_max: config.pid_max,
        }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn pid_max(&self) -> Pid {
        self.pid_max
    }

    /// Create a process without a parent, e.g. the first user program.
    ///
    /// `aspace` comes from the program loader, `ctx` is the user entry state
    /// of its first thread.
    pub fn spawn(
        &self,
        name: &str,
        aspace: Option<K::AddrSpace>,
        cwd: Option<K::Dir>,
        ctx: K::Context,
    ) -> ProcResult<Arc<Process<K>>> {
        let pid = match self.table.lock().insert_root() {
            Ok(pid) => pid,
            Err(err) => {
                warn!("[process] cannot spawn {}: {}", name, err);
                if let Some(aspace) = aspace {
                    self.kernel.destroy_addr_space(aspace);
                }
                return Err(err);
            }
        };
        let process = self.new_container(pid, String::from(name), aspace, cwd);
        self.start(&process, ctx)?;
        info!("[process] spawned {} as process {}", name, pid);
        Ok(process)
    }

    /// The parent PID of `process`, `0` for roots and orphans.
    pub fn get_ppid(&self, process: &Process<K>) -> Pid {
        self.table.lock().parent_of(process.get_pid()).unwrap_or(0)
    }

    pub fn stats(&self) -> TableStats {
        self.table.lock().stats()
    }

    /// Number of containers that still have threads attached.
    pub fn live_containers(&self) -> usize {
        self.containers.load(Ordering::Acquire)
    }

    /// Run `f` with the family tree locked.
    pub fn with_table<R>(&self, f: impl FnOnce(&FamilyTree) -> R) -> R {
        f(&self.table.lock())
    }

    /// Block until every container has been torn down.
    pub fn wait_idle(&self) {
        self.idle
            .wait_until(|| self.containers.load(Ordering::Acquire) == 0);
    }

    /// Start another thread in `process`, entering user mode with `ctx`.
    pub fn add_thread(&self, process: &Arc<Process<K>>, ctx: K::Context) -> ProcResult {
        process.attach_thread();
        self.kernel
            .spawn_thread(process.clone(), ctx)
            .inspect_err(|err| {
                warn!("[process] process {}: cannot add thread: {}", process.get_pid(), err);
                self.detach_thread(process);
            })
    }

    /// Detach a thread of `process` that ends without calling `exit`.
    ///
    /// If it was the last thread and nobody called `exit`, the process
    /// terminates with code `0`.
    pub fn detach_thread(&self, process: &Process<K>) {
        if process.detach_thread(&self.kernel) {
            if process.mark_exiting() {
                info!(
                    "[exit] last thread of process {} left, exiting with code 0",
                    process.get_pid()
                );
                self.record_exit(process.get_pid(), 0);
            }
            let remaining = self.containers.fetch_sub(1, Ordering::AcqRel) - 1;
            if remaining == 0 {
                self.idle.notify_all();
            }
        }
    }

    /// Tear the subsystem down at kernel shutdown.
    ///
    /// Panics if the family tree is inconsistent.
    pub fn shutdown(self) -> TableStats {
        let table = self.table.into_inner();
        table.verify();
        let stats = table.stats();
        if stats.live > 0 {
            warn!(
                "[process] shutting down with {} processes ({} zombies) left",
                stats.live, stats.zombies
            );
        }
        let containers = self.containers.load(Ordering::Acquire);
        if containers > 0 {
            warn!("[process] {} containers still have threads", containers);
        }
        stats
    }

    pub(crate) fn new_container(
        &self,
        pid: Pid,
        name: String,
        aspace: Option<K::AddrSpace>,
        cwd: Option<K::Dir>,
    ) -> Arc<Process<K>> {
        self.containers.fetch_add(1, Ordering::AcqRel);
        Arc::new(Process::new(pid, name, aspace, cwd))
    }

    /// Attach the first thread of a new process and hand it to the scheduler.
    ///
    /// On failure everything the process holds is released: its node, its
    /// PID and its container.
    pub(crate) fn start(&self, process: &Arc<Process<K>>, ctx: K::Context) -> ProcResult {
        process.attach_thread();
        if let Err(err) = self.kernel.spawn_thread(process.clone(), ctx) {
            let pid = process.get_pid();
            warn!("[process] cannot start process {}: {}", pid, err);
            self.table.lock().discard(pid);
            // a sibling thread of the parent may already be waiting for this pid
            self.child_exit.notify_all();
            // the node is gone, there is no exit to record
            process.mark_exiting();
            self.detach_thread(process);
            return Err(err);
        }
        Ok(())
    }

    pub(crate) fn check_pid(&self, pid: i32) -> ProcResult<Pid> {
        match Pid::try_from(pid) {
            Ok(pid) if (1..=self.pid_max).contains(&pid) => Ok(pid),
            _ => Err(ProcError::NoSuchProcess),
        }
    }
}
