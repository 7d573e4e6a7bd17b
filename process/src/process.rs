use crate::Pid;
use crate::kernel::Kernel;
use alloc::string::String;
use core::sync::atomic::{AtomicBool, Ordering};
use spin::Mutex;

struct Resources<K: Kernel> {
    aspace: Option<K::AddrSpace>,
    cwd: Option<K::Dir>,
    threads: usize,
    destroyed: bool,
}

/// The execution side of a process: threads, address space and working
/// directory.
///
/// The exit status lives in the process-info node instead, which can outlive
/// the container. The container is torn down when its last thread detaches.
pub struct Process<K: Kernel> {
    pid: Pid,
    name: Mutex<String>,
    exiting: AtomicBool,
    resources: Mutex<Resources<K>>,
}

impl<K: Kernel> Process<K> {
    pub(crate) fn new(
        pid: Pid,
        name: String,
        aspace: Option<K::AddrSpace>,
        cwd: Option<K::Dir>,
    ) -> Self {
        Self {
            pid,
            name: Mutex::new(name),
            exiting: AtomicBool::new(false),
            resources: Mutex::new(Resources {
                aspace,
                cwd,
                threads: 0,
                destroyed: false,
            }),
        }
    }

    pub fn get_pid(&self) -> Pid {
        self.pid
    }

    pub fn name(&self) -> String {
        self.name.lock().clone()
    }

    /// Whether the process has begun exiting, through `exit` or its last thread leaving.
    pub fn is_exiting(&self) -> bool {
        self.exiting.load(Ordering::Acquire)
    }

    /// Returns `true` for the first caller only.
    pub(crate) fn mark_exiting(&self) -> bool {
        !self.exiting.swap(true, Ordering::AcqRel)
    }

    pub fn thread_count(&self) -> usize {
        self.resources.lock().threads
    }

    pub fn is_destroyed(&self) -> bool {
        self.resources.lock().destroyed
    }

    /// Run `f` on the address space, `None` for a process without user memory.
    pub fn with_addr_space<R>(&self, f: impl FnOnce(Option<&K::AddrSpace>) -> R) -> R {
        f(self.resources.lock().aspace.as_ref())
    }

    pub fn cwd(&self) -> Option<K::Dir> {
        self.resources.lock().cwd.clone()
    }

    pub fn set_cwd(&self, cwd: Option<K::Dir>) -> Option<K::Dir> {
        core::mem::replace(&mut self.resources.lock().cwd, cwd)
    }

    /// Install the image of a newly loaded program and return the old
    /// address space.
    pub(crate) fn replace_image(
        &self,
        name: &str,
        aspace: K::AddrSpace,
    ) -> Option<K::AddrSpace> {
        *self.name.lock() = String::from(name);
        self.resources.lock().aspace.replace(aspace)
    }

    pub(crate) fn attach_thread(&self) {
        let mut resources = self.resources.lock();
        assert!(
            !resources.destroyed,
            "[process] attaching a thread to destroyed process {}",
            self.pid
        );
        resources.threads += 1;
    }

    /// Detach one thread. The last one out tears the container down; returns
    /// `true` in that case.
    pub(crate) fn detach_thread(&self, kernel: &K) -> bool {
        let (aspace, cwd) = {
            let mut resources = self.resources.lock();
            assert!(
                resources.threads > 0,
                "[process] detaching a thread from process {} with none attached",
                self.pid
            );
            resources.threads -= 1;
            if resources.threads > 0 {
                return false;
            }
            resources.destroyed = true;
            (resources.aspace.take(), resources.cwd.take())
        };
        debug!("[process] destroying container of process {}", self.pid);
        if let Some(aspace) = aspace {
            kernel.destroy_addr_space(aspace);
        }
        drop(cwd);
        true
    }
}
