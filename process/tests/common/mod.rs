#![allow(dead_code)]

use proc_core::{
    Kernel, ProcError, ProcResult, Process, ProcessConfig, ProcessManager, UserContext, WaitQueue,
};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};

/// Address the mock user memory refuses to write.
pub const BAD_ADDR: usize = 0xdead_0000;

#[derive(Default)]
pub struct CondvarQueue {
    lock: Mutex<()>,
    cond: Condvar,
}

impl WaitQueue for CondvarQueue {
    fn wait_until<F: Fn() -> bool>(&self, condition: F) {
        let mut guard = self.lock.lock().unwrap();
        while !condition() {
            guard = self.cond.wait(guard).unwrap();
        }
    }

    fn notify_all(&self) {
        let _guard = self.lock.lock().unwrap();
        self.cond.notify_all();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockContext {
    pub pc: usize,
    pub sp: usize,
    pub retval: usize,
}

impl MockContext {
    pub fn at(pc: usize) -> Self {
        Self {
            pc,
            sp: 0x7fff_0000,
            retval: usize::MAX,
        }
    }
}

impl UserContext for MockContext {
    fn set_retval(&mut self, value: usize) {
        self.retval = value;
    }

    fn set_sp(&mut self, sp: usize) {
        self.sp = sp;
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockAddrSpace {
    pub id: u64,
}

/// Unwind payload of a thread that called `exit_current_thread`.
#[derive(Debug)]
pub struct ThreadExit(pub i32);

pub struct Spawned {
    pub process: Arc<Process<MockKernel>>,
    pub ctx: MockContext,
}

/// Records scheduled threads instead of running them; tests play the part of
/// those threads.
#[derive(Default)]
pub struct MockKernel {
    next_aspace: AtomicU64,
    live_aspaces: AtomicUsize,
    pub fail_copy: AtomicBool,
    pub fail_spawn: AtomicBool,
    spawned: Mutex<VecDeque<Spawned>>,
    user_memory: Mutex<BTreeMap<usize, i32>>,
    user_words: Mutex<BTreeMap<usize, usize>>,
    user_strings: Mutex<BTreeMap<usize, String>>,
    /// Program path to entry point.
    programs: Mutex<BTreeMap<String, usize>>,
    /// Arguments and environment of every successful load.
    pub loaded: Mutex<Vec<(String, Vec<String>, Vec<String>)>>,
}

impl MockKernel {
    pub fn new_aspace(&self) -> MockAddrSpace {
        self.live_aspaces.fetch_add(1, Ordering::SeqCst);
        MockAddrSpace {
            id: self.next_aspace.fetch_add(1, Ordering::SeqCst),
        }
    }

    pub fn live_aspaces(&self) -> usize {
        self.live_aspaces.load(Ordering::SeqCst)
    }

    pub fn take_spawned(&self) -> Spawned {
        self.spawned
            .lock()
            .unwrap()
            .pop_front()
            .expect("no thread was spawned")
    }

    pub fn pending_threads(&self) -> usize {
        self.spawned.lock().unwrap().len()
    }

    pub fn read_user(&self, addr: usize) -> Option<i32> {
        self.user_memory.lock().unwrap().get(&addr).copied()
    }

    pub fn put_user_word(&self, addr: usize, value: usize) {
        self.user_words.lock().unwrap().insert(addr, value);
    }

    pub fn put_user_str(&self, addr: usize, value: &str) {
        self.user_strings
            .lock()
            .unwrap()
            .insert(addr, value.to_string());
    }

    /// Lay out a NULL-terminated array of strings at `addr`, the strings
    /// themselves at `addr + 0x100` onwards.
    pub fn put_user_argv(&self, addr: usize, args: &[&str]) {
        for (i, arg) in args.iter().enumerate() {
            let str_addr = addr + 0x100 + i * 0x40;
            self.put_user_str(str_addr, arg);
            self.put_user_word(addr + i * 8, str_addr);
        }
        self.put_user_word(addr + args.len() * 8, 0);
    }

    pub fn install_program(&self, path: &str, entry: usize) {
        self.programs
            .lock()
            .unwrap()
            .insert(path.to_string(), entry);
    }
}

impl Kernel for MockKernel {
    type AddrSpace = MockAddrSpace;
    type Dir = Arc<str>;
    type Context = MockContext;
    type WaitQueue = CondvarQueue;

    fn copy_addr_space(&self, _src: &MockAddrSpace) -> ProcResult<MockAddrSpace> {
        if self.fail_copy.load(Ordering::SeqCst) {
            return Err(ProcError::OutOfMemory);
        }
        Ok(self.new_aspace())
    }

    fn destroy_addr_space(&self, _aspace: MockAddrSpace) {
        self.live_aspaces.fetch_sub(1, Ordering::SeqCst);
    }

    fn spawn_thread(&self, process: Arc<Process<Self>>, ctx: MockContext) -> ProcResult {
        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(ProcError::OutOfMemory);
        }
        self.spawned
            .lock()
            .unwrap()
            .push_back(Spawned { process, ctx });
        Ok(())
    }

    fn exit_current_thread(&self, exit_code: i32) -> ! {
        std::panic::resume_unwind(Box::new(ThreadExit(exit_code)))
    }

    fn write_user_i32(&self, _process: &Process<Self>, addr: usize, value: i32) -> ProcResult {
        if addr == BAD_ADDR {
            return Err(ProcError::BadAddress);
        }
        self.user_memory.lock().unwrap().insert(addr, value);
        Ok(())
    }

    fn read_user_usize(&self, _process: &Process<Self>, addr: usize) -> ProcResult<usize> {
        self.user_words
            .lock()
            .unwrap()
            .get(&addr)
            .copied()
            .ok_or(ProcError::BadAddress)
    }

    fn read_user_str(&self, _process: &Process<Self>, addr: usize) -> ProcResult<String> {
        self.user_strings
            .lock()
            .unwrap()
            .get(&addr)
            .cloned()
            .ok_or(ProcError::BadAddress)
    }

    fn load_program(
        &self,
        path: &str,
        args: &[String],
        envs: &[String],
    ) -> ProcResult<(MockAddrSpace, MockContext)> {
        let entry = *self
            .programs
            .lock()
            .unwrap()
            .get(path)
            .ok_or(ProcError::NotFound)?;
        self.loaded
            .lock()
            .unwrap()
            .push((path.to_string(), args.to_vec(), envs.to_vec()));
        Ok((self.new_aspace(), MockContext::at(entry)))
    }
}

pub type Manager = ProcessManager<MockKernel>;
pub type MockProcess = Process<MockKernel>;

/// Start a manager with an `init` process (pid 1) whose thread is the caller.
pub fn boot(pid_max: u32) -> (Arc<Manager>, Arc<MockProcess>) {
    let config = ProcessConfig::with_pid_max(pid_max).unwrap();
    let manager = Arc::new(ProcessManager::new(MockKernel::default(), config));
    let aspace = manager.kernel().new_aspace();
    let init = manager
        .spawn("init", Some(aspace), Some(Arc::from("/")), MockContext::at(0x1000))
        .unwrap();
    manager.kernel().take_spawned();
    (manager, init)
}

/// Fork `parent` and return the child container once its thread is "running".
pub fn fork_child(manager: &Manager, parent: &Arc<MockProcess>) -> Arc<MockProcess> {
    let pid = manager.fork(parent, &MockContext::at(0x2000)).unwrap();
    let spawned = manager.kernel().take_spawned();
    assert_eq!(spawned.process.get_pid(), pid);
    assert_eq!(spawned.ctx.retval, 0);
    spawned.process
}
