use proc_core::{Kernel, Process, ProcessManager};

/// Terminate `current` and end the calling thread.
pub fn sys_exit_impl<K: Kernel>(
    manager: &ProcessManager<K>,
    current: &Process<K>,
    exit_code: i32,
) -> ! {
    manager.exit(current, exit_code);
    manager.kernel().exit_current_thread(exit_code)
}
