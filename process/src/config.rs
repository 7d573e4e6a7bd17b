use crate::Pid;
use crate::error::{ProcError, ProcResult};

/// Largest PID handed out by the registry.
pub const PID_MAX: Pid = 32767;

/// Upper bound for a configured `pid_max`, the same as Linux on 64-bit.
pub const PID_MAX_LIMIT: Pid = 1 << 22;

/// Limit on the total size of the arguments and environment of `exec`,
/// terminating NULs included.
pub const ARG_MAX: usize = 64 * 1024;

/// Boot-time parameters of the process subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessConfig {
    /// PIDs are allocated from `1..=pid_max`.
    pub pid_max: Pid,
}

impl ProcessConfig {
    /// Fails with `InvalidArgument` unless `1 <= pid_max <= PID_MAX_LIMIT`.
    pub fn with_pid_max(pid_max: Pid) -> ProcResult<Self> {
        if !(1..=PID_MAX_LIMIT).contains(&pid_max) {
            return Err(ProcError::InvalidArgument);
        }
        Ok(Self { pid_max })
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self { pid_max: PID_MAX }
    }
}
