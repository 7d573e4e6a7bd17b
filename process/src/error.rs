use axerrno::LinuxError;
use core::fmt;

/// Recoverable failures of the process operations.
///
/// Kernel bugs (double free of a PID, reaping a node twice, a cycle in the
/// family tree) are not represented here: they panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcError {
    /// A kernel allocation needed by the operation failed.
    OutOfMemory,
    /// Every PID is in use.
    ProcessLimitExceeded,
    /// Unsupported option or malformed argument.
    InvalidArgument,
    /// The PID names no process the caller could know about.
    NoSuchProcess,
    /// The PID is in use, but not by a child of the caller.
    NotAChild,
    /// A user-space address could not be read or written.
    BadAddress,
    /// No program at the given path.
    NotFound,
    /// Arguments and environment of a new program are too large.
    ArgumentListTooLong,
}

pub type ProcResult<T = ()> = Result<T, ProcError>;

impl ProcError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcError::OutOfMemory => "out of memory",
            ProcError::ProcessLimitExceeded => "process limit exceeded",
            ProcError::InvalidArgument => "invalid argument",
            ProcError::NoSuchProcess => "no such process",
            ProcError::NotAChild => "not a child of the caller",
            ProcError::BadAddress => "bad address",
            ProcError::NotFound => "no such file or directory",
            ProcError::ArgumentListTooLong => "argument list too long",
        }
    }
}

impl fmt::Display for ProcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProcError> for LinuxError {
    fn from(err: ProcError) -> Self {
        match err {
            ProcError::OutOfMemory => LinuxError::ENOMEM,
            ProcError::ProcessLimitExceeded => LinuxError::EAGAIN,
            ProcError::InvalidArgument => LinuxError::EINVAL,
            ProcError::NoSuchProcess => LinuxError::ESRCH,
            ProcError::NotAChild => LinuxError::ECHILD,
            ProcError::BadAddress => LinuxError::EFAULT,
            ProcError::NotFound => LinuxError::ENOENT,
            ProcError::ArgumentListTooLong => LinuxError::E2BIG,
        }
    }
}
