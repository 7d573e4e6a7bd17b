//! Process lifecycle management for a teaching kernel.
//!
//! A process is split in two: the [`Process`] container (threads, address
//! space, working directory) and its process-info node in the [`FamilyTree`],
//! which records the exit state and the parent/children links. The node
//! outlives the container so that a parent can still collect the exit code.
//!
//! All nodes and the PID table are guarded by one lock owned by the
//! [`ProcessManager`], which implements fork, exec, exit and wait on top of
//! them.
#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod family;
mod exec;
mod exit;
mod fork;
pub mod kernel;
pub mod manager;
pub mod pid;
pub mod process;
pub mod wait;

/// Type alias for process ID.
/// Linux uses `int` for these IDs, which is typically 32 bits.
pub type Pid = u32;

pub use config::{ARG_MAX, PID_MAX, PID_MAX_LIMIT, ProcessConfig};
pub use error::{ProcError, ProcResult};
pub use family::{FamilyTree, Owner, ProcessInfo, TableStats};
pub use kernel::{Kernel, UserContext, WaitQueue};
pub use manager::ProcessManager;
pub use pid::PidRegistry;
pub use process::Process;
pub use wait::WaitOptions;
