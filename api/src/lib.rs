//! Syscall entry points of the process subsystem.
//!
//! [`imp`] holds the handlers proper, [`interface`] the architecture-specific
//! argument layouts that forward to them. Every handler takes the
//! [`ProcessManager`](proc_core::ProcessManager) and the calling process
//! explicitly and returns a [`LinuxResult`](axerrno::LinuxResult).
#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[macro_use]
extern crate log;

pub mod imp;
pub mod interface;
