//! Process-info nodes and the family tree that links them.
//!
//! Nodes live in an arena keyed by PID. Links between nodes are PIDs, never
//! references, so destroying a node cannot leave anything dangling: every
//! destruction goes through [`FamilyTree`] and unlinks the node from its
//! parent in the same critical section.

use crate::Pid;
use crate::error::{ProcError, ProcResult};
use crate::pid::PidRegistry;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

/// Who is responsible for a node once it has exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// The parent collects the exit status with `wait`.
    Parent(Pid),
    /// Nobody can wait for this node; it is reclaimed as soon as it exits.
    /// Roots start here and orphans are moved here when their parent exits.
    Registry,
}

/// Process-info node: the part of a process that survives until it is reaped.
#[derive(Debug)]
pub struct ProcessInfo {
    pid: Pid,
    exit_code: Option<i32>,
    owner: Owner,
    children: Vec<Pid>,
}

impl ProcessInfo {
    fn new(pid: Pid, owner: Owner) -> Self {
        Self {
            pid,
            exit_code: None,
            owner,
            children: Vec::new(),
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn is_exited(&self) -> bool {
        self.exit_code.is_some()
    }

    /// `None` while the process is running.
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn parent(&self) -> Option<Pid> {
        match self.owner {
            Owner::Parent(parent) => Some(parent),
            Owner::Registry => None,
        }
    }

    pub fn children(&self) -> &[Pid] {
        &self.children
    }

    fn set_exited(&mut self, exit_code: i32) {
        if let Some(previous) = self.exit_code {
            panic!(
                "[process] process {} exited twice (codes {} and {})",
                self.pid, previous, exit_code
            );
        }
        self.exit_code = Some(exit_code);
    }
}

/// What became of a node after its process exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Kept as a zombie until `parent` waits for it.
    Zombie { parent: Pid },
    /// Destroyed on the spot, its PID is free.
    Reclaimed,
}

/// A node as seen by a parent looking for one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    Running,
    Exited(i32),
    /// Not a child of the asking parent (or no process at all).
    Absent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Nodes in the tree, zombies included.
    pub live: usize,
    /// Exited nodes waiting to be reaped.
    pub zombies: usize,
    /// Running nodes owned by the registry.
    pub orphans: usize,
    pub pids_in_use: usize,
}

/// All process-info nodes plus the PID registry, guarded as one unit.
pub struct FamilyTree {
    pids: PidRegistry,
    nodes: BTreeMap<Pid, ProcessInfo>,
}

impl FamilyTree {
    pub fn new(pid_max: Pid) -> Self {
        Self {
            pids: PidRegistry::new(pid_max),
            nodes: BTreeMap::new(),
        }
    }

    pub fn pids(&self) -> &PidRegistry {
        &self.pids
    }

    pub fn get(&self, pid: Pid) -> Option<&ProcessInfo> {
        self.nodes.get(&pid)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a parentless node.
    pub fn insert_root(&mut self) -> ProcResult<Pid> {
        let pid = self.pids.allocate()?;
        self.insert_node(ProcessInfo::new(pid, Owner::Registry));
        Ok(pid)
    }

    /// Create a node as a child of `parent`.
    ///
    /// A parent that has already exited cannot wait any more, so the child
    /// starts out owned by the registry.
    pub fn insert_child(&mut self, parent: Pid) -> ProcResult<Pid> {
        let pid = self.pids.allocate()?;
        let owner = match self.nodes.get_mut(&parent) {
            Some(node) if !node.is_exited() => {
                if node.children.try_reserve(1).is_err() {
                    self.pids.free(pid);
                    return Err(ProcError::OutOfMemory);
                }
                node.children.push(pid);
                Owner::Parent(parent)
            }
            _ => {
                debug!(
                    "[process] parent {} is gone, process {} starts orphaned",
                    parent, pid
                );
                Owner::Registry
            }
        };
        self.insert_node(ProcessInfo::new(pid, owner));
        Ok(pid)
    }

    fn insert_node(&mut self, node: ProcessInfo) {
        let pid = node.pid;
        if self.nodes.insert(pid, node).is_some() {
            panic!("[process] pid {} is claimed by two processes", pid);
        }
    }

    /// Undo [`insert_root`](Self::insert_root) or
    /// [`insert_child`](Self::insert_child) for a process that never ran.
    pub fn discard(&mut self, pid: Pid) {
        let node = self.destroy(pid, None);
        assert!(
            !node.is_exited(),
            "[process] discarding process {} that already exited",
            pid
        );
    }

    /// Record the termination of `pid`.
    ///
    /// Exited children are destroyed, running ones are handed to the
    /// registry. Returns `None` if `pid` has no node.
    pub fn exit(&mut self, pid: Pid, exit_code: i32) -> Option<ExitOutcome> {
        let children = core::mem::take(&mut self.nodes.get_mut(&pid)?.children);
        for child in children {
            let node = self.node_mut(child);
            node.owner = Owner::Registry;
            if node.is_exited() {
                trace!("[process] reclaiming zombie {} of exiting {}", child, pid);
                self.destroy(child, None);
            } else {
                trace!("[process] process {} orphaned by {}", child, pid);
            }
        }

        let node = self.node_mut(pid);
        node.set_exited(exit_code);
        let owner = node.owner;
        match owner {
            Owner::Parent(parent) => Some(ExitOutcome::Zombie { parent }),
            Owner::Registry => {
                self.destroy(pid, None);
                Some(ExitOutcome::Reclaimed)
            }
        }
    }

    pub fn child_state(&self, parent: Pid, pid: Pid) -> ChildState {
        match self.nodes.get(&pid) {
            Some(node) if node.owner == Owner::Parent(parent) => match node.exit_code {
                Some(code) => ChildState::Exited(code),
                None => ChildState::Running,
            },
            _ => ChildState::Absent,
        }
    }

    /// The error `caller` gets when `pid` is not one of its children.
    pub fn absent_child_error(&self, caller: Pid, pid: Pid) -> ProcError {
        if self.pids.is_allocated(pid) || self.pids.reaped_by(pid) == Some(caller) {
            ProcError::NotAChild
        } else {
            ProcError::NoSuchProcess
        }
    }

    /// Consume the exited child `pid` of `parent` and return its exit code.
    pub fn reap(&mut self, parent: Pid, pid: Pid) -> i32 {
        let exit_code = match self.child_state(parent, pid) {
            ChildState::Exited(code) => code,
            state => panic!(
                "[process] process {} reaping {} in state {:?}",
                parent, pid, state
            ),
        };
        self.destroy(pid, Some(parent));
        exit_code
    }

    pub fn parent_of(&self, pid: Pid) -> Option<Pid> {
        self.nodes.get(&pid)?.parent()
    }

    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            live: self.nodes.len(),
            pids_in_use: self.pids.in_use(),
            ..TableStats::default()
        };
        for node in self.nodes.values() {
            if node.is_exited() {
                stats.zombies += 1;
            } else if node.owner == Owner::Registry {
                stats.orphans += 1;
            }
        }
        stats
    }

    /// Check the tree invariants, panicking on the first violation.
    pub fn verify(&self) {
        assert_eq!(
            self.pids.in_use(),
            self.nodes.len(),
            "[process] {} pids allocated for {} processes",
            self.pids.in_use(),
            self.nodes.len()
        );
        for (&pid, node) in &self.nodes {
            assert_eq!(node.pid, pid, "[process] node {} filed under {}", node.pid, pid);
            assert!(
                self.pids.is_allocated(pid),
                "[process] process {} holds a free pid",
                pid
            );
            if node.is_exited() {
                assert!(
                    node.owner != Owner::Registry,
                    "[process] exited orphan {} was not reclaimed",
                    pid
                );
                assert!(
                    node.children.is_empty(),
                    "[process] exited process {} still has children {:?}",
                    pid,
                    node.children
                );
            }
            if let Owner::Parent(parent) = node.owner {
                let parent_node = self.nodes.get(&parent).unwrap_or_else(|| {
                    panic!("[process] process {} has dangling parent {}", pid, parent)
                });
                assert!(
                    parent_node.children.contains(&pid),
                    "[process] parent {} does not list child {}",
                    parent,
                    pid
                );
            }
            for &child in &node.children {
                match self.nodes.get(&child) {
                    Some(child_node) if child_node.owner == Owner::Parent(pid) => {}
                    _ => panic!("[process] process {} lists {} as a child", pid, child),
                }
            }
            let mut cursor = node.owner;
            let mut depth = 0;
            while let Owner::Parent(parent) = cursor {
                depth += 1;
                if depth > self.nodes.len() {
                    panic!("[process] cycle in family tree through process {}", pid);
                }
                cursor = self.nodes[&parent].owner;
            }
        }
    }

    fn node_mut(&mut self, pid: Pid) -> &mut ProcessInfo {
        self.nodes
            .get_mut(&pid)
            .unwrap_or_else(|| panic!("[process] process {} not found", pid))
    }

    /// Remove `pid` from the arena and its parent's children, then free its PID.
    fn destroy(&mut self, pid: Pid, reaper: Option<Pid>) -> ProcessInfo {
        let node = self
            .nodes
            .remove(&pid)
            .unwrap_or_else(|| panic!("[process] destroying unknown process {}", pid));
        assert!(
            node.children.is_empty(),
            "[process] process {} destroyed with children {:?}",
            pid,
            node.children
        );
        if let Owner::Parent(parent) = node.owner {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|&child| child != pid);
            }
        }
        match reaper {
            Some(parent) => self.pids.free_reaped(pid, parent),
            None => self.pids.free(pid),
        }
        node
    }
}
