use crate::Pid;
use crate::error::{ProcError, ProcResult};
use alloc::vec;
use alloc::vec::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Free,
    Allocated,
    /// Free again after `parent` collected the exit status. `generation`
    /// pins the parent's own allocation, so a later holder of the same PID
    /// is not mistaken for it.
    Reaped { parent: Pid, generation: u32 },
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    state: State,
    /// Bumped on every allocation.
    generation: u32,
}

/// Fixed-size table of PIDs `1..=pid_max`.
///
/// The registry has no lock of its own: it lives inside the
/// [`FamilyTree`](crate::FamilyTree) and shares its lock, so a PID and the node
/// claiming it always change together.
pub struct PidRegistry {
    slots: Vec<Slot>,
    in_use: usize,
}

impl PidRegistry {
    pub fn new(pid_max: Pid) -> Self {
        assert!(pid_max > 0, "[process] pid_max must be positive");
        let free = Slot {
            state: State::Free,
            generation: 0,
        };
        Self {
            slots: vec![free; pid_max as usize],
            in_use: 0,
        }
    }

    pub fn pid_max(&self) -> Pid {
        self.slots.len() as Pid
    }

    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Allocate the lowest free PID.
    pub fn allocate(&mut self) -> ProcResult<Pid> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.state != State::Allocated)
            .ok_or(ProcError::ProcessLimitExceeded)?;
        let slot = &mut self.slots[index];
        slot.state = State::Allocated;
        slot.generation = slot.generation.wrapping_add(1);
        self.in_use += 1;
        Ok(index as Pid + 1)
    }

    /// Release `pid`. The caller guarantees no node claims it any more.
    pub fn free(&mut self, pid: Pid) {
        self.release(pid, State::Free);
    }

    /// Release `pid` after its exit status was collected by `parent`, which
    /// must still hold its own PID.
    pub fn free_reaped(&mut self, pid: Pid, parent: Pid) {
        let generation = match self.slot(parent) {
            Some(slot) if slot.state == State::Allocated => slot.generation,
            _ => panic!("[process] pid {} reaped by unallocated pid {}", pid, parent),
        };
        self.release(pid, State::Reaped { parent, generation });
    }

    fn release(&mut self, pid: Pid, next: State) {
        let slot = self
            .slot_mut(pid)
            .unwrap_or_else(|| panic!("[process] freeing out-of-range pid {}", pid));
        if slot.state != State::Allocated {
            panic!("[process] pid {} freed while not allocated", pid);
        }
        slot.state = next;
        self.in_use -= 1;
    }

    pub fn is_allocated(&self, pid: Pid) -> bool {
        self.slot(pid)
            .is_some_and(|slot| slot.state == State::Allocated)
    }

    /// The process that last reaped `pid`, as long as neither PID has been
    /// reused since.
    pub fn reaped_by(&self, pid: Pid) -> Option<Pid> {
        let State::Reaped { parent, generation } = self.slot(pid)?.state else {
            return None;
        };
        let holder = self.slot(parent)?;
        (holder.state == State::Allocated && holder.generation == generation).then_some(parent)
    }

    fn slot(&self, pid: Pid) -> Option<Slot> {
        let index = (pid as usize).checked_sub(1)?;
        self.slots.get(index).copied()
    }

    fn slot_mut(&mut self, pid: Pid) -> Option<&mut Slot> {
        let index = (pid as usize).checked_sub(1)?;
        self.slots.get_mut(index)
    }
}
