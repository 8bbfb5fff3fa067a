//! Fixed-capacity body pool.

use std::collections::BTreeSet;

use horde_core::{AgentArchetype, AgentPool, BodyHandle, Vec2};

/// Hands out a bounded number of body handles and recycles released ones.
#[derive(Clone, Debug)]
pub struct BodyPool {
    capacity: u32,
    next: u32,
    free: Vec<BodyHandle>,
    in_use: BTreeSet<BodyHandle>,
    acquired: u64,
    released: u64,
    double_releases: u64,
}

impl BodyPool {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            next: 0,
            free: Vec::new(),
            in_use: BTreeSet::new(),
            acquired: 0,
            released: 0,
            double_releases: 0,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.in_use.len()
    }

    pub fn available(&self) -> usize {
        self.capacity as usize - self.in_use.len()
    }

    pub fn acquired(&self) -> u64 {
        self.acquired
    }

    pub fn released(&self) -> u64 {
        self.released
    }

    /// Releases of handles that were not checked out.
    pub fn double_releases(&self) -> u64 {
        self.double_releases
    }
}

impl AgentPool for BodyPool {
    fn acquire(&mut self, archetype: &AgentArchetype, spawn: Vec2) -> Option<BodyHandle> {
        let body = match self.free.pop() {
            Some(body) => body,
            None if self.next < self.capacity => {
                self.next += 1;
                BodyHandle(self.next - 1)
            }
            None => {
                tracing::debug!("pool exhausted for {} at {}", archetype.name, spawn);
                return None;
            }
        };
        self.in_use.insert(body);
        self.acquired += 1;
        Some(body)
    }

    fn release(&mut self, body: BodyHandle) {
        if !self.in_use.remove(&body) {
            self.double_releases += 1;
            tracing::warn!("body {:?} released while not in use", body);
            return;
        }
        self.free.push(body);
        self.released += 1;
    }
}
