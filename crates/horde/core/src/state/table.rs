//! Arena of live agents addressed by generational [`AgentId`]s.

use super::{AgentId, AgentRecord};

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u32,
    record: Option<AgentRecord>,
}

/// Slot vector with a free list.
///
/// Iteration order is ascending slot index, which is the stable enumeration
/// order used for every tie-break in the tactical layer.
#[derive(Clone, Debug, Default)]
pub struct AgentTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl AgentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a slot and stores the record built for the new id.
    pub fn insert_with(&mut self, build: impl FnOnce(AgentId) -> AgentRecord) -> AgentId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = AgentId::new(index, slot.generation);
        slot.record = Some(build(id));
        self.len += 1;
        id
    }

    /// Removes the agent and invalidates every outstanding handle to it.
    pub fn remove(&mut self, id: AgentId) -> Option<AgentRecord> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(record)
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.record.as_ref()
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentRecord> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.record.as_mut()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> {
        self.slots.iter().filter_map(|slot| slot.record.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AgentRecord> {
        self.slots.iter_mut().filter_map(|slot| slot.record.as_mut())
    }

    /// Snapshot of live ids, for passes that mutate the table while iterating.
    pub fn ids(&self) -> Vec<AgentId> {
        self.iter().map(|record| record.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::Vec2;
    use crate::state::{AgentArchetype, BodyHandle};

    fn insert(table: &mut AgentTable) -> AgentId {
        let archetype = Arc::new(AgentArchetype::default());
        table.insert_with(|id| AgentRecord::spawn(id, BodyHandle(0), archetype, Vec2::ZERO, 0.0))
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut table = AgentTable::new();
        let first = insert(&mut table);
        assert!(table.remove(first).is_some());
        assert!(table.remove(first).is_none());

        // The slot is reused under a new generation.
        let second = insert(&mut table);
        assert_eq!(second.index, first.index);
        assert_ne!(second.generation, first.generation);
        assert!(table.get(first).is_none());
        assert!(table.get(second).is_some());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn iteration_follows_slot_order() {
        let mut table = AgentTable::new();
        let a = insert(&mut table);
        let b = insert(&mut table);
        let c = insert(&mut table);
        table.remove(b);
        let d = insert(&mut table);

        assert_eq!(table.ids(), vec![a, d, c]);
    }
}
