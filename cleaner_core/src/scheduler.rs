//! Random-activation scheduler.

use cleaner_env::{EntityId, SimContext, SimError, SimResult};
use std::collections::BTreeSet;

/// Holds the set of active entities and hands out a fresh random
/// activation order each tick.
///
/// Membership is kept in a `BTreeSet` so the pre-shuffle order depends only
/// on ids, never on hash state. That keeps seeded runs reproducible.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    members: BTreeSet<EntityId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity. Returns false if it was already a member.
    pub fn add(&mut self, entity: EntityId) -> bool {
        self.members.insert(entity)
    }

    /// Unregisters an entity.
    pub fn remove(&mut self, entity: EntityId) -> SimResult<()> {
        if self.members.remove(&entity) {
            Ok(())
        } else {
            Err(SimError::UnknownEntity(entity))
        }
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.members.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in id order.
    pub fn members(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.members.iter().copied()
    }

    /// Snapshots the current members into a uniformly shuffled sequence.
    ///
    /// The snapshot is immutable for the pass that consumes it: callers must
    /// check `contains` before activating each entry, since earlier
    /// activations may have removed later ones.
    pub fn activation_order(&self, ctx: &mut SimContext) -> Vec<EntityId> {
        let mut order: Vec<EntityId> = self.members.iter().copied().collect();
        ctx.shuffle(&mut order);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.add(EntityId(1)));
        assert!(scheduler.add(EntityId(2)));
        assert!(!scheduler.add(EntityId(1)));
        assert_eq!(scheduler.len(), 2);

        scheduler.remove(EntityId(1)).unwrap();
        assert!(!scheduler.contains(EntityId(1)));
        assert_eq!(
            scheduler.remove(EntityId(1)),
            Err(SimError::UnknownEntity(EntityId(1)))
        );
    }

    #[test]
    fn test_activation_order_is_permutation() {
        let mut scheduler = Scheduler::new();
        for i in 0..30 {
            scheduler.add(EntityId(i));
        }

        let mut ctx = SimContext::new(42);
        let mut order = scheduler.activation_order(&mut ctx);
        assert_eq!(order.len(), 30);

        order.sort();
        assert_eq!(order, scheduler.members().collect::<Vec<_>>());
    }

    #[test]
    fn test_activation_order_fresh_each_call() {
        let mut scheduler = Scheduler::new();
        for i in 0..20 {
            scheduler.add(EntityId(i));
        }

        let mut ctx = SimContext::new(7);
        let first = scheduler.activation_order(&mut ctx);
        let reshuffled = (0..5).any(|_| scheduler.activation_order(&mut ctx) != first);
        assert!(reshuffled, "order should be recomputed every pass");
    }

    #[test]
    fn test_activation_order_deterministic() {
        let mut scheduler = Scheduler::new();
        for i in 0..10 {
            scheduler.add(EntityId(i));
        }

        let a = scheduler.activation_order(&mut SimContext::new(99));
        let b = scheduler.activation_order(&mut SimContext::new(99));
        assert_eq!(a, b);
    }
}
