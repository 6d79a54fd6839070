//! Diff planning between an existing and a desired collection.

use std::collections::{HashMap, HashSet};

use outofschool_core::id::IdGenerator;
use outofschool_core::repository::ChildWrite;
use uuid::Uuid;

use crate::child::OwnedChild;
use crate::key::{ChildKey, KeyStrategy};

/// Drops every incoming child whose key was already seen, keeping the first
/// occurrence and the input order. Children without a key are always kept.
pub fn deduplicate<C: OwnedChild>(incoming: Vec<C>, keys: &KeyStrategy<C>) -> Vec<C> {
    let mut seen = HashSet::new();
    incoming
        .into_iter()
        .filter(|child| keys.key_of(child).is_none_or(|key| seen.insert(key)))
        .collect()
}

/// An existing child paired with its overwritten state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildUpdate<C> {
    /// The child as loaded.
    pub before: C,
    /// The same child after the incoming fields were copied over it.
    pub after: C,
}

/// Counts of a plan's partitions, for logging and assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    /// Children to insert.
    pub created: usize,
    /// Children whose fields change.
    pub updated: usize,
    /// Children to remove.
    pub deleted: usize,
    /// Matched children whose fields are already equal.
    pub unchanged: usize,
}

impl PlanSummary {
    /// Returns `true` when the plan writes nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.deleted == 0
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Create(usize),
    Update(usize),
    Unchanged(usize),
}

/// The `{create, update, delete}` partition of one collection.
#[derive(Debug, Clone)]
pub struct DiffPlan<C> {
    /// Incoming children with no existing counterpart, owner already set.
    pub to_create: Vec<C>,
    /// Matched children whose fields differ.
    pub to_update: Vec<ChildUpdate<C>>,
    /// Existing children absent from the incoming set.
    pub to_delete: Vec<C>,
    /// Matched children that need no write.
    pub unchanged: Vec<C>,
    /// Position of every incoming child in the partitions above.
    slots: Vec<Slot>,
}

/// The result of applying a plan: the new collection in incoming order and
/// the writes that take the store there.
#[derive(Debug, Clone)]
pub struct AppliedCollection<C> {
    /// The collection as it reads after reconciliation.
    pub children: Vec<C>,
    /// Deletes, then updates, then creates.
    pub writes: Vec<ChildWrite<C>>,
    /// Partition sizes.
    pub summary: PlanSummary,
}

impl<C: OwnedChild> DiffPlan<C> {
    /// Partition sizes.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            created: self.to_create.len(),
            updated: self.to_update.len(),
            deleted: self.to_delete.len(),
            unchanged: self.unchanged.len(),
        }
    }

    /// Mints ids for created children that have none and lays the collection
    /// out in the order the caller supplied it.
    pub fn apply(self, ids: &dyn IdGenerator) -> AppliedCollection<C> {
        let summary = self.summary();
        let Self {
            mut to_create,
            to_update,
            to_delete,
            unchanged,
            slots,
        } = self;

        for child in &mut to_create {
            if child.id().is_none_or(|id| id.is_nil()) {
                child.set_id(Some(ids.next_id()));
            }
        }

        let children = slots
            .iter()
            .map(|slot| match *slot {
                Slot::Create(idx) => to_create[idx].clone(),
                Slot::Update(idx) => to_update[idx].after.clone(),
                Slot::Unchanged(idx) => unchanged[idx].clone(),
            })
            .collect();

        let mut writes = Vec::with_capacity(summary.created + summary.updated + summary.deleted);
        writes.extend(to_delete.into_iter().map(ChildWrite::Delete));
        writes.extend(to_update.into_iter().map(|u| ChildWrite::Update(u.after)));
        writes.extend(to_create.into_iter().map(ChildWrite::Create));

        AppliedCollection {
            children,
            writes,
            summary,
        }
    }
}

/// Computes the diff between `existing` and an already de-duplicated,
/// invariant-checked `incoming` collection.
///
/// Matched children keep their surrogate id and owner; every other field is
/// taken from the incoming side. Created children get `owner_id`; their id
/// is cleared unless the strategy honours caller-supplied ids. Existing
/// children sharing a key with an earlier existing child are deleted.
pub fn plan<C: OwnedChild>(
    owner_id: Uuid,
    existing: &[C],
    incoming: &[C],
    keys: &KeyStrategy<C>,
) -> DiffPlan<C> {
    let mut existing_by_key: HashMap<ChildKey, usize> = HashMap::new();
    for (idx, child) in existing.iter().enumerate() {
        if let Some(key) = keys.key_of(child) {
            existing_by_key.entry(key).or_insert(idx);
        }
    }

    let mut claimed = vec![false; existing.len()];
    let mut plan = DiffPlan {
        to_create: Vec::new(),
        to_update: Vec::new(),
        to_delete: Vec::new(),
        unchanged: Vec::new(),
        slots: Vec::with_capacity(incoming.len()),
    };

    for candidate in incoming {
        let matched = keys
            .key_of(candidate)
            .and_then(|key| existing_by_key.get(&key).copied())
            .filter(|&idx| !claimed[idx]);

        if let Some(idx) = matched {
            claimed[idx] = true;
            let before = existing[idx].clone();
            let mut after = before.clone();
            after.overwrite_from(candidate);
            if after == before {
                plan.slots.push(Slot::Unchanged(plan.unchanged.len()));
                plan.unchanged.push(after);
            } else {
                plan.slots.push(Slot::Update(plan.to_update.len()));
                plan.to_update.push(ChildUpdate { before, after });
            }
        } else {
            let mut created = candidate.clone();
            if !keys.keeps_caller_ids() {
                created.set_id(None);
            }
            created.set_owner_id(owner_id);
            plan.slots.push(Slot::Create(plan.to_create.len()));
            plan.to_create.push(created);
        }
    }

    plan.to_delete = existing
        .iter()
        .zip(&claimed)
        .filter(|(_, claimed)| !**claimed)
        .map(|(child, _)| child.clone())
        .collect();

    plan
}
