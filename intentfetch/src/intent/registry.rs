//! Target registry: the eligible working list, the done set and the
//! resource-to-id observation table.
//!
//! # Lifecycle
//!
//! ```text
//! set_targets / observe ──► eligible ──[trigger]──► done
//!                              │                     │
//!                              │ absent from next    │ release(observation)
//!                              │ set_targets         ▼
//!                              └──────────────► re-armed (eligible on next
//!                                               set_targets)
//! ```
//!
//! Ids absent from a bulk replacement simply stop being eligible; they do
//! not enter the done set and may come back with a later replacement.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use super::target::{Target, TargetId};

/// Handle returned by [`TargetRegistry::observe`].
///
/// Releasing it (which consumes it) removes the resource mapping and
/// re-arms the id. A handle whose resource has since been observed again
/// is stale: releasing it still re-arms its id but keeps the newer mapping.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping an observation without releasing it leaves the resource tracked"]
pub struct Observation<K> {
    resource: K,
    id: TargetId,
    token: u64,
}

impl<K> Observation<K> {
    /// The observed resource.
    pub fn resource(&self) -> &K {
        &self.resource
    }

    /// The target id the resource was registered under.
    pub fn id(&self) -> &TargetId {
        &self.id
    }
}

#[derive(Debug)]
struct ObservedResource {
    id: TargetId,
    token: u64,
}

/// Holds the targets eligible for scoring and the ids that already fired.
#[derive(Debug)]
pub struct TargetRegistry<K> {
    /// Working list; never contains a done id or a duplicate id.
    targets: Vec<Target>,

    /// Ids that triggered and stay excluded until re-armed.
    done: HashSet<TargetId>,

    /// Observed resources and the id each maps to.
    resources: HashMap<K, ObservedResource>,

    /// Token for the next observation.
    next_token: u64,
}

impl<K> Default for TargetRegistry<K> {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            done: HashSet::new(),
            resources: HashMap::new(),
            next_token: 0,
        }
    }
}

impl<K: Hash + Eq + Clone> TargetRegistry<K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the working list.
    ///
    /// Targets whose id is done or empty are dropped, as are repeated ids
    /// (the first occurrence wins). An empty input clears eligibility. Returns the
    /// number of targets now eligible.
    pub fn set_targets<I>(&mut self, targets: I) -> usize
    where
        I: IntoIterator<Item = Target>,
    {
        let mut seen: HashSet<TargetId> = HashSet::new();
        let mut skipped_done = 0usize;
        let mut skipped_duplicate = 0usize;
        let mut skipped_empty = 0usize;

        let mut next = Vec::new();
        for target in targets {
            if target.id.is_empty() {
                skipped_empty += 1;
                continue;
            }
            if self.done.contains(&target.id) {
                skipped_done += 1;
                continue;
            }
            if !seen.insert(target.id.clone()) {
                skipped_duplicate += 1;
                continue;
            }
            next.push(target);
        }
        self.targets = next;

        if skipped_empty > 0 {
            tracing::debug!(skipped_empty, "Dropped targets with an empty id");
        }
        if skipped_duplicate > 0 {
            tracing::debug!(
                skipped_duplicate,
                "Duplicate target ids in replacement, kept first occurrence"
            );
        }
        tracing::trace!(
            eligible = self.targets.len(),
            skipped_done,
            "Targets replaced"
        );

        self.targets.len()
    }

    /// Targets currently eligible for scoring.
    pub fn eligible(&self) -> &[Target] {
        &self.targets
    }

    /// Mark an id as triggered: add it to the done set and drop it from the
    /// working list.
    pub fn mark_done(&mut self, id: &TargetId) {
        self.done.insert(id.clone());
        self.targets.retain(|target| &target.id != id);
    }

    /// Whether the id has triggered and not yet been re-armed.
    pub fn is_done(&self, id: &str) -> bool {
        self.done.contains(id)
    }

    /// Register `resource` under `id`.
    ///
    /// Observing a resource that is already tracked replaces its mapping and
    /// makes the earlier handle stale.
    pub fn observe(&mut self, resource: K, id: TargetId) -> Observation<K> {
        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);

        self.resources.insert(
            resource.clone(),
            ObservedResource {
                id: id.clone(),
                token,
            },
        );

        Observation {
            resource,
            id,
            token,
        }
    }

    /// Release an observation.
    ///
    /// Clears the id from the done set and, unless another tracked resource
    /// still maps to the same id, removes it from the working list. A current
    /// handle also removes its resource mapping and returns `true`. A stale
    /// handle leaves the newer mapping in place and returns `false`.
    pub fn release(&mut self, observation: Observation<K>) -> bool {
        let is_current = self
            .resources
            .get(&observation.resource)
            .is_some_and(|entry| entry.token == observation.token);

        if is_current {
            self.resources.remove(&observation.resource);
        } else {
            tracing::debug!(id = %observation.id, "Releasing stale observation");
        }

        self.done.remove(&observation.id);

        let still_observed = self
            .resources
            .values()
            .any(|entry| entry.id == observation.id);
        if !still_observed {
            self.targets.retain(|target| target.id != observation.id);
        }

        is_current
    }

    /// The id a tracked resource maps to.
    pub fn resource_id(&self, resource: &K) -> Option<&TargetId> {
        self.resources.get(resource).map(|entry| &entry.id)
    }

    /// All tracked resources, in no particular order.
    pub fn resources(&self) -> impl Iterator<Item = &K> {
        self.resources.keys()
    }

    /// Number of tracked resources.
    pub fn tracked_resources(&self) -> usize {
        self.resources.len()
    }

    /// Number of done ids.
    pub fn done_count(&self) -> usize {
        self.done.len()
    }

    /// Number of eligible targets.
    pub fn eligible_count(&self) -> usize {
        self.targets.len()
    }
}
