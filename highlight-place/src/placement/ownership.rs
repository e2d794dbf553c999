use bevy::prelude::*;
use std::collections::HashSet;
use std::hash::Hash;

/// Replicated objects and the "placed onto" links between them.
pub trait OwnershipGraph {
    type Object: Copy + Eq + Hash + std::fmt::Debug;

    /// Ask the replication layer for exclusive write ownership of `object`.
    fn request_ownership(&mut self, object: Self::Object);

    /// Objects currently placed into slots carried by `object`.
    fn occupants_of(&self, object: Self::Object) -> Vec<Self::Object>;
}

/// Request ownership of `root` and, transitively, of everything attached
/// downstream of it. Returns the number of objects requested.
pub fn request_ownership_of_attached<G: OwnershipGraph>(graph: &mut G, root: G::Object) -> usize {
    let mut visited = HashSet::new();
    let mut stack = vec![root];
    while let Some(object) = stack.pop() {
        if !visited.insert(object) {
            warn!("Placement chain revisits {:?}; skipping", object);
            continue;
        }
        graph.request_ownership(object);
        stack.extend(graph.occupants_of(object));
    }
    visited.len()
}
