use bevy::prelude::*;

use crate::engine::components::SlotOccupant;
use crate::engine::events::{OwnershipRequest, RequestAttachedOwnership};
use crate::placement::{OwnershipGraph, request_ownership_of_attached};

/// Snapshot of "carrier → placed object" links taken from occupied slots.
struct EcsOwnershipGraph<'a> {
    links: &'a [(Entity, Entity)],
    requested: Vec<Entity>,
}

impl OwnershipGraph for EcsOwnershipGraph<'_> {
    type Object = Entity;

    fn request_ownership(&mut self, object: Entity) {
        self.requested.push(object);
    }

    fn occupants_of(&self, object: Entity) -> Vec<Entity> {
        self.links
            .iter()
            .filter(|(carrier, _)| *carrier == object)
            .map(|(_, occupant)| *occupant)
            .collect()
    }
}

// A slot is carried by its parent entity, or by itself when it has none.
pub fn propagate_ownership_requests(
    mut chains: EventReader<RequestAttachedOwnership>,
    slots: Query<(Entity, &SlotOccupant, Option<&ChildOf>)>,
    mut requests: EventWriter<OwnershipRequest>,
) {
    if chains.is_empty() {
        return;
    }
    let links: Vec<(Entity, Entity)> = slots
        .iter()
        .map(|(slot, occupant, parent)| (parent.map_or(slot, |p| p.parent()), occupant.0))
        .collect();

    for chain in chains.read() {
        let mut graph = EcsOwnershipGraph {
            links: &links,
            requested: Vec::new(),
        };
        let count = request_ownership_of_attached(&mut graph, chain.root);
        debug!("Requesting ownership of {} objects from {}", count, chain.root);
        for object in graph.requested {
            requests.write(OwnershipRequest { object });
        }
    }
}
