//! Deletion safety: cut-vertex detection on the undirected family graph.
//!
//! Father, mother, spouse, children and siblings all count as undirected
//! edges here. A person whose removal would split their connected component
//! is a bridge and must not be deleted.

use crate::error::RelationError;
use crate::graph::FamilyGraph;
use crate::person::PersonId;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::{Dfs, NodeFiltered};
use tracing::debug;

/// Undirected view of every relation link in the registry.
pub fn undirected_view(graph: &FamilyGraph) -> UnGraphMap<PersonId, ()> {
    let mut view = UnGraphMap::new();
    for person in graph.people() {
        view.add_node(person.id());
    }
    for person in graph.people() {
        for neighbor in person.relatives() {
            view.add_edge(person.id(), neighbor, ());
        }
    }
    view
}

/// Whether removing the person would disconnect their component.
///
/// Degree zero or one can never disconnect anything, which settles most
/// queries without a search. Otherwise the component containing the target
/// is measured, then a second search runs from one of the target's
/// neighbors on a view that excludes the target; reaching fewer than
/// `component - 1` nodes means the target alone held the component
/// together.
pub fn is_bridge(graph: &FamilyGraph, id: PersonId) -> Result<bool, RelationError> {
    let person = graph
        .get(id)
        .ok_or(RelationError::UnknownPerson(id))?;

    let neighbors = person.relatives();
    if neighbors.len() <= 1 {
        return Ok(false);
    }

    let view = undirected_view(graph);

    let mut component = 0usize;
    let mut dfs = Dfs::new(&view, id);
    while dfs.next(&view).is_some() {
        component += 1;
    }
    if component == 1 {
        return Ok(false);
    }

    let without_target = NodeFiltered::from_fn(&view, |n| n != id);
    let mut reachable = 0usize;
    let mut dfs = Dfs::new(&without_target, neighbors[0]);
    while dfs.next(&without_target).is_some() {
        reachable += 1;
    }

    debug!(person = %id, component, reachable, "bridge check");
    Ok(reachable < component - 1)
}
