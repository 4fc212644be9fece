// connectivity.rs
use crate::adjacency::DirectedGraph;
use crate::board::Board;
use crate::country::CountryId;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

/// Partitions the graph into strongly connected components (Kosaraju).
///
/// The first pass records the order in which depth-first searches finish;
/// the second walks the reversed graph from the latest-finishing vertex
/// first, and every search tree it grows is one component. Vertices are
/// visited in ascending id order, so the output is deterministic.
pub fn strongly_connected_components(graph: &DirectedGraph) -> Vec<BTreeSet<CountryId>> {
    let order = finishing_order(graph);
    let reversed = graph.reversed();

    let mut assigned = HashSet::new();
    let mut components = Vec::new();
    for &root in order.iter().rev() {
        if !assigned.insert(root) {
            continue;
        }
        let mut component = BTreeSet::new();
        let mut stack = vec![root];
        while let Some(vertex) = stack.pop() {
            component.insert(vertex);
            for next in reversed.successors(vertex) {
                if assigned.insert(next) {
                    stack.push(next);
                }
            }
        }
        components.push(component);
    }
    components
}

fn finishing_order(graph: &DirectedGraph) -> Vec<CountryId> {
    let mut visited = HashSet::new();
    let mut order = Vec::with_capacity(graph.vertex_count());

    for root in graph.vertices() {
        if !visited.insert(root) {
            continue;
        }
        let mut stack = vec![(root, successors_of(graph, root))];
        while let Some((vertex, pending)) = stack.last_mut() {
            let vertex = *vertex;
            match pending.next() {
                Some(next) => {
                    if visited.insert(next) {
                        stack.push((next, successors_of(graph, next)));
                    }
                }
                None => {
                    order.push(vertex);
                    stack.pop();
                }
            }
        }
    }
    order
}

fn successors_of(graph: &DirectedGraph, vertex: CountryId) -> std::vec::IntoIter<CountryId> {
    graph.successors(vertex).collect::<Vec<_>>().into_iter()
}

impl Board {
    /// A map is playable when it has countries and borders and every country
    /// can reach every other one.
    pub fn is_map_valid(&mut self) -> bool {
        self.is_strongly_connected()
    }

    pub fn is_map_not_valid(&mut self) -> bool {
        !self.is_map_valid()
    }

    /// Rebuilds the graph from the adjacency index and checks that it forms
    /// a single strongly connected component covering every country.
    pub fn is_strongly_connected(&mut self) -> bool {
        if self.countries.is_empty() {
            info!("map invalid: no countries");
            return false;
        }
        if self.border_count() == 0 {
            info!("map invalid: no borders");
            return false;
        }

        let total_countries = self.countries.len();
        let components = strongly_connected_components(self.rebuild_graph());
        let valid = components.len() == 1 && components[0].len() == total_countries;
        info!(
            countries = total_countries,
            components = components.len(),
            valid,
            "map connectivity checked"
        );
        valid
    }
}
