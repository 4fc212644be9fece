// adjacency.rs
use crate::board::Board;
use crate::country::CountryId;
use crate::error::MapError;
use crate::event::GameEvent;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Directed view of the borders, one edge per direction. Only the
/// connectivity check reads it; the adjacency index stays the source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectedGraph {
    successors: BTreeMap<CountryId, BTreeSet<CountryId>>,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: CountryId) {
        self.successors.entry(vertex).or_default();
    }

    /// Removes the vertex and every edge into or out of it.
    pub fn remove_vertex(&mut self, vertex: CountryId) {
        self.successors.remove(&vertex);
        for targets in self.successors.values_mut() {
            targets.remove(&vertex);
        }
    }

    /// Adds `from -> to`, inserting either vertex if missing.
    pub fn add_edge(&mut self, from: CountryId, to: CountryId) {
        self.add_vertex(to);
        self.successors.entry(from).or_default().insert(to);
    }

    pub fn remove_edge(&mut self, from: CountryId, to: CountryId) -> bool {
        self.successors
            .get_mut(&from)
            .is_some_and(|targets| targets.remove(&to))
    }

    pub fn contains_vertex(&self, vertex: CountryId) -> bool {
        self.successors.contains_key(&vertex)
    }

    pub fn contains_edge(&self, from: CountryId, to: CountryId) -> bool {
        self.successors
            .get(&from)
            .is_some_and(|targets| targets.contains(&to))
    }

    pub fn vertices(&self) -> impl Iterator<Item = CountryId> + '_ {
        self.successors.keys().copied()
    }

    pub fn successors(&self, vertex: CountryId) -> impl Iterator<Item = CountryId> + '_ {
        self.successors
            .get(&vertex)
            .into_iter()
            .flat_map(|targets| targets.iter().copied())
    }

    pub fn vertex_count(&self) -> usize {
        self.successors.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.values().map(BTreeSet::len).sum()
    }

    /// Same vertices, every edge flipped.
    pub fn reversed(&self) -> DirectedGraph {
        let mut reversed = DirectedGraph::new();
        for (&from, targets) in &self.successors {
            reversed.add_vertex(from);
            for &to in targets {
                reversed.add_edge(to, from);
            }
        }
        reversed
    }
}

impl Board {
    /// Adds a two-way border between two existing countries.
    pub fn add_border(&mut self, a: CountryId, b: CountryId) -> Result<(), MapError> {
        self.check_border(a, b)?;
        self.link(a, b);
        debug!(a, b, "border added");
        self.notify_state();
        Ok(())
    }

    pub fn add_border_by_name(&mut self, a: &str, b: &str) -> Result<(), MapError> {
        let a_id = self.require_country_id(a)?;
        let b_id = self.require_country_id(b)?;
        self.add_border(a_id, b_id)
    }

    /// Removes the border in both directions. `Ok(false)` when the two
    /// countries exist but were not neighbors.
    pub fn remove_border_by_name(&mut self, a: &str, b: &str) -> Result<bool, MapError> {
        let a_id = self.require_country_id(a)?;
        let b_id = self.require_country_id(b)?;

        let removed_ab = self
            .adjacency
            .get_mut(&a_id)
            .is_some_and(|neighbors| neighbors.remove(&b_id));
        let removed_ba = self
            .adjacency
            .get_mut(&b_id)
            .is_some_and(|neighbors| neighbors.remove(&a_id));
        self.graph.remove_edge(a_id, b_id);
        self.graph.remove_edge(b_id, a_id);

        let removed = removed_ab || removed_ba;
        if removed {
            debug!(a = a_id, b = b_id, "border removed");
        }
        self.notify_state();
        Ok(removed)
    }

    /// Bulk-loads borders as handed over by a map loader. Every listed
    /// country must exist; one-sided entries are mirrored.
    pub fn load_adjacency<I, N>(&mut self, adjacency: I) -> Result<(), MapError>
    where
        I: IntoIterator<Item = (CountryId, N)>,
        N: IntoIterator<Item = CountryId>,
    {
        let adjacency: Vec<(CountryId, Vec<CountryId>)> = adjacency
            .into_iter()
            .map(|(country, neighbors)| (country, neighbors.into_iter().collect()))
            .collect();

        for (country, neighbors) in &adjacency {
            if !self.country_id_exists(*country) {
                warn!(country, "adjacency lists unknown country");
                return Err(MapError::UnknownCountry(*country));
            }
            for &neighbor in neighbors {
                self.check_border(*country, neighbor)?;
            }
        }

        for (country, neighbors) in adjacency {
            self.adjacency.entry(country).or_default();
            for neighbor in neighbors {
                self.link(country, neighbor);
            }
        }
        debug!(borders = self.border_count(), "adjacency loaded");
        self.notify_state();
        Ok(())
    }

    pub fn neighbors(&self, country: CountryId) -> Option<&BTreeSet<CountryId>> {
        self.adjacency.get(&country)
    }

    pub fn are_adjacent(&self, a: CountryId, b: CountryId) -> bool {
        self.neighbors(a).is_some_and(|neighbors| neighbors.contains(&b))
    }

    /// Number of undirected borders.
    pub fn border_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Replaces the directed graph with one built from the adjacency index:
    /// every country is a vertex and every border a pair of opposite edges.
    pub fn rebuild_graph(&mut self) -> &DirectedGraph {
        let mut graph = DirectedGraph::new();
        for &country in self.countries.keys() {
            graph.add_vertex(country);
        }
        for (&country, neighbors) in &self.adjacency {
            for &neighbor in neighbors {
                graph.add_edge(country, neighbor);
                graph.add_edge(neighbor, country);
            }
        }
        self.graph = graph;
        &self.graph
    }

    /// Text listing of every country's neighbors.
    pub fn border_listing(&self) -> String {
        let mut listing = String::from("[Border]\n");
        for (country, neighbors) in &self.adjacency {
            listing.push_str(&format!("{} : [{}]\n", country, neighbors.iter().join(", ")));
        }
        listing
    }

    /// Publishes the border listing to observers.
    pub fn print_borders(&mut self) {
        let listing = self.border_listing();
        self.publish(GameEvent::BorderText(listing));
    }

    /// Continents, countries and borders in one text block.
    pub fn map_listing(&self) -> String {
        format!(
            "{}{}{}",
            self.continent_listing(),
            self.country_listing(),
            self.border_listing()
        )
    }

    /// Publishes the full map listing to observers.
    pub fn show_map(&mut self) {
        let listing = self.map_listing();
        self.publish(GameEvent::BorderText(listing));
    }

    fn check_border(&self, a: CountryId, b: CountryId) -> Result<(), MapError> {
        for id in [a, b] {
            if !self.country_id_exists(id) {
                warn!(a, b, "rejected border with unknown country");
                return Err(MapError::UnknownCountry(id));
            }
        }
        if a == b {
            return Err(MapError::SelfBorder(a));
        }
        Ok(())
    }

    fn link(&mut self, a: CountryId, b: CountryId) {
        self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        self.graph.add_edge(a, b);
        self.graph.add_edge(b, a);
    }

    fn require_country_id(&self, name: &str) -> Result<CountryId, MapError> {
        self.country_id_by_name(name)
            .ok_or_else(|| MapError::UnknownCountryName(name.to_string()))
    }
}
