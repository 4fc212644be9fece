// board.rs
use crate::adjacency::DirectedGraph;
use crate::continent::{Continent, ContinentId};
use crate::country::{Country, CountryId};
use crate::error::MapError;
use crate::event::{EventBus, GameEvent, Observer};
use crate::game_state::GameState;
use crate::name::normalize_name;
use crate::snapshot::{MapSnapshot, MapSnapshotBuilder, SnapshotAssembler};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// The world map of one game: countries, continents, borders and who holds
/// what. Owned by the game driver and passed around by reference.
#[derive(Debug, Default)]
pub struct Board {
    pub(crate) countries: BTreeMap<CountryId, Country>,
    pub(crate) continents: BTreeMap<ContinentId, Continent>,
    pub(crate) continent_countries: BTreeMap<ContinentId, BTreeSet<CountryId>>,
    pub(crate) adjacency: BTreeMap<CountryId, BTreeSet<CountryId>>,
    pub(crate) graph: DirectedGraph,
    state: GameState,
    events: EventBus,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn countries(&self) -> &BTreeMap<CountryId, Country> {
        &self.countries
    }

    pub fn continents(&self) -> &BTreeMap<ContinentId, Continent> {
        &self.continents
    }

    pub fn continent_countries(&self) -> &BTreeMap<ContinentId, BTreeSet<CountryId>> {
        &self.continent_countries
    }

    pub fn adjacency(&self) -> &BTreeMap<CountryId, BTreeSet<CountryId>> {
        &self.adjacency
    }

    pub fn graph(&self) -> &DirectedGraph {
        &self.graph
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn set_state(&mut self, state: GameState) {
        debug!(%state, "game state changed");
        self.state = state;
        self.notify_state();
    }

    /// Attaches an observer and sends it the current game state right away.
    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.events.subscribe(observer);
        self.events.notify_last(&GameEvent::StateChanged(self.state));
    }

    pub fn publish(&mut self, event: GameEvent) {
        self.events.publish(event);
    }

    pub(crate) fn notify_state(&mut self) {
        self.events.publish(GameEvent::StateChanged(self.state));
    }

    /// Empties the map for a new game. Observers and the game state stay.
    pub fn clear(&mut self) {
        self.countries.clear();
        self.continents.clear();
        self.continent_countries.clear();
        self.adjacency.clear();
        self.graph = DirectedGraph::new();
        debug!("board cleared");
        self.notify_state();
    }

    /// Verifies that the country set, the continent index and the adjacency
    /// index agree with each other.
    pub fn check_invariants(&self) -> Result<(), MapError> {
        fn violation(msg: String) -> Result<(), MapError> {
            Err(MapError::InvariantViolation(msg))
        }

        for (country_id, neighbors) in &self.adjacency {
            if !self.countries.contains_key(country_id) {
                return violation(format!("adjacency lists missing country {country_id}"));
            }
            for neighbor in neighbors {
                if !self.countries.contains_key(neighbor) {
                    return violation(format!("country {country_id} borders missing country {neighbor}"));
                }
                let reciprocal = self
                    .adjacency
                    .get(neighbor)
                    .is_some_and(|back| back.contains(country_id));
                if !reciprocal {
                    return violation(format!("border {country_id} -> {neighbor} is one-sided"));
                }
            }
        }

        for (continent_id, members) in &self.continent_countries {
            if !self.continents.contains_key(continent_id) {
                return violation(format!("index lists missing continent {continent_id}"));
            }
            for member in members {
                match self.countries.get(member) {
                    None => return violation(format!("continent {continent_id} lists missing country {member}")),
                    Some(country) if country.continent_id != *continent_id => {
                        return violation(format!(
                            "country {member} is filed under continent {continent_id} but belongs to {}",
                            country.continent_id
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        for country in self.countries.values() {
            let filed = self
                .continent_countries
                .get(&country.continent_id)
                .is_some_and(|members| members.contains(&country.id));
            if !filed {
                return violation(format!("country {} is not filed under its continent", country.id));
            }
        }

        let mut country_names = HashMap::new();
        for country in self.countries.values() {
            if let Some(other) = country_names.insert(normalize_name(&country.name), country.id) {
                return violation(format!("countries {other} and {} share a name", country.id));
            }
        }
        let mut continent_names = HashMap::new();
        for continent in self.continents.values() {
            if let Some(other) = continent_names.insert(normalize_name(&continent.name), continent.id) {
                return violation(format!("continents {other} and {} share a name", continent.id));
            }
        }

        Ok(())
    }

    /// Pushes the whole board into `builder`.
    pub fn build_snapshot<B: MapSnapshotBuilder>(&self, builder: &mut B) {
        builder.countries(self.countries.values());
        builder.continents(self.continents.values());
        builder.continent_countries(&self.continent_countries);
        builder.adjacency(&self.adjacency);
        builder.game_state(self.state);
    }

    pub fn snapshot(&self) -> MapSnapshot {
        let mut assembler = SnapshotAssembler::new();
        self.build_snapshot(&mut assembler);
        assembler.finish()
    }

    /// Rebuilds a board from a snapshot through the checked mutators.
    pub fn from_snapshot(snapshot: MapSnapshot) -> Result<Self, MapError> {
        let mut board = Board::new();
        board.add_continents(snapshot.continents)?;
        board.add_countries(snapshot.countries)?;
        board.load_adjacency(snapshot.adjacency)?;
        board.state = snapshot.game_state;

        let index_matches = snapshot
            .continent_countries
            .iter()
            .filter(|(_, members)| !members.is_empty())
            .all(|(id, members)| board.continent_countries.get(id) == Some(members));
        if !index_matches {
            return Err(MapError::InvariantViolation(
                "snapshot continent index disagrees with its countries".to_string(),
            ));
        }
        board.check_invariants()?;
        Ok(board)
    }
}
