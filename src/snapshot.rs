// snapshot.rs
use crate::continent::{Continent, ContinentId};
use crate::country::{Country, CountryId};
use crate::game_state::GameState;
use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Frozen copy of a board, ready to be written out by whoever owns the
/// file format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub countries: Vec<Country>,
    pub continents: Vec<Continent>,
    pub continent_countries: BTreeMap<ContinentId, BTreeSet<CountryId>>,
    pub adjacency: BTreeMap<CountryId, BTreeSet<CountryId>>,
    pub game_state: GameState,
}

/// Frozen copy of a whole game: the map plus the roster and whose turn it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub map: MapSnapshot,
    pub players: Vec<Player>,
    pub current_player: Option<Player>,
    pub current_player_index: Option<usize>,
}

/// Receives the board's state piece by piece; see [`crate::board::Board::build_snapshot`].
pub trait MapSnapshotBuilder {
    fn countries<'a, I: IntoIterator<Item = &'a Country>>(&mut self, countries: I);
    fn continents<'a, I: IntoIterator<Item = &'a Continent>>(&mut self, continents: I);
    fn continent_countries(&mut self, index: &BTreeMap<ContinentId, BTreeSet<CountryId>>);
    fn adjacency(&mut self, adjacency: &BTreeMap<CountryId, BTreeSet<CountryId>>);
    fn game_state(&mut self, state: GameState);
}

#[derive(Debug, Default)]
pub struct SnapshotAssembler {
    snapshot: MapSnapshot,
}

impl SnapshotAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> MapSnapshot {
        self.snapshot
    }
}

impl MapSnapshotBuilder for SnapshotAssembler {
    fn countries<'a, I: IntoIterator<Item = &'a Country>>(&mut self, countries: I) {
        self.snapshot.countries = countries.into_iter().cloned().collect();
    }

    fn continents<'a, I: IntoIterator<Item = &'a Continent>>(&mut self, continents: I) {
        self.snapshot.continents = continents.into_iter().cloned().collect();
    }

    fn continent_countries(&mut self, index: &BTreeMap<ContinentId, BTreeSet<CountryId>>) {
        self.snapshot.continent_countries = index.clone();
    }

    fn adjacency(&mut self, adjacency: &BTreeMap<CountryId, BTreeSet<CountryId>>) {
        self.snapshot.adjacency = adjacency.clone();
    }

    fn game_state(&mut self, state: GameState) {
        self.snapshot.game_state = state;
    }
}
