// map_config.rs
use crate::board::Board;
use crate::continent::{Continent, ContinentId};
use crate::country::{Country, CountryId};
use crate::error::MapError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// JSON description of a map, as handed over by a map loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    pub continents: Vec<ContinentConfig>,
    pub countries: Vec<CountryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinentConfig {
    pub id: ContinentId,
    pub name: String,
    pub bonus_armies: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryConfig {
    pub id: CountryId,
    pub name: String,
    /// Continent name; matched case- and whitespace-insensitively.
    pub continent: String,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    /// Neighboring country names.
    #[serde(default)]
    pub adjacent_countries: Vec<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub armies: u32,
}

impl MapConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(data)?)
    }

    /// Builds a board in loader order: continents, then countries, then
    /// borders.
    pub fn to_board(&self) -> Result<Board, MapError> {
        let mut board = Board::new();

        board.add_continents(
            self.continents
                .iter()
                .map(|c| Continent::new(c.id, &c.name, c.bonus_armies)),
        )?;

        let mut countries = Vec::with_capacity(self.countries.len());
        for config in &self.countries {
            let continent = board
                .continent_by_name(&config.continent)
                .ok_or_else(|| MapError::UnknownContinentName(config.continent.clone()))?;
            let mut country = Country::new(config.id, &config.name, continent.id, &continent.name)
                .at(config.x, config.y);
            country.player = config.player.clone();
            country.armies = config.armies;
            countries.push(country);
        }
        board.add_countries(countries)?;

        let mut adjacency: BTreeMap<CountryId, Vec<CountryId>> = BTreeMap::new();
        for config in &self.countries {
            let neighbors = adjacency.entry(config.id).or_default();
            for name in &config.adjacent_countries {
                let neighbor = board
                    .country_id_by_name(name)
                    .ok_or_else(|| MapError::UnknownCountryName(name.clone()))?;
                neighbors.push(neighbor);
            }
        }
        board.load_adjacency(adjacency)?;

        info!(
            continents = board.continents().len(),
            countries = board.countries().len(),
            borders = board.border_count(),
            "map config loaded"
        );
        Ok(board)
    }
}
