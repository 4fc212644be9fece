// continent.rs
use crate::board::Board;
use crate::error::MapError;
use crate::name::{names_match, normalize_name};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

pub type ContinentId = u32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Continent {
    pub id: ContinentId,
    pub name: String,
    /// Reinforcement bonus for holding every country of the continent.
    pub bonus_armies: u32,
}

impl Continent {
    pub fn new(id: ContinentId, name: &str, bonus_armies: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            bonus_armies,
        }
    }

    pub fn get_bonus(&self) -> u32 {
        self.bonus_armies
    }

    fn same_definition(&self, other: &Continent) -> bool {
        self.id == other.id
            && names_match(&self.name, &other.name)
            && self.bonus_armies == other.bonus_armies
    }
}

impl Board {
    /// Adds a continent and makes sure its country index entry exists.
    /// Re-adding an identical continent only re-wires the index.
    pub fn add_continent(&mut self, continent: Continent) -> Result<(), MapError> {
        self.add_continents(std::iter::once(continent))
    }

    /// Adds a batch of continents. Nothing is inserted unless every continent
    /// in the batch is acceptable.
    pub fn add_continents<I>(&mut self, continents: I) -> Result<(), MapError>
    where
        I: IntoIterator<Item = Continent>,
    {
        let continents: Vec<Continent> = continents.into_iter().collect();
        self.check_continent_batch(&continents)?;

        for continent in continents {
            debug!(id = continent.id, name = %continent.name, "continent added");
            self.continent_countries.entry(continent.id).or_default();
            self.continents.entry(continent.id).or_insert(continent);
        }
        self.notify_state();
        Ok(())
    }

    fn check_continent_batch(&self, continents: &[Continent]) -> Result<(), MapError> {
        let mut batch_ids: HashMap<ContinentId, &Continent> = HashMap::new();
        let mut batch_names: HashMap<String, ContinentId> = HashMap::new();

        for continent in continents {
            self.check_continent(continent)?;
            if let Some(earlier) = batch_ids.insert(continent.id, continent) {
                if !earlier.same_definition(continent) {
                    return Err(MapError::DuplicateContinent {
                        name: continent.name.clone(),
                        existing: continent.id,
                    });
                }
            }
            let key = normalize_name(&continent.name);
            if let Some(&existing) = batch_names.get(&key) {
                if existing != continent.id {
                    return Err(MapError::DuplicateContinent {
                        name: continent.name.clone(),
                        existing,
                    });
                }
            }
            batch_names.insert(key, continent.id);
        }
        Ok(())
    }

    fn check_continent(&self, continent: &Continent) -> Result<(), MapError> {
        if continent.bonus_armies == 0 {
            warn!(name = %continent.name, "rejected continent without control value");
            return Err(MapError::InvalidControlValue(continent.name.clone()));
        }
        if let Some(existing) = self.continents.get(&continent.id) {
            if !existing.same_definition(continent) {
                return Err(MapError::DuplicateContinent {
                    name: continent.name.clone(),
                    existing: existing.id,
                });
            }
        }
        if let Some(existing) = self.continent_id_by_name(&continent.name) {
            if existing != continent.id {
                return Err(MapError::DuplicateContinent {
                    name: continent.name.clone(),
                    existing,
                });
            }
        }
        Ok(())
    }

    /// Removes a continent together with every country in it. Returns `false`
    /// when no continent has that name.
    pub fn remove_continent_by_name(&mut self, name: &str) -> bool {
        let Some(continent_id) = self.continent_id_by_name(name) else {
            return false;
        };

        let mut doomed: BTreeSet<_> = self
            .continent_countries
            .remove(&continent_id)
            .unwrap_or_default();
        doomed.extend(
            self.countries
                .values()
                .filter(|country| country.continent_id == continent_id)
                .map(|country| country.id),
        );
        for country_id in &doomed {
            self.detach_country(*country_id);
        }
        self.continents.remove(&continent_id);

        debug!(continent_id, countries = doomed.len(), "continent removed");
        self.notify_state();
        true
    }

    pub fn continent_id_exists(&self, id: ContinentId) -> bool {
        self.continents.contains_key(&id)
    }

    pub fn continent_name_exists(&self, name: &str) -> bool {
        self.continent_by_name(name).is_some()
    }

    pub fn continent_by_id(&self, id: ContinentId) -> Option<&Continent> {
        self.continents.get(&id)
    }

    pub fn continent_by_name(&self, name: &str) -> Option<&Continent> {
        let key = normalize_name(name);
        self.continents
            .values()
            .find(|continent| normalize_name(&continent.name) == key)
    }

    pub fn continent_id_by_name(&self, name: &str) -> Option<ContinentId> {
        self.continent_by_name(name).map(|continent| continent.id)
    }

    pub fn continent_name_by_id(&self, id: ContinentId) -> Option<&str> {
        self.continent_by_id(id).map(|continent| continent.name.as_str())
    }

    /// `[Continent]` section: one `id name value` line per continent.
    pub fn continent_listing(&self) -> String {
        let mut listing = String::from("[Continent]\n");
        for continent in self.continents.values() {
            listing.push_str(&format!("{} {} {}\n", continent.id, continent.name, continent.bonus_armies));
        }
        listing
    }

    pub fn continent_value_by_id(&self, id: ContinentId) -> Option<u32> {
        self.continent_by_id(id).map(Continent::get_bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::Country;

    fn board_with_two_continents() -> Board {
        let mut board = Board::new();
        board
            .add_continents(vec![
                Continent::new(1, "North America", 5),
                Continent::new(2, "Australia", 2),
            ])
            .unwrap();
        board
    }

    #[test]
    fn adding_creates_index_entry() {
        let board = board_with_two_continents();
        assert_eq!(board.continent_countries().get(&1), Some(&BTreeSet::new()));
        assert_eq!(board.continent_countries().get(&2), Some(&BTreeSet::new()));
    }

    #[test]
    fn identical_re_add_is_a_no_op() {
        let mut board = board_with_two_continents();
        board.add_country(Country::new(7, "Alaska", 1, "North America")).unwrap();
        board.add_continent(Continent::new(1, "north america", 5)).unwrap();

        assert_eq!(board.continents().len(), 2);
        assert!(board.continent_countries()[&1].contains(&7));
    }

    #[test]
    fn rejects_zero_control_value() {
        let mut board = Board::new();
        let err = board.add_continent(Continent::new(1, "Void", 0)).unwrap_err();
        assert!(matches!(err, MapError::InvalidControlValue(_)));
        assert!(board.continents().is_empty());
    }

    #[test]
    fn rejects_duplicate_names_under_normalization() {
        let mut board = board_with_two_continents();
        let err = board
            .add_continent(Continent::new(3, "NORTH  america", 4))
            .unwrap_err();
        assert!(matches!(err, MapError::DuplicateContinent { existing: 1, .. }));
    }

    #[test]
    fn batch_is_all_or_nothing() {
        let mut board = Board::new();
        let result = board.add_continents(vec![
            Continent::new(1, "Europe", 5),
            Continent::new(2, "Asia", 7),
            Continent::new(3, "europe", 2),
        ]);
        assert!(result.is_err());
        assert!(board.continents().is_empty());
        assert!(board.continent_countries().is_empty());
    }

    #[test]
    fn lookups_ignore_case_and_whitespace() {
        let board = board_with_two_continents();
        assert_eq!(board.continent_id_by_name(" northAMERICA"), Some(1));
        assert_eq!(board.continent_name_by_id(2), Some("Australia"));
        assert_eq!(board.continent_value_by_id(1), Some(5));
        assert!(board.continent_name_exists("australia"));
        assert!(!board.continent_name_exists("Atlantis"));
        assert_eq!(board.continent_value_by_id(9), None);
    }

    #[test]
    fn removing_unknown_continent_is_a_no_op() {
        let mut board = board_with_two_continents();
        assert!(!board.remove_continent_by_name("Atlantis"));
        assert_eq!(board.continents().len(), 2);
    }
}
