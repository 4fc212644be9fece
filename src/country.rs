// country.rs
use crate::board::Board;
use crate::continent::ContinentId;
use crate::error::MapError;
use crate::name::{names_match, normalize_name};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

pub type CountryId = u32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    pub continent_id: ContinentId,
    /// Must name the same continent as `continent_id`.
    pub continent_name: String,
    pub x: i32,
    pub y: i32,
    /// Occupying player's name, unset until countries are handed out.
    pub player: Option<String>,
    pub armies: u32,
}

impl Country {
    pub fn new(id: CountryId, name: &str, continent_id: ContinentId, continent_name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            continent_id,
            continent_name: continent_name.to_string(),
            x: 0,
            y: 0,
            player: None,
            armies: 0,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn is_owned_by(&self, player: &str) -> bool {
        self.player
            .as_deref()
            .is_some_and(|occupant| names_match(occupant, player))
    }

    pub fn add_armies(&mut self, num_armies: u32) {
        self.armies = self.armies.saturating_add(num_armies);
    }

    pub fn remove_armies(&mut self, num_armies: u32) {
        self.armies = self.armies.saturating_sub(num_armies);
    }

    /// Map-definition equality; ownership and garrison are ignored.
    fn same_definition(&self, other: &Country) -> bool {
        self.id == other.id
            && names_match(&self.name, &other.name)
            && self.continent_id == other.continent_id
            && self.x == other.x
            && self.y == other.y
    }
}

impl Board {
    /// Adds a country and files it under its continent. The continent must
    /// already be on the board.
    pub fn add_country(&mut self, country: Country) -> Result<(), MapError> {
        self.add_countries(std::iter::once(country))
    }

    /// Adds a batch of countries. Nothing is inserted unless every country in
    /// the batch is acceptable.
    pub fn add_countries<I>(&mut self, countries: I) -> Result<(), MapError>
    where
        I: IntoIterator<Item = Country>,
    {
        let countries: Vec<Country> = countries.into_iter().collect();
        self.check_country_batch(&countries)?;

        for country in countries {
            debug!(id = country.id, name = %country.name, continent = country.continent_id, "country added");
            self.continent_countries
                .entry(country.continent_id)
                .or_default()
                .insert(country.id);
            self.countries.entry(country.id).or_insert(country);
        }
        self.notify_state();
        Ok(())
    }

    fn check_country_batch(&self, countries: &[Country]) -> Result<(), MapError> {
        let mut batch_ids: HashMap<CountryId, &Country> = HashMap::new();
        let mut batch_names: HashMap<String, CountryId> = HashMap::new();

        for country in countries {
            self.check_country(country)?;
            if let Some(earlier) = batch_ids.insert(country.id, country) {
                if !earlier.same_definition(country) {
                    return Err(MapError::DuplicateCountry {
                        name: country.name.clone(),
                        existing: country.id,
                    });
                }
            }
            let key = normalize_name(&country.name);
            if let Some(&existing) = batch_names.get(&key) {
                if existing != country.id {
                    return Err(MapError::DuplicateCountry {
                        name: country.name.clone(),
                        existing,
                    });
                }
            }
            batch_names.insert(key, country.id);
        }
        Ok(())
    }

    fn check_country(&self, country: &Country) -> Result<(), MapError> {
        let Some(continent) = self.continent_by_id(country.continent_id) else {
            warn!(name = %country.name, continent = country.continent_id, "rejected country in unknown continent");
            return Err(MapError::UnknownContinent(country.continent_id));
        };
        if !names_match(&continent.name, &country.continent_name) {
            return Err(MapError::ContinentMismatch {
                country: country.name.clone(),
                continent_id: continent.id,
                given: country.continent_name.clone(),
                actual: continent.name.clone(),
            });
        }
        if let Some(existing) = self.countries.get(&country.id) {
            if !existing.same_definition(country) {
                return Err(MapError::DuplicateCountry {
                    name: country.name.clone(),
                    existing: existing.id,
                });
            }
        }
        if let Some(existing) = self.country_id_by_name(&country.name) {
            if existing != country.id {
                return Err(MapError::DuplicateCountry {
                    name: country.name.clone(),
                    existing,
                });
            }
        }
        Ok(())
    }

    /// Removes a country and every border touching it. Returns `false` when no
    /// country has that name.
    pub fn remove_country_by_name(&mut self, name: &str) -> bool {
        let Some(country_id) = self.country_id_by_name(name) else {
            return false;
        };
        self.detach_country(country_id);
        debug!(country_id, "country removed");
        self.notify_state();
        true
    }

    /// Drops a country from the catalog, the continent index, the adjacency
    /// index and the graph.
    pub(crate) fn detach_country(&mut self, country_id: CountryId) {
        if let Some(country) = self.countries.remove(&country_id) {
            if let Some(members) = self.continent_countries.get_mut(&country.continent_id) {
                members.remove(&country_id);
            }
        }
        self.adjacency.remove(&country_id);
        for neighbors in self.adjacency.values_mut() {
            neighbors.remove(&country_id);
        }
        self.graph.remove_vertex(country_id);
    }

    pub fn country_id_exists(&self, id: CountryId) -> bool {
        self.countries.contains_key(&id)
    }

    pub fn country_name_exists(&self, name: &str) -> bool {
        self.country_by_name(name).is_some()
    }

    pub fn country_by_id(&self, id: CountryId) -> Option<&Country> {
        self.countries.get(&id)
    }

    pub fn country_by_name(&self, name: &str) -> Option<&Country> {
        let key = normalize_name(name);
        self.countries
            .values()
            .find(|country| normalize_name(&country.name) == key)
    }

    pub fn country_id_by_name(&self, name: &str) -> Option<CountryId> {
        self.country_by_name(name).map(|country| country.id)
    }

    pub fn country_name_by_id(&self, id: CountryId) -> Option<&str> {
        self.country_by_id(id).map(|country| country.name.as_str())
    }

    /// `[Country]` section: one `id name continent x y` line per country.
    pub fn country_listing(&self) -> String {
        let mut listing = String::from("[Country]\n");
        for country in self.countries.values() {
            listing.push_str(&format!(
                "{} {} {} {} {}\n",
                country.id, country.name, country.continent_id, country.x, country.y
            ));
        }
        listing
    }

    pub fn countries_in_continent(&self, continent_name: &str) -> Vec<&Country> {
        self.countries
            .values()
            .filter(|country| names_match(&country.continent_name, continent_name))
            .collect()
    }

    pub fn continent_id_of_country(&self, country_name: &str) -> Option<ContinentId> {
        self.country_by_name(country_name)
            .map(|country| country.continent_id)
    }

    pub fn continent_name_of_country(&self, country_name: &str) -> Option<&str> {
        self.continent_id_of_country(country_name)
            .and_then(|id| self.continent_name_by_id(id))
    }

    pub fn continent_value_of_country(&self, country_name: &str) -> Option<u32> {
        self.continent_id_of_country(country_name)
            .and_then(|id| self.continent_value_by_id(id))
    }

    /// Hands a country to a player with an initial garrison. Returns `false`
    /// if the country does not exist.
    pub fn occupy(&mut self, country_id: CountryId, player: &str, armies: u32) -> bool {
        let Some(country) = self.countries.get_mut(&country_id) else {
            return false;
        };
        country.player = Some(player.to_string());
        country.armies = armies;
        debug!(country_id, player, armies, "country occupied");
        self.notify_state();
        true
    }

    pub fn set_armies(&mut self, country_id: CountryId, armies: u32) -> bool {
        let Some(country) = self.countries.get_mut(&country_id) else {
            return false;
        };
        country.armies = armies;
        self.notify_state();
        true
    }

    pub fn remove_armies(&mut self, country_id: CountryId, num_armies: u32) -> bool {
        let Some(country) = self.countries.get_mut(&country_id) else {
            return false;
        };
        country.remove_armies(num_armies);
        self.notify_state();
        true
    }

    /// Adds armies to a country the caller already knows exists.
    ///
    /// # Panics
    ///
    /// Panics if no country has that name. Check with
    /// [`Board::country_name_exists`] first when the name comes from user input.
    pub fn reinforce_country(&mut self, name: &str, num_armies: u32) {
        let country_id = self
            .country_id_by_name(name)
            .unwrap_or_else(|| panic!("reinforce_country: no country named '{name}'"));
        if let Some(country) = self.countries.get_mut(&country_id) {
            country.add_armies(num_armies);
        }
        debug!(country_id, num_armies, "country reinforced");
        self.notify_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continent::Continent;

    fn board() -> Board {
        let mut board = Board::new();
        board
            .add_continents(vec![
                Continent::new(1, "Europe", 5),
                Continent::new(2, "Africa", 3),
            ])
            .unwrap();
        board
            .add_countries(vec![
                Country::new(1, "Great Britain", 1, "Europe").at(120, 80),
                Country::new(2, "Iceland", 1, "Europe"),
                Country::new(3, "Egypt", 2, "Africa"),
            ])
            .unwrap();
        board
    }

    #[test]
    fn countries_are_filed_under_their_continent() {
        let board = board();
        assert_eq!(
            board.continent_countries()[&1].iter().copied().collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(board.continent_countries()[&2].contains(&3));
        board.check_invariants().unwrap();
    }

    #[test]
    fn rejects_unknown_continent() {
        let mut board = board();
        let err = board
            .add_country(Country::new(9, "Atlantis", 42, "Ocean"))
            .unwrap_err();
        assert!(matches!(err, MapError::UnknownContinent(42)));
        assert!(!board.country_id_exists(9));
    }

    #[test]
    fn rejects_continent_name_disagreeing_with_id() {
        let mut board = board();
        let err = board
            .add_country(Country::new(9, "Morocco", 1, "Africa"))
            .unwrap_err();
        assert!(matches!(err, MapError::ContinentMismatch { .. }));
    }

    #[test]
    fn rejects_name_clash_and_id_reuse() {
        let mut board = board();
        assert!(matches!(
            board.add_country(Country::new(4, "great britain", 1, "Europe")),
            Err(MapError::DuplicateCountry { existing: 1, .. })
        ));
        assert!(matches!(
            board.add_country(Country::new(3, "Sudan", 2, "Africa")),
            Err(MapError::DuplicateCountry { existing: 3, .. })
        ));
        assert_eq!(board.countries().len(), 3);
    }

    #[test]
    fn identical_re_add_keeps_ownership() {
        let mut board = board();
        board.occupy(2, "alice", 4);
        board.add_country(Country::new(2, "Iceland", 1, "Europe")).unwrap();
        assert_eq!(board.country_by_id(2).unwrap().player.as_deref(), Some("alice"));
        assert_eq!(board.countries().len(), 3);
    }

    #[test]
    fn lookups_miss_quietly() {
        let board = board();
        assert_eq!(board.country_id_by_name("  greatBRITAIN "), Some(1));
        assert_eq!(board.country_name_by_id(3), Some("Egypt"));
        assert_eq!(board.country_by_id(1).map(|c| (c.x, c.y)), Some((120, 80)));
        assert_eq!(board.country_id_by_name("Narnia"), None);
        assert_eq!(board.continent_name_of_country("egypt"), Some("Africa"));
        assert_eq!(board.continent_value_of_country("Iceland"), Some(5));
        assert_eq!(board.continent_value_of_country("Narnia"), None);
        assert_eq!(board.countries_in_continent("EUROPE").len(), 2);
        assert!(board.countries_in_continent("Asia").is_empty());
    }

    #[test]
    fn removing_country_cascades() {
        let mut board = board();
        board.add_border(1, 2).unwrap();
        board.add_border(2, 3).unwrap();

        assert!(board.remove_country_by_name("ice land"));

        assert!(!board.country_id_exists(2));
        assert!(!board.continent_countries()[&1].contains(&2));
        assert!(board.neighbors(2).is_none());
        assert!(!board.neighbors(1).unwrap().contains(&2));
        assert!(!board.neighbors(3).unwrap().contains(&2));
        assert!(!board.graph().contains_vertex(2));
        board.check_invariants().unwrap();
    }

    #[test]
    fn removing_unknown_country_is_a_no_op() {
        let mut board = board();
        assert!(!board.remove_country_by_name("Narnia"));
        assert_eq!(board.countries().len(), 3);
    }

    #[test]
    fn garrison_changes() {
        let mut board = board();
        assert!(board.occupy(3, "bob", 2));
        board.reinforce_country("EGYPT", 3);
        assert_eq!(board.country_by_id(3).unwrap().armies, 5);
        assert!(board.remove_armies(3, 9));
        assert_eq!(board.country_by_id(3).unwrap().armies, 0);
        assert!(board.set_armies(3, 7));
        assert_eq!(board.country_by_id(3).unwrap().armies, 7);
        assert!(!board.occupy(99, "bob", 1));
    }

    #[test]
    #[should_panic(expected = "no country named")]
    fn reinforcing_unknown_country_panics() {
        let mut board = board();
        board.reinforce_country("Narnia", 1);
    }
}
