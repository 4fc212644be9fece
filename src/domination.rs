// domination.rs
use crate::board::Board;
use crate::continent::ContinentId;
use crate::country::{Country, CountryId};
use crate::event::GameEvent;
use crate::name::names_match;
use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Minimum reinforcement a player gets per turn before continent bonuses.
pub const MIN_REINFORCEMENT: u32 = 3;

/// One scoreboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDomination {
    pub player: String,
    /// Share of all countries held, 0 to 100.
    pub percentage: f64,
    pub total_armies: u64,
    pub continents: Vec<String>,
}

impl Board {
    /// Maps every continent held outright to its owner's name. Continents
    /// with no countries, mixed owners, or an unoccupied country are absent.
    pub fn continent_owners(&self) -> BTreeMap<ContinentId, String> {
        let mut owners = BTreeMap::new();

        for (&continent_id, members) in &self.continent_countries {
            let mut occupants = members
                .iter()
                .map(|id| self.countries.get(id).and_then(|country| country.player.as_deref()));

            let first = occupants.next().flatten();
            let owner = if members.len() == 1 {
                first
            } else {
                first.filter(|first| {
                    occupants.all(|other| other.is_some_and(|other| names_match(other, first)))
                })
            };

            if let Some(owner) = owner {
                owners.insert(continent_id, owner.to_string());
            }
        }
        owners
    }

    /// Sum of the control values of every continent the player holds.
    pub fn continent_reinforcement(&self, player: &str) -> u32 {
        self.continent_owners()
            .iter()
            .filter(|(_, owner)| names_match(owner, player))
            .filter_map(|(&id, _)| self.continent_value_by_id(id))
            .fold(0, u32::saturating_add)
    }

    pub fn owned_continent_names(&self, player: &str) -> Vec<String> {
        self.continent_owners()
            .iter()
            .filter(|(_, owner)| names_match(owner, player))
            .filter_map(|(&id, _)| self.continent_name_by_id(id))
            .map(str::to_string)
            .collect()
    }

    fn owned_by<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a Country> + 'a {
        self.countries
            .values()
            .filter(move |country| country.is_owned_by(player))
    }

    pub fn countries_owned_count(&self, player: &str) -> usize {
        self.owned_by(player).count()
    }

    pub fn countries_owned_by(&self, player: &str) -> Vec<CountryId> {
        self.owned_by(player).map(|country| country.id).collect()
    }

    pub fn country_names_owned_by(&self, player: &str) -> Vec<String> {
        self.owned_by(player).map(|country| country.name.clone()).collect()
    }

    pub fn total_armies(&self, player: &str) -> u64 {
        self.owned_by(player).map(|country| u64::from(country.armies)).sum()
    }

    /// Armies a player receives at the start of a reinforcement phase: one
    /// per three countries held (at least [`MIN_REINFORCEMENT`]) plus every
    /// continent bonus. Published to observers.
    pub fn reinforcement_for(&mut self, player: &str) -> u32 {
        let countries = self.countries_owned_count(player) as u32;
        let base = std::cmp::max(countries / 3, MIN_REINFORCEMENT);
        let armies = base.saturating_add(self.continent_reinforcement(player));

        debug!(player, countries, armies, "reinforcement computed");
        self.publish(GameEvent::ReinforcementComputed {
            player: player.to_string(),
            armies,
        });
        armies
    }

    /// Scoreboard for every player. Published to observers.
    pub fn world_domination(&mut self, players: &[Player]) -> Vec<PlayerDomination> {
        let total = self.countries.len();
        let owners = self.continent_owners();

        let rows: Vec<PlayerDomination> = players
            .iter()
            .map(|player| {
                let owned = self.countries_owned_count(&player.name);
                let percentage = if total == 0 {
                    0.0
                } else {
                    owned as f64 * 100.0 / total as f64
                };
                let continents = owners
                    .iter()
                    .filter(|(_, owner)| player.is_named(owner))
                    .filter_map(|(&id, _)| self.continent_name_by_id(id))
                    .map(str::to_string)
                    .collect();
                PlayerDomination {
                    player: player.name.clone(),
                    percentage,
                    total_armies: self.total_armies(&player.name),
                    continents,
                }
            })
            .collect();

        self.publish(GameEvent::DominationSnapshot(rows.clone()));
        rows
    }
}
