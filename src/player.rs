// player.rs
use crate::name::names_match;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: usize,
    pub name: String,
}

impl Player {
    pub fn new(id: usize, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }

    /// Player identity is the normalized name, not the id.
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}
