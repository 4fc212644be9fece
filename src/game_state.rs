// game_state.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase tag broadcast to observers. The board only stores it; the phase
/// controller decides when it moves.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    LoadMap,
    StartUp,
    Reinforcement,
    Attack,
    Fortification,
    GameOver,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            GameState::LoadMap => "load map",
            GameState::StartUp => "start up",
            GameState::Reinforcement => "reinforcement",
            GameState::Attack => "attack",
            GameState::Fortification => "fortification",
            GameState::GameOver => "game over",
        };
        f.write_str(tag)
    }
}
