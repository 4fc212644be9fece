// lib.rs
pub mod adjacency;
pub mod board;
pub mod connectivity;
pub mod continent;
pub mod country;
pub mod domination;
pub mod error;
pub mod event;
pub mod game;
pub mod game_state;
pub mod map_config;
pub mod name;
pub mod player;
pub mod snapshot;
