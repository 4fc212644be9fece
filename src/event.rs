// event.rs
use crate::domination::PlayerDomination;
use crate::game_state::GameState;
use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::Sender;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEdit {
    Added(Player),
    Removed(Player),
}

/// Everything the board and the game broadcast to observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StateChanged(GameState),
    PlayerChanged { player: Player },
    PlayerEdited(PlayerEdit),
    ReinforcementComputed { player: String, armies: u32 },
    DominationSnapshot(Vec<PlayerDomination>),
    BorderText(String),
}

/// Receiver of game events. Delivery is synchronous: `notify` runs on the
/// caller's thread before the publishing call returns.
pub trait Observer {
    fn notify(&mut self, event: &GameEvent);
}

impl Observer for Sender<GameEvent> {
    fn notify(&mut self, event: &GameEvent) {
        if self.send(event.clone()).is_err() {
            warn!("observer channel closed, dropping {:?}", event);
        }
    }
}

#[derive(Default)]
pub struct EventBus {
    observers: Vec<Box<dyn Observer>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Deliver to the most recently attached observer only.
    pub fn notify_last(&mut self, event: &GameEvent) {
        if let Some(observer) = self.observers.last_mut() {
            observer.notify(event);
        }
    }

    pub fn publish(&mut self, event: GameEvent) {
        for observer in self.observers.iter_mut() {
            observer.notify(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("observers", &self.observers.len())
            .finish()
    }
}
