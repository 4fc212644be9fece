// game.rs
use crate::board::Board;
use crate::domination::PlayerDomination;
use crate::error::MapError;
use crate::event::{GameEvent, PlayerEdit};
use crate::player::Player;
use crate::snapshot::GameSnapshot;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

/// A board plus the players sitting at it.
#[derive(Debug, Default)]
pub struct Game {
    pub board: Board,
    pub players: Vec<Player>,
    current_player: Option<usize>,
    next_player_id: usize,
}

impl Game {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    /// Drops the map and every player. Observers stay attached.
    pub fn new_game(&mut self) {
        self.board.clear();
        self.players.clear();
        self.current_player = None;
        self.next_player_id = 0;
        info!("new game");
    }

    pub fn player_exists(&self, name: &str) -> bool {
        self.player_by_name(name).is_some()
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.is_named(name))
    }

    pub fn add_player(&mut self, name: &str) -> Player {
        let player = Player::new(self.next_player_id, name);
        self.next_player_id += 1;
        self.players.push(player.clone());
        debug!(id = player.id, name, "player added");
        self.board
            .publish(GameEvent::PlayerEdited(PlayerEdit::Added(player.clone())));
        player
    }

    /// Removes a player, keeping the turn on whoever held it. Returns `false`
    /// if nobody has that name.
    pub fn remove_player(&mut self, name: &str) -> bool {
        let Some(index) = self.players.iter().position(|player| player.is_named(name)) else {
            return false;
        };
        let removed = self.players.remove(index);

        self.current_player = match self.current_player {
            _ if self.players.is_empty() => None,
            Some(current) if current > index => Some(current - 1),
            Some(current) if current >= self.players.len() => Some(0),
            other => other,
        };

        debug!(name = %removed.name, "player removed");
        self.board
            .publish(GameEvent::PlayerEdited(PlayerEdit::Removed(removed)));
        true
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player.and_then(|index| self.players.get(index))
    }

    pub fn current_player_index(&self) -> Option<usize> {
        self.current_player
    }

    /// Hands the turn to the player at `index`. Returns `None` if there is no
    /// such player.
    pub fn set_current_player(&mut self, index: usize) -> Option<&Player> {
        let player = self.players.get(index)?.clone();
        self.current_player = Some(index);
        self.board.publish(GameEvent::PlayerChanged { player });
        self.players.get(index)
    }

    pub fn switch_next_player(&mut self) -> Option<&Player> {
        if self.players.is_empty() {
            return None;
        }
        let next = match self.current_player {
            Some(current) => (current + 1) % self.players.len(),
            None => 0,
        };
        self.set_current_player(next)
    }

    /// Deals every country out round-robin, one army each. Countries are
    /// shuffled within each continent so nobody is handed a whole continent
    /// by construction order.
    pub fn distribute_countries<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.players.is_empty() {
            return;
        }

        let mut deal: Vec<Vec<u32>> = self
            .board
            .continent_countries()
            .values()
            .map(|members| members.iter().copied().collect())
            .collect();
        deal.shuffle(rng);

        let mut player_index = 0;
        for continent_countries in &mut deal {
            continent_countries.shuffle(rng);
            for &country_id in continent_countries.iter() {
                let owner = self.players[player_index].name.clone();
                self.board.occupy(country_id, &owner, 1);
                player_index = (player_index + 1) % self.players.len();
            }
        }
        info!(
            countries = self.board.countries().len(),
            players = self.players.len(),
            "countries distributed"
        );
    }

    /// Reinforcement owed to the player whose turn it is.
    pub fn reinforce_current_player(&mut self) -> Option<u32> {
        let name = self.current_player()?.name.clone();
        Some(self.board.reinforcement_for(&name))
    }

    pub fn world_domination(&mut self) -> Vec<PlayerDomination> {
        self.board.world_domination(&self.players)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            map: self.board.snapshot(),
            players: self.players.clone(),
            current_player: self.current_player().cloned(),
            current_player_index: self.current_player,
        }
    }

    /// Restores a saved game. The current index must point at the recorded
    /// current player.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, MapError> {
        let at_index = snapshot
            .current_player_index
            .map(|index| snapshot.players.get(index));
        match (at_index, &snapshot.current_player) {
            (None, None) => {}
            (Some(Some(player)), Some(current)) if player == current => {}
            _ => {
                return Err(MapError::InvariantViolation(format!(
                    "current player index {:?} does not match {:?}",
                    snapshot.current_player_index,
                    snapshot.current_player.as_ref().map(|player| &player.name)
                )));
            }
        }

        let next_player_id = snapshot
            .players
            .iter()
            .map(|player| player.id + 1)
            .max()
            .unwrap_or(0);
        Ok(Self {
            board: Board::from_snapshot(snapshot.map)?,
            players: snapshot.players,
            current_player: snapshot.current_player_index,
            next_player_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continent::Continent;
    use crate::country::Country;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::mpsc::channel;

    fn game() -> Game {
        let mut board = Board::new();
        board
            .add_continents(vec![Continent::new(1, "East", 2), Continent::new(2, "West", 4)])
            .unwrap();
        board
            .add_countries(vec![
                Country::new(1, "E1", 1, "East"),
                Country::new(2, "E2", 1, "East"),
                Country::new(3, "E3", 1, "East"),
                Country::new(4, "W1", 2, "West"),
                Country::new(5, "W2", 2, "West"),
            ])
            .unwrap();
        Game::new(board)
    }

    #[test]
    fn roster_edits_are_published() {
        let mut game = game();
        let (tx, rx) = channel();
        game.board.subscribe(Box::new(tx));
        rx.try_recv().unwrap();

        let alice = game.add_player("alice");
        assert!(game.player_exists(" Alice"));
        assert!(game.remove_player("ALICE"));
        assert!(!game.player_exists("alice"));
        assert!(!game.remove_player("alice"));

        let events: Vec<GameEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerEdited(PlayerEdit::Added(alice.clone())),
                GameEvent::PlayerEdited(PlayerEdit::Removed(alice)),
            ]
        );
    }

    #[test]
    fn turn_rotation_wraps() {
        let mut game = game();
        game.add_player("a");
        game.add_player("b");
        game.add_player("c");

        assert_eq!(game.switch_next_player().map(|p| p.name.clone()), Some("a".into()));
        assert_eq!(game.switch_next_player().map(|p| p.name.clone()), Some("b".into()));
        game.switch_next_player();
        assert_eq!(game.switch_next_player().map(|p| p.name.clone()), Some("a".into()));
        assert!(game.set_current_player(7).is_none());
    }

    #[test]
    fn removing_earlier_player_keeps_current() {
        let mut game = game();
        game.add_player("a");
        game.add_player("b");
        game.add_player("c");
        game.set_current_player(2);

        game.remove_player("a");

        assert_eq!(game.current_player().map(|p| p.name.as_str()), Some("c"));
    }

    #[test]
    fn removing_last_current_player_wraps_to_first() {
        let mut game = game();
        game.add_player("a");
        game.add_player("b");
        game.set_current_player(1);

        game.remove_player("b");

        assert_eq!(game.current_player_index(), Some(0));
        game.remove_player("a");
        assert_eq!(game.current_player_index(), None);
    }

    #[test]
    fn distribution_covers_every_country_evenly() {
        let mut game = game();
        game.add_player("a");
        game.add_player("b");
        let mut rng = StdRng::seed_from_u64(7);

        game.distribute_countries(&mut rng);

        assert!(game.board.countries().values().all(|c| c.player.is_some() && c.armies == 1));
        let a = game.board.countries_owned_count("a");
        let b = game.board.countries_owned_count("b");
        assert_eq!(a + b, 5);
        assert!(a.abs_diff(b) <= 1);
    }

    #[test]
    fn current_player_reinforcement() {
        let mut game = game();
        game.add_player("a");
        assert_eq!(game.reinforce_current_player(), None);

        for id in 1..=5 {
            game.board.occupy(id, "a", 1);
        }
        game.switch_next_player();
        assert_eq!(game.reinforce_current_player(), Some(3 + 2 + 4));
    }

    #[test]
    fn snapshot_restores_roster_and_turn() {
        let mut game = game();
        game.add_player("a");
        game.add_player("b");
        game.board.occupy(1, "b", 4);
        game.set_current_player(1);

        let snapshot = game.snapshot();
        assert_eq!(snapshot.current_player.as_ref().map(|p| p.name.as_str()), Some("b"));

        let json = serde_json::to_string(&snapshot).unwrap();
        let mut restored = Game::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.current_player().map(|p| p.name.as_str()), Some("b"));
        assert_eq!(restored.board.country_by_id(1).unwrap().armies, 4);
        assert_eq!(restored.add_player("c").id, 2);
    }

    #[test]
    fn snapshot_with_stray_current_index_is_rejected() {
        let mut game = game();
        game.add_player("a");
        game.add_player("b");
        game.switch_next_player();

        let mut out_of_range = game.snapshot();
        out_of_range.current_player_index = Some(5);
        assert!(matches!(
            Game::from_snapshot(out_of_range),
            Err(MapError::InvariantViolation(_))
        ));

        let mut mismatched = game.snapshot();
        mismatched.current_player_index = Some(1);
        assert!(Game::from_snapshot(mismatched).is_err());

        let mut missing_player = game.snapshot();
        missing_player.current_player = None;
        assert!(Game::from_snapshot(missing_player).is_err());
    }

    #[test]
    fn new_game_resets_everything() {
        let mut game = game();
        game.add_player("a");
        game.switch_next_player();
        game.new_game();
        assert!(game.players.is_empty());
        assert!(game.current_player().is_none());
        assert!(game.board.countries().is_empty());
        assert_eq!(game.add_player("z").id, 0);
    }
}
