//! Game records and their in-memory store.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// A game record.
///
/// The id comes from the route or the store, never from the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Store-assigned or caller-chosen identifier.
    #[serde(default, skip_deserializing)]
    pub id: String,
    /// When the game started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Kind of game, e.g. `chess`.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Number of players.
    #[serde(default)]
    pub player_count: i64,
    /// Number of rounds played.
    #[serde(default)]
    pub round_count: i64,
}

/// Concurrent map of games keyed by id.
#[derive(Debug)]
pub struct GameStore {
    games: DashMap<String, Game>,
    next_id: AtomicU64,
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStore {
    /// Creates an empty store. Generated ids start at `1`.
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns a copy of the game with `id`.
    pub fn get(&self, id: &str) -> Option<Game> {
        self.games.get(id).map(|entry| entry.value().clone())
    }

    /// Stores `game` under `id`, replacing any previous record.
    ///
    /// Returns `true` if no record existed.
    pub fn put(&self, id: &str, mut game: Game) -> bool {
        game.id = id.to_string();
        self.games.insert(id.to_string(), game).is_none()
    }

    /// Removes and returns the game with `id`.
    pub fn delete(&self, id: &str) -> Option<Game> {
        self.games.remove(id).map(|(_, game)| game)
    }

    /// Stores `game` under the next free generated id and returns that id.
    pub fn insert_new(&self, mut game: Game) -> String {
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
            // Skip ids already claimed through `put`.
            if let dashmap::mapref::entry::Entry::Vacant(slot) = self.games.entry(id.clone()) {
                game.id.clone_from(&id);
                slot.insert(game);
                return id;
            }
        }
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Returns `true` if the store holds no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chess() -> Game {
        Game {
            kind: "chess".to_string(),
            player_count: 2,
            ..Game::default()
        }
    }

    #[test]
    fn test_insert_new_assigns_sequential_ids() {
        let store = GameStore::new();
        assert_eq!(store.insert_new(chess()), "1");
        assert_eq!(store.insert_new(chess()), "2");
        assert_eq!(store.get("2").unwrap().id, "2");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_insert_new_skips_taken_ids() {
        let store = GameStore::new();
        assert!(store.put("1", chess()));
        assert_eq!(store.insert_new(chess()), "2");
    }

    #[test]
    fn test_put_reports_creation() {
        let store = GameStore::new();
        assert!(store.put("abc", chess()));
        assert!(!store.put("abc", Game::default()));
        assert_eq!(store.get("abc").unwrap().kind, "");
        assert_eq!(store.get("abc").unwrap().id, "abc");
    }

    #[test]
    fn test_delete() {
        let store = GameStore::new();
        store.put("x", chess());
        assert_eq!(store.delete("x").unwrap().kind, "chess");
        assert!(store.delete("x").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let game: Game = serde_json::from_str(
            r#"{"id":"ignored","startDate":"2024-05-01T10:00:00Z","type":"go","playerCount":2,"roundCount":9}"#,
        )
        .unwrap();
        assert_eq!(game.id, "");
        assert_eq!(game.kind, "go");
        assert_eq!(game.round_count, 9);
        assert!(game.start_date.is_some());

        let json = serde_json::to_value(Game { id: "7".into(), ..Game::default() }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "7", "type": "", "playerCount": 0, "roundCount": 0})
        );
    }
}
