//! In-memory game record service.
//!
//! | Method | Path         | Success                         |
//! |--------|--------------|---------------------------------|
//! | GET    | `/ping`      | 200 `pong`                      |
//! | POST   | `/game`      | 201                             |
//! | PUT    | `/game/{id}` | 201 when created, 200 otherwise |
//! | GET    | `/game/{id}` | 200 with the record             |
//! | DELETE | `/game/{id}` | 200                             |

use std::sync::Arc;

use daedalus::prelude::*;
use daedalus::server::ServerError;

pub mod endpoints;
pub mod store;

pub use endpoints::{CreateGame, DeleteGame, GetGame, Ping, PutGame, GAME_NOT_FOUND};
pub use store::{Game, GameStore};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the application around `store`.
pub fn app(store: Arc<GameStore>) -> Result<Application, ServerError> {
    Application::builder()
        .route::<Ping>(Method::GET, "/ping", "ping")
        .route::<CreateGame>(Method::POST, "/game", "createGame")
        .route::<PutGame>(Method::PUT, "/game/{id}", "putGame")
        .route::<GetGame>(Method::GET, "/game/{id}", "getGame")
        .route::<DeleteGame>(Method::DELETE, "/game/{id}", "deleteGame")
        .service(store)
        .build()
}
