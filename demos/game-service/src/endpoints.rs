//! HTTP endpoints for the game service.

use daedalus::prelude::*;
use tracing::{debug, info};

use crate::store::{Game, GameStore};

/// Message for lookups of an unknown id.
pub const GAME_NOT_FOUND: &str = "game does not exist";

/// Extracts the token from an `Authorization: Bearer <token>` value.
pub fn bearer_token(header: &str) -> Option<String> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

/// Masks a credential for logging, keeping at most a four character prefix.
pub fn redact(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    if token.chars().count() > 8 {
        format!("{prefix}***")
    } else {
        "***".to_string()
    }
}

fn record_caller(endpoint: &str, authorization: &str) -> Option<String> {
    let token = bearer_token(authorization);
    match &token {
        Some(token) => debug!(endpoint, token = %redact(token), "bearer token presented"),
        None => debug!(endpoint, "no bearer token presented"),
    }
    token
}

/// `GET /ping`
#[derive(Debug, Default, Bind)]
pub struct Ping;

impl Enrich for Ping {}

impl Execute for Ping {
    type Output = &'static str;

    async fn execute(&self, _ctx: &RequestContext) -> Result<Reply<Self::Output>, Error> {
        Ok(Reply::ok("pong"))
    }
}

impl Endpoint for Ping {
    type Format = PlainText;
}

/// `POST /game`
#[derive(Debug, Default, Bind)]
pub struct CreateGame {
    #[bind(header = "authorization")]
    authorization: String,
    #[bind(json)]
    game: Game,
    token: Option<String>,
}

impl Enrich for CreateGame {
    fn enrich(&mut self, _ctx: &BindContext) -> Result<(), Error> {
        self.token = record_caller("createGame", &self.authorization);
        Ok(())
    }
}

impl Execute for CreateGame {
    type Output = ();

    async fn execute(&self, ctx: &RequestContext) -> Result<Reply<()>, Error> {
        let store = ctx.service::<GameStore>()?;
        let id = store.insert_new(self.game.clone());
        info!(game_id = %id, authenticated = self.token.is_some(), "game created");
        Ok(Reply::created())
    }
}

impl Endpoint for CreateGame {
    type Format = Json;
}

/// `PUT /game/{id}`
#[derive(Debug, Default, Bind)]
pub struct PutGame {
    #[bind(path = "id")]
    id: String,
    #[bind(header = "authorization")]
    authorization: String,
    #[bind(json)]
    game: Game,
    token: Option<String>,
}

impl Enrich for PutGame {
    fn enrich(&mut self, _ctx: &BindContext) -> Result<(), Error> {
        self.token = record_caller("putGame", &self.authorization);
        Ok(())
    }
}

impl Execute for PutGame {
    type Output = ();

    async fn execute(&self, ctx: &RequestContext) -> Result<Reply<()>, Error> {
        let store = ctx.service::<GameStore>()?;
        let created = store.put(&self.id, self.game.clone());
        info!(game_id = %self.id, created, authenticated = self.token.is_some(), "game stored");
        let status = if created {
            StatusCode::CREATED
        } else {
            StatusCode::OK
        };
        Ok(Reply::Status(status, None))
    }
}

impl Endpoint for PutGame {
    type Format = Json;
}

/// `GET /game/{id}`
#[derive(Debug, Default, Bind)]
pub struct GetGame {
    #[bind(path = "id")]
    id: String,
}

impl Enrich for GetGame {}

impl Execute for GetGame {
    type Output = Game;

    async fn execute(&self, ctx: &RequestContext) -> Result<Reply<Game>, Error> {
        ctx.service::<GameStore>()?
            .get(&self.id)
            .map(Reply::ok)
            .ok_or_else(|| Error::not_found(GAME_NOT_FOUND))
    }
}

impl Endpoint for GetGame {
    type Format = Json;
}

/// `DELETE /game/{id}`
#[derive(Debug, Default, Bind)]
pub struct DeleteGame {
    #[bind(path = "id")]
    id: String,
    #[bind(header = "authorization")]
    authorization: String,
    token: Option<String>,
}

impl Enrich for DeleteGame {
    fn enrich(&mut self, _ctx: &BindContext) -> Result<(), Error> {
        self.token = record_caller("deleteGame", &self.authorization);
        Ok(())
    }
}

impl Execute for DeleteGame {
    type Output = ();

    async fn execute(&self, ctx: &RequestContext) -> Result<Reply<()>, Error> {
        let store = ctx.service::<GameStore>()?;
        if store.delete(&self.id).is_none() {
            return Err(Error::not_found(GAME_NOT_FOUND));
        }
        info!(game_id = %self.id, authenticated = self.token.is_some(), "game deleted");
        Ok(Reply::Status(StatusCode::OK, None))
    }
}

impl Endpoint for DeleteGame {
    type Format = Json;
}
