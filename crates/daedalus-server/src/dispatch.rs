//! The dispatch pipeline.
//!
//! For one request and one endpoint type the pipeline:
//!
//! 1. creates a zero-valued endpoint,
//! 2. runs Bind, then Enrich, then Execute, stopping at the first failure,
//! 3. runs Respond exactly once with either the Execute reply or the
//!    failure.
//!
//! ```text
//! Start ──► Bind ──ok──► Enrich ──ok──► Execute ──ok──► Respond(reply)
//!            │             │              │
//!            └──err────────┴──────err─────┴──────────► Respond(error)
//! ```

use std::fmt;

use bytes::Bytes;
use http::{Response, StatusCode};

use daedalus_bind::{respond, BindContext, Reply};
use daedalus_core::{Error, FaultKind, RequestContext};

use crate::endpoint::Endpoint;

/// Pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Populate fields from the request.
    Bind,
    /// Derive additional state.
    Enrich,
    /// Business logic.
    Execute,
    /// Serialize the outcome.
    Respond,
}

impl Stage {
    /// Lowercase stage name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bind => "bind",
            Self::Enrich => "enrich",
            Self::Execute => "execute",
            Self::Respond => "respond",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one pipeline run.
#[derive(Debug)]
pub struct Dispatched {
    /// The single response produced by Respond.
    pub response: Response<Bytes>,
    /// Stage that short-circuited the run, if any.
    pub failed_stage: Option<Stage>,
}

/// Runs the pipeline for endpoint type `E`.
pub async fn dispatch<E: Endpoint>(ctx: &RequestContext, request: &BindContext) -> Dispatched {
    let (outcome, failed_stage) = run_stages::<E>(ctx, request).await;

    let status = match &outcome {
        Ok(reply) => reply.status(),
        Err(err) => err.status(),
    };
    log_completion(ctx, status, failed_stage, outcome.as_ref().err());

    tracing::debug!(request_id = %ctx.request_id(), stage = %Stage::Respond, "stage");
    Dispatched {
        response: respond::<E::Format, E::Output>(outcome),
        failed_stage,
    }
}

async fn run_stages<E: Endpoint>(
    ctx: &RequestContext,
    request: &BindContext,
) -> (Result<Reply<E::Output>, Error>, Option<Stage>) {
    let mut endpoint = E::default();

    tracing::debug!(request_id = %ctx.request_id(), stage = %Stage::Bind, "stage");
    if let Err(err) = endpoint.bind(request) {
        return (Err(err), Some(Stage::Bind));
    }

    tracing::debug!(request_id = %ctx.request_id(), stage = %Stage::Enrich, "stage");
    if let Err(err) = endpoint.enrich(request) {
        return (Err(err), Some(Stage::Enrich));
    }

    tracing::debug!(request_id = %ctx.request_id(), stage = %Stage::Execute, "stage");
    match endpoint.execute(ctx).await {
        Ok(reply) => (Ok(reply), None),
        Err(err) => (Err(err), Some(Stage::Execute)),
    }
}

fn log_completion(
    ctx: &RequestContext,
    status: StatusCode,
    failed_stage: Option<Stage>,
    error: Option<&Error>,
) {
    let request_id = ctx.request_id();
    let endpoint = ctx.endpoint().unwrap_or("-");
    let duration_ms = u64::try_from(ctx.elapsed().as_millis()).unwrap_or(u64::MAX);
    let stage = failed_stage.map_or("-", Stage::as_str);

    match error {
        Some(err) if err.kind() == FaultKind::Server => tracing::error!(
            %request_id,
            endpoint,
            stage,
            status = status.as_u16(),
            duration_ms,
            error = %err.diagnostic(),
            "request failed"
        ),
        Some(err) => tracing::warn!(
            %request_id,
            endpoint,
            stage,
            status = status.as_u16(),
            duration_ms,
            error = err.message(),
            "request rejected"
        ),
        None => tracing::info!(
            %request_id,
            endpoint,
            status = status.as_u16(),
            duration_ms,
            "request completed"
        ),
    }
}
