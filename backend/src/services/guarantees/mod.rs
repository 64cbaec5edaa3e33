//! # Guarantee Service Module
//!
//! HTTP endpoints for reading and changing guarantees, mounted under
//! `/api/guarantees`.
//!
//! Writes go straight to the store. Handlers never touch the in-memory list
//! themselves; the change feed applies the resulting event, the same way it
//! applies changes made by any other client.
//!
//! ## Sub-modules:
//! - `list`: the live list and an explicit refetch.
//! - `get`, `create`, `update`, `delete`: single-record operations.
//! - `statistics`: the latest aggregate snapshot and an on-demand refresh.
//! - `events`: a server-sent-event stream of change notifications.

mod create;
mod delete;
mod events;
mod get;
mod list;
mod statistics;
mod update;

use actix_web::web::{delete, get, patch, post, scope};
use actix_web::Scope;

/// The base path for all guarantee endpoints.
pub const API_PATH: &str = "/api/guarantees";

/// Configures and returns the Actix `Scope` for guarantee routes.
///
/// Fixed paths are registered before `/{id}` so they are not captured by it.
///
/// # Registered Routes:
///
/// *   **`GET /`**: the live list, newest first.
/// *   **`POST /`**: creates a guarantee from a fully populated `NewGuarantee`.
/// *   **`POST /refresh`**: refetches the list from the store.
/// *   **`GET /statistics`**: the latest `StatisticsSnapshot`.
/// *   **`POST /statistics/refresh`**: refreshes statistics now.
/// *   **`GET /events`**: `text/event-stream` of `ChangePayload` JSON.
/// *   **`GET /{id}`**: one guarantee, read from the store.
/// *   **`PATCH /{id}`**: partial update from a `GuaranteeUpdate`.
/// *   **`DELETE /{id}`**: removes a guarantee.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("", post().to(create::process))
        .route("/refresh", post().to(list::refresh))
        .route("/statistics", get().to(statistics::process))
        .route("/statistics/refresh", post().to(statistics::refresh))
        .route("/events", get().to(events::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}", patch().to(update::process))
        .route("/{id}", delete().to(delete::process))
}
