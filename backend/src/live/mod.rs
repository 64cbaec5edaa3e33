//! Keeps the server's view of the guarantee collection current.
//!
//! This module holds the state shared by every request handler and the
//! background tasks that maintain it:
//!
//! - `state`: `AppState`, the clonable bundle injected into the Actix
//!   application as `web::Data`.
//! - `feed`: mounts the realtime subscription that applies store changes to
//!   the in-memory list, and hands back the handle that tears it down.
//! - `statistics`: refreshes the aggregate figures on a fixed period and on
//!   demand, independently of the list.

pub mod feed;
pub mod state;
pub mod statistics;
