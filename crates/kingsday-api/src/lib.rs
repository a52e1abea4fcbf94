//! HTTP API server for the Kingsday board game.
//!
//! Exposes the game session as a small JSON API the browser UI drives:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/health` | Liveness probe |
//! | `GET` | `/api/roles` | Role summaries, sorted by name |
//! | `POST` | `/api/game/start` | Initialize and start a game |
//! | `POST` | `/api/game/action` | Perform one turn action |
//! | `GET` | `/api/game/state` | Full state snapshot |
//! | `POST` | `/api/game/reset` | Delete the runtime state |
//!
//! One session exists per process, behind a mutex: turn processing is
//! serial by construction, matching the single-table game model.
//!
//! # Modules
//!
//! - [`state`] -- Shared application state and the state payload
//! - [`handlers`] -- Endpoint handlers
//! - [`router`] -- Router assembly (CORS + request tracing)
//! - [`server`] -- TCP bind and serve lifecycle
//! - [`error`] -- [`ApiError`] with `IntoResponse`

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use server::start_server;
pub use state::AppState;
