//! File-backed JSON persistence for the Kingsday board game.
//!
//! Every document the game touches is a flat JSON file under a single
//! data directory:
//!
//! ```text
//! data/
//!   roles/*.json                      role definitions (content, read-only)
//!   events/*.json                     event cards (content, read-only)
//!   global_defs.json                  shared defaults (content, read-only)
//!   runtime/current_game.json         the active session (singleton)
//!   runtime/<role_id>_gamestate.json  one per seated player
//!   runtime/winrate.json              cross-session statistics
//! ```
//!
//! # Contract
//!
//! - **Loads never fail.** A missing file, a parse error, or a document
//!   of the wrong shape yields the caller-supplied fallback. Content
//!   problems degrade; they do not crash a running game.
//! - **Saves may fail.** Write I/O errors are the one hard failure in
//!   the system and propagate as [`StoreError`] for the API layer to
//!   surface.
//! - **No transactions.** Documents are written one file at a time with
//!   no cross-file atomicity; the design assumes a single local session.
//!
//! # Modules
//!
//! - [`json`] -- Load/save primitives implementing the contract
//! - [`store`] -- [`GameStore`]: typed access to every game document
//! - [`error`] -- [`StoreError`]

pub mod error;
pub mod json;
pub mod store;

pub use error::StoreError;
pub use store::GameStore;
