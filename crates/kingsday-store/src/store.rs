//! [`GameStore`]: typed access to every persisted game document.
//!
//! The store is a plain value owning the data root path. It is passed by
//! reference into the rule core and the turn flow, making the runtime
//! state an explicit collaborator instead of ambient process-wide files.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use kingsday_types::{
    CurrentGame, EventCard, GlobalDefs, PlayerState, RoleDefinition, RoleId, RoleSummary,
    WinrateStats,
};

use crate::error::StoreError;
use crate::json;

/// Suffix of per-player runtime state files.
const GAMESTATE_SUFFIX: &str = "_gamestate.json";

/// Filename of the singleton session document.
const CURRENT_GAME_FILE: &str = "current_game.json";

/// Filename of the cross-session statistics document.
const WINRATE_FILE: &str = "winrate.json";

/// Typed access to the game's JSON documents under one data directory.
#[derive(Debug, Clone)]
pub struct GameStore {
    data_root: PathBuf,
}

impl GameStore {
    /// Create a store rooted at the given data directory.
    ///
    /// The directory does not need to exist yet; it is created lazily on
    /// the first write.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// The data root this store reads and writes under.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    // -----------------------------------------------------------------
    // Paths
    // -----------------------------------------------------------------

    /// Directory holding role definition content files.
    pub fn roles_dir(&self) -> PathBuf {
        self.data_root.join("roles")
    }

    /// Directory holding event card content files.
    pub fn events_dir(&self) -> PathBuf {
        self.data_root.join("events")
    }

    /// Directory holding mutable runtime documents.
    pub fn runtime_dir(&self) -> PathBuf {
        self.data_root.join("runtime")
    }

    /// Path of the singleton current-game document.
    pub fn current_game_path(&self) -> PathBuf {
        self.runtime_dir().join(CURRENT_GAME_FILE)
    }

    /// Path of a player's runtime state document.
    pub fn gamestate_path(&self, role_id: &RoleId) -> PathBuf {
        self.runtime_dir()
            .join(format!("{role_id}{GAMESTATE_SUFFIX}"))
    }

    /// Path of the win-rate statistics document.
    pub fn winrate_path(&self) -> PathBuf {
        self.runtime_dir().join(WINRATE_FILE)
    }

    /// Path of the shared content definitions document.
    pub fn global_defs_path(&self) -> PathBuf {
        self.data_root.join("global_defs.json")
    }

    // -----------------------------------------------------------------
    // Role discovery
    // -----------------------------------------------------------------

    /// List the `.json` filenames under a content directory, sorted.
    ///
    /// A missing directory lists as empty.
    fn list_json_files(dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };

        let mut files: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.ends_with(".json"))
            .collect();
        files.sort();
        files
    }

    /// Discover all valid roles, sorted by display name.
    ///
    /// Files that fail to parse or lack id/name/`init_number` are
    /// skipped; a content problem in one file never hides the rest.
    pub fn list_roles(&self) -> Vec<RoleSummary> {
        let dir = self.roles_dir();
        let mut roles: Vec<RoleSummary> = Self::list_json_files(&dir)
            .into_iter()
            .filter_map(|file| {
                let role: RoleDefinition =
                    json::load_or(&dir.join(&file), RoleDefinition::default());
                if role.is_valid() {
                    Some(RoleSummary {
                        id: role.id,
                        name: role.name,
                        file,
                        init_number: role.init_number,
                    })
                } else {
                    debug!(file, "skipping invalid role file");
                    None
                }
            })
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.file.cmp(&b.file)));
        roles
    }

    /// Load a full role definition by id, scanning the roles directory.
    ///
    /// Roles are matched by their `id` field, never by filename.
    pub fn load_role(&self, role_id: &RoleId) -> Option<RoleDefinition> {
        let dir = self.roles_dir();
        Self::list_json_files(&dir).into_iter().find_map(|file| {
            let role: RoleDefinition = json::load_or(&dir.join(&file), RoleDefinition::default());
            (role.is_valid() && role.id == *role_id).then_some(role)
        })
    }

    // -----------------------------------------------------------------
    // Runtime documents
    // -----------------------------------------------------------------

    /// Load a player's state, falling back to an empty state for the
    /// role when the document is missing or unreadable.
    pub fn load_gamestate(&self, role_id: &RoleId) -> PlayerState {
        json::load_or(
            &self.gamestate_path(role_id),
            PlayerState::empty(role_id.clone()),
        )
    }

    /// Persist a player's state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on write failure.
    pub fn save_gamestate(&self, state: &PlayerState) -> Result<(), StoreError> {
        json::save_pretty(&self.gamestate_path(&state.role_id), state)
    }

    /// Load the current-game document, falling back to an empty session.
    pub fn load_current_game(&self) -> CurrentGame {
        json::load_or(&self.current_game_path(), CurrentGame::default())
    }

    /// Persist the current-game document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on write failure.
    pub fn save_current_game(&self, game: &CurrentGame) -> Result<(), StoreError> {
        json::save_pretty(&self.current_game_path(), game)
    }

    /// Load the win-rate statistics, falling back to an empty document.
    pub fn load_winrate(&self) -> WinrateStats {
        json::load_or(&self.winrate_path(), WinrateStats::default())
    }

    /// Persist the win-rate statistics.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on write failure.
    pub fn save_winrate(&self, stats: &WinrateStats) -> Result<(), StoreError> {
        json::save_pretty(&self.winrate_path(), stats)
    }

    /// Load the shared content definitions, falling back to defaults.
    pub fn load_global_defs(&self) -> GlobalDefs {
        json::load_or(&self.global_defs_path(), GlobalDefs::default())
    }

    // -----------------------------------------------------------------
    // Event deck
    // -----------------------------------------------------------------

    /// List all event card filenames, sorted.
    pub fn list_event_files(&self) -> Vec<String> {
        Self::list_json_files(&self.events_dir())
    }

    /// Load one event card by filename, falling back to an empty card.
    pub fn load_event(&self, file: &str) -> EventCard {
        json::load_or(&self.events_dir().join(file), EventCard::default())
    }

    // -----------------------------------------------------------------
    // Runtime lifecycle
    // -----------------------------------------------------------------

    /// Delete the session's runtime documents: every player gamestate
    /// and the current-game file. The win-rate statistics survive.
    ///
    /// A missing runtime directory is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if an existing file cannot be removed.
    pub fn reset_runtime(&self) -> Result<(), StoreError> {
        let dir = self.runtime_dir();
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Ok(());
        };

        for entry in entries.filter_map(Result::ok) {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(GAMESTATE_SUFFIX) || name == CURRENT_GAME_FILE {
                let path = entry.path();
                std::fs::remove_file(&path)
                    .map_err(|source| StoreError::Remove { path, source })?;
            }
        }

        info!(dir = %dir.display(), "runtime reset");
        Ok(())
    }
}
