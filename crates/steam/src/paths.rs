//! Steam root discovery and the fixed directory layout below a root or library.
//!
//! Platform candidate tables live in `paths_linux.rs`, `paths_macos.rs` and
//! `paths_windows.rs`. This module picks the one for the current platform,
//! validates candidates, and exposes the [`SteamLocator`] seam the handler
//! depends on.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use tracing::debug;

use crate::config::DiscoveryConfig;
use crate::error::GameFinderError;

/// File name of Steam's library index.
pub const LIBRARY_FOLDERS_FILE: &str = "libraryfolders.vdf";

/// Returns `<steam_root>/config/libraryfolders.vdf`.
pub fn library_folders_path(steam_root: &Path) -> PathBuf {
    steam_root.join("config").join(LIBRARY_FOLDERS_FILE)
}

/// Returns `<library>/steamapps`, where app manifests live.
pub fn steamapps_path(library: &Path) -> PathBuf {
    library.join("steamapps")
}

/// Returns `<library>/steamapps/common`, where games are installed.
pub fn common_path(library: &Path) -> PathBuf {
    steamapps_path(library).join("common")
}

/// A directory counts as a Steam root only if it holds the library index.
pub fn is_valid_steam_root(path: &Path) -> bool {
    library_folders_path(path).is_file()
}

/// Returns the Steam client executable (or app bundle) inside a root.
pub fn steam_executable_path(steam_root: &Path) -> PathBuf {
    if cfg!(target_os = "windows") {
        steam_root.join("steam.exe")
    } else if cfg!(target_os = "macos") {
        steam_root.join("Steam.app")
    } else {
        steam_root.join("steam.sh")
    }
}

/// Returns `true` if any component of `path` is `steamapps`.
pub fn is_steam_game_path(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| s.eq_ignore_ascii_case("steamapps"))
    })
}

/// Resolves the Steam installation root.
///
/// The handler only talks to this trait, keeping registry queries and
/// platform path tables out of the rest of the engine.
pub trait SteamLocator: Send + Sync {
    fn locate(&self) -> Pin<Box<dyn Future<Output = Result<PathBuf, GameFinderError>> + Send + '_>>;
}

/// Searches the platform's default locations, then the registry on Windows.
#[derive(Debug, Clone, Default)]
pub struct SystemLocator {
    config: DiscoveryConfig,
}

impl SystemLocator {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    async fn search(&self) -> Result<PathBuf, GameFinderError> {
        if let Some(path) = &self.config.steam_path {
            debug!(path = %path.display(), "using configured steam path");
            return validate_root(path);
        }

        let mut searched = default_candidates();
        searched.extend(self.config.extra_search_paths.iter().cloned());

        if let Some(found) = first_valid(&searched) {
            return Ok(found);
        }

        if let Some(path) = registry_candidate(self.config.registry_timeout()).await {
            let valid = is_valid_steam_root(&path);
            debug!(path = %path.display(), valid, "probed registry steam path");
            searched.push(path.clone());
            if valid {
                return Ok(path);
            }
        }

        Err(GameFinderError::SteamNotFound { searched })
    }
}

impl SteamLocator for SystemLocator {
    fn locate(&self) -> Pin<Box<dyn Future<Output = Result<PathBuf, GameFinderError>> + Send + '_>> {
        Box::pin(self.search())
    }
}

/// Accepts exactly one root, after validating it.
#[derive(Debug, Clone)]
pub struct FixedLocator {
    path: PathBuf,
}

impl FixedLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SteamLocator for FixedLocator {
    fn locate(&self) -> Pin<Box<dyn Future<Output = Result<PathBuf, GameFinderError>> + Send + '_>> {
        Box::pin(async move { validate_root(&self.path) })
    }
}

/// Finds the Steam root with default settings.
pub async fn find_steam_path() -> Result<PathBuf, GameFinderError> {
    SystemLocator::default().search().await
}

fn validate_root(path: &Path) -> Result<PathBuf, GameFinderError> {
    if is_valid_steam_root(path) {
        Ok(path.to_path_buf())
    } else {
        Err(GameFinderError::SteamNotFound {
            searched: vec![path.to_path_buf()],
        })
    }
}

fn first_valid(candidates: &[PathBuf]) -> Option<PathBuf> {
    for candidate in candidates {
        let valid = is_valid_steam_root(candidate);
        debug!(path = %candidate.display(), valid, "probed steam candidate");
        if valid {
            return Some(candidate.clone());
        }
    }
    None
}

// Platform-specific candidate tables.
#[cfg(target_os = "windows")]
fn default_candidates() -> Vec<PathBuf> {
    crate::paths_windows::default_candidates(std::env::var_os("ProgramFiles(x86)"))
}

#[cfg(target_os = "macos")]
fn default_candidates() -> Vec<PathBuf> {
    match home_dir() {
        Some(home) => crate::paths_macos::default_candidates(&home),
        None => Vec::new(),
    }
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn default_candidates() -> Vec<PathBuf> {
    let xdg_data_home = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from);
    match home_dir() {
        Some(home) => crate::paths_linux::default_candidates(&home, xdg_data_home.as_deref()),
        None => Vec::new(),
    }
}

#[cfg(not(target_os = "windows"))]
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

#[cfg(target_os = "windows")]
async fn registry_candidate(timeout: Duration) -> Option<PathBuf> {
    crate::paths_windows::registry_steam_path(timeout).await
}

#[cfg(not(target_os = "windows"))]
async fn registry_candidate(_timeout: Duration) -> Option<PathBuf> {
    None
}
