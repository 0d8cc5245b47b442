//! Discovery entry point: root, then libraries, then manifests.

use std::collections::HashSet;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::error::GameFinderError;
use crate::library::parse_library_folders;
use crate::manifest::parse_app_manifest;
use crate::paths::{SteamLocator, SystemLocator, library_folders_path, steamapps_path};
use crate::store::StoreHandler;
use crate::types::{LibraryFolder, STORE_ID, SteamGame};

/// Finds installed Steam games.
///
/// Stateless apart from remembering the last root it resolved.
pub struct SteamHandler {
    locator: Box<dyn SteamLocator>,
    steam_path: Mutex<Option<PathBuf>>,
}

impl Default for SteamHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SteamHandler {
    pub fn new() -> Self {
        Self::with_config(DiscoveryConfig::default())
    }

    pub fn with_config(config: DiscoveryConfig) -> Self {
        Self::with_locator(SystemLocator::new(config))
    }

    pub fn with_locator(locator: impl SteamLocator + 'static) -> Self {
        Self {
            locator: Box::new(locator),
            steam_path: Mutex::new(None),
        }
    }

    /// Returns every fully installed game across all libraries.
    ///
    /// Fails only when the root cannot be found or the library index cannot
    /// be used. Problems with individual libraries or manifests are logged
    /// and the affected entries left out. The filesystem walk runs on the
    /// blocking pool.
    pub async fn find_all_games(&self) -> Result<Vec<SteamGame>, GameFinderError> {
        let root = self.locator.locate().await?;

        let (libraries, games) = tokio::task::spawn_blocking({
            let root = root.clone();
            move || discover(&root)
        })
        .await
        .map_err(|source| GameFinderError::ScanInterrupted { source })??;

        info!(
            steam_path = %root.display(),
            libraries,
            games = games.len(),
            "steam discovery complete"
        );
        self.remember_root(&root);
        Ok(games)
    }

    /// Returns `true` if a Steam root can be located.
    ///
    /// Does not update [`steam_path`](Self::steam_path).
    pub async fn is_available(&self) -> bool {
        match self.locator.locate().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "steam not available");
                false
            }
        }
    }

    /// Root used by the last successful [`find_all_games`](Self::find_all_games).
    pub fn steam_path(&self) -> Option<PathBuf> {
        self.steam_path
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the installed game for the first of `app_ids` that is present.
    ///
    /// Titles often ship under several AppIds (regional or edition variants);
    /// callers pass them in order of preference.
    pub async fn find_by_app_id(&self, app_ids: &[u32]) -> Result<Option<SteamGame>, GameFinderError> {
        let mut games = self.find_all_games().await?;
        Ok(app_ids.iter().find_map(|id| {
            let pos = games.iter().position(|g| g.app_id() == *id)?;
            Some(games.swap_remove(pos))
        }))
    }

    /// Returns the first installed game whose whole name matches `pattern`.
    pub async fn find_by_name(&self, pattern: &Regex) -> Result<Option<SteamGame>, GameFinderError> {
        let pattern = anchored(pattern);
        let games = self.find_all_games().await?;
        Ok(games.into_iter().find(|g| pattern.is_match(&g.name)))
    }

    fn remember_root(&self, root: &Path) {
        *self
            .steam_path
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(root.to_path_buf());
    }
}

impl StoreHandler for SteamHandler {
    fn store_id(&self) -> &'static str {
        STORE_ID
    }

    fn store_name(&self) -> &'static str {
        "Steam"
    }

    fn find_all_games(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SteamGame>, GameFinderError>> + Send + '_>> {
        Box::pin(SteamHandler::find_all_games(self))
    }

    fn is_available(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(SteamHandler::is_available(self))
    }
}

/// Reads the library index below `root` and scans every library in it.
/// Returns the number of libraries scanned alongside the games.
fn discover(root: &Path) -> Result<(usize, Vec<SteamGame>), GameFinderError> {
    let folders = with_root_library(root, parse_library_folders(&library_folders_path(root))?);
    let games = scan_libraries(root, &folders);
    Ok((folders.len(), games))
}

/// Puts the Steam root first when the index does not list it.
///
/// Older index files only list the additional libraries; the root always
/// holds one.
fn with_root_library(root: &Path, mut folders: Vec<LibraryFolder>) -> Vec<LibraryFolder> {
    let canonical_root = canonical(root);
    if folders.iter().any(|f| canonical(&f.path) == canonical_root) {
        return folders;
    }
    debug!(steam_path = %root.display(), "library index does not list the steam root; adding it");
    folders.insert(
        0,
        LibraryFolder {
            index: String::new(),
            path: root.to_path_buf(),
            label: String::new(),
            content_id: None,
            total_disk_size: 0,
            update_clean_bytes_tally: 0,
            time_last_update_verified: None,
            app_sizes: Default::default(),
        },
    );
    folders
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Scans each library's `steamapps` directory for installed games.
///
/// A library listed twice (by the same canonical path) is scanned once, and
/// an AppId seen in an earlier library wins over later copies. Only
/// manifests whose state is a valid install and whose install directory
/// exists on disk produce a game.
pub fn scan_libraries(steam_path: &Path, folders: &[LibraryFolder]) -> Vec<SteamGame> {
    let mut seen_libraries = HashSet::new();
    let mut seen_apps = HashSet::new();
    let mut games = Vec::new();

    for folder in folders {
        if !seen_libraries.insert(canonical(&folder.path)) {
            debug!(library = %folder.path.display(), "skipping duplicate library");
            continue;
        }

        let steamapps = steamapps_path(&folder.path);
        if !steamapps.is_dir() {
            debug!(library = %folder.path.display(), "library has no steamapps directory");
            continue;
        }

        let manifests = match list_manifests(&steamapps) {
            Ok(manifests) => manifests,
            Err(e) => {
                warn!(library = %folder.path.display(), code = %e.code(), error = %e, "skipping unreadable library");
                continue;
            }
        };

        for manifest_path in manifests {
            let manifest = match parse_app_manifest(&manifest_path) {
                Ok(m) => m,
                Err(e) => {
                    warn!(
                        file = %manifest_path.display(),
                        code = %e.code(),
                        error = %e,
                        "skipping unreadable app manifest"
                    );
                    continue;
                }
            };

            if !manifest.state_flags.is_valid_install() {
                debug!(app_id = manifest.app_id, state = %manifest.state_flags, "skipping app that is not fully installed");
                continue;
            }
            if !manifest.installation_directory.is_dir() {
                debug!(
                    app_id = manifest.app_id,
                    dir = %manifest.installation_directory.display(),
                    "skipping app with missing install directory"
                );
                continue;
            }
            if !seen_apps.insert(manifest.app_id) {
                debug!(app_id = manifest.app_id, library = %folder.path.display(), "skipping duplicate app");
                continue;
            }

            games.push(SteamGame::new(manifest, folder.clone(), steam_path.to_path_buf()));
        }
    }

    games
}

fn list_manifests(steamapps: &Path) -> Result<Vec<PathBuf>, GameFinderError> {
    let read_error = |source| GameFinderError::LibraryRead {
        path: steamapps.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(steamapps).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let name = entry.file_name();
        if name.to_str().is_some_and(is_manifest_file_name) && entry.path().is_file() {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Matches `appmanifest_*.acf`, extension case-insensitive.
pub(crate) fn is_manifest_file_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("appmanifest_") else {
        return false;
    };
    rest.len() > 4
        && rest.is_char_boundary(rest.len() - 4)
        && rest[rest.len() - 4..].eq_ignore_ascii_case(".acf")
}

// `Regex::is_match` finds substrings; names must match as a whole.
fn anchored(pattern: &Regex) -> Regex {
    Regex::new(&format!(r"\A(?:{})\z", pattern.as_str())).unwrap_or_else(|_| pattern.clone())
}
