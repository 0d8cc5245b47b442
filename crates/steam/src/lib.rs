//! Steam library discovery.
//!
//! Locates the Steam installation, reads `config/libraryfolders.vdf`, and
//! turns every valid `appmanifest_*.acf` across the listed libraries into a
//! [`SteamGame`]. Everything is read-only; nothing under the Steam root is
//! ever written.

pub mod config;
pub mod error;
pub mod handler;
pub mod library;
pub mod manifest;
pub mod paths;
pub mod state;
pub mod store;
pub mod types;

// Candidate tables are plain path logic, so all of them build (and are
// tested) everywhere; only the current platform's is called.
#[cfg_attr(any(target_os = "windows", target_os = "macos"), allow(dead_code))]
mod paths_linux;
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
mod paths_macos;
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
mod paths_windows;

// Re-export primary types.
pub use config::DiscoveryConfig;
pub use error::{ErrorCode, GameFinderError};
pub use handler::{SteamHandler, scan_libraries};
pub use library::{find_library_for_app, parse_library_folders};
pub use manifest::{app_manifest_path, parse_app_manifest};
pub use paths::{
    FixedLocator, SteamLocator, SystemLocator, common_path, find_steam_path, is_steam_game_path,
    is_valid_steam_root, library_folders_path, steam_executable_path, steamapps_path,
};
pub use state::StateFlags;
pub use store::StoreHandler;
pub use types::{AppManifest, InstalledDepot, LibraryFolder, STORE_ID, SteamGame};
