//! Domain types produced by Steam discovery.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::StateFlags;

/// Store tag carried by every [`SteamGame`].
pub const STORE_ID: &str = "steam";

/// One entry of `libraryfolders.vdf`: a directory where Steam installs apps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryFolder {
    /// Index key of the entry (`"0"`, `"1"`, ...).
    pub index: String,
    /// Absolute path of the library root.
    pub path: PathBuf,
    /// User-facing label; usually empty.
    pub label: String,
    pub content_id: Option<u64>,
    pub total_disk_size: u64,
    pub update_clean_bytes_tally: u64,
    pub time_last_update_verified: Option<DateTime<Utc>>,
    /// AppId to size in bytes for every app Steam places in this library.
    pub app_sizes: BTreeMap<u32, u64>,
}

impl LibraryFolder {
    /// Returns `true` if Steam lists `app_id` in this library.
    pub fn contains_app(&self, app_id: u32) -> bool {
        self.app_sizes.contains_key(&app_id)
    }
}

/// A depot entry from `InstalledDepots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledDepot {
    pub depot_id: u32,
    pub manifest_id: u64,
    pub size_on_disk: u64,
    pub dlc_app_id: Option<u32>,
}

/// Parsed `appmanifest_<id>.acf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    pub app_id: u32,
    pub name: String,
    pub state_flags: StateFlags,
    /// Folder name below `steamapps/common`.
    pub install_dir: String,
    /// `<library>/steamapps/common/<install_dir>`.
    pub installation_directory: PathBuf,
    pub last_updated: Option<DateTime<Utc>>,
    pub size_on_disk: u64,
    pub staging_size: u64,
    pub bytes_to_download: u64,
    pub bytes_downloaded: u64,
    pub bytes_to_stage: u64,
    pub bytes_staged: u64,
    pub build_id: Option<u32>,
    pub target_build_id: Option<u32>,
    pub universe: Option<u32>,
    /// SteamID64 of the last owner; `None` when Steam records 0.
    pub last_owner: Option<u64>,
    pub auto_update_behavior: Option<u32>,
    pub scheduled_auto_update: Option<DateTime<Utc>>,
    pub installed_depots: Vec<InstalledDepot>,
    /// Depot id to the app that provides it.
    pub shared_depots: BTreeMap<u32, u32>,
    pub user_config: BTreeMap<String, String>,
}

impl AppManifest {
    /// Returns `true` if the state flags describe a playable install.
    pub fn is_installed(&self) -> bool {
        self.state_flags.is_valid_install()
    }
}

/// A fully installed Steam game, as returned by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SteamGame {
    /// AppId as a string.
    pub id: String,
    pub name: String,
    /// Absolute install directory.
    pub path: PathBuf,
    pub store: &'static str,
    pub app_manifest: AppManifest,
    pub library_folder: LibraryFolder,
    pub steam_path: PathBuf,
}

impl SteamGame {
    pub fn new(app_manifest: AppManifest, library_folder: LibraryFolder, steam_path: PathBuf) -> Self {
        Self {
            id: app_manifest.app_id.to_string(),
            name: app_manifest.name.clone(),
            path: app_manifest.installation_directory.clone(),
            store: STORE_ID,
            app_manifest,
            library_folder,
            steam_path,
        }
    }

    pub fn app_id(&self) -> u32 {
        self.app_manifest.app_id
    }
}
