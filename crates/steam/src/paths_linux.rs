//! Steam root candidates on Linux and other Unix systems.

use std::path::{Path, PathBuf};

const FLATPAK_APP_ID: &str = "com.valvesoftware.Steam";

/// Returns the candidate roots in priority order: XDG data dir, the Debian
/// package's install, both Flatpak layouts, Snap, then legacy `~/.steam` links.
pub(crate) fn default_candidates(home: &Path, xdg_data_home: Option<&Path>) -> Vec<PathBuf> {
    // Relative XDG_DATA_HOME values are invalid and ignored.
    let data_home = xdg_data_home
        .filter(|p| p.is_absolute())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| home.join(".local").join("share"));

    let dot_steam = home.join(".steam");
    let flatpak = home.join(".var").join("app").join(FLATPAK_APP_ID);

    vec![
        data_home.join("Steam"),
        dot_steam.join("debian-installation"),
        flatpak.join("data").join("Steam"),
        flatpak.join(".local").join("share").join("Steam"),
        home.join("snap")
            .join("steam")
            .join("common")
            .join(".local")
            .join("share")
            .join("Steam"),
        dot_steam.join("steam"),
        dot_steam.join("root"),
        dot_steam,
    ]
}
