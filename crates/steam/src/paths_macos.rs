//! Steam root candidates on macOS.

use std::fs;
use std::path::{Path, PathBuf};

/// Returns the native location, the legacy `~/.steam/steam` link, then any
/// Steam installed inside a CrossOver bottle.
pub(crate) fn default_candidates(home: &Path) -> Vec<PathBuf> {
    let app_support = home.join("Library").join("Application Support");
    let mut candidates = vec![
        app_support.join("Steam"),
        home.join(".steam").join("steam"),
    ];
    candidates.extend(crossover_candidates(&app_support));
    candidates
}

/// Lists `<bottle>/drive_c/Program Files (x86)/Steam` for every CrossOver bottle.
fn crossover_candidates(app_support: &Path) -> Vec<PathBuf> {
    let bottles = app_support.join("CrossOver").join("Bottles");
    let Ok(entries) = fs::read_dir(&bottles) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false))
        .map(|entry| {
            entry
                .path()
                .join("drive_c")
                .join("Program Files (x86)")
                .join("Steam")
        })
        .collect();
    found.sort();
    found
}
