//! Parser for `config/libraryfolders.vdf`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gamefinder_vdf::VdfNode;
use tracing::{debug, warn};

use crate::error::GameFinderError;
use crate::types::LibraryFolder;

/// Parses the library index into one [`LibraryFolder`] per numbered entry.
///
/// Non-numeric keys (`contentstatsid`) and non-object children are skipped.
/// A malformed entry is dropped without affecting the others; the call only
/// fails if every entry was malformed, in which case the error lists them
/// all. An index with no entries at all is valid and yields an empty list.
pub fn parse_library_folders(path: &Path) -> Result<Vec<LibraryFolder>, GameFinderError> {
    let root = gamefinder_vdf::parse_file(path).map_err(|e| GameFinderError::from_vdf(path, e))?;

    let folders = root.get_object("libraryfolders").ok_or_else(|| {
        GameFinderError::invalid_format(path, "missing top-level 'libraryfolders' object")
    })?;

    let mut entries = Vec::new();
    let mut errors = Vec::new();

    for (key, value) in folders.numeric_children() {
        let Some(entry) = value.as_object() else {
            debug!(key, "skipping library entry that is not a block");
            continue;
        };

        match parse_entry(path, key, entry) {
            Ok(folder) => entries.push(folder),
            Err(e) => {
                warn!(key, file = %path.display(), error = %e, "skipping malformed library entry");
                errors.push(format!("entry {key}: {e}"));
            }
        }
    }

    if entries.is_empty() && !errors.is_empty() {
        return Err(GameFinderError::NoLibraryFolders {
            path: path.to_path_buf(),
            errors,
        });
    }

    debug!(file = %path.display(), count = entries.len(), "parsed library folders");
    Ok(entries)
}

/// Returns the library that Steam lists as holding `app_id`.
pub fn find_library_for_app(folders: &[LibraryFolder], app_id: u32) -> Option<&LibraryFolder> {
    folders.iter().find(|f| f.contains_app(app_id))
}

fn parse_entry(file: &Path, key: &str, entry: &VdfNode) -> Result<LibraryFolder, GameFinderError> {
    let context = format!("library entry {key} of {}", file.display());
    let path = entry
        .get_required_string("path", &context)
        .map_err(|e| GameFinderError::from_vdf(file, e))?;
    if path.trim().is_empty() {
        return Err(GameFinderError::MissingField {
            key: "path".into(),
            context,
        });
    }

    Ok(LibraryFolder {
        index: key.to_string(),
        path: PathBuf::from(path),
        label: entry.get_string("label").unwrap_or_default().to_string(),
        content_id: Some(entry.get_big_int("contentid")).filter(|&id| id != 0),
        total_disk_size: entry.get_big_int("totalsize"),
        update_clean_bytes_tally: entry.get_big_int("update_clean_bytes_tally"),
        time_last_update_verified: entry.get_timestamp("time_last_update_verified"),
        app_sizes: entry.get_object("apps").map(parse_app_sizes).unwrap_or_default(),
    })
}

fn parse_app_sizes(apps: &VdfNode) -> BTreeMap<u32, u64> {
    apps.iter()
        .filter_map(|(app_id, size)| {
            let app_id = app_id.parse::<u32>().ok()?;
            let size = size
                .as_str()
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(0);
            Some((app_id, size))
        })
        .collect()
}
