//! Parser for `steamapps/appmanifest_<appid>.acf`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gamefinder_vdf::VdfNode;

use crate::error::GameFinderError;
use crate::state::StateFlags;
use crate::types::{AppManifest, InstalledDepot};

/// Parses one app manifest.
///
/// `appid`, `name` and `installdir` are required. Every other field is
/// optional: sizes default to 0, ids and timestamps to `None`. The install
/// directory is resolved next to the manifest, as
/// `<library>/steamapps/common/<installdir>`.
pub fn parse_app_manifest(path: &Path) -> Result<AppManifest, GameFinderError> {
    let root = gamefinder_vdf::parse_file(path).map_err(|e| GameFinderError::from_vdf(path, e))?;

    let app = root
        .get_object("AppState")
        .ok_or_else(|| GameFinderError::invalid_format(path, "missing top-level 'AppState' object"))?;

    let context = format!("AppState of {}", path.display());
    let required = |key: &str| {
        app.get_required_string(key, &context)
            .map_err(|e| GameFinderError::from_vdf(path, e))
    };

    let raw_app_id = required("appid")?;
    let app_id = raw_app_id.trim().parse::<u32>().map_err(|_| {
        GameFinderError::invalid_format(path, format!("appid '{raw_app_id}' is not a valid AppId"))
    })?;
    let name = required("name")?.to_string();
    let install_dir = required("installdir")?.to_string();
    // An empty value would resolve to the shared `common` directory itself.
    if install_dir.trim().is_empty() {
        return Err(GameFinderError::MissingField {
            key: "installdir".into(),
            context,
        });
    }

    let installation_directory = path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("common")
        .join(&install_dir);

    Ok(AppManifest {
        app_id,
        name,
        state_flags: StateFlags::from_bits(app.get_number("StateFlags").unwrap_or(0)),
        install_dir,
        installation_directory,
        last_updated: app.get_timestamp("LastUpdated"),
        size_on_disk: app.get_big_int("SizeOnDisk"),
        staging_size: app.get_big_int("StagingSize"),
        bytes_to_download: app.get_big_int("BytesToDownload"),
        bytes_downloaded: app.get_big_int("BytesDownloaded"),
        bytes_to_stage: app.get_big_int("BytesToStage"),
        bytes_staged: app.get_big_int("BytesStaged"),
        build_id: app.get_number("buildid"),
        target_build_id: app.get_number("TargetBuildID"),
        universe: app.get_number("Universe"),
        last_owner: Some(app.get_big_int("LastOwner")).filter(|&owner| owner != 0),
        auto_update_behavior: app.get_number("AutoUpdateBehavior"),
        scheduled_auto_update: app.get_timestamp("ScheduledAutoUpdate"),
        installed_depots: app
            .get_object("InstalledDepots")
            .map(parse_installed_depots)
            .unwrap_or_default(),
        shared_depots: app
            .get_object("SharedDepots")
            .map(parse_shared_depots)
            .unwrap_or_default(),
        user_config: app
            .get_object("UserConfig")
            .map(parse_string_map)
            .unwrap_or_default(),
    })
}

/// Returns the path of the manifest for `app_id` inside a `steamapps` directory.
pub fn app_manifest_path(steamapps: &Path, app_id: u32) -> PathBuf {
    steamapps.join(format!("appmanifest_{app_id}.acf"))
}

// Depot metadata is informational, so unreadable entries are dropped quietly.
fn parse_installed_depots(depots: &VdfNode) -> Vec<InstalledDepot> {
    depots
        .iter()
        .filter_map(|(key, value)| {
            let depot_id = key.parse::<u32>().ok()?;
            let depot = value.as_object()?;
            Some(InstalledDepot {
                depot_id,
                manifest_id: depot.get_big_int("manifest"),
                size_on_disk: depot.get_big_int("size"),
                dlc_app_id: depot.get_number("dlcappid"),
            })
        })
        .collect()
}

fn parse_shared_depots(depots: &VdfNode) -> BTreeMap<u32, u32> {
    depots
        .iter()
        .filter_map(|(key, value)| {
            let depot_id = key.parse::<u32>().ok()?;
            let app_id = value.as_str()?.trim().parse::<u32>().ok()?;
            Some((depot_id, app_id))
        })
        .collect()
}

fn parse_string_map(node: &VdfNode) -> BTreeMap<String, String> {
    node.iter()
        .filter_map(|(key, value)| Some((key.to_string(), value.as_str()?.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::fs;

    const HALF_LIFE_2: &str = r#"
"AppState"
{
	"appid"		"220"
	"Universe"		"1"
	"LauncherPath"		"C:\\Program Files (x86)\\Steam\\steam.exe"
	"name"		"Half-Life 2"
	"StateFlags"		"4"
	"installdir"		"Half-Life 2"
	"LastUpdated"		"1699999999"
	"SizeOnDisk"		"4135432313"
	"StagingSize"		"0"
	"buildid"		"12345678"
	"LastOwner"		"76561198000000000"
	"BytesToDownload"		"2000"
	"BytesDownloaded"		"2000"
	"BytesToStage"		"3000"
	"BytesStaged"		"3000"
	"TargetBuildID"		"12345679"
	"AutoUpdateBehavior"		"0"
	"AllowOtherDownloadsWhileRunning"		"0"
	"ScheduledAutoUpdate"		"0"
	"InstalledDepots"
	{
		"221"
		{
			"manifest"		"8212334588283318046"
			"size"		"4135432313"
		}
		"323140"
		{
			"manifest"		"4171203357498127843"
			"size"		"1024"
			"dlcappid"		"323140"
		}
		"junk"
		{
			"manifest"		"1"
		}
		"999"		"not a block"
	}
	"SharedDepots"
	{
		"228988"		"228980"
		"228990"		"228980"
	}
	"UserConfig"
	{
		"language"		"english"
	}
	"MountedConfig"
	{
		"language"		"english"
	}
}
"#;

    fn write_manifest(dir: &Path, file: &str, content: &str) -> PathBuf {
        let steamapps = dir.join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        let path = steamapps.join(file);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parse_full_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_manifest(tmp.path(), "appmanifest_220.acf", HALF_LIFE_2);
        let m = parse_app_manifest(&path).unwrap();

        assert_eq!(m.app_id, 220);
        assert_eq!(m.name, "Half-Life 2");
        assert_eq!(m.install_dir, "Half-Life 2");
        assert_eq!(m.state_flags, StateFlags::FULLY_INSTALLED);
        assert!(m.is_installed());
        assert_eq!(
            m.installation_directory,
            tmp.path().join("steamapps").join("common").join("Half-Life 2")
        );
        assert_eq!(m.last_updated.map(|t| t.timestamp()), Some(1699999999));
        assert_eq!(m.size_on_disk, 4135432313);
        assert_eq!(m.staging_size, 0);
        assert_eq!(m.bytes_to_download, 2000);
        assert_eq!(m.bytes_downloaded, 2000);
        assert_eq!(m.bytes_to_stage, 3000);
        assert_eq!(m.bytes_staged, 3000);
        assert_eq!(m.build_id, Some(12345678));
        assert_eq!(m.target_build_id, Some(12345679));
        assert_eq!(m.universe, Some(1));
        assert_eq!(m.last_owner, Some(76561198000000000));
        assert_eq!(m.auto_update_behavior, Some(0));
        assert_eq!(m.scheduled_auto_update, None);
        assert_eq!(m.shared_depots.get(&228988), Some(&228980));
        assert_eq!(m.user_config.get("language").map(String::as_str), Some("english"));
    }

    #[test]
    fn depots_skip_unreadable_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_manifest(tmp.path(), "appmanifest_220.acf", HALF_LIFE_2);
        let m = parse_app_manifest(&path).unwrap();

        assert_eq!(
            m.installed_depots,
            vec![
                InstalledDepot {
                    depot_id: 221,
                    manifest_id: 8212334588283318046,
                    size_on_disk: 4135432313,
                    dlc_app_id: None,
                },
                InstalledDepot {
                    depot_id: 323140,
                    manifest_id: 4171203357498127843,
                    size_on_disk: 1024,
                    dlc_app_id: Some(323140),
                },
            ]
        );
    }

    #[test]
    fn minimal_manifest_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let content = r#""AppState" { "appid" "400" "name" "Portal" "installdir" "Portal" "LastOwner" "0" }"#;
        let path = write_manifest(tmp.path(), "appmanifest_400.acf", content);
        let m = parse_app_manifest(&path).unwrap();

        assert_eq!(m.state_flags.bits(), 0);
        assert!(!m.is_installed());
        assert_eq!(m.size_on_disk, 0);
        assert_eq!(m.bytes_to_download, 0);
        assert_eq!(m.last_updated, None);
        assert_eq!(m.last_owner, None);
        assert_eq!(m.build_id, None);
        assert!(m.installed_depots.is_empty());
        assert!(m.user_config.is_empty());
    }

    #[test]
    fn bare_tokens_read_like_quoted_ones() {
        let tmp = tempfile::tempdir().unwrap();
        let content = "\"AppState\" { appid 70 name HalfLife installdir Half-Life StateFlags 1048580 }";
        let path = write_manifest(tmp.path(), "appmanifest_70.acf", content);
        let m = parse_app_manifest(&path).unwrap();

        assert_eq!(m.app_id, 70);
        assert_eq!(m.name, "HalfLife");
        assert_eq!(m.install_dir, "Half-Life");
        assert!(m.state_flags.contains(StateFlags::DOWNLOADING));
        assert!(!m.is_installed());
    }

    #[test]
    fn missing_required_fields() {
        let tmp = tempfile::tempdir().unwrap();
        for (content, key) in [
            (r#""AppState" { "name" "x" "installdir" "x" }"#, "appid"),
            (r#""AppState" { "appid" "1" "installdir" "x" }"#, "name"),
            (r#""AppState" { "appid" "1" "name" "x" }"#, "installdir"),
        ] {
            let path = write_manifest(tmp.path(), "appmanifest_1.acf", content);
            let err = parse_app_manifest(&path).unwrap_err();
            assert_eq!(err.code(), ErrorCode::VdfMissingField);
            match err {
                GameFinderError::MissingField { key: k, context } => {
                    assert_eq!(k, key);
                    assert!(context.contains("appmanifest_1.acf"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn blank_install_dir_is_missing() {
        let tmp = tempfile::tempdir().unwrap();
        for blank in ["", "   "] {
            let content = format!(
                r#""AppState" {{ "appid" "1" "name" "x" "StateFlags" "4" "installdir" "{blank}" }}"#
            );
            let path = write_manifest(tmp.path(), "appmanifest_1.acf", &content);
            let err = parse_app_manifest(&path).unwrap_err();
            assert_eq!(err.code(), ErrorCode::VdfMissingField);
            assert!(matches!(err, GameFinderError::MissingField { ref key, .. } if key == "installdir"));
        }
    }

    #[test]
    fn missing_app_state_is_invalid_format() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_manifest(tmp.path(), "appmanifest_1.acf", r#""Other" { "appid" "1" }"#);
        assert_eq!(parse_app_manifest(&path).unwrap_err().code(), ErrorCode::VdfInvalidFormat);
    }

    #[test]
    fn non_numeric_app_id_is_invalid_format() {
        let tmp = tempfile::tempdir().unwrap();
        let content = r#""AppState" { "appid" "abc" "name" "x" "installdir" "x" }"#;
        let path = write_manifest(tmp.path(), "appmanifest_1.acf", content);
        assert_eq!(parse_app_manifest(&path).unwrap_err().code(), ErrorCode::VdfInvalidFormat);
    }

    #[test]
    fn corrupt_manifest_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_manifest(tmp.path(), "appmanifest_1.acf", "\"AppState\" { \"appid\" \"1");
        assert_eq!(parse_app_manifest(&path).unwrap_err().code(), ErrorCode::VdfParseError);
    }

    #[test]
    fn manifest_path_format() {
        assert_eq!(
            app_manifest_path(Path::new("/lib/steamapps"), 220),
            PathBuf::from("/lib/steamapps/appmanifest_220.acf")
        );
    }
}
