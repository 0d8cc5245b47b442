fn main() {
    println!("Run `cargo test -p discovery-compat` to execute discovery compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};

    use gamefinder_steam::{
        ErrorCode, FixedLocator, StateFlags, SteamHandler, find_library_for_app, library_folders_path,
        parse_app_manifest, parse_library_folders,
    };

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn read_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// VDF-escapes a path the way Steam writes it.
    fn vdf_path(path: &Path) -> String {
        path.display().to_string().replace('\\', "\\\\")
    }

    /// A Steam install laid out on disk from the fixtures:
    /// `<tmp>/Steam` is the root and first library, `<tmp>/SSD` the second,
    /// `<tmp>/Unplugged` is listed but does not exist.
    struct SteamTree {
        _tmp: tempfile::TempDir,
        root: PathBuf,
        second: PathBuf,
    }

    impl SteamTree {
        fn build() -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let root = tmp.path().join("Steam");
            let second = tmp.path().join("SSD");

            let index = read_fixture("libraryfolders.vdf")
                .replace("__LIBRARY_MAIN__", &vdf_path(&root))
                .replace("__LIBRARY_SECOND__", &vdf_path(&second))
                .replace("__LIBRARY_MISSING__", &vdf_path(&tmp.path().join("Unplugged")));
            fs::create_dir_all(root.join("config")).unwrap();
            fs::write(library_folders_path(&root), index).unwrap();

            copy_manifests("library_main", &root);
            copy_manifests("library_second", &second);

            // Cyberpunk's directory exists but the manifest is mid-update;
            // Portal 2's directory was deleted by hand.
            for dir in ["Half-Life 2", "Steamworks Shared", "Cyberpunk 2077"] {
                fs::create_dir_all(root.join("steamapps").join("common").join(dir)).unwrap();
            }
            for dir in ["Portal", "Half-Life 2"] {
                fs::create_dir_all(second.join("steamapps").join("common").join(dir)).unwrap();
            }

            Self { _tmp: tmp, root, second }
        }

        fn handler(&self) -> SteamHandler {
            SteamHandler::with_locator(FixedLocator::new(&self.root))
        }
    }

    fn copy_manifests(fixture: &str, library: &Path) {
        let steamapps = library.join("steamapps");
        fs::create_dir_all(&steamapps).unwrap();
        for entry in fs::read_dir(fixtures_dir().join(fixture)).unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), steamapps.join(entry.file_name())).unwrap();
        }
    }

    #[tokio::test]
    async fn discovers_installed_games() {
        let tree = SteamTree::build();
        let games = tree.handler().find_all_games().await.unwrap();

        let found: Vec<(&str, &str)> = games.iter().map(|g| (g.id.as_str(), g.name.as_str())).collect();
        assert_eq!(
            found,
            [
                ("220", "Half-Life 2"),
                ("228980", "Steamworks Common Redistributables"),
                ("400", "Portal"),
            ]
        );

        for game in &games {
            assert_eq!(game.store, "steam");
            assert_eq!(game.steam_path, tree.root);
            assert!(game.path.is_dir());
        }
        assert_eq!(games[0].library_folder.path, tree.root);
        assert_eq!(games[2].library_folder.path, tree.second);
        assert_eq!(games[2].library_folder.label, "Games SSD");
    }

    #[tokio::test]
    async fn first_library_wins_for_duplicate_app() {
        let tree = SteamTree::build();
        let game = tree.handler().find_by_app_id(&[220]).await.unwrap().unwrap();
        assert_eq!(game.library_folder.index, "0");
        assert_eq!(
            game.path,
            tree.root.join("steamapps").join("common").join("Half-Life 2")
        );
    }

    #[test]
    fn library_index_fields() {
        let tree = SteamTree::build();
        let folders = parse_library_folders(&library_folders_path(&tree.root)).unwrap();
        assert_eq!(folders.len(), 3);

        let main = &folders[0];
        assert_eq!(main.index, "0");
        assert_eq!(main.content_id, Some(7281964928495815227));
        assert_eq!(main.update_clean_bytes_tally, 2806519391);
        assert_eq!(main.time_last_update_verified.map(|t| t.timestamp()), Some(1700741209));
        assert_eq!(main.app_sizes.get(&1091500), Some(&65968235713));

        let ssd = &folders[1];
        assert_eq!(ssd.total_disk_size, 1000186310656);
        assert_eq!(ssd.time_last_update_verified, None);

        assert!(folders[2].app_sizes.is_empty());
        assert_eq!(find_library_for_app(&folders, 620).map(|f| f.index.as_str()), Some("1"));
        assert!(find_library_for_app(&folders, 70).is_none());
    }

    #[test]
    fn legacy_index_keeps_block_entries_only() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("libraryfolders.vdf");
        fs::write(&path, read_fixture("libraryfolders_legacy.vdf")).unwrap();

        let folders = parse_library_folders(&path).unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].index, "2");
        assert_eq!(folders[0].path, PathBuf::from(r"E:\Games\Steam"));
        assert_eq!(folders[0].content_id, None);
    }

    #[test]
    fn manifest_fields() {
        let m = parse_app_manifest(&fixtures_dir().join("library_main").join("appmanifest_220.acf")).unwrap();
        assert_eq!(m.app_id, 220);
        assert!(m.state_flags.is_valid_install());
        assert_eq!(m.build_id, Some(12573483));
        assert_eq!(m.last_owner, Some(76561197960287930));
        assert_eq!(m.installed_depots.len(), 2);
        assert_eq!(m.shared_depots.len(), 2);
        assert_eq!(m.user_config.get("language").map(String::as_str), Some("english"));

        let m = parse_app_manifest(&fixtures_dir().join("library_main").join("appmanifest_1091500.acf")).unwrap();
        assert!(m.state_flags.contains(StateFlags::UPDATE_REQUIRED));
        assert!(!m.state_flags.is_valid_install());
        assert_eq!(m.state_flags.to_string(), "UpdateRequired|UpdateStarted");
        assert_eq!(m.scheduled_auto_update.map(|t| t.timestamp()), Some(1702474140));
    }

    #[test]
    fn truncated_manifest_is_a_parse_error() {
        let err = parse_app_manifest(&fixtures_dir().join("library_main").join("appmanifest_70.acf")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::VdfParseError);
    }

    #[tokio::test]
    async fn serialized_game_shape() {
        let tree = SteamTree::build();
        let game = tree.handler().find_by_app_id(&[400]).await.unwrap().unwrap();
        let json = serde_json::to_value(&game).unwrap();

        assert_eq!(json["id"], "400");
        assert_eq!(json["store"], "steam");
        assert_eq!(json["appManifest"]["appId"], 400);
        assert_eq!(json["appManifest"]["installDir"], "Portal");
        assert_eq!(json["appManifest"]["stateFlags"], 4);
        assert_eq!(json["appManifest"]["sizeOnDisk"], 4437282391u64);
        assert!(json["appManifest"]["lastOwner"].is_null());
        assert_eq!(json["libraryFolder"]["label"], "Games SSD");
        assert!(json.get("steamPath").is_some());
    }

    #[test]
    fn fixtures_are_plain_vdf() {
        for name in ["libraryfolders.vdf", "libraryfolders_legacy.vdf"] {
            gamefinder_vdf::parse(&read_fixture(name)).unwrap();
        }
    }
}
