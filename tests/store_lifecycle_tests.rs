//! End-to-end tests over the stores and their persistence contract.
//!
//! Each test opens the stores over a temp directory the way the binary
//! does; reopening the stores over the same directory simulates an app
//! reload.

mod common;

use common::{open_stores, song, ADMIN_PASS, ADMIN_USER, TEST_PASS, TEST_USER};
use tempfile::TempDir;

#[test]
fn test_full_user_journey_survives_reload() {
    let dir = TempDir::new().unwrap();

    let playlist_id = {
        let stores = open_stores(dir.path());

        stores.credentials.register(TEST_USER, TEST_PASS).unwrap();
        let identity = stores.credentials.verify(TEST_USER, TEST_PASS).unwrap();
        stores.session.login(identity).unwrap();

        let playlist = stores
            .playlists
            .create(Some(TEST_USER), "Road Trip", "for the drive")
            .unwrap();
        stores.playlists.add_song(&playlist.id, song("t1", "One")).unwrap();
        stores.playlists.add_song(&playlist.id, song("t2", "Two")).unwrap();
        stores.playlists.remove_song(&playlist.id, "t1").unwrap();
        playlist.id
    };

    // Reload everything from disk.
    let stores = open_stores(dir.path());

    let session = stores.session.current();
    assert_eq!(session.user.as_deref(), Some(TEST_USER));
    assert!(session.token.is_some());

    let playlist = stores.playlists.get(&playlist_id).unwrap();
    assert_eq!(playlist.name, "Road Trip");
    assert_eq!(playlist.owner_username.as_deref(), Some(TEST_USER));
    let song_ids: Vec<&str> = playlist.songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(song_ids, vec!["t2"]);

    assert!(stores.credentials.verify(TEST_USER, TEST_PASS).is_ok());
}

#[test]
fn test_logout_removes_the_durable_session() {
    let dir = TempDir::new().unwrap();

    {
        let stores = open_stores(dir.path());
        let identity = stores.credentials.verify(ADMIN_USER, ADMIN_PASS).unwrap();
        stores.session.login(identity).unwrap();
        assert!(dir.path().join("auth.json").is_file());

        stores.session.logout().unwrap();
    }

    // A reload with no session file is indistinguishable from first launch.
    assert!(!dir.path().join("auth.json").exists());
    let stores = open_stores(dir.path());
    assert_eq!(stores.session.current().user, None);
}

#[test]
fn test_seeded_admin_scenario() {
    let dir = TempDir::new().unwrap();
    let stores = open_stores(dir.path());

    let identity = stores.credentials.verify(ADMIN_USER, ADMIN_PASS).unwrap();
    assert!(identity.admin);

    assert!(stores.credentials.verify(ADMIN_USER, "wrong").is_err());
}

#[test]
fn test_road_trip_scenario() {
    let dir = TempDir::new().unwrap();
    let stores = open_stores(dir.path());

    let playlist = stores
        .playlists
        .create(Some("alice"), "Road Trip", "")
        .unwrap();
    assert!(playlist.songs.is_empty());

    stores
        .playlists
        .add_song(&playlist.id, song("t1", "Opener"))
        .unwrap();
    assert_eq!(stores.playlists.get(&playlist.id).unwrap().songs.len(), 1);

    stores.playlists.remove_song(&playlist.id, "t1").unwrap();
    assert_eq!(stores.playlists.get(&playlist.id).unwrap().songs.len(), 0);
}

#[test]
fn test_each_store_owns_its_own_file() {
    let dir = TempDir::new().unwrap();
    let stores = open_stores(dir.path());

    stores.credentials.register(TEST_USER, TEST_PASS).unwrap();
    assert!(dir.path().join("users.json").is_file());
    assert!(!dir.path().join("playlists.json").exists());
    assert!(!dir.path().join("auth.json").exists());

    stores.playlists.create(Some(TEST_USER), "Mix", "").unwrap();
    assert!(dir.path().join("playlists.json").is_file());
    assert!(!dir.path().join("auth.json").exists());
}

#[test]
fn test_durable_layout_matches_the_storage_contract() {
    let dir = TempDir::new().unwrap();
    let stores = open_stores(dir.path());

    stores.playlists.create(Some(TEST_USER), "Mix", "desc").unwrap();
    let raw = std::fs::read_to_string(dir.path().join("playlists.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let playlists = value.as_array().unwrap();
    assert_eq!(playlists.len(), 1);
    let playlist = &playlists[0];
    assert_eq!(playlist["name"], "Mix");
    assert_eq!(playlist["userId"], TEST_USER);
    assert!(playlist["songs"].as_array().unwrap().is_empty());

    let identity = stores.credentials.verify(ADMIN_USER, ADMIN_PASS).unwrap();
    stores.session.login(identity).unwrap();
    let raw = std::fs::read_to_string(dir.path().join("auth.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["user"], ADMIN_USER);
    assert_eq!(value["admin"], true);
    assert!(value["token"].is_string());
}

#[test]
fn test_registered_passwords_are_not_stored_in_plaintext() {
    let dir = TempDir::new().unwrap();
    let stores = open_stores(dir.path());

    stores.credentials.register(TEST_USER, TEST_PASS).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("users.json")).unwrap();
    assert!(!raw.contains(TEST_PASS));
}
