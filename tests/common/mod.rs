//! Shared fixtures for the integration suite.

use mixtape::storage::FileStorage;
use mixtape::{CredentialStore, PlaylistStore, SessionStore, Song};
use std::path::Path;
use std::sync::Arc;

pub const ADMIN_USER: &str = "shubham";
pub const ADMIN_PASS: &str = "1234";
pub const TEST_USER: &str = "alice";
pub const TEST_PASS: &str = "Str0ng!pass";

pub struct Stores {
    pub credentials: CredentialStore,
    pub session: SessionStore,
    pub playlists: PlaylistStore,
}

/// Builds the three stores over a file backend rooted at `dir`, wired the
/// same way the binary wires them. Opening twice over the same directory
/// simulates an app reload.
pub fn open_stores(dir: &Path) -> Stores {
    let storage = Arc::new(FileStorage::initialize(dir.to_path_buf()).unwrap());
    Stores {
        credentials: CredentialStore::initialize(storage.clone()),
        session: SessionStore::initialize(storage.clone()),
        playlists: PlaylistStore::initialize(storage),
    }
}

#[allow(dead_code)]
pub fn song(id: &str, title: &str) -> Song {
    Song {
        id: id.to_string(),
        title: title.to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        image_url: String::new(),
    }
}
