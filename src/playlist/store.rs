use super::models::{Playlist, Song};
use crate::storage::{StorageBackend, StorageError};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

pub const PLAYLISTS_KEY: &str = "playlists";

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("Playlist {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// All playlists for all users, loaded from the `playlists` key. Every
/// successful mutation rewrites the whole collection before returning, so
/// durable storage always matches in-memory state.
pub struct PlaylistStore {
    storage: Arc<dyn StorageBackend>,
    playlists: Mutex<Vec<Playlist>>,
}

impl PlaylistStore {
    pub fn initialize(storage: Arc<dyn StorageBackend>) -> PlaylistStore {
        let playlists = match storage.get(PLAYLISTS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Playlist>>(&raw) {
                Ok(playlists) => playlists,
                Err(err) => {
                    warn!("Malformed playlists collection, starting empty: {}", err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Could not read playlists collection, starting empty: {}", err);
                Vec::new()
            }
        };
        PlaylistStore {
            storage,
            playlists: Mutex::new(playlists),
        }
    }

    /// Creates a playlist with a fresh id and an empty song list. Name
    /// collisions across playlists are permitted.
    pub fn create(
        &self,
        owner_username: Option<&str>,
        name: &str,
        description: &str,
    ) -> Result<Playlist, PlaylistError> {
        let playlist = Playlist {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: description.to_string(),
            songs: Vec::new(),
            owner_username: owner_username.map(str::to_string),
        };

        let mut playlists = self.playlists.lock().unwrap();
        playlists.push(playlist.clone());
        self.persist(&playlists)?;
        info!("Created playlist {} ({})", playlist.name, playlist.id);
        Ok(playlist)
    }

    /// Updates name and description in place; the song list is untouched.
    pub fn rename(
        &self,
        playlist_id: &str,
        new_name: &str,
        new_description: &str,
    ) -> Result<(), PlaylistError> {
        let mut playlists = self.playlists.lock().unwrap();
        {
            let playlist = playlists
                .iter_mut()
                .find(|p| p.id == playlist_id)
                .ok_or_else(|| PlaylistError::NotFound(playlist_id.to_string()))?;
            playlist.name = new_name.to_string();
            playlist.description = new_description.to_string();
        }
        self.persist(&playlists)?;
        Ok(())
    }

    pub fn remove(&self, playlist_id: &str) -> Result<(), PlaylistError> {
        let mut playlists = self.playlists.lock().unwrap();
        let before = playlists.len();
        playlists.retain(|p| p.id != playlist_id);
        if playlists.len() == before {
            return Err(PlaylistError::NotFound(playlist_id.to_string()));
        }
        self.persist(&playlists)?;
        Ok(())
    }

    /// Appends unconditionally; duplicate prevention is the caller's
    /// concern (see `Playlist::has_song`).
    pub fn add_song(&self, playlist_id: &str, song: Song) -> Result<(), PlaylistError> {
        let mut playlists = self.playlists.lock().unwrap();
        {
            let playlist = playlists
                .iter_mut()
                .find(|p| p.id == playlist_id)
                .ok_or_else(|| PlaylistError::NotFound(playlist_id.to_string()))?;
            playlist.songs.push(song);
        }
        self.persist(&playlists)?;
        Ok(())
    }

    /// Removes by song id, preserving the order of the remaining songs.
    /// A song id with no match leaves the list unchanged.
    pub fn remove_song(&self, playlist_id: &str, song_id: &str) -> Result<(), PlaylistError> {
        let mut playlists = self.playlists.lock().unwrap();
        {
            let playlist = playlists
                .iter_mut()
                .find(|p| p.id == playlist_id)
                .ok_or_else(|| PlaylistError::NotFound(playlist_id.to_string()))?;
            playlist.songs.retain(|s| s.id != song_id);
        }
        self.persist(&playlists)?;
        Ok(())
    }

    pub fn get(&self, playlist_id: &str) -> Option<Playlist> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned()
    }

    pub fn playlists_for(&self, owner_username: &str) -> Vec<Playlist> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.owner_username.as_deref() == Some(owner_username))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<Playlist> {
        self.playlists.lock().unwrap().clone()
    }

    fn persist(&self, playlists: &[Playlist]) -> Result<(), StorageError> {
        let json = serde_json::to_string(playlists)?;
        self.storage.set(PLAYLISTS_KEY, &json)
    }
}
