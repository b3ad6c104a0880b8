use serde::{Deserialize, Serialize};

/// An immutable track value copied out of catalog search results.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(rename = "image")]
    pub image_url: String,
}

/// A playlist as persisted in the `playlists` collection.
///
/// `owner_username` is not validated against the user collection; a playlist
/// can outlive its owner.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub songs: Vec<Song>,
    #[serde(rename = "userId")]
    pub owner_username: Option<String>,
}

impl Playlist {
    /// Duplicate detection is per-playlist and by song id only. The store
    /// itself appends unconditionally; this supports the presentation-layer
    /// filter.
    pub fn has_song(&self, song_id: &str) -> bool {
        self.songs.iter().any(|s| s.id == song_id)
    }
}
