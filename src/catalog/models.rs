//! Wire models for the remote catalog.
//!
//! Fields the search can omit degrade to empty values instead of failing
//! deserialization, so an unexpected body yields an empty result list.

use crate::playlist::Song;
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
pub(crate) struct SearchResponse {
    pub tracks: Option<TracksPage>,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct TracksPage {
    pub items: Option<Vec<CatalogTrack>>,
}

/// A track record as returned by the catalog search.
#[derive(Deserialize, Debug, Clone)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    #[serde(default)]
    pub album: TrackAlbum,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TrackAlbum {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<AlbumImage>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AlbumImage {
    pub url: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

impl CatalogTrack {
    /// Copies the track into the immutable `Song` value playlists embed:
    /// artist names joined, first album image or empty.
    pub fn to_song(&self) -> Song {
        Song {
            id: self.id.clone(),
            title: self.name.clone(),
            artist: self
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            album: self.album.name.clone(),
            image_url: self
                .album
                .images
                .first()
                .map(|i| i.url.clone())
                .unwrap_or_default(),
        }
    }
}
