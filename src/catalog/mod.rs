mod client;
mod models;

pub use client::CatalogClient;
pub use models::{AlbumImage, CatalogTrack, TrackAlbum, TrackArtist};
