mod models;
mod store;

pub use models::{Playlist, Song};
pub use store::{PlaylistError, PlaylistStore, PLAYLISTS_KEY};
