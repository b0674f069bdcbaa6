use m3u8_rs::Playlist;

use crate::error::ManifestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    /// Index of quality variants
    Master,
    /// List of playable segments
    Media,
}

/// Tells master and media playlists apart.
pub fn classify(text: &str) -> Result<PlaylistKind, ManifestError> {
    match m3u8_rs::parse_playlist_res(text.as_bytes()) {
        Ok(Playlist::MasterPlaylist(_)) => Ok(PlaylistKind::Master),
        Ok(Playlist::MediaPlaylist(_)) => Ok(PlaylistKind::Media),
        Err(e) => Err(ManifestError::Unparsable {
            reason: e.to_string(),
        }),
    }
}
