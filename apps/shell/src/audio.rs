//! Audio playback seam.

use async_trait::async_trait;
use qa_core::PlaybackError;

/// Plays an encoded clip and resolves once playback has finished.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, clip: Vec<u8>) -> Result<(), PlaybackError>;
}
