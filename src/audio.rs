//! Ambient audio channel.
//!
//! One track at a time. With the `audio` feature the track is decoded and
//! looped through rodio; without it the player only checks that the asset
//! exists, so a missing file is reported the same way in both builds.

use glitch_engine::{AmbientCue, PlaybackError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Plays the ambient track the engine asks for.
pub struct AmbientPlayer {
    root: PathBuf,
    now_playing: Option<AmbientCue>,
    #[cfg(feature = "audio")]
    output: Option<rodio_backend::Output>,
}

impl AmbientPlayer {
    /// Creates a player resolving assets under `root`.
    ///
    /// A missing audio device is logged; every later play then fails and
    /// is ignored by the engine.
    #[instrument(skip(root), fields(root = %root.as_ref().display()))]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            now_playing: None,
            #[cfg(feature = "audio")]
            output: rodio_backend::Output::open(),
        }
    }

    /// The cue last played successfully.
    pub fn now_playing(&self) -> Option<&AmbientCue> {
        self.now_playing.as_ref()
    }

    /// Switches track or adjusts the volume.
    #[instrument(skip(self), fields(sound = %cue.sound, volume = cue.volume))]
    pub fn play(&mut self, cue: &AmbientCue) -> Result<(), PlaybackError> {
        let path = cue.sound.resolve(&self.root);
        if cue.switched {
            if !path.is_file() {
                return Err(PlaybackError::new(format!(
                    "Ambient asset not found: {}",
                    path.display()
                )));
            }
            self.start(&path, cue.volume)?;
            info!(path = %path.display(), "Ambient track started");
        } else {
            self.set_volume(cue.volume)?;
            debug!("Ambient volume raised");
        }
        self.now_playing = Some(*cue);
        Ok(())
    }

    #[cfg(feature = "audio")]
    fn start(&mut self, path: &Path, volume: f32) -> Result<(), PlaybackError> {
        let output = self
            .output
            .as_mut()
            .ok_or_else(|| PlaybackError::new("No audio output device"))?;
        output.start(path, volume)
    }

    #[cfg(not(feature = "audio"))]
    fn start(&mut self, path: &Path, volume: f32) -> Result<(), PlaybackError> {
        debug!(path = %path.display(), volume, "Silent build, not decoding");
        Ok(())
    }

    #[cfg(feature = "audio")]
    fn set_volume(&mut self, volume: f32) -> Result<(), PlaybackError> {
        let output = self
            .output
            .as_mut()
            .ok_or_else(|| PlaybackError::new("No audio output device"))?;
        output.set_volume(volume)
    }

    #[cfg(not(feature = "audio"))]
    fn set_volume(&mut self, volume: f32) -> Result<(), PlaybackError> {
        if self.now_playing.is_none() {
            return Err(PlaybackError::new("Nothing is playing"));
        }
        debug!(volume, "Silent build, volume noted");
        Ok(())
    }
}

#[cfg(feature = "audio")]
mod rodio_backend {
    use glitch_engine::PlaybackError;
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;
    use tracing::warn;

    pub(super) struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sink: Option<Sink>,
    }

    impl Output {
        pub(super) fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                    sink: None,
                }),
                Err(e) => {
                    warn!(error = %e, "No audio output device");
                    None
                }
            }
        }

        pub(super) fn start(&mut self, path: &Path, volume: f32) -> Result<(), PlaybackError> {
            let file = File::open(path)
                .map_err(|e| PlaybackError::new(format!("Failed to open {}: {}", path.display(), e)))?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| PlaybackError::new(format!("Failed to decode {}: {}", path.display(), e)))?;
            let sink = Sink::try_new(&self.handle)
                .map_err(|e| PlaybackError::new(format!("Failed to open sink: {}", e)))?;
            sink.set_volume(volume);
            sink.append(source.repeat_infinite());
            if let Some(old) = self.sink.replace(sink) {
                old.stop();
            }
            Ok(())
        }

        pub(super) fn set_volume(&mut self, volume: f32) -> Result<(), PlaybackError> {
            let sink = self
                .sink
                .as_ref()
                .ok_or_else(|| PlaybackError::new("Nothing is playing"))?;
            sink.set_volume(volume);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitch_engine::AmbientSound;

    fn cue(sound: AmbientSound, switched: bool) -> AmbientCue {
        AmbientCue {
            sound,
            volume: 0.45,
            switched,
        }
    }

    #[test]
    fn test_missing_asset_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = AmbientPlayer::new(dir.path());
        let err = player.play(&cue(AmbientSound::Static, true)).unwrap_err();
        assert!(err.message.contains("static.mp3"));
        assert!(player.now_playing().is_none());
    }

    #[cfg(not(feature = "audio"))]
    #[test]
    fn test_present_asset_plays_silently() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("audio/hum.mp3"), b"not really audio").unwrap();

        let mut player = AmbientPlayer::new(dir.path());
        player.play(&cue(AmbientSound::Hum, true)).unwrap();
        player.play(&cue(AmbientSound::Hum, false)).unwrap();
        assert_eq!(
            player.now_playing().map(|c| c.sound),
            Some(AmbientSound::Hum)
        );
    }

    #[cfg(not(feature = "audio"))]
    #[test]
    fn test_volume_bump_without_track_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut player = AmbientPlayer::new(dir.path());
        assert!(player.play(&cue(AmbientSound::Hum, false)).is_err());
    }
}
