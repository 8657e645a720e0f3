/// Background music.
///
/// The soundtrack handle is created once by the process and handed to the
/// `Game`; the simulation only ever pauses or resumes it.

use std::path::Path;

use crate::error::AssetError;

/// A looping background track.
pub trait Soundtrack {
    fn pause(&mut self);
    fn resume(&mut self);
    fn is_paused(&self) -> bool;
}

impl<S: Soundtrack + ?Sized> Soundtrack for Box<S> {
    fn pause(&mut self) {
        (**self).pause()
    }

    fn resume(&mut self) {
        (**self).resume()
    }

    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }
}

/// Used when there is no track or no audio device.  Tracks the pause state
/// so callers behave identically with or without sound.
#[derive(Debug, Default, Clone)]
pub struct SilentTrack {
    paused: bool,
}

impl SilentTrack {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Soundtrack for SilentTrack {
    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(feature = "audio")]
pub use looping::LoopingTrack;

#[cfg(feature = "audio")]
mod looping {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use rodio::{Decoder, OutputStream, Sink, Source};

    use super::Soundtrack;
    use crate::error::AssetError;

    /// Rodio sink playing one file on repeat.
    pub struct LoopingTrack {
        // Dropping the stream silences the sink.
        _stream: OutputStream,
        sink: Sink,
    }

    impl LoopingTrack {
        pub fn open(path: &Path) -> Result<Self, AssetError> {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| AssetError::Audio(format!("no output device: {}", e)))?;
            let file = File::open(path).map_err(|source| AssetError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let source = Decoder::new(BufReader::new(file))
                .map_err(|e| AssetError::Audio(format!("cannot decode {:?}: {}", path, e)))?;
            let sink = Sink::try_new(&handle)
                .map_err(|e| AssetError::Audio(format!("failed to create sink: {}", e)))?;
            sink.append(source.repeat_infinite());
            log::info!("Looping music from {:?}", path);
            Ok(Self {
                _stream: stream,
                sink,
            })
        }
    }

    impl Soundtrack for LoopingTrack {
        fn pause(&mut self) {
            self.sink.pause();
        }

        fn resume(&mut self) {
            self.sink.play();
        }

        fn is_paused(&self) -> bool {
            self.sink.is_paused()
        }
    }
}

#[cfg(feature = "audio")]
fn try_open(path: &Path) -> Result<Box<dyn Soundtrack>, AssetError> {
    Ok(Box::new(LoopingTrack::open(path)?))
}

#[cfg(not(feature = "audio"))]
fn try_open(path: &Path) -> Result<Box<dyn Soundtrack>, AssetError> {
    Err(AssetError::Audio(format!(
        "built without the `audio` feature, ignoring {:?}",
        path
    )))
}

/// Start the music if possible, otherwise fall back to silence.
pub fn open_soundtrack(path: Option<&Path>) -> Box<dyn Soundtrack> {
    let Some(path) = path else {
        return Box::new(SilentTrack::new());
    };
    match try_open(path) {
        Ok(track) => track,
        Err(e) => {
            log::warn!("Music disabled: {}", e);
            Box::new(SilentTrack::new())
        }
    }
}
