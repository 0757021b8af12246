//! Default audio output device.
//!
//! Opened once at startup and kept for the life of the game. Dropping it
//! stops everything still playing.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use frax_core::FraxError;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};

pub struct AudioDevice {
    stream: OutputStream,
}

impl AudioDevice {
    pub fn open() -> Result<Self, FraxError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| FraxError::Platform(format!("Failed to open audio device: {e}")))?;
        stream.log_on_drop(false);
        log::info!("Audio device opened");
        Ok(Self { stream })
    }

    /// Decode `path` and start playing it. Playback stops when the returned
    /// sink is dropped, unless it is detached.
    pub fn play_file(&self, path: &Path) -> Result<Sink, FraxError> {
        let source_id = path.display().to_string();
        let file = File::open(path).map_err(|e| FraxError::resource_load(&source_id, e))?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| FraxError::resource_load(&source_id, e))?;
        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        Ok(sink)
    }

    pub fn close(self) {
        drop(self.stream);
        log::info!("Audio device closed");
    }
}
