//! Audio system for background music and sound effects

use crate::ports::{AudioSink, Cue};
use crate::settings::AudioSettings;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BGM_FILE: &str = "bgm.wav";
const LINE_CLEAR_FILE: &str = "line_clear.wav";

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    bgm_sink: Option<Sink>,
    assets_path: PathBuf,
    volume: f32,
}

impl AudioManager {
    /// Open the default output device. Returns None when audio is disabled
    /// or no device or asset directory is available.
    pub fn new(settings: &AudioSettings) -> Option<Self> {
        let volume = settings.gain();
        if volume <= 0.0 {
            return None;
        }
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(output) => output,
            Err(e) => {
                warn!("Audio disabled: {}", e);
                return None;
            }
        };
        let Some(assets_path) = Self::find_assets_path() else {
            warn!("Audio disabled: no assets directory found");
            return None;
        };

        Some(Self {
            _stream: stream,
            stream_handle,
            bgm_sink: None,
            assets_path,
            volume,
        })
    }

    fn find_assets_path() -> Option<PathBuf> {
        let mut paths = vec![PathBuf::from("assets")];
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            paths.push(dir.join("assets"));
        }

        paths.into_iter().find(|p| p.is_dir())
    }

    fn open(&self, name: &str) -> Option<Decoder<BufReader<File>>> {
        let path = self.assets_path.join(name);
        let file = File::open(&path)
            .map_err(|e| warn!("Cannot open {}: {}", path.display(), e))
            .ok()?;
        Decoder::new(BufReader::new(file))
            .map_err(|e| warn!("Cannot decode {}: {}", path.display(), e))
            .ok()
    }

    /// Play background music (loops indefinitely), restarting it if playing
    pub fn play_bgm(&mut self) {
        self.stop_bgm();

        let Some(decoder) = self.open(BGM_FILE) else { return };
        let Ok(sink) = Sink::try_new(&self.stream_handle) else { return };

        sink.set_volume(self.volume);
        sink.append(decoder.repeat_infinite());
        self.bgm_sink = Some(sink);
    }

    /// Stop background music
    pub fn stop_bgm(&mut self) {
        if let Some(sink) = self.bgm_sink.take() {
            sink.stop();
        }
    }

    /// Play a sound effect over whatever else is playing
    pub fn play_sfx(&mut self, name: &str) {
        let Some(decoder) = self.open(name) else { return };
        if let Ok(sink) = Sink::try_new(&self.stream_handle) {
            sink.set_volume(self.volume);
            sink.append(decoder);
            sink.detach(); // Let it play and clean up automatically
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: Cue) {
        debug!(?cue, "play");
        match cue {
            Cue::BackgroundMusic => self.play_bgm(),
            Cue::LineClear => self.play_sfx(LINE_CLEAR_FILE),
        }
    }
}
