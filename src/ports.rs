//! Seams between the simulation and the outside world

use crate::game::Snapshot;
use std::io;

/// Sounds the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Looping background track, requested when a game starts
    BackgroundMusic,
    LineClear,
}

/// Draws a frame from a snapshot
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()>;
}

/// Plays sounds. Playback failures stay inside the implementation.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Audio sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}

impl<A: AudioSink> AudioSink for Option<A> {
    fn play(&mut self, cue: Cue) {
        if let Some(sink) = self {
            sink.play(cue);
        }
    }
}
