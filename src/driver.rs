//! Frame driver
//!
//! Turns clock timestamps into tick deltas, forwards input commands, routes
//! game events to the audio sink, and redraws after anything changes.

use crate::game::{Command, Game, GameEvent, Outcome};
use crate::ports::{AudioSink, Cue, Renderer};
use std::io;
use std::time::{Duration, Instant};
use tracing::trace;

pub struct Driver<R, A> {
    game: Game,
    renderer: R,
    audio: A,
    /// Timestamp of the previous frame
    last_frame: Option<Instant>,
}

impl<R: Renderer, A: AudioSink> Driver<R, A> {
    pub fn new(game: Game, renderer: R, audio: A) -> Self {
        Self {
            game,
            renderer,
            audio,
            last_frame: None,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// Advance the game to `now`. The first frame has a zero delta; later
    /// frames use the time since the previous one.
    pub fn frame(&mut self, now: Instant) -> io::Result<Outcome> {
        let delta = match self.last_frame.replace(now) {
            Some(previous) => now.saturating_duration_since(previous),
            None => Duration::ZERO,
        };
        let outcome = self.game.tick(delta);
        self.finish(&outcome)?;
        Ok(outcome)
    }

    /// Apply an input command
    pub fn command(&mut self, command: Command) -> io::Result<Outcome> {
        let outcome = self.game.apply_command(command);
        trace!(?command, ?outcome, "command");
        self.finish(&outcome)?;
        Ok(outcome)
    }

    /// Draw the current state unconditionally
    pub fn render(&mut self) -> io::Result<()> {
        self.renderer.render(&self.game.snapshot())
    }

    fn finish(&mut self, outcome: &Outcome) -> io::Result<()> {
        let mut redraw = outcome.is_change();
        for event in self.game.drain_events() {
            match event {
                GameEvent::Started => self.audio.play(Cue::BackgroundMusic),
                GameEvent::LineClear { .. } => self.audio.play(Cue::LineClear),
                GameEvent::Blink(_) => redraw = true,
                _ => {}
            }
        }
        if redraw {
            self.render()?;
        }
        Ok(())
    }
}
