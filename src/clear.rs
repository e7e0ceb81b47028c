//! Line-clear blink animation
//!
//! Full rows flash between their original colors and empty for a fixed
//! number of phases before they are removed. The animation is advanced by
//! game ticks, so nothing here sleeps or blocks.

use crate::board::{Board, Cell};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Blink timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkSettings {
    /// Number of phases; even phases show the row, odd phases hide it
    pub phases: u32,
    /// Duration of each phase in milliseconds
    pub phase_ms: u64,
}

impl BlinkSettings {
    pub fn phase_duration(&self) -> Duration {
        Duration::from_millis(self.phase_ms)
    }
}

impl Default for BlinkSettings {
    fn default() -> Self {
        Self {
            phases: 5,
            phase_ms: 100,
        }
    }
}

/// A phase that just became current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPhase {
    pub phase: u32,
    /// Whether the cleared rows are drawn in this phase
    pub visible: bool,
}

/// An in-progress line clear
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearAnimation {
    /// Rows being cleared, top to bottom
    rows: Vec<usize>,
    /// Row contents captured when the clear started
    originals: Vec<Vec<Cell>>,
    settings: BlinkSettings,
    phase: u32,
    elapsed: Duration,
}

impl ClearAnimation {
    /// Capture the given rows and paint the first phase
    pub fn start(
        board: &mut Board,
        rows: Vec<usize>,
        settings: BlinkSettings,
    ) -> (Self, Option<BlinkPhase>) {
        let originals = rows
            .iter()
            .map(|&y| board.row(y).map(|r| r.to_vec()).unwrap_or_default())
            .collect();
        let animation = Self {
            rows,
            originals,
            settings,
            phase: 0,
            elapsed: Duration::ZERO,
        };
        let first = if animation.is_finished() {
            None
        } else {
            Some(animation.paint(board))
        };
        (animation, first)
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase >= self.settings.phases
    }

    /// Advance by `delta`, returning every phase entered along the way
    pub fn advance(&mut self, board: &mut Board, delta: Duration) -> Vec<BlinkPhase> {
        let mut entered = Vec::new();
        if self.is_finished() {
            return entered;
        }

        let phase_len = self.settings.phase_duration();
        self.elapsed += delta;
        while !self.is_finished() && self.elapsed >= phase_len {
            self.elapsed -= phase_len;
            self.phase += 1;
            if !self.is_finished() {
                entered.push(self.paint(board));
            }
        }
        entered
    }

    fn paint(&self, board: &mut Board) -> BlinkPhase {
        let visible = self.phase % 2 == 0;
        for (&y, original) in self.rows.iter().zip(&self.originals) {
            if visible {
                board.paint_row(y, original);
            } else {
                board.blank_row(y);
            }
        }
        BlinkPhase {
            phase: self.phase,
            visible,
        }
    }
}
