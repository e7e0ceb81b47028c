//! Scoring, leveling and gravity speed

use serde::{Deserialize, Serialize};

/// Points per clear event, indexed by rows cleared at once
pub const LINE_SCORES: [u64; 5] = [0, 40, 100, 300, 1200];
/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;
/// Drop interval at level 1
pub const BASE_DROP_INTERVAL_MS: u64 = 1000;
/// Interval shaved off per level
pub const DROP_STEP_MS: u64 = 100;
/// Floor for the drop interval
pub const MIN_DROP_INTERVAL_MS: u64 = 100;

/// How the level follows from total lines cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelCurve {
    /// `lines / 10 + 1`: level 2 starts at the 10th line
    #[default]
    PerTenLines,
    /// `(lines - 1) / 10 + 1`: level 2 starts at the 11th line
    AfterTenth,
}

impl LevelCurve {
    pub fn level_for(&self, lines: u32) -> u32 {
        match self {
            LevelCurve::PerTenLines => lines / LINES_PER_LEVEL + 1,
            LevelCurve::AfterTenth => lines.saturating_sub(1) / LINES_PER_LEVEL + 1,
        }
    }
}

/// Rule constants that vary between builds of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub level_curve: LevelCurve,
    /// Lower bound on the automatic drop interval
    pub min_drop_interval_ms: u64,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            level_curve: LevelCurve::default(),
            min_drop_interval_ms: MIN_DROP_INTERVAL_MS,
        }
    }
}

impl Rules {
    /// Gravity interval for a level, clamped to the configured floor
    pub fn drop_interval(&self, level: u32) -> u64 {
        let step = u64::from(level.saturating_sub(1)) * DROP_STEP_MS;
        BASE_DROP_INTERVAL_MS
            .saturating_sub(step)
            .max(self.min_drop_interval_ms)
    }
}

/// Points for clearing `lines` rows at once at `level`
pub fn line_clear_points(lines: usize, level: u32) -> u64 {
    LINE_SCORES.get(lines).copied().unwrap_or(0) * u64::from(level)
}

/// Result of applying a clear to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearAward {
    pub points: u64,
    /// Level the points were multiplied by
    pub level: u32,
    pub leveled_up: bool,
}

/// Score tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
    /// Automatic drop interval in milliseconds
    pub drop_interval_ms: u64,
    rules: Rules,
}

impl Default for Score {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Score {
    pub fn new(rules: Rules) -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: rules.drop_interval(1),
            rules,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Return every counter to its starting value
    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
    }

    /// Award a clear of `lines` rows.
    ///
    /// Points use the level in effect before this clear; level and drop
    /// interval are updated afterwards. Zero rows changes nothing.
    pub fn add_clear(&mut self, lines: usize) -> ClearAward {
        let level = self.level;
        if lines == 0 {
            return ClearAward {
                points: 0,
                level,
                leveled_up: false,
            };
        }

        let points = line_clear_points(lines, level);
        self.points += points;
        self.lines += lines as u32;
        self.level = self.rules.level_curve.level_for(self.lines);
        self.drop_interval_ms = self.rules.drop_interval(self.level);

        ClearAward {
            points,
            level,
            leveled_up: self.level > level,
        }
    }
}
