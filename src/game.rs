//! Core game state and logic

use crate::board::{Board, DEFAULT_COLS, DEFAULT_ROWS};
use crate::clear::{BlinkPhase, BlinkSettings, ClearAnimation};
use crate::generator::PieceGenerator;
use crate::piece::{Piece, Position};
use crate::score::{Rules, Score};
use crate::tetromino::TetrominoType;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    /// Idle until started; also where a topped-out game ends up
    #[default]
    GameOver,
    Running,
    /// Full rows are blinking; gravity and input are suspended
    LineClearing,
}

/// Input commands the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    Start,
}

/// What a command or tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was due
    Idle,
    /// Not accepted in the current state
    Ignored,
    Moved,
    Rotated,
    /// Move or rotation rejected by a wall or settled cells
    Blocked,
    /// Piece merged without completing a row; the next piece is in play
    Settled,
    /// Piece merged and completed rows; the blink animation is running
    ClearStarted { rows: Vec<usize> },
    /// A blink phase advanced
    Animating,
    /// Rows removed and scored; the next piece is in play
    Cleared { lines: usize, points: u64 },
    Started,
    /// A piece could not spawn; all state was reset. Carries the totals of
    /// the game that ended.
    GameOver {
        final_score: u64,
        lines: u32,
        level: u32,
    },
}

impl Outcome {
    /// Whether anything visible changed
    pub fn is_change(&self) -> bool {
        !matches!(self, Outcome::Idle | Outcome::Ignored | Outcome::Blocked)
    }
}

/// Notifications for the presentation side, drained after each update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Landed { piece: TetrominoType },
    /// Rows completed; a clear sound should play
    LineClear { rows: Vec<usize> },
    Blink(BlinkPhase),
    LinesCleared { count: usize, points: u64 },
    LevelUp { level: u32 },
    GameOver { final_score: u64 },
}

/// Board size and rule set for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub rules: Rules,
    pub blink: BlinkSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            rules: Rules::default(),
            blink: BlinkSettings::default(),
        }
    }
}

/// Read-only view of the game handed to renderers
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: GameState,
    pub board: Board,
    pub active: Option<Piece>,
    /// Cells of the active piece at its landing position
    pub ghost: Vec<(i32, i32)>,
    pub next: TetrominoType,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    /// Score of the game that most recently ended
    pub last_score: Option<u64>,
}

/// The main game struct
pub struct Game {
    config: GameConfig,
    board: Board,
    /// Current falling piece; absent while rows are clearing
    active: Option<Piece>,
    /// Pre-generated piece shown as the preview
    next: TetrominoType,
    generator: PieceGenerator,
    score: Score,
    state: GameState,
    /// Time since the last automatic drop
    drop_counter: Duration,
    clearing: Option<ClearAnimation>,
    last_score: Option<u64>,
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a new game with an OS-seeded piece generator
    pub fn new(config: GameConfig) -> Self {
        Self::with_generator(config, PieceGenerator::new())
    }

    /// Create a new game with a reproducible piece sequence
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_generator(config, PieceGenerator::with_seed(seed))
    }

    fn with_generator(config: GameConfig, mut generator: PieceGenerator) -> Self {
        let first = generator.next();
        let next = generator.next();
        Self {
            config,
            board: Board::new(config.rows, config.cols),
            active: Some(Piece::new(first, config.cols)),
            next,
            generator,
            score: Score::new(config.rules),
            state: GameState::GameOver,
            drop_counter: Duration::ZERO,
            clearing: None,
            last_score: None,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn is_line_clearing(&self) -> bool {
        self.state == GameState::LineClearing
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next(&self) -> TetrominoType {
        self.next
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn last_score(&self) -> Option<u64> {
        self.last_score
    }

    pub fn drop_interval(&self) -> Duration {
        Duration::from_millis(self.score.drop_interval_ms)
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reset everything and begin play
    pub fn start(&mut self) -> Outcome {
        if self.state != GameState::GameOver {
            return Outcome::Ignored;
        }
        self.reset();
        if !self.active.as_ref().is_some_and(|piece| piece.fits(&self.board)) {
            warn!(cols = self.config.cols, "first piece does not fit the board");
            return self.game_over();
        }
        self.state = GameState::Running;
        self.events.push(GameEvent::Started);
        info!(rows = self.config.rows, cols = self.config.cols, "game started");
        Outcome::Started
    }

    /// Dispatch an input command
    pub fn apply_command(&mut self, command: Command) -> Outcome {
        match command {
            Command::MoveLeft => self.move_tetrimino(-1, 0),
            Command::MoveRight => self.move_tetrimino(1, 0),
            Command::SoftDrop => self.move_tetrimino(0, 1),
            Command::Rotate => self.rotate_tetrimino(),
            Command::Start => self.start(),
        }
    }

    /// Advance time. Drives gravity while running and the blink animation
    /// while clearing.
    pub fn tick(&mut self, delta: Duration) -> Outcome {
        match self.state {
            GameState::GameOver => Outcome::Idle,
            GameState::LineClearing => self.advance_clear(delta),
            GameState::Running => {
                self.drop_counter += delta;
                if self.drop_counter > self.drop_interval() {
                    let outcome = self.move_tetrimino(0, 1);
                    self.drop_counter = Duration::ZERO;
                    outcome
                } else {
                    Outcome::Idle
                }
            }
        }
    }

    /// Translate the active piece. An invalid downward step lands it.
    pub fn move_tetrimino(&mut self, dx: i32, dy: i32) -> Outcome {
        if self.state != GameState::Running {
            return Outcome::Ignored;
        }
        let Some(piece) = &mut self.active else {
            return Outcome::Ignored;
        };

        let target = piece.position.offset(dx, dy);
        if !piece.fits_at(&self.board, target) {
            if dy == 1 {
                return self.land();
            }
            return Outcome::Blocked;
        }

        piece.move_by(dx, dy);
        Outcome::Moved
    }

    /// Rotate the active piece one state, with a full-cycle fallback that
    /// leaves it unchanged when the new state does not fit
    pub fn rotate_tetrimino(&mut self) -> Outcome {
        if self.state != GameState::Running {
            return Outcome::Ignored;
        }
        let Some(piece) = &mut self.active else {
            return Outcome::Ignored;
        };

        let before = piece.rotation;
        let rotated = piece.rotate(&self.board);
        if !piece.fits(&self.board) {
            for _ in 0..3 {
                piece.rotate(&self.board);
            }
            if !piece.fits(&self.board) {
                piece.rotation = before;
            }
            return Outcome::Blocked;
        }

        if rotated {
            Outcome::Rotated
        } else {
            Outcome::Blocked
        }
    }

    /// Where the active piece would come to rest if dropped straight down
    pub fn ghost_position(&self) -> Option<Position> {
        self.active
            .as_ref()
            .map(|piece| piece.ghost_position(&self.board))
    }

    pub fn snapshot(&self) -> Snapshot {
        let ghost = self
            .active
            .as_ref()
            .map(|piece| piece.cells_at(piece.ghost_position(&self.board)))
            .unwrap_or_default();

        Snapshot {
            state: self.state,
            board: self.board.clone(),
            active: self.active.clone(),
            ghost,
            next: self.next,
            score: self.score.points,
            lines: self.score.lines,
            level: self.score.level,
            last_score: self.last_score,
        }
    }

    /// Merge the active piece and either start a clear or bring in the next
    fn land(&mut self) -> Outcome {
        let Some(piece) = self.active.take() else {
            return Outcome::Ignored;
        };
        let Position { x, y } = piece.position;
        self.board.merge(x, y, piece.matrix(), piece.color());
        self.events.push(GameEvent::Landed {
            piece: piece.piece_type,
        });
        debug!(piece = piece.piece_type.name(), x, y, "piece landed");

        let rows = self.board.full_rows();
        if rows.is_empty() {
            return if self.spawn_next() {
                Outcome::Settled
            } else {
                self.game_over()
            };
        }

        self.events.push(GameEvent::LineClear { rows: rows.clone() });
        let (animation, first) =
            ClearAnimation::start(&mut self.board, rows.clone(), self.config.blink);
        if let Some(phase) = first {
            self.events.push(GameEvent::Blink(phase));
        }
        let finished = animation.is_finished();
        self.clearing = Some(animation);
        self.state = GameState::LineClearing;
        debug!(?rows, "line clear started");

        if finished {
            return self.finish_clear();
        }
        Outcome::ClearStarted { rows }
    }

    fn advance_clear(&mut self, delta: Duration) -> Outcome {
        let Some(animation) = self.clearing.as_mut() else {
            self.state = GameState::Running;
            return Outcome::Idle;
        };

        let phases = animation.advance(&mut self.board, delta);
        let finished = animation.is_finished();
        let animating = !phases.is_empty();
        self.events.extend(phases.into_iter().map(GameEvent::Blink));

        if finished {
            self.finish_clear()
        } else if animating {
            Outcome::Animating
        } else {
            Outcome::Idle
        }
    }

    /// Remove the cleared rows, score them, and bring in the next piece
    fn finish_clear(&mut self) -> Outcome {
        let Some(animation) = self.clearing.take() else {
            return Outcome::Idle;
        };
        let rows = animation.rows();
        self.board.remove_rows(rows);

        let lines = rows.len();
        let award = self.score.add_clear(lines);
        self.events.push(GameEvent::LinesCleared {
            count: lines,
            points: award.points,
        });
        info!(lines, points = award.points, total = self.score.points, "lines cleared");
        if award.leveled_up {
            self.events.push(GameEvent::LevelUp {
                level: self.score.level,
            });
            info!(
                level = self.score.level,
                interval_ms = self.score.drop_interval_ms,
                "level up"
            );
        }

        if !self.spawn_next() {
            return self.game_over();
        }
        Outcome::Cleared {
            lines,
            points: award.points,
        }
    }

    /// Promote the preview piece to the top-center and draw a new preview.
    /// Returns false if the spawned piece collides.
    fn spawn_next(&mut self) -> bool {
        let upcoming = self.generator.next();
        let kind = std::mem::replace(&mut self.next, upcoming);
        let piece = Piece::new(kind, self.board.cols());
        if !piece.fits(&self.board) {
            return false;
        }
        self.active = Some(piece);
        self.state = GameState::Running;
        true
    }

    fn game_over(&mut self) -> Outcome {
        let final_score = self.score.points;
        let lines = self.score.lines;
        let level = self.score.level;
        info!(final_score, lines, level, "game over");
        self.reset();
        self.state = GameState::GameOver;
        self.last_score = Some(final_score);
        self.events.push(GameEvent::GameOver { final_score });
        Outcome::GameOver {
            final_score,
            lines,
            level,
        }
    }

    /// Return grid, pieces and counters to their starting values
    fn reset(&mut self) {
        self.board = Board::new(self.config.rows, self.config.cols);
        self.score.reset();
        self.drop_counter = Duration::ZERO;
        self.clearing = None;
        self.active = Some(Piece::new(self.generator.next(), self.config.cols));
        self.next = self.generator.next();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
impl Game {
    /// Fill row `y` with settled cells, leaving column `gap` open
    pub(crate) fn fill_row_for_test(&mut self, y: i32, gap: i32) {
        for x in 0..self.board.cols() as i32 {
            if x != gap {
                self.board
                    .set(x, y, crate::board::Cell::Filled(ratatui::style::Color::Blue));
            }
        }
    }

    /// Replace the active piece with a freshly spawned `kind`
    pub(crate) fn set_active_for_test(&mut self, kind: TetrominoType) {
        self.active = Some(Piece::new(kind, self.board.cols()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use ratatui::style::Color;

    const BOTTOM: i32 = DEFAULT_ROWS as i32 - 1;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn started_game() -> Game {
        let mut game = Game::with_seed(GameConfig::default(), 1);
        assert_eq!(game.start(), Outcome::Started);
        game.drain_events();
        game
    }

    /// Soft drop until the piece lands
    fn drop_until_landed(game: &mut Game) -> Outcome {
        for _ in 0..game.board.rows() + 1 {
            match game.apply_command(Command::SoftDrop) {
                Outcome::Moved => continue,
                other => return other,
            }
        }
        panic!("piece never landed");
    }

    #[test]
    fn test_starts_in_game_over() {
        let mut game = Game::with_seed(GameConfig::default(), 3);
        assert!(game.is_game_over());
        assert_eq!(game.tick(ms(5000)), Outcome::Idle);
        assert_eq!(game.apply_command(Command::MoveLeft), Outcome::Ignored);
        assert_eq!(game.apply_command(Command::Rotate), Outcome::Ignored);
        assert!(game.drain_events().is_empty());

        assert_eq!(game.apply_command(Command::Start), Outcome::Started);
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.drain_events(), vec![GameEvent::Started]);
        assert_eq!(game.apply_command(Command::Start), Outcome::Ignored);
    }

    #[test]
    fn test_moves_and_walls() {
        let mut game = started_game();
        game.set_active_for_test(TetrominoType::O);
        assert_eq!(game.apply_command(Command::MoveLeft), Outcome::Moved);
        assert_eq!(game.active().unwrap().position, Position::new(3, 0));

        // O occupies matrix columns 1 and 2, so x can reach -1
        for _ in 0..4 {
            assert_eq!(game.apply_command(Command::MoveLeft), Outcome::Moved);
        }
        assert_eq!(game.active().unwrap().position.x, -1);
        assert_eq!(game.apply_command(Command::MoveLeft), Outcome::Blocked);
        assert_eq!(game.active().unwrap().position.x, -1);
    }

    #[test]
    fn test_sideways_block_does_not_land() {
        let mut game = started_game();
        game.set_active_for_test(TetrominoType::O);
        game.board.set(4, 1, Cell::Filled(Color::Red));
        assert_eq!(game.move_tetrimino(-1, 0), Outcome::Blocked);
        assert!(game.active().is_some());
        assert_eq!(game.board.filled_count(), 1);
    }

    #[test]
    fn test_gravity_waits_for_interval() {
        let mut game = started_game();
        let y = game.active().unwrap().position.y;
        assert_eq!(game.tick(ms(1000)), Outcome::Idle);
        assert_eq!(game.active().unwrap().position.y, y);
        assert_eq!(game.tick(ms(1)), Outcome::Moved);
        assert_eq!(game.active().unwrap().position.y, y + 1);
        // Accumulator was reset
        assert_eq!(game.tick(ms(999)), Outcome::Idle);
    }

    #[test]
    fn test_o_piece_falls_to_bottom() {
        let mut game = started_game();
        game.set_active_for_test(TetrominoType::O);

        let mut landed = None;
        for _ in 0..100 {
            match game.tick(ms(1001)) {
                Outcome::Moved => {}
                other => {
                    landed = Some(other);
                    break;
                }
            }
        }

        assert_eq!(landed, Some(Outcome::Settled));
        assert!(!game.is_game_over());
        assert_eq!(game.board.filled_count(), 4);
        let yellow = Cell::Filled(Color::Yellow);
        for (x, y) in [(5, BOTTOM - 1), (6, BOTTOM - 1), (5, BOTTOM), (6, BOTTOM)] {
            assert_eq!(game.board.get(x, y), Some(yellow));
        }
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::Landed {
            piece: TetrominoType::O
        }));
    }

    #[test]
    fn test_next_piece_is_promoted() {
        let mut game = started_game();
        let upcoming = game.next();
        game.set_active_for_test(TetrominoType::O);
        assert_eq!(drop_until_landed(&mut game), Outcome::Settled);
        let active = game.active().unwrap();
        assert_eq!(active.piece_type, upcoming);
        assert_eq!(active.position, Position::new(4, 0));
        assert_eq!(active.rotation, 0);
    }

    #[test]
    fn test_vertical_i_clears_row() {
        let mut game = started_game();
        game.fill_row_for_test(BOTTOM, 9);
        game.board.set(0, BOTTOM - 1, Cell::Filled(Color::Red));
        game.set_active_for_test(TetrominoType::I);

        assert_eq!(game.apply_command(Command::Rotate), Outcome::Rotated);
        for _ in 0..4 {
            assert_eq!(game.apply_command(Command::MoveRight), Outcome::Moved);
        }
        assert_eq!(game.apply_command(Command::MoveRight), Outcome::Blocked);

        let level = game.score().level;
        assert_eq!(
            drop_until_landed(&mut game),
            Outcome::ClearStarted {
                rows: vec![BOTTOM as usize]
            }
        );
        assert!(game.is_line_clearing());
        assert!(game.active().is_none());
        assert_eq!(game.apply_command(Command::MoveLeft), Outcome::Ignored);
        assert_eq!(game.apply_command(Command::Rotate), Outcome::Ignored);

        // Five 100ms phases
        for _ in 0..4 {
            assert_eq!(game.tick(ms(100)), Outcome::Animating);
        }
        assert_eq!(
            game.tick(ms(100)),
            Outcome::Cleared {
                lines: 1,
                points: 40 * u64::from(level)
            }
        );

        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.score().points, 40 * u64::from(level));
        assert_eq!(game.score().lines, 1);
        assert_eq!(game.board.rows(), DEFAULT_ROWS);
        // Row above shifted down, along with the rest of the I
        assert_eq!(game.board.get(0, BOTTOM), Some(Cell::Filled(Color::Red)));
        let cyan = Cell::Filled(Color::Cyan);
        for y in BOTTOM - 2..=BOTTOM {
            assert_eq!(game.board.get(9, y), Some(cyan));
        }
        assert_eq!(game.board.filled_count(), 4);

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LineClear {
            rows: vec![BOTTOM as usize]
        }));
        assert!(events.contains(&GameEvent::LinesCleared {
            count: 1,
            points: 40
        }));
        let blinks = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Blink(_)))
            .count();
        assert_eq!(blinks, 5);
    }

    #[test]
    fn test_four_row_clear() {
        let mut game = started_game();
        for y in BOTTOM - 3..=BOTTOM {
            game.fill_row_for_test(y, 9);
        }
        game.set_active_for_test(TetrominoType::I);
        game.rotate_tetrimino();
        for _ in 0..4 {
            game.move_tetrimino(1, 0);
        }
        assert!(matches!(
            drop_until_landed(&mut game),
            Outcome::ClearStarted { ref rows } if rows.len() == 4
        ));
        assert_eq!(
            game.tick(ms(500)),
            Outcome::Cleared {
                lines: 4,
                points: 1200
            }
        );
        assert!(game.board.is_empty());
        assert_eq!(game.score().lines, 4);
    }

    #[test]
    fn test_landing_without_clear_keeps_counters() {
        let mut game = started_game();
        game.set_active_for_test(TetrominoType::T);
        assert_eq!(drop_until_landed(&mut game), Outcome::Settled);
        let score = game.score();
        assert_eq!((score.points, score.lines, score.level), (0, 0, 1));
        assert_eq!(score.drop_interval_ms, 1000);
    }

    #[test]
    fn test_level_up_speeds_gravity() {
        let mut game = started_game();
        game.score.add_clear(4);
        game.score.add_clear(4);
        for y in BOTTOM - 1..=BOTTOM {
            game.fill_row_for_test(y, 9);
        }
        game.set_active_for_test(TetrominoType::I);
        game.rotate_tetrimino();
        for _ in 0..4 {
            game.move_tetrimino(1, 0);
        }
        drop_until_landed(&mut game);
        // Paid at the pre-clear level
        assert_eq!(
            game.tick(ms(500)),
            Outcome::Cleared {
                lines: 2,
                points: 100
            }
        );
        assert_eq!(game.score().level, 2);
        assert_eq!(game.drop_interval(), ms(900));
        assert!(game.drain_events().contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut game = started_game();
        game.score.add_clear(4);
        game.fill_row_for_test(0, 0);
        game.fill_row_for_test(1, 0);
        game.set_active_for_test(TetrominoType::O);
        game.active.as_mut().unwrap().position = Position::new(2, 16);

        assert_eq!(
            drop_until_landed(&mut game),
            Outcome::GameOver {
                final_score: 1200,
                lines: 4,
                level: 1
            }
        );
        assert!(game.is_game_over());
        assert!(game.board.is_empty());
        let score = game.score();
        assert_eq!((score.points, score.lines, score.level), (0, 0, 1));
        assert_eq!(score.drop_interval_ms, 1000);
        assert_eq!(game.last_score(), Some(1200));
        assert!(game
            .drain_events()
            .contains(&GameEvent::GameOver { final_score: 1200 }));

        // Dead until restarted
        assert_eq!(game.tick(ms(5000)), Outcome::Idle);
        assert_eq!(game.start(), Outcome::Started);
        assert_eq!(game.state(), GameState::Running);
    }

    #[test]
    fn test_rotation_blocked_leaves_piece_unchanged() {
        let mut game = started_game();
        game.set_active_for_test(TetrominoType::I);
        // Vertical I would need column 5 rows 0..3
        game.board.set(5, 3, Cell::Filled(Color::Red));
        let before = game.active().cloned();
        assert_eq!(game.rotate_tetrimino(), Outcome::Blocked);
        assert_eq!(game.active().cloned(), before);
    }

    #[test]
    fn test_rotation_full_cycle() {
        let mut game = started_game();
        game.set_active_for_test(TetrominoType::T);
        game.move_tetrimino(0, 1);
        let before = game.active().cloned();
        for _ in 0..4 {
            assert_eq!(game.rotate_tetrimino(), Outcome::Rotated);
        }
        assert_eq!(game.active().cloned(), before);
    }

    #[test]
    fn test_ghost_position_is_pure() {
        let mut game = started_game();
        game.set_active_for_test(TetrominoType::O);
        game.board.set(5, 10, Cell::Filled(Color::Red));
        let before = game.active().cloned();
        let ghost = game.ghost_position().unwrap();
        assert_eq!(ghost, Position::new(4, 7));
        assert_eq!(game.active().cloned(), before);

        let snapshot = game.snapshot();
        assert_eq!(snapshot.ghost, vec![(5, 8), (6, 8), (5, 9), (6, 9)]);
    }

    #[test]
    fn test_snapshot_reports_counters() {
        let mut game = started_game();
        game.score.add_clear(3);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.state, GameState::Running);
        assert_eq!(snapshot.score, 300);
        assert_eq!(snapshot.lines, 3);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.next, game.next());
        assert!(snapshot.active.is_some());
    }

    #[test]
    fn test_custom_board_size() {
        let config = GameConfig {
            rows: 24,
            cols: 12,
            ..GameConfig::default()
        };
        let mut game = Game::with_seed(config, 9);
        game.start();
        assert_eq!(game.board().rows(), 24);
        assert_eq!(game.board().cols(), 12);
        assert_eq!(game.active().unwrap().position, Position::new(5, 0));
    }

    #[test]
    fn test_start_on_too_narrow_board_is_game_over() {
        // At x = 0 every spawn matrix reaches column 2
        let config = GameConfig {
            rows: 20,
            cols: 2,
            ..GameConfig::default()
        };
        let mut game = Game::with_seed(config, 4);
        assert_eq!(
            game.start(),
            Outcome::GameOver {
                final_score: 0,
                lines: 0,
                level: 1
            }
        );
        assert!(game.is_game_over());
        assert_eq!(game.last_score(), Some(0));
        assert!(!game.drain_events().contains(&GameEvent::Started));
        assert_eq!(game.apply_command(Command::SoftDrop), Outcome::Ignored);
    }

    #[test]
    fn test_every_piece_spawns_on_smallest_board() {
        let board = Board::new(crate::board::MIN_ROWS, crate::board::MIN_COLS);
        for kind in TetrominoType::all() {
            assert!(Piece::new(kind, board.cols()).fits(&board), "{:?}", kind);
        }
    }

    /// Drop a vertical I into column 9 to complete the bottom row
    fn complete_bottom_row(game: &mut Game) -> Outcome {
        game.fill_row_for_test(BOTTOM, 9);
        game.set_active_for_test(TetrominoType::I);
        let piece = game.active.as_mut().unwrap();
        piece.rotation = 1;
        piece.position = Position::new(8, 0);
        drop_until_landed(game)
    }

    #[test]
    fn test_spawn_checked_after_rows_removed() {
        let mut game = started_game();
        game.next = TetrominoType::O;
        // Inside the O's spawn cells until the clear shifts it down a row
        game.board.set(5, 2, Cell::Filled(Color::Red));

        assert!(matches!(
            complete_bottom_row(&mut game),
            Outcome::ClearStarted { .. }
        ));
        assert!(!Piece::new(TetrominoType::O, DEFAULT_COLS).fits(&game.board));

        assert_eq!(
            game.tick(ms(500)),
            Outcome::Cleared {
                lines: 1,
                points: 40
            }
        );
        assert_eq!(game.state(), GameState::Running);
        assert_eq!(game.board.get(5, 3), Some(Cell::Filled(Color::Red)));
        let active = game.active().unwrap();
        assert_eq!(active.piece_type, TetrominoType::O);
        assert_eq!(active.position, Position::new(4, 0));
    }

    #[test]
    fn test_spawn_still_blocked_after_clear_is_game_over() {
        let mut game = started_game();
        game.score.add_clear(4);
        game.next = TetrominoType::O;
        // Shifts down into the O's spawn cells
        game.board.set(5, 1, Cell::Filled(Color::Red));

        assert!(matches!(
            complete_bottom_row(&mut game),
            Outcome::ClearStarted { .. }
        ));
        assert_eq!(
            game.tick(ms(500)),
            Outcome::GameOver {
                final_score: 1240,
                lines: 5,
                level: 1
            }
        );
        assert!(game.is_game_over());
        assert!(game.board.is_empty());
        let score = game.score();
        assert_eq!((score.points, score.lines, score.level), (0, 0, 1));
        assert_eq!(game.last_score(), Some(1240));
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::LinesCleared {
            count: 1,
            points: 40
        }));
        assert!(events.contains(&GameEvent::GameOver { final_score: 1240 }));
    }
}
