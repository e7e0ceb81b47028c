//! Terminal UI rendering with ratatui

use crate::board::Cell;
use crate::game::{GameState, Snapshot};
use crate::ports::Renderer;
use crate::settings::VisualSettings;
use crate::tetromino::{self, TetrominoType};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;

const EMPTY: &str = "  ";

/// Width of the next/stats column
const SIDE_WIDTH: u16 = 16;
/// Height of the next piece box
const NEXT_HEIGHT: u16 = 6;
/// Minimum height of the stats box
const STATS_HEIGHT: u16 = 12;

/// Renderer that draws snapshots to a ratatui terminal
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    visual: VisualSettings,
    /// Best score shown alongside the current one
    best: u64,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>, visual: VisualSettings, best: u64) -> Self {
        Self {
            terminal,
            visual,
            best,
        }
    }

    pub fn set_best(&mut self, best: u64) {
        self.best = best;
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let visual = &self.visual;
        let best = self.best;
        self.terminal
            .draw(|frame| render_game(frame, snapshot, visual, best))?;
        Ok(())
    }
}

/// Render the playfield, side panel and any overlay
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, visual: &VisualSettings, best: u64) {
    let area = frame.area();
    let (block_char, _) = visual.block_chars();

    let board_width = snapshot.board.cols() as u16 * 2 + 2;
    let board_height = snapshot.board.rows() as u16 + 2;
    let game_area = center_rect(
        area,
        board_width + SIDE_WIDTH,
        board_height.max(NEXT_HEIGHT + STATS_HEIGHT),
    );

    // Create main layout: board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Length(SIDE_WIDTH),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, visual);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NEXT_HEIGHT),
            Constraint::Min(STATS_HEIGHT),
        ])
        .split(main_layout[1]);

    render_next(frame, right_layout[0], snapshot.next, block_char);
    render_stats(frame, right_layout[1], snapshot, best);

    if snapshot.state == GameState::GameOver {
        match snapshot.last_score {
            Some(score) => render_overlay(
                frame,
                area,
                "GAME OVER",
                &format!("Score: {}", score),
                "Enter to play again",
            ),
            None => render_overlay(frame, area, "BLOCKFALL", "Press Enter", "to start"),
        }
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the next piece box
fn render_next(frame: &mut Frame, area: Rect, next: TetrominoType, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_mini_piece(frame, inner, next, block_char);
}

/// Render a small piece preview, trimmed to its occupied rows and columns
fn render_mini_piece(frame: &mut Frame, area: Rect, piece_type: TetrominoType, block_char: &str) {
    if area.height < 1 || area.width < 4 {
        return;
    }

    let color = piece_type.color();
    let cells: Vec<(i32, i32)> = tetromino::occupied(piece_type.matrix(0)).collect();
    let (Some(min_x), Some(max_x)) = (
        cells.iter().map(|&(x, _)| x).min(),
        cells.iter().map(|&(x, _)| x).max(),
    ) else {
        return;
    };
    let (Some(min_y), Some(max_y)) = (
        cells.iter().map(|&(_, y)| y).min(),
        cells.iter().map(|&(_, y)| y).max(),
    ) else {
        return;
    };

    let lines: Vec<Line> = (min_y..=max_y)
        .map(|y| {
            let spans: Vec<Span> = (min_x..=max_x)
                .map(|x| {
                    if cells.contains(&(x, y)) {
                        Span::styled(block_char, Style::default().fg(color))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, visual: &VisualSettings) {
    let (block_char, ghost_char) = visual.block_chars();

    let border = if snapshot.state == GameState::LineClearing {
        Color::Yellow
    } else {
        Color::White
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active = snapshot
        .active
        .as_ref()
        .map(|piece| (piece.cells(), piece.color()));
    let ghost_color = active.as_ref().map(|(_, color)| *color);

    let lines: Vec<Line> = snapshot
        .board
        .iter_rows()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    let pos = (x as i32, y as i32);
                    let current = active
                        .as_ref()
                        .filter(|(cells, _)| cells.contains(&pos))
                        .map(|(_, color)| *color);

                    if let Some(color) = current {
                        Span::styled(block_char, Style::default().fg(color))
                    } else if let Cell::Filled(color) = cell {
                        Span::styled(block_char, Style::default().fg(*color))
                    } else if visual.show_ghost && snapshot.ghost.contains(&pos) {
                        let color = ghost_color.unwrap_or(Color::Gray);
                        Span::styled(ghost_char, Style::default().fg(color).dim())
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot, best: u64) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stat = |label: &'static str, value: String, color: Color| {
        [
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
            Line::from(Span::styled(value, Style::default().fg(color).bold())),
        ]
    };

    let mut lines = Vec::new();
    lines.extend(stat("SCORE", snapshot.score.to_string(), Color::Yellow));
    lines.push(Line::raw(""));
    lines.extend(stat("LINES", snapshot.lines.to_string(), Color::Green));
    lines.push(Line::raw(""));
    lines.extend(stat("LEVEL", snapshot.level.to_string(), Color::Cyan));
    lines.push(Line::raw(""));
    lines.extend(stat("BEST", best.max(snapshot.score).to_string(), Color::Magenta));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render an overlay (title and game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str, hint: &str) {
    let popup_width = 24u16;
    let popup_height = 6u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::White)),
        Line::styled(hint, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
