//! Blockfall - falling blocks in the terminal

use blockfall::audio::AudioManager;
use blockfall::driver::Driver;
use blockfall::game::{Game, Outcome};
use blockfall::input::{Action, KeyBindings};
use blockfall::settings::Settings;
use blockfall::ui::TerminalRenderer;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

type AppDriver = Driver<TerminalRenderer<CrosstermBackend<Stdout>>, Option<AudioManager>>;

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    // Setup tracing to log file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "blockfall=debug".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "Blockfall starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let mut settings = Settings::load();
    let loaded = settings.clone();
    let keys = KeyBindings::from_settings(&settings);

    // Optional - the game works without audio
    let audio = AudioManager::new(&settings.audio);

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    let renderer = TerminalRenderer::new(
        terminal,
        settings.visual.clone(),
        settings.high_score.score,
    );
    let game = Game::new(settings.game_config());
    let mut driver = Driver::new(game, renderer, audio);

    let result = run_app(&mut driver, &keys, &mut settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    // Only a new high score changes settings while playing
    if settings != loaded {
        if let Err(e) = settings.save() {
            tracing::warn!("Could not save settings: {}", e);
            eprintln!("Warning: Could not save settings: {}", e);
        }
    }

    if result.is_ok() {
        println!("\nThanks for playing Blockfall!");
        if let Some(score) = driver.game().last_score() {
            println!("Last score: {}", score);
        }
        println!("Best score: {}", settings.high_score.score);
    }

    result
}

fn run_app(driver: &mut AppDriver, keys: &KeyBindings, settings: &mut Settings) -> io::Result<()> {
    driver.render()?;

    loop {
        if event::poll(FRAME_DURATION)? {
            match event::read()? {
                Event::Key(key) => match keys.action_for(key) {
                    Some(Action::Quit) => {
                        tracing::info!("Quit requested");
                        return Ok(());
                    }
                    Some(Action::Game(command)) => {
                        let outcome = driver.command(command)?;
                        record_game_over(driver, settings, &outcome)?;
                    }
                    None => {}
                },
                // Terminal::draw resizes the buffer itself
                Event::Resize(..) => driver.render()?,
                _ => {}
            }
        }

        let outcome = driver.frame(Instant::now())?;
        record_game_over(driver, settings, &outcome)?;
    }
}

fn record_game_over(
    driver: &mut AppDriver,
    settings: &mut Settings,
    outcome: &Outcome,
) -> io::Result<()> {
    let &Outcome::GameOver {
        final_score,
        lines,
        level,
    } = outcome
    else {
        return Ok(());
    };
    if settings.record_score(final_score, lines, level) {
        tracing::info!("New high score: {}", final_score);
        driver.renderer_mut().set_best(final_score);
        driver.render()?;
    }
    Ok(())
}
