mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use flappy::core::constants::DEFAULT_TICKS_PER_SECOND;
use flappy::{GameConfig, KeyboardDecision, LoggingAudio, Session, SpriteSet, StopSignal};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io::{self, Stdout};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ui::flappy_scene::{render_flappy, SceneDims};

#[derive(Parser, Debug)]
#[command(author, version, about = "Flappy Bird in the terminal", long_about = None)]
struct Args {
    /// JSON game config; missing keys keep the single-player preset
    #[arg(short, long)]
    config: Option<String>,

    /// RNG seed (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulation ticks per second
    #[arg(long, default_value_t = DEFAULT_TICKS_PER_SECOND)]
    fps: u32,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<String>,
}

type Term = Terminal<CrosstermBackend<Stdout>>;

fn init_logging(path: Option<&str>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("failed to create log file {path}"))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn new_session(config: &GameConfig, rng: &mut ChaCha8Rng, stop: &StopSignal) -> Result<Session> {
    let session = Session::solo(config.clone(), SpriteSet::default(), rng)
        .context("invalid game config")?
        .with_audio(Box::new(LoggingAudio))
        .with_stop_signal(stop.clone());
    Ok(session)
}

fn run_game(terminal: &mut Term, config: &GameConfig, seed: u64, fps: u32, key_release: bool) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let stop = StopSignal::new();
    let mut session = new_session(config, &mut rng, &stop)?;
    let mut keys = KeyboardDecision::new();

    let tick_duration = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let mut last_tick = Instant::now();

    loop {
        let snapshot = session.snapshot();
        let dims = SceneDims::from_session(&session);
        terminal.draw(|frame| {
            let area = frame.size();
            render_flappy(frame, area, &snapshot, &dims);
        })?;

        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                let ctrl_c =
                    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
                match (key.code, key.kind) {
                    _ if ctrl_c => stop.request(),
                    (KeyCode::Char('q') | KeyCode::Esc, KeyEventKind::Press) => stop.request(),
                    (KeyCode::Char(' ') | KeyCode::Up, KeyEventKind::Press) => {
                        if key_release {
                            keys.key_down();
                        } else {
                            keys.tap();
                        }
                    }
                    (KeyCode::Char(' ') | KeyCode::Up, KeyEventKind::Release) => keys.key_up(),
                    (KeyCode::Char('r'), KeyEventKind::Press) if session.is_over() => {
                        tracing::info!("Restarting after score {}", session.score());
                        session = new_session(config, &mut rng, &stop)?;
                        keys = KeyboardDecision::new();
                    }
                    _ => {}
                }
            }
        }

        if stop.is_requested() && session.is_over() {
            break;
        }

        if last_tick.elapsed() >= tick_duration {
            session.tick(&mut keys, &mut rng);
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => GameConfig::load_over(path, GameConfig::solo())
            .with_context(|| format!("failed to load config {path}"))?,
        None => GameConfig::solo(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!("Starting game with seed {}", seed);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let key_release = supports_keyboard_enhancement().unwrap_or(false);
    if key_release {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_game(&mut terminal, &config, seed, args.fps, key_release);

    // Restore terminal
    if key_release {
        terminal.backend_mut().execute(PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
