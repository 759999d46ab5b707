mod display;

use std::io::{stdout, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tile_runner::compute::{run_game, Frame, GameReport, Observer, RunConfig, Unobserved};
use tile_runner::parser::LevelParser;

const BUNDLED_LEVELS: &str = include_str!("../levels/levels.json");

#[derive(Parser, Debug)]
#[command(name = "tile_runner")]
#[command(about = "Tile-based platformer simulation: plays level plans in the terminal")]
struct Cli {
    /// JSON file holding an array of plans (each an array of row strings)
    #[arg(long)]
    levels: Option<PathBuf>,
    /// Run without a terminal UI and print the report as JSON
    #[arg(long)]
    headless: bool,
    /// Tick budget for one attempt at a level
    #[arg(long, default_value_t = 3600)]
    max_ticks: u32,
    /// Attempts per level before giving up
    #[arg(long, default_value_t = 3)]
    attempts: u32,
    /// Seed for coin phases; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Ticks per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

// ── Level loading ─────────────────────────────────────────────────────────────

fn load_plans(path: Option<&Path>) -> Result<Vec<Vec<String>>> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading level file {}", path.display()))?,
        None => BUNDLED_LEVELS.to_string(),
    };
    let plans: Vec<Vec<String>> =
        serde_json::from_str(&text).context("level file must be an array of string arrays")?;
    if plans.is_empty() {
        bail!("level file contains no plans");
    }
    Ok(plans)
}

// ── Terminal observer ─────────────────────────────────────────────────────────

fn is_quit(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
            KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
            _ => false,
        },
        _ => false,
    }
}

/// Draws every simulated frame and paces the run to wall-clock time.
struct TerminalObserver<'a, W: Write> {
    out: &'a mut W,
    rx: &'a mpsc::Receiver<Event>,
    frame_time: Duration,
    frame_start: Instant,
    error: Option<std::io::Error>,
}

impl<W: Write> Observer for TerminalObserver<'_, W> {
    fn observe(&mut self, frame: &Frame<'_>) -> ControlFlow<()> {
        while let Ok(event) = self.rx.try_recv() {
            if is_quit(&event) {
                return ControlFlow::Break(());
            }
        }

        if let Err(err) = display::render(&mut *self.out, frame) {
            self.error = Some(err);
            return ControlFlow::Break(());
        }

        let elapsed = self.frame_start.elapsed();
        if elapsed < self.frame_time {
            thread::sleep(self.frame_time - elapsed);
        }
        self.frame_start = Instant::now();
        ControlFlow::Continue(())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let plans = load_plans(cli.levels.as_deref())?;
    let fps = cli.fps.max(1);
    let config = RunConfig {
        step: 1.0 / fps as f64,
        max_ticks: cli.max_ticks,
        max_attempts: cli.attempts.max(1),
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let parser = LevelParser::standard();
    log::info!("{} level plans loaded", plans.len());

    if cli.headless {
        let report = run_game(plans.as_slice(), &parser, &config, &mut rng, &mut Unobserved)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let frame_time = Duration::from_secs_f64(config.step);
    let report = run_interactive(&plans, &parser, &config, &mut rng, frame_time)?;
    if report.completed {
        println!("You won the prize!");
    }
    Ok(())
}

fn run_interactive(
    plans: &[Vec<String>],
    parser: &LevelParser,
    config: &RunConfig,
    rng: &mut StdRng,
    frame_time: Duration,
) -> Result<GameReport> {
    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // key reader; the observer polls the channel between frames
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = play(&mut out, &rx, plans, parser, config, rng, frame_time);

    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn play<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    plans: &[Vec<String>],
    parser: &LevelParser,
    config: &RunConfig,
    rng: &mut StdRng,
    frame_time: Duration,
) -> Result<GameReport> {
    let mut observer = TerminalObserver {
        out,
        rx,
        frame_time,
        frame_start: Instant::now(),
        error: None,
    };
    let report = run_game(plans, parser, config, rng, &mut observer)?;
    if let Some(err) = observer.error.take() {
        return Err(anyhow::Error::new(err).context("drawing frame"));
    }

    if !report.stopped {
        display::render_summary(&mut *observer.out, &report)?;
        // Block until any key press
        while let Ok(event) = rx.recv() {
            if matches!(event, Event::Key(KeyEvent { kind: KeyEventKind::Press, .. })) {
                break;
            }
        }
    }
    Ok(report)
}
