/// Game driver: per-tick orchestration and level sequencing.
///
/// Nothing here touches the terminal.  Callers hook rendering in through an
/// `Observer`, and all randomness comes through the injected RNG so a seeded
/// RNG replays a run exactly.

use std::ops::ControlFlow;

use rand::RngCore;
use serde::Serialize;

use crate::consts::{FRAME_STEP, MAX_STEP};
use crate::entities::Obstacle;
use crate::error::Result;
use crate::level::{Level, LevelStatus, Terrain};
use crate::parser::LevelParser;
use crate::vector::Vector;

// ── Configuration ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// dt handed to every tick.
    pub step: f64,
    /// Tick budget for a single attempt at a level.
    pub max_ticks: u32,
    /// Attempts per level before the run gives up.
    pub max_attempts: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            step: FRAME_STEP,
            max_ticks: 3600,
            max_attempts: 3,
        }
    }
}

// ── Reports ──────────────────────────────────────────────────────────────────

/// Outcome of one attempt at a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelRun {
    /// `Unresolved` when the tick budget ran out first.
    pub status: LevelStatus,
    pub ticks: u32,
    /// The observer asked to stop.
    pub stopped: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelReport {
    pub index: usize,
    pub attempts: u32,
    pub status: LevelStatus,
    pub ticks: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GameReport {
    pub levels: Vec<LevelReport>,
    /// Every level was won.
    pub completed: bool,
    pub stopped: bool,
}

// ── Observer ─────────────────────────────────────────────────────────────────

/// Where the driver is, handed to the observer after every tick.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub level: &'a Level,
    pub index: usize,
    pub attempt: u32,
    pub tick: u32,
}

/// Receives every simulated frame.  Returning `Break` stops the run.
pub trait Observer {
    fn observe(&mut self, frame: &Frame<'_>) -> ControlFlow<()>;
}

/// Observer that never stops the run.
pub struct Unobserved;

impl Observer for Unobserved {
    fn observe(&mut self, _frame: &Frame<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

// ── Per-tick step ────────────────────────────────────────────────────────────

/// Advance the level by one tick.
///
/// Every actor acts in roster order, then the player is checked against the
/// terrain it covers and against the live roster.  Once the level has an
/// outcome the finish delay burns down by `dt`.
pub fn tick(level: &mut Level, dt: f64) -> Result<()> {
    let dt = dt.min(MAX_STEP);

    level.act_actors(dt)?;

    if !level.status().is_resolved() {
        resolve_player_contacts(level)?;
    }

    if level.status().is_resolved() {
        level.count_down(dt);
    }
    Ok(())
}

fn resolve_player_contacts(level: &mut Level) -> Result<()> {
    let Some(player) = level.player() else {
        return Ok(());
    };
    let (id, pos, size) = (player.id(), player.pos, player.size());

    if let Some(obstacle) = level.obstacle_at(pos, size)? {
        level.player_touched(obstacle, None);
    }

    let touched = level.actor_at_id(id)?.map(|a| (a.actor_type(), a.id()));
    if let Some((actor_type, other)) = touched {
        level.player_touched(actor_type, Some(other));
    }
    Ok(())
}

/// Displace the player by `offset`.
///
/// A wall at the destination blocks the move; any terrain there is still
/// reported through `player_touched`, so stepping into lava loses the level.
pub fn move_player(level: &mut Level, offset: Vector) -> Result<()> {
    let Some(player) = level.player() else {
        return Ok(());
    };
    let (id, target, size) = (player.id(), player.pos + offset, player.size());

    let obstacle = level.obstacle_at(target, size)?;
    if obstacle != Some(Obstacle::Wall) {
        if let Some(player) = level.actor_mut(id) {
            player.pos = target;
        }
    }
    if let Some(obstacle) = obstacle {
        level.player_touched(obstacle, None);
    }
    Ok(())
}

// ── Level and game loops ─────────────────────────────────────────────────────

/// Tick `level` until it is finished, the observer stops, or the tick budget
/// runs out.
pub fn run_level(
    level: &mut Level,
    config: &RunConfig,
    observer: &mut dyn Observer,
    index: usize,
    attempt: u32,
) -> Result<LevelRun> {
    let mut ticks = 0;
    while ticks < config.max_ticks {
        tick(level, config.step)?;
        ticks += 1;

        let frame = Frame {
            level: &*level,
            index,
            attempt,
            tick: ticks,
        };
        if observer.observe(&frame).is_break() {
            return Ok(LevelRun {
                status: level.status(),
                ticks,
                stopped: true,
            });
        }
        if level.is_finished() {
            return Ok(LevelRun {
                status: level.status(),
                ticks,
                stopped: false,
            });
        }
    }

    log::warn!(
        "level {} attempt {}: tick budget of {} exhausted",
        index + 1,
        attempt,
        config.max_ticks
    );
    Ok(LevelRun {
        status: LevelStatus::Unresolved,
        ticks,
        stopped: false,
    })
}

/// Play `plans` in order.
///
/// A won level advances to the next plan.  A lost or timed-out level is
/// parsed afresh and retried, up to `max_attempts` times.
pub fn run_game<S: AsRef<str>>(
    plans: &[Vec<S>],
    parser: &LevelParser,
    config: &RunConfig,
    rng: &mut dyn RngCore,
    observer: &mut dyn Observer,
) -> Result<GameReport> {
    let mut report = GameReport::default();

    for (index, plan) in plans.iter().enumerate() {
        let mut attempt = 0;
        let mut ticks = 0;
        loop {
            attempt += 1;
            log::info!("level {} attempt {}", index + 1, attempt);

            let mut level = parser.parse(plan.as_slice(), rng)?;
            let run = run_level(&mut level, config, observer, index, attempt)?;
            ticks += run.ticks;

            let won = run.status == LevelStatus::Won;
            if !run.stopped && !won && attempt < config.max_attempts {
                continue;
            }

            report.levels.push(LevelReport {
                index,
                attempts: attempt,
                status: run.status,
                ticks,
            });
            if run.stopped {
                report.stopped = true;
                return Ok(report);
            }
            if !won {
                log::info!("giving up on level {} after {} attempts", index + 1, attempt);
                return Ok(report);
            }
            break;
        }
    }

    report.completed = true;
    log::info!("all {} levels won", plans.len());
    Ok(report)
}
