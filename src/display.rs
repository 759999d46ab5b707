/// Terminal drawing for the interactive binary.
///
/// Frames are queued onto any writer and flushed once.  The window scrolls
/// to keep the player near its centre on levels larger than the terminal.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use tile_runner::compute::{Frame, GameReport};
use tile_runner::entities::{Actor, ActorType, Obstacle};
use tile_runner::level::{Level, LevelStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_WALL: Color = Color::Grey;
const C_LAVA: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_COIN: Color = Color::Yellow;
const C_FIREBALL: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Rows taken by the HUD, the top border, the bottom border and the hint.
const CHROME_ROWS: u16 = 4;
const CHROME_COLS: u16 = 2;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Top-left cell of the visible window along one axis, keeping `focus`
/// centred where the level is larger than the window.
pub fn view_origin(level_len: usize, view_len: usize, focus: f64) -> usize {
    if level_len <= view_len {
        return 0;
    }
    let wanted = (focus - view_len as f64 / 2.0).floor().max(0.0) as usize;
    wanted.min(level_len - view_len)
}

struct View {
    col: usize,
    row: usize,
    cols: usize,
    rows: usize,
}

impl View {
    fn new(level: &Level, width: u16, height: u16) -> Self {
        let cols = width.saturating_sub(CHROME_COLS) as usize;
        let rows = height.saturating_sub(CHROME_ROWS) as usize;
        let (fx, fy) = level
            .player()
            .map(centre)
            .unwrap_or((0.0, 0.0));
        Self {
            col: view_origin(level.width(), cols, fx),
            row: view_origin(level.height(), rows, fy),
            cols: cols.min(level.width()),
            rows: rows.min(level.height()),
        }
    }

    /// Screen position of a level cell, if it is inside the window.
    fn screen(&self, col: i64, row: i64) -> Option<(u16, u16)> {
        let c = col - self.col as i64;
        let r = row - self.row as i64;
        if c < 0 || r < 0 || c >= self.cols as i64 || r >= self.rows as i64 {
            return None;
        }
        Some((c as u16 + 1, r as u16 + 2))
    }
}

fn centre(actor: &Actor) -> (f64, f64) {
    ((actor.left() + actor.right()) / 2.0, (actor.top() + actor.bottom()) / 2.0)
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Draw the level, HUD and any outcome banner for `frame`.
pub fn render<W: Write>(out: &mut W, frame: &Frame<'_>) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let level = frame.level;
    let view = View::new(level, width, height);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, frame, width)?;
    draw_grid(out, level, &view)?;

    for actor in level.actors() {
        draw_actor(out, actor, &view)?;
    }

    draw_controls_hint(out, height)?;

    if level.status().is_resolved() {
        draw_banner(out, level.status(), width, height)?;
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Closing screen after the run.
pub fn render_summary<W: Write>(out: &mut W, report: &GameReport) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (title, color) = if report.completed {
        ("YOU WON THE PRIZE!", Color::Green)
    } else {
        ("GAME  OVER", Color::Red)
    };

    let mut lines: Vec<(String, Color)> = vec![(title.to_string(), color)];
    for level in &report.levels {
        lines.push((
            format!(
                "Level {:>2}: {:<10} attempts {:>2}",
                level.index + 1,
                level.status,
                level.attempts
            ),
            C_HUD,
        ));
    }
    lines.push(("Press any key".to_string(), C_HINT));

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let w = view.cols;
    let bottom = view.rows as u16 + 2;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

    out.queue(cursor::MoveTo(0, bottom))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in 2..bottom {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(w as u16 + 1, row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, frame: &Frame<'_>, width: u16) -> std::io::Result<()> {
    let level = frame.level;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Level {}  Try {}",
        frame.index + 1,
        frame.attempt
    )))?;

    let right_str = format!("Coins left: {}", level.remaining(ActorType::Coin));
    let rx = width.saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(Print(&right_str))?;

    Ok(())
}

// ── Terrain ───────────────────────────────────────────────────────────────────

fn draw_grid<W: Write>(out: &mut W, level: &Level, view: &View) -> std::io::Result<()> {
    for (row, cells) in level.grid().rows().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let Some(obstacle) = cell else { continue };
            let Some((x, y)) = view.screen(col as i64, row as i64) else {
                continue;
            };
            out.queue(cursor::MoveTo(x, y))?;
            match obstacle {
                Obstacle::Wall => {
                    out.queue(style::SetForegroundColor(C_WALL))?;
                    out.queue(Print("█"))?;
                }
                Obstacle::Lava => {
                    out.queue(style::SetForegroundColor(C_LAVA))?;
                    out.queue(Print("~"))?;
                }
            }
        }
    }
    Ok(())
}

// ── Actors ────────────────────────────────────────────────────────────────────

fn draw_actor<W: Write>(out: &mut W, actor: &Actor, view: &View) -> std::io::Result<()> {
    let (cx, cy) = centre(actor);
    let Some((x, y)) = view.screen(cx.floor() as i64, cy.floor() as i64) else {
        return Ok(());
    };
    let (glyph, color) = match actor.actor_type() {
        ActorType::Player => ("@", C_PLAYER),
        ActorType::Coin => ("o", C_COIN),
        ActorType::Fireball => ("*", C_FIREBALL),
        ActorType::Actor => ("?", C_HINT),
    };
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Q : Quit"))?;
    Ok(())
}

// ── Outcome banner ────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    status: LevelStatus,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let (msg, color) = match status {
        LevelStatus::Won => ("║  LEVEL COMPLETE  ║", Color::Green),
        _ => ("║     YOU  DIED    ║", Color::Red),
    };
    let lines = ["╔══════════════════╗", msg, "╚══════════════════╝"];

    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(1);
    out.queue(style::SetForegroundColor(color))?;
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(*line))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_levels_are_not_scrolled() {
        assert_eq!(view_origin(10, 40, 9.0), 0);
    }

    #[test]
    fn view_centres_on_focus_and_clamps() {
        assert_eq!(view_origin(100, 20, 50.0), 40);
        assert_eq!(view_origin(100, 20, 2.0), 0);
        assert_eq!(view_origin(100, 20, 99.0), 80);
    }
}
