/// Level state: the obstacle grid, the actor roster and the win/lose machine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::FINISH_DELAY;
use crate::entities::{Actor, ActorId, ActorType, Obstacle};
use crate::error::{GameError, Result};
use crate::vector::Vector;

/// Anything an actor can probe for terrain collisions.
pub trait Terrain {
    fn obstacle_at(&self, pos: Vector, size: Vector) -> Result<Option<Obstacle>>;
}

// ── Grid ─────────────────────────────────────────────────────────────────────

/// Rectangular, immutable obstacle grid indexed `[row][col]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Option<Obstacle>>>,
    width: usize,
}

impl Grid {
    /// Build a grid from rows of possibly different lengths.  Short rows are
    /// padded with empty cells up to the longest row.
    pub fn from_rows(mut rows: Vec<Vec<Option<Obstacle>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in rows.iter_mut().filter(|r| r.len() < width) {
            row.resize(width, None);
        }
        Self { rows, width }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<Option<Obstacle>>] {
        &self.rows
    }

    /// Cell at column `col`, row `row`; `None` outside the grid or when empty.
    pub fn cell(&self, col: usize, row: usize) -> Option<Obstacle> {
        self.rows.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

impl Terrain for Grid {
    /// Terrain under the box at `pos`/`size`.
    ///
    /// Any partially covered cell counts.  Below the grid is lava; left of,
    /// right of, or above the grid is wall.
    fn obstacle_at(&self, pos: Vector, size: Vector) -> Result<Option<Obstacle>> {
        let pos = pos.validate("obstacle position")?;
        let size = size.validate("obstacle size")?;
        if size.x < 0.0 || size.y < 0.0 {
            return Err(GameError::TypeInvalid { what: "obstacle size" });
        }

        let left = pos.x.floor();
        let top = pos.y.floor();
        let right = (pos.x + size.x).ceil();
        let bottom = (pos.y + size.y).ceil();

        if bottom > self.height() as f64 {
            return Ok(Some(Obstacle::Lava));
        }
        if left < 0.0 || top < 0.0 || right > self.width as f64 {
            return Ok(Some(Obstacle::Wall));
        }

        let (left, top, right, bottom) = (left as usize, top as usize, right as usize, bottom as usize);
        for row in &self.rows[top..bottom] {
            if let Some(hit) = row[left..right].iter().flatten().next() {
                return Ok(Some(*hit));
            }
        }
        Ok(None)
    }
}

// ── Status ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelStatus {
    #[default]
    Unresolved,
    Lost,
    Won,
}

impl LevelStatus {
    pub fn is_resolved(&self) -> bool {
        *self != LevelStatus::Unresolved
    }
}

impl fmt::Display for LevelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelStatus::Unresolved => f.pad("unresolved"),
            LevelStatus::Lost => f.pad("lost"),
            LevelStatus::Won => f.pad("won"),
        }
    }
}

/// What the player ran into: terrain or another actor's type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contact {
    Obstacle(Obstacle),
    Actor(ActorType),
}

impl From<Obstacle> for Contact {
    fn from(obstacle: Obstacle) -> Self {
        Contact::Obstacle(obstacle)
    }
}

impl From<ActorType> for Contact {
    fn from(actor_type: ActorType) -> Self {
        Contact::Actor(actor_type)
    }
}

impl Contact {
    fn is_hazard(&self) -> bool {
        matches!(
            self,
            Contact::Obstacle(Obstacle::Lava) | Contact::Actor(ActorType::Fireball)
        )
    }
}

// ── Level ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Level {
    grid: Grid,
    actors: Vec<Actor>,
    /// First player found at construction.  Not refreshed when the roster
    /// changes; removing the player leaves this pointing at nothing.
    player: Option<ActorId>,
    status: LevelStatus,
    finish_delay: f64,
}

impl Level {
    pub fn new(grid: Grid, actors: Vec<Actor>) -> Self {
        let mut players = actors.iter().filter(|a| a.actor_type() == ActorType::Player);
        let player = players.next().map(Actor::id);
        let extra = players.count();
        if player.is_none() {
            log::warn!("level has no player");
        } else if extra > 0 {
            log::warn!("level has {} extra players; using the first", extra);
        }
        log::debug!(
            "level {}x{} with {} actors",
            grid.width(),
            grid.height(),
            actors.len()
        );
        Self {
            grid,
            actors,
            player,
            status: LevelStatus::Unresolved,
            finish_delay: FINISH_DELAY,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|a| a.id() == id)
    }

    pub fn player_id(&self) -> Option<ActorId> {
        self.player
    }

    pub fn player(&self) -> Option<&Actor> {
        self.player.and_then(|id| self.actor(id))
    }

    pub fn status(&self) -> LevelStatus {
        self.status
    }

    pub fn finish_delay(&self) -> f64 {
        self.finish_delay
    }

    /// Burn down the post-outcome delay.  The level never calls this itself.
    pub fn count_down(&mut self, step: f64) {
        self.finish_delay -= step;
    }

    /// True once an outcome is set and the delay has run out.
    pub fn is_finished(&self) -> bool {
        self.status.is_resolved() && self.finish_delay < 0.0
    }

    /// First actor in roster order whose box overlaps `actor`'s.  `actor`
    /// need not be part of the roster; it never matches itself.
    pub fn actor_at(&self, actor: &Actor) -> Option<&Actor> {
        self.actors.iter().find(|other| other.is_intersect(actor))
    }

    /// `actor_at` for a roster actor named by its handle.
    pub fn actor_at_id(&self, id: ActorId) -> Result<Option<&Actor>> {
        let actor = self.actor(id).ok_or(GameError::ActorRequired { id })?;
        Ok(self.actor_at(actor))
    }

    /// Advance every actor by `dt`, in roster order.
    pub fn act_actors(&mut self, dt: f64) -> Result<()> {
        let grid = &self.grid;
        for actor in self.actors.iter_mut() {
            actor.act(dt, grid)?;
        }
        Ok(())
    }

    /// Drop the actor with this id, if present.
    pub fn remove_actor(&mut self, id: ActorId) {
        if let Some(index) = self.actors.iter().position(|a| a.id() == id) {
            self.actors.remove(index);
        }
    }

    pub fn remaining(&self, actor_type: ActorType) -> usize {
        self.actors
            .iter()
            .filter(|a| a.actor_type() == actor_type)
            .count()
    }

    pub fn no_more_actors(&self, actor_type: ActorType) -> bool {
        !self.actors.iter().any(|a| a.actor_type() == actor_type)
    }

    /// Resolve what happens when the player touches something.
    ///
    /// Hazards lose the level.  A coin contact collects `actor` if it is a
    /// coin.  Then, while still unresolved, an empty coin roster wins.  Once
    /// the status is set every further call is ignored.
    pub fn player_touched(&mut self, contact: impl Into<Contact>, actor: Option<ActorId>) {
        if self.status.is_resolved() {
            return;
        }

        let contact = contact.into();
        if contact.is_hazard() {
            log::info!("player touched {:?}: level lost", contact);
            self.status = LevelStatus::Lost;
            return;
        }

        if contact == Contact::Actor(ActorType::Coin) {
            if let Some(id) = actor {
                if self.actor(id).map(Actor::actor_type) == Some(ActorType::Coin) {
                    self.remove_actor(id);
                    log::debug!("coin {} collected, {} left", id, self.remaining(ActorType::Coin));
                }
            }
        }

        if self.no_more_actors(ActorType::Coin) {
            log::info!("no coins left: level won");
            self.status = LevelStatus::Won;
        }
    }
}

impl Terrain for Level {
    fn obstacle_at(&self, pos: Vector, size: Vector) -> Result<Option<Obstacle>> {
        self.grid.obstacle_at(pos, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_padded() {
        let grid = Grid::from_rows(vec![vec![Some(Obstacle::Wall)], vec![None, None, Some(Obstacle::Lava)]]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.rows()[0].len(), 3);
        assert_eq!(grid.cell(2, 0), None);
        assert_eq!(grid.cell(2, 1), Some(Obstacle::Lava));
        assert_eq!(grid.cell(9, 9), None);
    }

    #[test]
    fn hazard_contacts() {
        assert!(Contact::from(Obstacle::Lava).is_hazard());
        assert!(Contact::from(ActorType::Fireball).is_hazard());
        assert!(!Contact::from(Obstacle::Wall).is_hazard());
        assert!(!Contact::from(ActorType::Coin).is_hazard());
    }
}
