/// Turns a level plan (one string per grid row) into a `Level`.
///
/// Obstacle symbols are fixed; actor symbols come from the table the parser
/// is built with.  Unknown symbols are simply empty cells.

use std::collections::HashMap;
use std::fmt;

use rand::RngCore;

use crate::entities::{Actor, Obstacle};
use crate::error::Result;
use crate::level::{Grid, Level};
use crate::vector::Vector;

/// Builds an actor standing in grid cell `cell`.
pub type ActorFactory = fn(Vector, &mut dyn RngCore) -> Result<Actor>;

fn spawn_player(cell: Vector, _rng: &mut dyn RngCore) -> Result<Actor> {
    Actor::player(cell)
}

fn spawn_coin(cell: Vector, rng: &mut dyn RngCore) -> Result<Actor> {
    Actor::coin(cell, rng)
}

fn spawn_horizontal_fireball(cell: Vector, _rng: &mut dyn RngCore) -> Result<Actor> {
    Actor::horizontal_fireball(cell)
}

fn spawn_vertical_fireball(cell: Vector, _rng: &mut dyn RngCore) -> Result<Actor> {
    Actor::vertical_fireball(cell)
}

fn spawn_fire_rain(cell: Vector, _rng: &mut dyn RngCore) -> Result<Actor> {
    Actor::fire_rain(cell)
}

/// `@` player, `o` coin, `=` horizontal fireball, `|` vertical fireball,
/// `v` fire rain.
pub fn standard_symbols() -> HashMap<char, ActorFactory> {
    let mut symbols: HashMap<char, ActorFactory> = HashMap::new();
    symbols.insert('@', spawn_player);
    symbols.insert('o', spawn_coin);
    symbols.insert('=', spawn_horizontal_fireball);
    symbols.insert('|', spawn_vertical_fireball);
    symbols.insert('v', spawn_fire_rain);
    symbols
}

#[derive(Clone, Default)]
pub struct LevelParser {
    symbols: HashMap<char, ActorFactory>,
}

impl fmt::Debug for LevelParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut symbols: Vec<char> = self.symbols.keys().copied().collect();
        symbols.sort_unstable();
        f.debug_struct("LevelParser").field("symbols", &symbols).finish()
    }
}

impl LevelParser {
    pub fn new(symbols: HashMap<char, ActorFactory>) -> Self {
        Self { symbols }
    }

    pub fn standard() -> Self {
        Self::new(standard_symbols())
    }

    pub fn actor_from_symbol(&self, symbol: char) -> Option<ActorFactory> {
        self.symbols.get(&symbol).copied()
    }

    pub fn obstacle_from_symbol(symbol: char) -> Option<Obstacle> {
        match symbol {
            'x' => Some(Obstacle::Wall),
            '!' => Some(Obstacle::Lava),
            _ => None,
        }
    }

    pub fn create_grid<S: AsRef<str>>(&self, plan: &[S]) -> Grid {
        let rows: Vec<Vec<Option<Obstacle>>> = plan
            .iter()
            .map(|row| row.as_ref().chars().map(Self::obstacle_from_symbol).collect())
            .collect();
        let longest = rows.iter().map(Vec::len).max().unwrap_or(0);
        if rows.iter().any(|r| r.len() != longest) {
            log::warn!("ragged level plan; padding rows to width {}", longest);
        }
        Grid::from_rows(rows)
    }

    /// Instantiate actors in row-major discovery order.
    pub fn create_actors<S: AsRef<str>>(
        &self,
        plan: &[S],
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Actor>> {
        let mut actors = Vec::new();
        for (y, row) in plan.iter().enumerate() {
            for (x, symbol) in row.as_ref().chars().enumerate() {
                if let Some(factory) = self.actor_from_symbol(symbol) {
                    actors.push(factory(Vector::new(x as f64, y as f64), rng)?);
                }
            }
        }
        Ok(actors)
    }

    pub fn parse<S: AsRef<str>>(&self, plan: &[S], rng: &mut dyn RngCore) -> Result<Level> {
        let grid = self.create_grid(plan);
        let actors = self.create_actors(plan, rng)?;
        log::debug!("parsed plan: {} rows, {} actors", plan.len(), actors.len());
        Ok(Level::new(grid, actors))
    }
}
