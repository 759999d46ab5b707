/// Actors: the moving things on a level.
///
/// One `Actor` struct carries position, size and speed; the variant-specific
/// data and obstacle policy live in `ActorKind`.  Identity is an `ActorId`
/// handed out once per constructed actor, so two actors with the same box are
/// still distinct and a clone is the same actor.

use std::f64::consts::TAU;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::level::Terrain;
use crate::vector::Vector;

static NEXT_ACTOR_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    fn next() -> Self {
        ActorId(NEXT_ACTOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminant shared by all actors of a family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    Actor,
    Player,
    Fireball,
    Coin,
}

impl ActorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorType::Actor => "actor",
            ActorType::Player => "player",
            ActorType::Fireball => "fireball",
            ActorType::Coin => "coin",
        }
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static terrain kinds stored in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Obstacle {
    Wall,
    Lava,
}

impl fmt::Display for Obstacle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obstacle::Wall => f.write_str("wall"),
            Obstacle::Lava => f.write_str("lava"),
        }
    }
}

/// What a fireball does when its next step would enter terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObstaclePolicy {
    /// Flip the velocity and stay put this step.
    Reverse,
    /// Jump back to the spawn position, keeping the velocity.
    Restart { start_pos: Vector },
}

/// Vertical bob of a coin around its resting position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub start_pos: Vector,
    /// Current phase in radians.
    pub phase: f64,
    pub speed: f64,
    pub dist: f64,
}

impl Spring {
    pub fn update(&mut self, dt: f64) {
        self.phase += self.speed * dt;
    }

    pub fn offset(&self) -> Vector {
        Vector::new(0.0, self.phase.sin() * self.dist)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActorKind {
    /// Plain actor: no motion of its own.
    Actor,
    /// Moved by the driver only.
    Player,
    Fireball(ObstaclePolicy),
    Coin(Spring),
}

impl ActorKind {
    pub fn actor_type(&self) -> ActorType {
        match self {
            ActorKind::Actor => ActorType::Actor,
            ActorKind::Player => ActorType::Player,
            ActorKind::Fireball(_) => ActorType::Fireball,
            ActorKind::Coin(_) => ActorType::Coin,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    id: ActorId,
    /// Top-left corner.
    pub pos: Vector,
    /// Strictly positive on both axes; fixed at construction.
    size: Vector,
    /// Displacement per unit of simulated time.
    pub speed: Vector,
    kind: ActorKind,
}

// ── Constructors ─────────────────────────────────────────────────────────────

impl Actor {
    /// A plain actor.  Each vector is validated on its own and `size` must be
    /// strictly positive on both axes.
    pub fn new(pos: Vector, size: Vector, speed: Vector) -> Result<Self> {
        Self::with_kind(pos, size, speed, ActorKind::Actor)
    }

    fn with_kind(pos: Vector, size: Vector, speed: Vector, kind: ActorKind) -> Result<Self> {
        let pos = pos.validate("actor position")?;
        let size = size.validate("actor size")?;
        let speed = speed.validate("actor speed")?;
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(GameError::TypeInvalid { what: "actor size" });
        }
        Ok(Self {
            id: ActorId::next(),
            pos,
            size,
            speed,
            kind,
        })
    }

    /// Unit square at `pos`, standing still.
    pub fn at(pos: Vector) -> Result<Self> {
        Self::new(pos, Vector::new(1.0, 1.0), Vector::ZERO)
    }

    pub fn player(cell: Vector) -> Result<Self> {
        Self::with_kind(
            cell + PLAYER_OFFSET.into(),
            PLAYER_SIZE.into(),
            Vector::ZERO,
            ActorKind::Player,
        )
    }

    /// A one-cell fireball that bounces off terrain.
    pub fn fireball(cell: Vector, speed: Vector) -> Result<Self> {
        Self::with_kind(
            cell,
            Vector::new(1.0, 1.0),
            speed,
            ActorKind::Fireball(ObstaclePolicy::Reverse),
        )
    }

    pub fn horizontal_fireball(cell: Vector) -> Result<Self> {
        Self::fireball(cell, HORIZONTAL_FIREBALL_SPEED.into())
    }

    pub fn vertical_fireball(cell: Vector) -> Result<Self> {
        Self::fireball(cell, VERTICAL_FIREBALL_SPEED.into())
    }

    /// Falling fire that restarts from its spawn cell whenever it lands.
    pub fn fire_rain(cell: Vector) -> Result<Self> {
        Self::with_kind(
            cell,
            Vector::new(1.0, 1.0),
            FIRE_RAIN_SPEED.into(),
            ActorKind::Fireball(ObstaclePolicy::Restart { start_pos: cell }),
        )
    }

    /// A coin with a random starting phase.
    pub fn coin<R: RngCore + ?Sized>(cell: Vector, rng: &mut R) -> Result<Self> {
        let phase = rng.gen_range(0.0..TAU);
        Self::coin_with_phase(cell, phase)
    }

    pub fn coin_with_phase(cell: Vector, phase: f64) -> Result<Self> {
        let start_pos = cell + COIN_OFFSET.into();
        Self::with_kind(
            start_pos,
            COIN_SIZE.into(),
            Vector::ZERO,
            ActorKind::Coin(Spring {
                start_pos,
                phase,
                speed: COIN_SPRING_SPEED,
                dist: COIN_SPRING_DIST,
            }),
        )
    }
}

// ── Accessors ────────────────────────────────────────────────────────────────

impl Actor {
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    pub fn kind(&self) -> &ActorKind {
        &self.kind
    }

    pub fn actor_type(&self) -> ActorType {
        self.kind.actor_type()
    }

    pub fn left(&self) -> f64 {
        self.pos.x
    }

    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f64 {
        self.pos.y
    }

    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    /// Open-interval box overlap.  Boxes that only share an edge do not
    /// intersect, and an actor never intersects itself.
    pub fn is_intersect(&self, other: &Actor) -> bool {
        if self.id == other.id {
            return false;
        }
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

// ── Motion ───────────────────────────────────────────────────────────────────

impl Actor {
    /// Where this actor wants to be after `dt`.
    ///
    /// For coins this advances the spring phase, so it is only called once
    /// per step.
    pub fn get_next_position(&mut self, dt: f64) -> Vector {
        match &mut self.kind {
            ActorKind::Coin(spring) => {
                spring.update(dt);
                spring.start_pos + spring.offset()
            }
            _ => self.pos + self.speed * dt,
        }
    }

    /// Apply this actor's obstacle policy.  No-op for non-fireballs.
    pub fn handle_obstacle(&mut self) {
        match &self.kind {
            ActorKind::Fireball(ObstaclePolicy::Reverse) => self.speed = -self.speed,
            ActorKind::Fireball(ObstaclePolicy::Restart { start_pos }) => self.pos = *start_pos,
            _ => {}
        }
    }

    /// Advance this actor by `dt`.
    ///
    /// Fireballs move unless the candidate box touches terrain, in which case
    /// the obstacle policy runs instead.  Coins bob in place and never look at
    /// the terrain.  Players and plain actors do nothing.
    pub fn act<T: Terrain + ?Sized>(&mut self, dt: f64, terrain: &T) -> Result<()> {
        match self.kind {
            ActorKind::Actor | ActorKind::Player => {}
            ActorKind::Fireball(_) => {
                let next = self.get_next_position(dt);
                if terrain.obstacle_at(next, self.size)?.is_some() {
                    self.handle_obstacle();
                } else {
                    self.pos = next;
                }
            }
            ActorKind::Coin(_) => {
                self.pos = self.get_next_position(dt);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_survive_clone() {
        let a = Actor::at(Vector::ZERO).unwrap();
        let b = Actor::at(Vector::ZERO).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn spring_offset_follows_sine() {
        let mut spring = Spring {
            start_pos: Vector::ZERO,
            phase: 0.0,
            speed: 8.0,
            dist: 0.07,
        };
        assert_eq!(spring.offset(), Vector::new(0.0, 0.0));
        spring.update(std::f64::consts::FRAC_PI_2 / 8.0);
        assert!((spring.offset().y - 0.07).abs() < 1e-12);
    }
}
