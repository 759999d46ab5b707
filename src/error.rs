/// Precondition failures raised by the simulation core.
///
/// Both kinds are programming errors on the caller's side; nothing in the
/// core retries or swallows them.

use thiserror::Error;

use crate::entities::ActorId;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum GameError {
    /// A vector argument had a non-finite component, or an actor size was
    /// not strictly positive.
    #[error("invalid vector for {what}")]
    TypeInvalid { what: &'static str },

    /// The handle does not name an actor in the level's roster.
    #[error("actor {id} is not part of this level")]
    ActorRequired { id: ActorId },
}

pub type Result<T> = std::result::Result<T, GameError>;
