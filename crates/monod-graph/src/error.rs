//! Error types for network construction and wiring.

use thiserror::Error;

use crate::model::{EntityId, ACTIVITY_MAX, ACTIVITY_MIN};

/// Errors raised while building or mutating an interaction network.
///
/// Construction is fail-fast: malformed wiring is reported at build time,
/// never deferred into an evaluation pass.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("unknown entity: {0}")]
    UnknownEntity(EntityId),

    #[error("wrong entity kind: {id} is a {got}, expected a {expected}")]
    WrongKind {
        id: EntityId,
        expected: &'static str,
        got: &'static str,
    },

    #[error("fixed value {0} outside [{ACTIVITY_MIN}, {ACTIVITY_MAX}] or not finite")]
    FixedOutOfRange(f64),

    #[error("entity {0} has a fixed value; its output slot cannot be seeded")]
    FixedEntity(EntityId),

    #[error("unknown regulation type: {0:?} (expected Positive, Negative or Requirement)")]
    UnknownRegulationType(String),
}
