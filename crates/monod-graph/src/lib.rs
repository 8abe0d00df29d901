//! # monod-graph
//!
//! Data model for biological interaction networks.
//!
//! - [`Entity`] / [`EntityKind`]: arena nodes, one of molecule, reaction,
//!   complex or pathway
//! - [`RegulationType`]: Positive / Negative / Requirement response
//!   curves for reaction regulators
//! - [`Network`]: flat arena with dense [`EntityId`] indices, wiring
//!   API and the output-slot protocol
//!
//! Activities live in `[ACTIVITY_MIN, ACTIVITY_MAX]`; NaN marks "no
//! data" and flows through aggregation silently. The propagation math
//! itself lives in the sibling `monod-propagate` crate.

pub mod error;
pub mod model;
pub mod network;

mod display;

pub use error::NetworkError;
pub use model::{
    cap, Entity, EntityId, EntityKind, Members, RegulationType, ACTIVITY_MAX, ACTIVITY_MIN,
};
pub use network::{KindCounts, Network};
