//! # monod-propagate
//!
//! Cycle-safe activity propagation over [`monod_graph`] interaction
//! networks.
//!
//! Given a wired [`Network`](monod_graph::Network) and a batch of root
//! entities, [`PropagationEngine`] computes a scalar activity for every
//! reachable node by depth-first recursion, memoized per pass so each
//! node is computed at most once. Cycles terminate by construction:
//! a dependency edge back into a node still being computed reads that
//! node's current slot instead of recursing.
//!
//! ## Crate structure
//!
//! | Module      | Responsibility                                    |
//! |-------------|---------------------------------------------------|
//! | [`sigmoid`] | catalytic and regulatory response curves          |
//! | [`engine`]  | the evaluation pass, its config and report        |
//! | [`trace`]   | per-pass observation channel ([`TraceSink`])      |
//! | [`error`]   | [`PropagateError`]                                |
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use monod_graph::Network;
//! use monod_propagate::PropagationEngine;
//!
//! let mut net = Network::new();
//! let glucose = net.add_molecule("glucose");
//! let hexokinase = net.add_reaction("hexokinase");
//! net.add_input(hexokinase, glucose)?;
//! net.set_fixed(glucose, 0.8)?;
//!
//! let engine = PropagationEngine::default();
//! let report = engine.evaluate(&mut net, &[hexokinase])?;
//! assert_eq!(report.activity_of(hexokinase), Some(0.8));
//! ```
//!
//! Activities are capped into the range `monod_graph` defines; NaN marks
//! "no data" and flows through every combination rule silently.

pub mod engine;
pub mod error;
pub mod sigmoid;
pub mod trace;

pub use engine::{PropagationConfig, PropagationEngine, PropagationReport};
pub use error::PropagateError;
pub use sigmoid::{catalyst_factor, regulator_factor};
pub use trace::{BufferTrace, NoopTrace, TraceEvent, TraceSink};
