//! The evaluation pass: depth-first, memoized, cycle-tolerant.
//!
//! [`PropagationEngine::evaluate`] recurses through dependencies from the
//! given roots. One visited bitmap is shared by the whole batch, so every
//! entity is computed at most once per pass, and edges that lead back
//! into a node still being computed short-circuit to whatever its slot
//! holds at that moment (NaN for an in-progress node). Termination is
//! therefore guaranteed on arbitrary cyclic networks.
//!
//! Combination rules per entity kind:
//!
//! - molecule: externally supplied (fixed or seeded) or "no data"
//! - reaction: `min(inputs) * prod(catalyst factors) * prod(regulator factors)`
//! - complex: `sqrt(sum of squared member outputs / summed multiplicities)`
//! - pathway: capped sum of event outputs
//!
//! Dependencies without data are skipped by every rule rather than
//! poisoning the aggregate; a node with no usable dependency data at all
//! ends up "no data" itself.

use std::time::Instant;

use roaring::RoaringBitmap;
use serde::Serialize;
use tracing::{debug, trace};

use monod_graph::{cap, EntityId, EntityKind, Members, Network, RegulationType};

use crate::error::PropagateError;
use crate::sigmoid::{catalyst_factor, regulator_factor};
use crate::trace::{NoopTrace, TraceEvent, TraceSink};

// ─────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────

/// Tuning knobs for an evaluation pass.
#[derive(Debug, Clone)]
pub struct PropagationConfig {
    /// Clear every non-fixed output slot (and pathway accumulator) before
    /// the pass, re-seeding fixed values. Off by default: callers that
    /// pre-seed activities between passes manage resets themselves.
    pub reset_before_pass: bool,
    /// Emit a [`TraceEvent::Enter`] for every first visit. Noisy on large
    /// networks; cycle, cached and computed events are always emitted.
    pub trace_visits: bool,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            reset_before_pass: false,
            trace_visits: true,
        }
    }
}

// ─────────────────────────────────────────────
// Report
// ─────────────────────────────────────────────

/// Outcome of one evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct PropagationReport {
    /// Requested roots with their resulting activity, in request order.
    /// NaN means the root rolled up to "no data".
    pub activities: Vec<(EntityId, f64)>,
    /// Distinct entities the pass recursed into (memo set cardinality).
    /// Fixed and pre-seeded entities answer without being visited.
    pub visited: u64,
    /// Entities whose output slot was written by this pass.
    pub computed: usize,
    /// Dependency edges that led back into a node still being computed.
    pub cycles_hit: usize,
    /// Wall-clock duration of the whole batch.
    pub duration_ms: u64,
}

impl PropagationReport {
    /// Activity of `id`, if it was one of the requested roots.
    pub fn activity_of(&self, id: EntityId) -> Option<f64> {
        self.activities
            .iter()
            .find(|(root, _)| *root == id)
            .map(|(_, value)| *value)
    }

    /// Roots whose activity came out defined (non-NaN).
    pub fn defined_roots(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.activities
            .iter()
            .filter(|(_, value)| !value.is_nan())
            .map(|(root, _)| *root)
    }
}

// ─────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────

/// Activity propagation engine.
///
/// Stateless between calls: build once, evaluate as many networks and
/// passes as needed. All pass state (visited set, counters) lives on the
/// stack of a single `evaluate` call.
#[derive(Debug, Clone, Default)]
pub struct PropagationEngine {
    pub config: PropagationConfig,
}

impl PropagationEngine {
    pub fn new(config: PropagationConfig) -> Self {
        Self { config }
    }

    /// Evaluate `roots` over `net`, discarding trace events.
    ///
    /// Every root is resolved against one shared visited set, so entities
    /// reachable from several roots are computed once and reused. Results
    /// are written into the entities' output slots; the returned report
    /// carries the per-root activities plus pass statistics.
    pub fn evaluate(
        &self,
        net: &mut Network,
        roots: &[EntityId],
    ) -> Result<PropagationReport, PropagateError> {
        self.evaluate_with_trace(net, roots, &mut NoopTrace)
    }

    /// Like [`evaluate`](Self::evaluate), reporting each step to `sink`.
    pub fn evaluate_with_trace(
        &self,
        net: &mut Network,
        roots: &[EntityId],
        sink: &mut dyn TraceSink,
    ) -> Result<PropagationReport, PropagateError> {
        let start = Instant::now();

        // Roots are caller input; reject unknowns before touching state.
        for &root in roots {
            net.entity(root)?;
        }
        if self.config.reset_before_pass {
            net.reset_outputs();
        }

        let mut pass = Pass {
            net,
            sink,
            trace_visits: self.config.trace_visits,
            visited: RoaringBitmap::new(),
            in_flight: RoaringBitmap::new(),
            computed: 0,
            cycles_hit: 0,
        };

        let mut activities = Vec::with_capacity(roots.len());
        for &root in roots {
            let value = pass.compute(root, 0)?;
            activities.push((root, value));
        }

        debug!(
            roots = roots.len(),
            visited = pass.visited.len(),
            computed = pass.computed,
            cycles_hit = pass.cycles_hit,
            "propagation pass finished"
        );

        Ok(PropagationReport {
            activities,
            visited: pass.visited.len(),
            computed: pass.computed,
            cycles_hit: pass.cycles_hit,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

// ─────────────────────────────────────────────
// Pass
// ─────────────────────────────────────────────

/// State of one evaluation pass over one network.
struct Pass<'a> {
    net: &'a mut Network,
    sink: &'a mut dyn TraceSink,
    trace_visits: bool,
    /// Entities this pass has started computing. Shared across all roots
    /// of the batch; this set is both the memo cache and the cycle guard.
    visited: RoaringBitmap,
    /// Subset of `visited` currently on the recursion stack. Only used to
    /// tell true back-edges apart in the trace and counters; control flow
    /// decides on `visited` alone.
    in_flight: RoaringBitmap,
    computed: usize,
    cycles_hit: usize,
}

impl Pass<'_> {
    /// Resolve the activity of `id`, recursing into its dependencies.
    fn compute(&mut self, id: EntityId, depth: usize) -> Result<f64, PropagateError> {
        let entity = self.net.entity(id)?;

        // First caller wins: a node already seen this pass answers with
        // whatever its slot holds, defined or not.
        if self.visited.contains(id.0) {
            let output = entity.output();
            if self.in_flight.contains(id.0) {
                self.cycles_hit += 1;
                self.sink.record(TraceEvent::CycleHit { id });
                trace!(%id, "dependency cycle, using in-progress slot");
            }
            return Ok(output);
        }

        // Fixed and pre-seeded slots satisfy the caller without recursing
        // and without touching the visited set.
        if entity.has_output() {
            let output = entity.output();
            self.sink.record(TraceEvent::Cached { id, output });
            return Ok(output);
        }

        self.visited.insert(id.0);
        self.in_flight.insert(id.0);
        if self.trace_visits {
            self.sink.record(TraceEvent::Enter { id, depth });
        }

        let kind = entity.kind.clone();
        let value = match kind {
            // Primitives have nothing to recurse into; unseeded means
            // "no data".
            EntityKind::Molecule => f64::NAN,
            EntityKind::Reaction {
                inputs,
                catalysts,
                regulators,
            } => self.compute_reaction(depth, &inputs, &catalysts, &regulators)?,
            EntityKind::Complex { members } => self.compute_complex(depth, &members)?,
            EntityKind::Pathway { events, .. } => self.compute_pathway(id, depth, &events)?,
        };

        self.net.set_output(id, value)?;
        self.in_flight.remove(id.0);
        self.computed += 1;

        // Report the slot as stored, after capping.
        let stored = self.net.entity(id)?.output();
        self.sink.record(TraceEvent::Computed { id, output: stored });
        trace!(%id, output = stored, "stored");
        Ok(stored)
    }

    /// `min(inputs) * prod(catalyst factors) * prod(regulator factors)`.
    fn compute_reaction(
        &mut self,
        depth: usize,
        inputs: &[EntityId],
        catalysts: &[EntityId],
        regulators: &[(EntityId, RegulationType)],
    ) -> Result<f64, PropagateError> {
        // Force every dependency first; only the slot reads below matter.
        for &dep in inputs {
            self.compute(dep, depth + 1)?;
        }
        for &dep in catalysts {
            self.compute(dep, depth + 1)?;
        }
        for &(dep, _) in regulators {
            self.compute(dep, depth + 1)?;
        }

        // Bottleneck: the weakest input with data limits the reaction.
        let mut input_min = f64::INFINITY;
        for &dep in inputs {
            let entity = self.net.entity(dep)?;
            if entity.has_output() {
                input_min = input_min.min(entity.output());
            }
        }
        if input_min.is_infinite() {
            // No usable input signal; covers the empty input set too.
            return Ok(f64::NAN);
        }

        // Modifiers multiply in; absent data stays neutral at 1.
        let mut catalysis = 1.0;
        for &dep in catalysts {
            let entity = self.net.entity(dep)?;
            if entity.has_output() {
                catalysis *= catalyst_factor(entity.output());
            }
        }
        let mut regulation = 1.0;
        for &(dep, kind) in regulators {
            let entity = self.net.entity(dep)?;
            if entity.has_output() {
                regulation *= regulator_factor(kind, entity.output());
            }
        }

        Ok(input_min * catalysis * regulation)
    }

    /// `sqrt(sum of squared outputs / summed multiplicities)` over members
    /// with data.
    ///
    /// Each distinct member's square enters the numerator once; its
    /// multiplicity counts only toward the divisor. All-singleton members
    /// make this the plain RMS; a repeated member shrinks the aggregate
    /// instead of reinforcing it.
    fn compute_complex(
        &mut self,
        depth: usize,
        members: &Members,
    ) -> Result<f64, PropagateError> {
        for dep in members.ids() {
            self.compute(dep, depth + 1)?;
        }

        let mut sum = 0.0;
        let mut count = 0u32;
        for (dep, multiplicity) in members.iter() {
            let entity = self.net.entity(dep)?;
            if entity.has_output() {
                let output = entity.output();
                sum += output * output;
                count += multiplicity;
            }
        }
        if count == 0 {
            return Ok(f64::NAN);
        }
        Ok(cap((sum / f64::from(count)).sqrt()))
    }

    /// Capped sum of event outputs, folded through the pathway's own
    /// accumulator. Each distinct event contributes once regardless of
    /// its multiplicity.
    fn compute_pathway(
        &mut self,
        id: EntityId,
        depth: usize,
        events: &Members,
    ) -> Result<f64, PropagateError> {
        for dep in events.ids() {
            self.compute(dep, depth + 1)?;
            let entity = self.net.entity(dep)?;
            if entity.has_output() {
                let output = entity.output();
                self.net.add_weight(id, output)?;
            }
        }
        Ok(cap(self.net.pathway_weight(id)?))
    }
}
