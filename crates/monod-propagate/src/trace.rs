//! Observation channel for evaluation passes.
//!
//! A pass reports its steps to a [`TraceSink`] passed in explicitly;
//! there is no process-wide verbosity flag. [`NoopTrace`] discards
//! everything and is what [`evaluate`] uses; tests and tooling hand
//! [`evaluate_with_trace`] a [`BufferTrace`] and inspect the recording.
//!
//! [`evaluate`]: crate::PropagationEngine::evaluate
//! [`evaluate_with_trace`]: crate::PropagationEngine::evaluate_with_trace

use serde::Serialize;

use monod_graph::EntityId;

/// One observable step of an evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TraceEvent {
    /// A node was entered for the first time this pass. `depth` is the
    /// recursion depth at which it was reached.
    Enter { id: EntityId, depth: usize },
    /// A dependency edge led back into a node still being computed.
    /// Recursion stopped there and its current (undefined) slot was used.
    CycleHit { id: EntityId },
    /// The node's slot already held a value (fixed or pre-seeded), so it
    /// was returned without recursing.
    Cached { id: EntityId, output: f64 },
    /// A value was stored into the node's slot.
    Computed { id: EntityId, output: f64 },
}

/// Receives [`TraceEvent`]s while a pass runs.
pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

/// Discards every event. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl TraceSink for NoopTrace {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Buffers events in memory for later inspection.
#[derive(Debug, Default, Clone)]
pub struct BufferTrace {
    pub events: Vec<TraceEvent>,
}

impl BufferTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// How many times `id` had a value stored this pass. Anything above
    /// one means the single-computation guarantee broke.
    pub fn computed_count(&self, id: EntityId) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Computed { id: computed, .. } if *computed == id))
            .count()
    }
}

impl TraceSink for BufferTrace {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
