//! Flat arena of entities plus the wiring and output-slot protocol.
//!
//! A [`Network`] owns every entity of one interaction network. Callers
//! build it in two phases: allocate nodes (`add_molecule` and friends),
//! then wire edges (`add_input`, `add_member`, ...). Wiring is validated
//! fail-fast; evaluation assumes every referenced id exists.

use crate::error::NetworkError;
use crate::model::{
    cap, Entity, EntityId, EntityKind, Members, RegulationType, ACTIVITY_MAX, ACTIVITY_MIN,
};

/// Entity counts broken down by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub molecules: usize,
    pub reactions: usize,
    pub complexes: usize,
    pub pathways: usize,
}

impl KindCounts {
    pub fn total(&self) -> usize {
        self.molecules + self.reactions + self.complexes + self.pathways
    }
}

/// Arena holding every entity of one interaction network.
///
/// Entities are addressed by dense [`EntityId`] indices. The arena only
/// grows: nothing is removed during a run, so ids stay valid for the
/// network's lifetime. Structure is fixed once wired; evaluation passes
/// write only the per-entity output slots, always through [`set_output`]
/// so the activity cap is applied in exactly one place.
///
/// [`set_output`]: Network::set_output
#[derive(Debug, Clone, Default)]
pub struct Network {
    entities: Vec<Entity>,
}

impl Network {
    // ── Construction ──

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
        }
    }

    fn alloc(&mut self, name: impl Into<String>, kind: EntityKind) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(Entity::new(id, name, kind));
        id
    }

    /// Add a primitive species. Molecules have no dependencies; their
    /// activity comes from [`set_fixed`](Network::set_fixed) or
    /// [`set_output`](Network::set_output), or stays "no data".
    pub fn add_molecule(&mut self, name: impl Into<String>) -> EntityId {
        self.alloc(name, EntityKind::Molecule)
    }

    /// Add a reaction with empty input, catalyst and regulator lists.
    pub fn add_reaction(&mut self, name: impl Into<String>) -> EntityId {
        self.alloc(
            name,
            EntityKind::Reaction {
                inputs: Vec::new(),
                catalysts: Vec::new(),
                regulators: Vec::new(),
            },
        )
    }

    /// Add a complex with no members yet.
    pub fn add_complex(&mut self, name: impl Into<String>) -> EntityId {
        self.alloc(
            name,
            EntityKind::Complex {
                members: Members::new(),
            },
        )
    }

    /// Add a pathway with no events yet.
    pub fn add_pathway(&mut self, name: impl Into<String>) -> EntityId {
        self.alloc(
            name,
            EntityKind::Pathway {
                events: Members::new(),
                weight: f64::NAN,
            },
        )
    }

    // ── Wiring ──
    //
    // Every wiring call validates both endpoints before touching the
    // target. Self-edges are legal: cycles are broken at evaluation time
    // by the visited set, not forbidden at build time.

    /// Wire `input` as an input of the reaction `reaction`.
    ///
    /// Inputs form a set: wiring the same input twice is a no-op. Returns
    /// `true` when the edge is new.
    pub fn add_input(
        &mut self,
        reaction: EntityId,
        input: EntityId,
    ) -> Result<bool, NetworkError> {
        self.entity(input)?;
        let entity = self.entity_mut(reaction)?;
        match &mut entity.kind {
            EntityKind::Reaction { inputs, .. } => {
                if inputs.contains(&input) {
                    Ok(false)
                } else {
                    inputs.push(input);
                    Ok(true)
                }
            }
            other => Err(NetworkError::WrongKind {
                id: reaction,
                expected: "reaction",
                got: other.label(),
            }),
        }
    }

    /// Wire `catalyst` as a catalyst of the reaction `reaction`.
    ///
    /// Catalysts form a set: wiring the same catalyst twice is a no-op.
    /// Returns `true` when the edge is new.
    pub fn add_catalyst(
        &mut self,
        reaction: EntityId,
        catalyst: EntityId,
    ) -> Result<bool, NetworkError> {
        self.entity(catalyst)?;
        let entity = self.entity_mut(reaction)?;
        match &mut entity.kind {
            EntityKind::Reaction { catalysts, .. } => {
                if catalysts.contains(&catalyst) {
                    Ok(false)
                } else {
                    catalysts.push(catalyst);
                    Ok(true)
                }
            }
            other => Err(NetworkError::WrongKind {
                id: reaction,
                expected: "reaction",
                got: other.label(),
            }),
        }
    }

    /// Wire `regulator` as a regulator of the reaction `reaction`.
    ///
    /// At most one regulation per (reaction, regulator) pair: wiring an
    /// existing regulator again replaces its regulation type.
    pub fn set_regulator(
        &mut self,
        reaction: EntityId,
        regulator: EntityId,
        regulation: RegulationType,
    ) -> Result<(), NetworkError> {
        self.entity(regulator)?;
        let entity = self.entity_mut(reaction)?;
        match &mut entity.kind {
            EntityKind::Reaction { regulators, .. } => {
                if let Some(entry) = regulators.iter_mut().find(|(id, _)| *id == regulator) {
                    entry.1 = regulation;
                } else {
                    regulators.push((regulator, regulation));
                }
                Ok(())
            }
            other => Err(NetworkError::WrongKind {
                id: reaction,
                expected: "reaction",
                got: other.label(),
            }),
        }
    }

    /// Add `member` to the complex `complex`, bumping its multiplicity
    /// when already present. Returns the multiplicity after the add.
    pub fn add_member(
        &mut self,
        complex: EntityId,
        member: EntityId,
    ) -> Result<u32, NetworkError> {
        self.entity(member)?;
        let entity = self.entity_mut(complex)?;
        match &mut entity.kind {
            EntityKind::Complex { members } => Ok(members.add(member)),
            other => Err(NetworkError::WrongKind {
                id: complex,
                expected: "complex",
                got: other.label(),
            }),
        }
    }

    /// Add `event` to the pathway `pathway`, bumping its multiplicity
    /// when already present. Returns the multiplicity after the add.
    pub fn add_event(
        &mut self,
        pathway: EntityId,
        event: EntityId,
    ) -> Result<u32, NetworkError> {
        self.entity(event)?;
        let entity = self.entity_mut(pathway)?;
        match &mut entity.kind {
            EntityKind::Pathway { events, .. } => Ok(events.add(event)),
            other => Err(NetworkError::WrongKind {
                id: pathway,
                expected: "pathway",
                got: other.label(),
            }),
        }
    }

    // ── Fixed values and output slots ──

    /// Fix an observed value for `id`, overriding computation.
    ///
    /// The value must be finite and inside the activity range; anything
    /// else is rejected so bad measurements cannot masquerade as data.
    /// The output slot is seeded immediately, which is what makes fixed
    /// entities short-circuit during evaluation.
    pub fn set_fixed(&mut self, id: EntityId, value: f64) -> Result<(), NetworkError> {
        if !value.is_finite() || !(ACTIVITY_MIN..=ACTIVITY_MAX).contains(&value) {
            return Err(NetworkError::FixedOutOfRange(value));
        }
        let entity = self.entity_mut(id)?;
        entity.fixed = Some(value);
        entity.output = value;
        Ok(())
    }

    /// Remove a fixed override, clearing the output slot back to "no
    /// data" so the next pass recomputes the entity.
    pub fn clear_fixed(&mut self, id: EntityId) -> Result<(), NetworkError> {
        let entity = self.entity_mut(id)?;
        entity.fixed = None;
        entity.output = f64::NAN;
        Ok(())
    }

    /// Write `value` into the output slot of `id`, capped into the
    /// activity range. NaN clears the slot back to "no data".
    ///
    /// This is the single write path for results: evaluation stores
    /// through here, and callers can use it to pre-seed activities before
    /// a pass. Fixed entities reject the write; their slot is pinned to
    /// the override until [`clear_fixed`](Network::clear_fixed).
    pub fn set_output(&mut self, id: EntityId, value: f64) -> Result<(), NetworkError> {
        let entity = self.entity_mut(id)?;
        if entity.fixed.is_some() {
            return Err(NetworkError::FixedEntity(id));
        }
        entity.output = cap(value);
        Ok(())
    }

    /// Fold `value` into the accumulator of the pathway `id`.
    ///
    /// The first contribution defines the accumulator; later ones add to
    /// it. Starting from NaN rather than zero keeps "no contributions"
    /// distinct from "contributions summing to zero".
    pub fn add_weight(&mut self, id: EntityId, value: f64) -> Result<(), NetworkError> {
        let entity = self.entity_mut(id)?;
        match &mut entity.kind {
            EntityKind::Pathway { weight, .. } => {
                if weight.is_nan() {
                    *weight = value;
                } else {
                    *weight += value;
                }
                Ok(())
            }
            other => Err(NetworkError::WrongKind {
                id,
                expected: "pathway",
                got: other.label(),
            }),
        }
    }

    /// Current accumulator of the pathway `id`. NaN until the first
    /// [`add_weight`](Network::add_weight) of the pass.
    pub fn pathway_weight(&self, id: EntityId) -> Result<f64, NetworkError> {
        let entity = self.entity(id)?;
        match &entity.kind {
            EntityKind::Pathway { weight, .. } => Ok(*weight),
            other => Err(NetworkError::WrongKind {
                id,
                expected: "pathway",
                got: other.label(),
            }),
        }
    }

    /// Reset pass state across the whole arena: every non-fixed output
    /// slot back to NaN, fixed slots re-seeded with their override, all
    /// pathway accumulators cleared.
    pub fn reset_outputs(&mut self) {
        for entity in &mut self.entities {
            entity.output = entity.fixed.unwrap_or(f64::NAN);
            if let EntityKind::Pathway { weight, .. } = &mut entity.kind {
                *weight = f64::NAN;
            }
        }
    }

    // ── Queries ──

    /// Entity by id, or [`NetworkError::UnknownEntity`].
    pub fn entity(&self, id: EntityId) -> Result<&Entity, NetworkError> {
        self.entities
            .get(id.index())
            .ok_or(NetworkError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, NetworkError> {
        self.entities
            .get_mut(id.index())
            .ok_or(NetworkError::UnknownEntity(id))
    }

    /// Number of entities in the arena.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All ids, in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        (0..self.entities.len() as u32).map(EntityId)
    }

    /// All entities, in allocation order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    /// Arena composition by entity kind.
    pub fn kind_counts(&self) -> KindCounts {
        let mut counts = KindCounts::default();
        for entity in &self.entities {
            match entity.kind {
                EntityKind::Molecule => counts.molecules += 1,
                EntityKind::Reaction { .. } => counts.reactions += 1,
                EntityKind::Complex { .. } => counts.complexes += 1,
                EntityKind::Pathway { .. } => counts.pathways += 1,
            }
        }
        counts
    }

    /// Number of distinct dependencies of `id`: inputs plus catalysts
    /// plus regulators for a reaction, members for a complex, events for
    /// a pathway, zero for a molecule.
    pub fn degree_of(&self, id: EntityId) -> Result<usize, NetworkError> {
        let entity = self.entity(id)?;
        Ok(match &entity.kind {
            EntityKind::Molecule => 0,
            EntityKind::Reaction {
                inputs,
                catalysts,
                regulators,
            } => inputs.len() + catalysts.len() + regulators.len(),
            EntityKind::Complex { members } => members.len(),
            EntityKind::Pathway { events, .. } => events.len(),
        })
    }
}
