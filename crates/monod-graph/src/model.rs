//! Core data model: entity identities, node variants and the activity range.
//!
//! Every node of an interaction network is an [`Entity`] with one of four
//! [`EntityKind`] variants. Structure is wired once through
//! [`Network`](crate::Network); evaluation passes only ever write the
//! per-entity output slot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

// ─────────────────────────────────────────────
// Activity range
// ─────────────────────────────────────────────

/// Lower bound of the valid activity range.
pub const ACTIVITY_MIN: f64 = 0.0;

/// Upper bound of the valid activity range.
pub const ACTIVITY_MAX: f64 = 10.0;

/// Clamp an activity into `[ACTIVITY_MIN, ACTIVITY_MAX]`.
///
/// NaN passes through (`f64::clamp` propagates it), so "no data" survives
/// the cap instead of being coerced into a number.
#[inline]
pub fn cap(x: f64) -> f64 {
    x.clamp(ACTIVITY_MIN, ACTIVITY_MAX)
}

// ─────────────────────────────────────────────
// EntityId
// ─────────────────────────────────────────────

/// Stable index of an entity inside its owning [`Network`](crate::Network).
///
/// Ids are assigned densely from zero in insertion order and never reused.
/// The arena only grows during a run, so an `EntityId` stays valid for the
/// lifetime of its network.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

// ─────────────────────────────────────────────
// RegulationType
// ─────────────────────────────────────────────

/// How a regulator modulates a reaction's output.
///
/// The variant selects the response curve applied to the regulator's
/// activity `x` (implemented in the propagation crate):
///
/// - `Positive` applies `2/(1+e^(-x))`, range (0, 2): boosts above 1 for
///   active regulators, fades toward 0 for inactive ones.
/// - `Negative` applies `2/(1+e^(x))`, range (0, 2): the mirror image,
///   dampens as the regulator becomes more active.
/// - `Requirement` applies `1/(1+e^(x))`, range (0, 1): can only
///   attenuate, a hard dependency that never amplifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegulationType {
    Positive,
    Negative,
    Requirement,
}

impl RegulationType {
    /// Canonical name, matching what [`FromStr`] accepts.
    pub fn as_str(self) -> &'static str {
        match self {
            RegulationType::Positive => "Positive",
            RegulationType::Negative => "Negative",
            RegulationType::Requirement => "Requirement",
        }
    }
}

impl FromStr for RegulationType {
    type Err = NetworkError;

    /// Parse a canonical variant name. Unknown names are a construction
    /// error: regulation types come from curated network definitions and a
    /// typo must surface immediately.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(RegulationType::Positive),
            "Negative" => Ok(RegulationType::Negative),
            "Requirement" => Ok(RegulationType::Requirement),
            other => Err(NetworkError::UnknownRegulationType(other.to_string())),
        }
    }
}

impl fmt::Display for RegulationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────
// Members
// ─────────────────────────────────────────────

/// Insertion-ordered multiset of entity references.
///
/// Backs complex membership and pathway events: entries are unique, and
/// adding an entity that is already present bumps its multiplicity instead
/// of duplicating the entry. Iteration yields each distinct entity once,
/// in insertion order, with its multiplicity alongside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Members {
    entries: Vec<(EntityId, u32)>,
}

impl Members {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`, incrementing its multiplicity when already present.
    /// Returns the multiplicity after the add.
    pub fn add(&mut self, id: EntityId) -> u32 {
        if let Some(entry) = self.entries.iter_mut().find(|(e, _)| *e == id) {
            entry.1 += 1;
            entry.1
        } else {
            self.entries.push((id, 1));
            1
        }
    }

    /// Number of distinct entities. A double-added entity counts once.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of multiplicities over all entries.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, m)| m).sum()
    }

    /// Multiplicity of `id`, zero when absent.
    pub fn multiplicity(&self, id: EntityId) -> u32 {
        self.entries
            .iter()
            .find(|(e, _)| *e == id)
            .map(|(_, m)| *m)
            .unwrap_or(0)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.iter().any(|(e, _)| *e == id)
    }

    /// `(id, multiplicity)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// Distinct entity ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().map(|(e, _)| *e)
    }
}

// ─────────────────────────────────────────────
// EntityKind
// ─────────────────────────────────────────────

/// The four node variants of an interaction network.
///
/// A closed set: propagation dispatches on the variant, so every node kind
/// an evaluation pass can encounter is enumerated here.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    /// Primitive species (protein, metabolite, transcript). Carries no
    /// dependencies; its activity is externally supplied or absent.
    Molecule,

    /// Transformation combining inputs (bottleneck), catalysts
    /// (multiplicative boost) and typed regulators (modulation).
    Reaction {
        inputs: Vec<EntityId>,
        catalysts: Vec<EntityId>,
        regulators: Vec<(EntityId, RegulationType)>,
    },

    /// Molecular assembly; activity is the root of the summed squared
    /// member outputs over the summed multiplicities.
    Complex { members: Members },

    /// Collection of events rolled up into a capped weighted sum.
    Pathway {
        events: Members,
        /// Running accumulator for the current pass. NaN until the first
        /// contribution arrives.
        weight: f64,
    },
}

impl EntityKind {
    /// Short lowercase label used by dumps and log events.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Molecule => "molecule",
            EntityKind::Reaction { .. } => "reaction",
            EntityKind::Complex { .. } => "complex",
            EntityKind::Pathway { .. } => "pathway",
        }
    }
}

// ─────────────────────────────────────────────
// Entity
// ─────────────────────────────────────────────

/// One node of an interaction network.
///
/// Structure (`kind` and its edge lists) is read-only during evaluation;
/// only the output slot (and a pathway's accumulator) is written, at most
/// once per pass, by whichever traversal reaches the node first.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Arena index, stable for the life of the network.
    pub id: EntityId,
    /// Curated display name. Dumps and logs only; evaluation never looks
    /// an entity up by name.
    pub name: String,
    /// Variant payload.
    pub kind: EntityKind,
    /// Observed value overriding computation, if any.
    pub(crate) fixed: Option<f64>,
    /// Result slot. NaN means "not computed" or "no data".
    pub(crate) output: f64,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            fixed: None,
            output: f64::NAN,
        }
    }

    /// True iff the result slot holds a defined (non-NaN) value.
    #[inline]
    pub fn has_output(&self) -> bool {
        !self.output.is_nan()
    }

    /// Raw result slot. NaN until computed; check
    /// [`has_output`](Self::has_output) before treating it as data.
    #[inline]
    pub fn output(&self) -> f64 {
        self.output
    }

    /// True iff an observed value overrides computation for this entity.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// The observed override, if any.
    #[inline]
    pub fn fixed(&self) -> Option<f64> {
        self.fixed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_clamps_into_range() {
        assert_eq!(cap(-3.0), 0.0);
        assert_eq!(cap(0.0), 0.0);
        assert_eq!(cap(4.2), 4.2);
        assert_eq!(cap(10.0), 10.0);
        assert_eq!(cap(17.5), 10.0);
    }

    #[test]
    fn cap_passes_nan_through() {
        assert!(cap(f64::NAN).is_nan());
    }

    #[test]
    fn entity_id_displays_with_prefix() {
        assert_eq!(EntityId(0).to_string(), "E0");
        assert_eq!(EntityId(41).to_string(), "E41");
    }

    #[test]
    fn regulation_type_parses_canonical_names() {
        assert_eq!(
            "Positive".parse::<RegulationType>().unwrap(),
            RegulationType::Positive
        );
        assert_eq!(
            "Negative".parse::<RegulationType>().unwrap(),
            RegulationType::Negative
        );
        assert_eq!(
            "Requirement".parse::<RegulationType>().unwrap(),
            RegulationType::Requirement
        );
    }

    #[test]
    fn regulation_type_rejects_unknown_names() {
        let err = "Inhibition".parse::<RegulationType>().unwrap_err();
        match err {
            NetworkError::UnknownRegulationType(name) => assert_eq!(name, "Inhibition"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn regulation_type_display_roundtrips() {
        for kind in [
            RegulationType::Positive,
            RegulationType::Negative,
            RegulationType::Requirement,
        ] {
            assert_eq!(kind.to_string().parse::<RegulationType>().unwrap(), kind);
        }
    }

    #[test]
    fn members_deduplicates_and_counts() {
        let mut members = Members::new();
        assert_eq!(members.add(EntityId(3)), 1);
        assert_eq!(members.add(EntityId(5)), 1);
        assert_eq!(members.add(EntityId(3)), 2);

        assert_eq!(members.len(), 2);
        assert_eq!(members.total(), 3);
        assert_eq!(members.multiplicity(EntityId(3)), 2);
        assert_eq!(members.multiplicity(EntityId(5)), 1);
        assert_eq!(members.multiplicity(EntityId(9)), 0);
        assert!(members.contains(EntityId(5)));
        assert!(!members.contains(EntityId(9)));
    }

    #[test]
    fn members_iterates_in_insertion_order() {
        let mut members = Members::new();
        members.add(EntityId(9));
        members.add(EntityId(1));
        members.add(EntityId(9));
        members.add(EntityId(4));

        let ids: Vec<EntityId> = members.ids().collect();
        assert_eq!(ids, vec![EntityId(9), EntityId(1), EntityId(4)]);

        let pairs: Vec<(EntityId, u32)> = members.iter().collect();
        assert_eq!(pairs[0], (EntityId(9), 2));
    }

    #[test]
    fn entity_starts_without_output() {
        let entity = Entity::new(EntityId(0), "glucose", EntityKind::Molecule);
        assert!(!entity.has_output());
        assert!(entity.output().is_nan());
        assert!(!entity.is_fixed());
        assert_eq!(entity.kind.label(), "molecule");
    }

    #[test]
    fn serde_roundtrip_for_id_and_regulation() {
        let id = EntityId(17);
        let json = serde_json::to_string(&id).unwrap();
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let reg = RegulationType::Requirement;
        let json = serde_json::to_string(&reg).unwrap();
        let back: RegulationType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reg);
    }
}
