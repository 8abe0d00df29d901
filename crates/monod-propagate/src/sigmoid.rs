//! Catalytic and regulatory response curves.
//!
//! Modifier influence is always a logistic sigmoid of the modifier's
//! activity `x`, so no single catalyst or regulator can blow a reaction
//! up unboundedly or flip its sign:
//!
//! | Role        | Factor         | Range  | At x = 0 |
//! |-------------|----------------|--------|----------|
//! | Catalyst    | `2/(1+e^(-x))` | (0, 2) | 1.0      |
//! | Positive    | `2/(1+e^(-x))` | (0, 2) | 1.0      |
//! | Negative    | `2/(1+e^(x))`  | (0, 2) | 1.0      |
//! | Requirement | `1/(1+e^(x))`  | (0, 1) | 0.5      |
//!
//! Factors multiply into a reaction's input bottleneck, so 1.0 is the
//! neutral element: a resting catalyst neither helps nor hurts.

use monod_graph::RegulationType;

/// Catalytic factor for a catalyst with activity `x`.
///
/// `2/(1+e^(-x))` saturates toward 2 as `x` grows and toward 0 as `x`
/// falls, crossing 1 at `x = 0`.
#[inline]
pub fn catalyst_factor(x: f64) -> f64 {
    2.0 / (1.0 + (-x).exp())
}

/// Regulatory factor for a regulator with activity `x`, selected by its
/// [`RegulationType`].
#[inline]
pub fn regulator_factor(regulation: RegulationType, x: f64) -> f64 {
    match regulation {
        RegulationType::Positive => 2.0 / (1.0 + (-x).exp()),
        RegulationType::Negative => 2.0 / (1.0 + x.exp()),
        RegulationType::Requirement => 1.0 / (1.0 + x.exp()),
    }
}
