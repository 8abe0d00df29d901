//! End-to-end propagation over a small metabolic network.
//!
//! Wires a glycolysis-flavored graph through the public API only:
//! fixed substrate levels, a catalyzed and regulated reaction chain, a
//! homotetramer complex and a pathway roll-up, then checks activities,
//! pass statistics, trace events and the dump output.

use monod_graph::{EntityId, Network, RegulationType};
use monod_propagate::{
    catalyst_factor, regulator_factor, BufferTrace, PropagationConfig, PropagationEngine,
};

struct Glycolysis {
    net: Network,
    glucose: EntityId,
    pfk_enzyme: EntityId,
    hexokinase: EntityId,
    pfk: EntityId,
    tetramer: EntityId,
    pathway: EntityId,
}

fn build() -> Glycolysis {
    let mut net = Network::new();

    let glucose = net.add_molecule("glucose");
    let atp = net.add_molecule("ATP");
    let citrate = net.add_molecule("citrate");
    let pfk_enzyme = net.add_molecule("PFK-1");
    let subunit = net.add_molecule("PFK subunit");

    net.set_fixed(glucose, 0.8).unwrap();
    net.set_fixed(atp, 1.2).unwrap();
    net.set_fixed(citrate, 2.0).unwrap();
    net.set_fixed(subunit, 0.6).unwrap();

    let hexokinase = net.add_reaction("hexokinase");
    net.add_input(hexokinase, glucose).unwrap();
    net.add_input(hexokinase, atp).unwrap();

    let pfk = net.add_reaction("phosphofructokinase");
    net.add_input(pfk, hexokinase).unwrap();
    net.add_input(pfk, atp).unwrap();
    net.add_catalyst(pfk, pfk_enzyme).unwrap();
    net.set_regulator(pfk, citrate, RegulationType::Negative).unwrap();

    let tetramer = net.add_complex("PFK tetramer");
    for _ in 0..4 {
        net.add_member(tetramer, subunit).unwrap();
    }

    let pathway = net.add_pathway("glycolysis");
    net.add_event(pathway, hexokinase).unwrap();
    net.add_event(pathway, pfk).unwrap();

    Glycolysis {
        net,
        glucose,
        pfk_enzyme,
        hexokinase,
        pfk,
        tetramer,
        pathway,
    }
}

fn assert_close(got: f64, expected: f64) {
    assert!(
        (got - expected).abs() < 1e-9,
        "got {got}, expected {expected}"
    );
}

#[test]
fn activities_roll_up_through_the_network() {
    let mut g = build();
    let engine = PropagationEngine::default();
    let report = engine
        .evaluate(&mut g.net, &[g.pathway, g.tetramer])
        .unwrap();

    // min(0.8, 1.2), no modifiers.
    let hexokinase = 0.8;
    // min(hexokinase, 1.2), silent catalyst, citrate dampening.
    let pfk = hexokinase * regulator_factor(RegulationType::Negative, 2.0);
    let pathway = hexokinase + pfk;

    assert_close(g.net.entity(g.hexokinase).unwrap().output(), hexokinase);
    assert_close(g.net.entity(g.pfk).unwrap().output(), pfk);
    assert_close(report.activity_of(g.pathway).unwrap(), pathway);

    // One distinct subunit: its square enters once, all four copies land
    // in the divisor. sqrt(0.36 / 4) = 0.3.
    assert_close(report.activity_of(g.tetramer).unwrap(), 0.3);

    // hexokinase, pfk, PFK-1 (no data), the pathway and the complex were
    // entered; all fixed molecules answered from their slots.
    assert_eq!(report.visited, 5);
    assert_eq!(report.computed, 5);
    assert_eq!(report.cycles_hit, 0);
}

#[test]
fn shared_reaction_is_computed_once_per_batch() {
    let mut g = build();
    let mut sink = BufferTrace::new();
    let report = PropagationEngine::default()
        .evaluate_with_trace(&mut g.net, &[g.pathway, g.pfk], &mut sink)
        .unwrap();

    // hexokinase is both a pathway event and a pfk input.
    assert_eq!(sink.computed_count(g.hexokinase), 1);
    assert_eq!(sink.computed_count(g.pfk), 1);
    assert!(report.activity_of(g.pfk).unwrap() > 0.0);
}

#[test]
fn catalysts_engage_once_their_level_is_known() {
    let mut g = build();
    // Same network, but now the enzyme level is measured.
    g.net.set_fixed(g.pfk_enzyme, 1.0).unwrap();

    let report = PropagationEngine::default()
        .evaluate(&mut g.net, &[g.pfk])
        .unwrap();

    let expected = 0.8 * catalyst_factor(1.0) * regulator_factor(RegulationType::Negative, 2.0);
    assert_close(report.activity_of(g.pfk).unwrap(), expected);
}

#[test]
fn reset_picks_up_changed_measurements() {
    let mut g = build();
    let engine = PropagationEngine::new(PropagationConfig {
        reset_before_pass: true,
        ..PropagationConfig::default()
    });

    let first = engine.evaluate(&mut g.net, &[g.hexokinase]).unwrap();
    assert_close(first.activity_of(g.hexokinase).unwrap(), 0.8);

    // Glucose drops; the bottleneck follows on the next pass.
    g.net.set_fixed(g.glucose, 0.2).unwrap();
    let second = engine.evaluate(&mut g.net, &[g.hexokinase]).unwrap();
    assert_close(second.activity_of(g.hexokinase).unwrap(), 0.2);
}

#[test]
fn feedback_loop_settles_on_available_data() {
    let mut net = Network::new();
    let basal = net.add_molecule("basal signal");
    net.set_fixed(basal, 0.5).unwrap();

    // The kinase activates the complex it is a member of.
    let kinase = net.add_reaction("kinase");
    let assembly = net.add_complex("assembly");
    net.add_input(kinase, assembly).unwrap();
    net.add_member(assembly, basal).unwrap();
    net.add_member(assembly, kinase).unwrap();

    let report = PropagationEngine::default()
        .evaluate(&mut net, &[kinase])
        .unwrap();

    // The back-edge reads "no data"; the complex falls back to the basal
    // member alone: RMS(0.5) = 0.5, and the kinase bottleneck follows.
    assert_close(report.activity_of(kinase).unwrap(), 0.5);
    assert_eq!(report.cycles_hit, 1);
}

#[test]
fn dump_reflects_the_evaluated_state() {
    let mut g = build();
    PropagationEngine::default()
        .evaluate(&mut g.net, &[g.pathway])
        .unwrap();

    let dump = g.net.dump(g.pathway).unwrap();
    assert!(dump.starts_with("glycolysis [pathway"));
    assert!(dump.contains("event: hexokinase [reaction"));
    assert!(dump.contains("input: glucose [molecule E0] output=0.800 (fixed)"));
    // hexokinase appears under the pathway and again under pfk.
    assert!(dump.contains("(repeat)"));
    // Computed values show up, not placeholders.
    assert!(dump.contains("output=0.800\n") || dump.contains("output=0.800 "));
    assert!(!dump.lines().next().unwrap().contains("output=?"));
}
