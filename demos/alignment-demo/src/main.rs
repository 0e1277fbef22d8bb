//! Sentia end-to-end demonstration.
//!
//! Walks the two analysis engines over a small scenario: integrated
//! information of a weakly- vs strongly-coupled two-element system, the
//! conscious-agent index, constrained action verification with a
//! refinement round, and a seeded adversarial sweep against a
//! deliberately misaligned policy.

use anyhow::Result;
use colored::*;
use sentia_align::{AdversarialValueTester, ValueAlignmentVerifier};
use sentia_phi::{PhiEngine, PhiTrace, TraceComparison};
use sentia_types::{Constraint, ConstraintSet, TransitionMatrix};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║            Sentia — Integration & Alignment Walkthrough          ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════════╝".cyan()
    );
    println!();

    demo_integrated_information()?;
    println!();
    demo_action_verification()?;
    println!();
    demo_adversarial_sweep()?;

    Ok(())
}

fn demo_integrated_information() -> Result<()> {
    println!("{}", "─── Integrated information ───".bold());

    let engine = PhiEngine::new();

    let weak = TransitionMatrix::from_rows(vec![vec![0.9, 0.1], vec![0.1, 0.9]])?;
    let strong = TransitionMatrix::from_rows(vec![vec![0.5, 0.5], vec![0.5, 0.5]])?;

    let phi_weak = engine.phi(&weak)?;
    let phi_strong = engine.phi(&strong)?;

    println!("  weak coupling   [[0.9, 0.1], [0.1, 0.9]]  phi = {:.4}", phi_weak);
    println!("  strong coupling [[0.5, 0.5], [0.5, 0.5]]  phi = {:.4}", phi_strong);
    println!(
        "  ordering: {}",
        if phi_weak < phi_strong {
            "weak < strong ✓".green()
        } else {
            "unexpected".red()
        }
    );

    let index = engine.conscious_agent_index(&strong)?;
    println!("  agent index of the strong system: {:.4}", index);

    // Trace comparison over a short sweep of coupling strengths.
    let mut baseline = PhiTrace::new();
    let mut candidate = PhiTrace::new();
    for step in 0..5 {
        let drift = step as f64 * 0.05;
        let weak_step =
            TransitionMatrix::from_rows(vec![vec![0.9 - drift, 0.1 + drift], vec![0.1 + drift, 0.9 - drift]])?;
        baseline.push(engine.phi(&weak)?);
        candidate.push(engine.phi(&weak_step)?);
    }
    let comparison = TraceComparison::between(&baseline, &candidate);
    println!(
        "  phi trace drift: mean Δ = {:+.4}, std Δ = {:+.4}",
        comparison.mean_difference, comparison.std_difference
    );

    Ok(())
}

fn scenario_verifier() -> Result<ValueAlignmentVerifier> {
    // Action (x, y): spend on two interventions. Budget x + y <= 2,
    // x capped at 0.5, both non-negative.
    let budget = Constraint::new(vec![vec![1.0, 1.0]], vec![2.0])?;
    let limits = Constraint::new(
        vec![vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, -1.0]],
        vec![0.5, 0.0, 0.0],
    )?;
    let constraints = ConstraintSet::new(vec![budget, limits])?;

    let verifier = ValueAlignmentVerifier::new(
        |state: &[f64], action: &[f64]| {
            action.iter().sum::<f64>() - state.iter().sum::<f64>() * 0.1
        },
        constraints,
    )
    .with_objective(vec![-1.0, -1.0])?; // maximize total intervention
    Ok(verifier)
}

fn demo_action_verification() -> Result<()> {
    println!("{}", "─── Constrained action verification ───".bold());

    let verifier = scenario_verifier()?;
    let state = vec![1.0, 0.5];

    let optimal = verifier.optimize_action(&state)?;
    println!(
        "  optimal action under every constraint: [{:.2}, {:.2}]",
        optimal[0], optimal[1]
    );

    let overspend = vec![1.5, 1.5];
    let verdict = verifier.verify_action(&state, &overspend)?;
    println!(
        "  overspend [1.50, 1.50] verifies: {}",
        if verdict { "yes".green() } else { "no".red() }
    );

    let counterexamples = verifier.generate_counterexamples(&state, &overspend)?;
    for counterexample in &counterexamples {
        println!("  counterexample: {}", counterexample.to_string().yellow());
    }

    let refined = verifier.refine_constraints(&counterexamples)?;
    let verifier = verifier.with_constraints(refined)?;
    println!(
        "  after refinement, overspend verifies: {}",
        if verifier.verify_action(&state, &overspend)? {
            "yes".red()
        } else {
            "no (excluded at the margin)".green()
        }
    );

    Ok(())
}

fn demo_adversarial_sweep() -> Result<()> {
    println!("{}", "─── Adversarial robustness ───".bold());

    // A policy that ignores the budget split and always answers
    // half-and-half; near the cap this deviates from the optimum.
    let tester = AdversarialValueTester::new(
        |_state: &[f64]| vec![1.0, 1.0],
        scenario_verifier()?,
    );

    let states = vec![vec![1.0, 0.5], vec![0.2, 0.9]];
    let report = tester.run_adversarial_test(&states, 0.1, 25, 2024)?;
    println!(
        "  trials: {}, deviations: {}, accuracy: {:.2}",
        report.trials, report.deviations, report.accuracy
    );

    let none = tester.run_adversarial_test(&states, 0.0, 25, 2024)?;
    println!(
        "  epsilon = 0 sweep finds {} adversarial states (by construction)",
        none.deviations
    );

    Ok(())
}
