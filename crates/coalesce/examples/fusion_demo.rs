//! Fusion example: a swarm of bodies falling onto a heavy anchor
//!
//! Drives the step loop a presentation layer would run, printing the
//! fusion events instead of drawing them.
//!
//! Run with: cargo run --package coalesce --example fusion_demo

use coalesce::forces::ForceModel;
use coalesce::{SimulationConfig, SimulationEngine, SimulationError};

fn main() -> Result<(), SimulationError> {
    println!("N-body Fusion Demo\n");
    println!("{}", "=".repeat(60));

    let config = SimulationConfig {
        num_bodies: 40,
        ..SimulationConfig::default()
    }
    .with_seed(2024);

    let engine = SimulationEngine::new(config)?;
    let mut state = engine.initialize_seeded()?;

    let initial_mass = state.total_mass();
    let frames = engine.config().frame_count();

    println!("\nSimulation parameters:");
    println!("  Bodies: {}", state.body_count());
    println!("  Timestep: {}", engine.config().dt);
    println!("  Frames: {}", frames);
    println!("  Total mass: {:.1}", initial_mass);

    println!("\n{}", "=".repeat(60));
    println!("Starting simulation...\n");

    let mut fusion_count = 0;

    for _ in 0..frames {
        let outcome = engine.step(&state)?;

        for pair in &outcome.events.fused_pairs {
            let absorbed = outcome.merged.get(pair.removed)?;
            let survivor = outcome.state.get(pair.survivor)?;
            println!(
                "t={:6.2}: body {} (mass {:.1}) fused into {} -> mass {:.1}, radius {:.2}",
                outcome.state.time(),
                absorbed.id,
                absorbed.mass,
                survivor.id,
                survivor.mass,
                survivor.radius
            );
        }

        fusion_count += outcome.events.fused_pairs.len();
        state = outcome.state;
    }

    println!("\n{}", "=".repeat(60));
    println!("Simulation complete!\n");

    println!("Final statistics:");
    println!("  Final time: {:.2}", state.time());
    println!("  Final body count: {}", state.body_count());
    println!("  Total fusions: {}", fusion_count);
    println!(
        "  Mass drift: {:.3e}",
        (state.total_mass() - initial_mass).abs()
    );
    println!(
        "  Energy: kinetic {:.1}, potential {:.1}",
        state.kinetic_energy(),
        engine.force().potential_energy(&state)
    );

    println!("\nSurvivors by mass:");
    let mut bodies: Vec<_> = state.iter().collect();
    bodies.sort_by(|a, b| b.mass.total_cmp(&a.mass));
    for body in bodies.iter().take(5) {
        println!(
            "  Body {}: mass={:.1}, pos=({:.2}, {:.2}), speed={:.2}",
            body.id,
            body.mass,
            body.position.x,
            body.position.y,
            body.speed()
        );
    }

    Ok(())
}
