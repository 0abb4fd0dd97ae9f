//! Campaign walkthrough: research, loot, reveal, and plan ahead.
//!
//! Plays the opening of a campaign against the built-in XCOM fixture and
//! prints what becomes available at each step. Set `RUST_LOG=debug` to see
//! the engine's state-transition logs.
//!
//! Run with: `cargo run -p xcom-core --example campaign_walkthrough --features test-utils`

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use xcom_core::engine::{Engine, EngineError};
use xcom_core::test_utils::{item, project, project_names, xcom_catalog};

fn main() -> Result<(), EngineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut engine = Engine::new(Arc::new(xcom_catalog()));
    let gatecrasher = engine.start_campaign("Gatecrasher")?;

    let print_available = |engine: &Engine, label: &str| -> Result<(), EngineError> {
        let available = engine.available_research(gatecrasher)?;
        println!("{label}:");
        for (position, name) in project_names(engine.catalog(), available).iter().enumerate() {
            println!("  {}. {name}", position + 1);
        }
        Ok(())
    };

    print_available(&engine, "Available research")?;

    let biotech = project(engine.catalog(), "Alien Biotech");
    engine.advance_research(gatecrasher, biotech)?;
    print_available(&engine, "After researching Alien Biotech")?;

    let corpse = item(engine.catalog(), "Sectoid Corpse");
    let acquired = engine.acquire_item(gatecrasher, corpse, 1)?;
    println!(
        "Recovered a Sectoid Corpse; revealed: {:?}",
        project_names(engine.catalog(), acquired.unlocked)
    );
    print_available(&engine, "After recovering the corpse")?;

    let gauss = project(engine.catalog(), "Gauss Weapons");
    let requirements = engine.tech_requirements(gauss)?;
    println!(
        "Gauss Weapons requires: {:?}",
        project_names(engine.catalog(), requirements.iter().copied())
    );

    Ok(())
}
