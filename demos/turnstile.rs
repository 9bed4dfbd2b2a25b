//! Coin-operated turnstile driven through the text grammar.
//!
//! Run with `RUST_LOG=labelled_fsm=debug cargo run --example turnstile` to
//! see the engine's own tracing next to the machine logger.

use labelled_fsm::core::{Action, Definition};
use labelled_fsm::machine::Machine;
use tracing_subscriber::EnvFilter;

const TURNSTILE: &str = "
    # Coin machine
    locked -> locked (push);
    locked -> unlocked (coin); # trailing comment

    unlocked -> locked (push);
    unlocked -> unlocked (coin);
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // One rule at a time and all at once build the same definition.
    let mut definition = Definition::new();
    for rule in TURNSTILE.lines() {
        definition.process_definition_formats(rule)?;
    }
    let multi: Definition = TURNSTILE.parse()?;
    assert_eq!(definition, multi);
    definition.set_initial_state("locked")?;

    if let Some(coin) = definition.transition_mut("unlocked", "coin") {
        coin.set_action(Action::new(|_| {
            println!("#### Stile already unlocked. Coin rejected.")
        }));
    }
    if let Some(push) = definition.transition_mut("locked", "push") {
        push.set_action(Action::new(|_| {
            println!("#### Stile locked. Try putting a coin in.")
        }));
    }
    if let Some(unlocked) = definition.state_mut("unlocked") {
        unlocked.on_entry(|_| println!("### Clunk!"));
    }

    println!("{}\n", definition.definition_formats());
    println!("{}", definition.graph_viz());

    let mut machine = Machine::new(&definition)?;
    machine.set_logger(|line| println!("{line}"));

    println!("{}", machine.current_state());
    for label in ["push", "coin", "push", "coin", "coin", "coin"] {
        machine.perform_transition(label)?;
        println!("{}", machine.current_state());
    }

    tracing::info!(path = ?machine.history().get_path(), "walk finished");
    Ok(())
}
