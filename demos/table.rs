//! Print a definition as a state-transition table.

use labelled_fsm::core::Definition;
use labelled_fsm::grammar::{GraphVizOptions, RankDirection};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut definition = Definition::new();
    definition.process_definition_formats("locked -> locked (push)")?;
    definition.process_definition_formats("locked -> unlocked (coin)")?;
    definition.process_definition_formats("unlocked -> locked (push)")?;
    definition.process_definition_formats("unlocked -> unlocked (coin)")?;

    let multi: Definition = "# Coin machine
        locked -> locked (push);locked -> unlocked (coin); # trailing comment

        unlocked -> locked (push);
        unlocked -> unlocked (coin);"
        .parse()?;
    if definition != multi {
        return Err("line-by-line and multi-line definitions differ".into());
    }

    let table = definition.transition_table();
    print!("{table}");

    for row in &table.rows {
        for (state, cell) in table.states.iter().zip(&row.destinations) {
            tracing::debug!(%state, transition = %row.transition, destination = ?cell, "cell");
        }
    }

    let options = GraphVizOptions {
        rank_direction: Some(RankDirection::LR),
        highlight: Some("locked".to_string()),
    };
    println!("\n{}", definition.graph_viz_with(&options));
    Ok(())
}
