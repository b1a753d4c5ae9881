//! `backpack validate` - load the configuration and report it.
//!
//! Every configuration error (unknown keys, duplicate names, unknown
//! teams) surfaces here without touching the network.

use crate::ui;
use anyhow::Result;

pub fn run(config_path: &str) -> Result<()> {
    let (_, registry) = super::load_graph(config_path)?;

    let teams: usize = registry.organizations().map(|o| o.teams().count()).sum();
    let repositories: usize = registry
        .organizations()
        .map(|o| o.repositories().count())
        .sum();
    let hooks: usize = registry
        .organizations()
        .flat_map(|o| o.repositories())
        .map(|r| r.hooks().count())
        .sum();

    ui::success(&format!(
        "Configuration OK: {} organization(s), {} team(s), {} repository(ies), {} hook(s)",
        registry.len(),
        teams,
        repositories,
        hooks
    ));
    Ok(())
}
