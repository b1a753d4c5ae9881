//! `backpack converge` - apply the desired state to GitHub.

use crate::cli::ConvergeArgs;
use crate::engine::{self, ConvergeOptions, UnmanagedTeams};
use crate::ui;
use anyhow::Result;
use hubkit::RestClient;

pub fn run(config_path: &str, args: ConvergeArgs) -> Result<()> {
    let (config, mut registry) = super::load_graph(config_path)?;

    let opts = ConvergeOptions {
        dry_run: args.dry_run,
        on_unmanaged_teams: if args.delete_unmanaged_teams {
            UnmanagedTeams::Delete
        } else {
            config.settings.on_unmanaged_teams
        },
    };

    if args.token.is_none() {
        log::warn!("no GitHub token configured; unauthenticated API limits apply");
    }
    let client = match args.api_base {
        Some(base) => RestClient::with_api_base(base, args.token),
        None => RestClient::new(args.token),
    };

    match args.org {
        Some(name) => {
            let org = registry.organization_mut(&name)?;
            engine::converge(&client, org, &opts)?;
        }
        None => engine::converge_all(&client, &mut registry, &opts)?,
    }

    if opts.dry_run {
        ui::info("Dry run complete - no changes were made");
    } else {
        ui::success("Converge complete");
    }
    Ok(())
}
