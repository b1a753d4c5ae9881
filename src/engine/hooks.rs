//! Phase 4: converge repository webhooks.

use super::ConvergeOptions;
use crate::model::Organization;
use crate::ui;
use anyhow::{Context, Result};
use hubkit::{GithubApi, RemoteRepository};

/// Reconcile every managed repository's hooks, matching by name.
///
/// A matched hook is replaced whole if its active flag, its event set
/// (order-insensitive) or its config (password keys excluded) differs.
/// Remote hooks with no desired counterpart are deleted. Desired hooks
/// absent remotely are created.
pub(crate) fn converge(
    client: &dyn GithubApi,
    org: &Organization,
    remote_repositories: &[RemoteRepository],
    opts: &ConvergeOptions,
) -> Result<()> {
    for repository in org.repositories() {
        let full_name = format!("{}/{}", org.name, repository.name);
        if !remote_repositories.iter().any(|r| r.name == repository.name) {
            // only reachable in a dry run, when the creation was skipped
            log::debug!("skipping hooks of {}: repository does not exist remotely", full_name);
            continue;
        }

        let mut remote_hooks = client
            .list_hooks(&full_name)
            .with_context(|| format!("listing hooks of repository '{}'", full_name))?;

        for hook in repository.hooks() {
            if let Some(position) = remote_hooks.iter().position(|r| r.name == hook.name) {
                let remote = remote_hooks.remove(position);
                let mut remote_events = remote.events.clone();
                remote_events.sort();

                let update = remote.active != hook.active
                    || remote_events != hook.sorted_events()
                    || !hook.config_matches(&remote.config);
                if update {
                    ui::info(&format!(
                        "Updating {} hook on repository {}",
                        hook.name, full_name
                    ));
                    if !opts.dry_run {
                        client.create_hook(
                            &full_name,
                            &hook.name,
                            &hook.config,
                            &hook.events,
                            hook.active,
                        )?;
                    }
                }
            } else {
                ui::info(&format!(
                    "Creating {} hook on repository {}",
                    hook.name, full_name
                ));
                if !opts.dry_run {
                    client.create_hook(
                        &full_name,
                        &hook.name,
                        &hook.config,
                        &hook.events,
                        hook.active,
                    )?;
                }
            }
        }

        for remote in &remote_hooks {
            ui::info(&format!(
                "Removing {} hook on repository {}",
                remote.name, full_name
            ));
            if !opts.dry_run {
                client.delete_hook(&full_name, remote.id)?;
            }
        }
    }
    Ok(())
}
