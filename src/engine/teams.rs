//! Phase 1: converge organization teams.

use super::{ConvergeOptions, UnmanagedTeams};
use crate::model::Organization;
use crate::ui;
use anyhow::{Context, Result};
use hubkit::GithubApi;

/// Resolve every desired team against the remote team list.
///
/// Matched teams get their `github_id` bound and their permission
/// updated if the remote permission string differs. Remote teams with
/// no desired counterpart are warned about or deleted per policy.
/// Desired teams absent remotely are created, binding the new id.
pub(crate) fn converge(
    client: &dyn GithubApi,
    org: &mut Organization,
    opts: &ConvergeOptions,
) -> Result<()> {
    let org_name = org.name.clone();
    let remote_teams = client
        .list_teams(&org_name)
        .with_context(|| format!("listing teams of organization '{}'", org_name))?;

    for remote in &remote_teams {
        if org.has_team(&remote.name) {
            let team = org.team_mut(&remote.name)?;
            team.github_id = Some(remote.id);
            if remote.permission != team.permission.as_str() {
                ui::info(&format!("Updating team {}", team.name));
                if !opts.dry_run {
                    client.update_team(remote.id, team.permission.as_str())?;
                }
            }
        } else {
            match opts.on_unmanaged_teams {
                UnmanagedTeams::Warn => {
                    ui::warn(&format!("unmanaged team '{}'", remote.name));
                }
                UnmanagedTeams::Delete => {
                    ui::info(&format!("Removing team {}", remote.name));
                    if !opts.dry_run {
                        client.delete_team(remote.id)?;
                    }
                }
            }
        }
    }

    for team in org.teams_mut() {
        if !remote_teams.iter().any(|r| r.name == team.name) {
            ui::info(&format!("Creating team {}", team.name));
            if !opts.dry_run {
                let created =
                    client.create_team(&org_name, &team.name, team.permission.as_str())?;
                team.github_id = Some(created.id);
            }
        }
    }
    Ok(())
}
