//! Phase 3: converge team-repository permission assignments.
//!
//! The most expensive phase: one permissions-listing call per managed
//! team up front, then one team-listing call per managed repository.

use super::ConvergeOptions;
use crate::model::Organization;
use crate::ui;
use anyhow::{Context, Result};
use hubkit::{GithubApi, RemoteRepository, TeamRepository};
use std::collections::HashMap;

/// Reconcile every managed repository's team assignments.
///
/// A remote team with no edge in the repository's team map is removed
/// from the repository. A team with an edge is re-assigned only if the
/// remote flags for its exact level are not already set - a missing
/// index entry counts as "not set". Teams with an edge but absent from
/// the repository's remote team list are assigned at their edge level.
pub(crate) fn converge(
    client: &dyn GithubApi,
    org: &Organization,
    remote_repositories: &[RemoteRepository],
    opts: &ConvergeOptions,
) -> Result<()> {
    // team github_id -> repositories it can access, with permission flags
    let mut team_index: HashMap<u64, Vec<TeamRepository>> = HashMap::new();
    for team in org.teams() {
        if let Some(id) = team.github_id {
            let rows = client
                .list_team_repositories(id)
                .with_context(|| format!("listing repository permissions of team '{}'", team.name))?;
            team_index.insert(id, rows);
        }
        // teams without a bound id only occur in dry runs, where their
        // assignments are skipped anyway
    }

    for remote_repository in remote_repositories {
        if !org.has_repository(&remote_repository.name) {
            continue;
        }
        let repository = org.repository(&remote_repository.name)?;
        let full_name = &remote_repository.full_name;

        let remote_teams = client
            .list_repository_teams(full_name)
            .with_context(|| format!("listing teams of repository '{}'", full_name))?;

        for remote_team in &remote_teams {
            match repository.team_permission(&remote_team.name) {
                Some(level) => {
                    let team = org.team(&remote_team.name)?;
                    let already_set = team
                        .github_id
                        .and_then(|id| team_index.get(&id))
                        .and_then(|rows| rows.iter().find(|r| &r.full_name == full_name))
                        .is_some_and(|row| row.permissions.has(level.as_str()));
                    if !already_set {
                        ui::info(&format!(
                            "Updating repository team {} on {}",
                            team.name, repository.name
                        ));
                        if !opts.dry_run
                            && let Some(id) = team.github_id
                        {
                            client.add_team_repository(id, full_name, level.as_str())?;
                        }
                    }
                }
                None => {
                    ui::info(&format!(
                        "Removing repository team {} from {}",
                        remote_team.name, repository.name
                    ));
                    if !opts.dry_run {
                        client.remove_team_repository(remote_team.id, full_name)?;
                    }
                }
            }
        }

        for (team_name, level) in repository.teams() {
            if !remote_teams.iter().any(|r| r.name == team_name) {
                ui::info(&format!(
                    "Adding {} repository team {} to {}",
                    level, team_name, repository.name
                ));
                if !opts.dry_run
                    && let Some(id) = org.team(team_name)?.github_id
                {
                    client.add_team_repository(id, full_name, level.as_str())?;
                }
            }
        }
    }
    Ok(())
}
