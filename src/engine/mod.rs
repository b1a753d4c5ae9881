//! Convergence engine: make remote GitHub state match the desired graph.
//!
//! For one organization the engine runs four strictly ordered phases,
//! each a separate class of remote round-trips:
//!
//! 1. [`teams`] - resolve/create teams and bind their remote ids
//! 2. [`repositories`] - create/update repositories
//! 3. [`permissions`] - reconcile team-repository assignments
//! 4. [`hooks`] - reconcile repository webhooks
//!
//! The ordering is load-bearing: later phases assume team ids and
//! repository existence were already resolved. Every phase re-derives
//! its actions from a fresh remote snapshot, so re-running convergence
//! is always safe, and a converged organization produces zero mutating
//! calls.
//!
//! Every mutating decision prints a status line before the call is
//! issued. The first failed remote call aborts the run; nothing is
//! retried.

use crate::model::{Organization, Registry};
use crate::ui;
use anyhow::Result;
use hubkit::GithubApi;
use serde::Deserialize;

pub mod hooks;
pub mod permissions;
pub mod repositories;
pub mod teams;

/// What to do with a remote team no desired-state team claims.
///
/// The safe default is to warn and leave it alone; deletion is opt-in
/// because it destroys something no human asked to remove.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmanagedTeams {
    /// Report the team and leave it untouched.
    #[default]
    Warn,
    /// Delete the team.
    Delete,
}

/// Options controlling a convergence run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvergeOptions {
    /// Print what would change without issuing mutating calls.
    /// Read-only calls still run.
    pub dry_run: bool,
    /// Policy for unmanaged remote teams.
    pub on_unmanaged_teams: UnmanagedTeams,
}

/// Converge one organization.
pub fn converge(
    client: &dyn GithubApi,
    org: &mut Organization,
    opts: &ConvergeOptions,
) -> Result<()> {
    ui::header(&format!("Converging organization {}", org.name));
    teams::converge(client, org, opts)?;
    let remote_repositories = repositories::converge(client, org, opts)?;
    permissions::converge(client, org, &remote_repositories, opts)?;
    hooks::converge(client, org, &remote_repositories, opts)?;
    Ok(())
}

/// Converge every organization in the registry, in name order.
///
/// Organizations are processed strictly sequentially with no isolation:
/// the first failure aborts the whole batch, including organizations
/// not yet converged.
pub fn converge_all(
    client: &dyn GithubApi,
    registry: &mut Registry,
    opts: &ConvergeOptions,
) -> Result<()> {
    for org in registry.organizations_mut() {
        converge(client, org, opts)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RepositorySpec, TeamSpec};
    use hubkit::MockGithub;

    /// The acme/core/svc bootstrap: empty remote, one admin team, one
    /// repository granting it admin. Exactly one create-team, one
    /// create-repository and one assign call, in that order.
    #[test]
    fn test_bootstrap_from_empty_remote() {
        let mut registry = Registry::new();
        let org = registry.define_organization("acme").unwrap();
        org.define_team(
            "core",
            toml::from_str::<TeamSpec>("permission = \"admin\"").unwrap(),
        )
        .unwrap();
        org.define_repository(
            "svc",
            RepositorySpec {
                admin_teams: vec!["core".to_string()],
                ..RepositorySpec::default()
            },
        )
        .unwrap();

        let mock = MockGithub::new();
        converge_all(&mock, &mut registry, &ConvergeOptions::default()).unwrap();

        assert_eq!(mock.calls(), vec![
            "create_team acme core admin",
            "create_repository acme/svc",
            "add_team_repository 1 acme/svc admin",
        ]);
        assert_eq!(
            registry
                .organization("acme")
                .unwrap()
                .team("core")
                .unwrap()
                .github_id,
            Some(1)
        );
    }

    /// After a full run the remote state matches the desired state, so
    /// a second run must issue zero mutating calls.
    #[test]
    fn test_second_run_is_a_no_op() {
        let mut registry = Registry::new();
        let org = registry.define_organization("acme").unwrap();
        org.define_team(
            "core",
            toml::from_str::<TeamSpec>("permission = \"admin\"").unwrap(),
        )
        .unwrap();
        org.define_team("deploy", TeamSpec::default()).unwrap();
        org.define_repository(
            "svc",
            RepositorySpec {
                description: "the service".to_string(),
                admin_teams: vec!["core".to_string()],
                push_teams: vec!["deploy".to_string()],
                hooks: [(
                    "ci".to_string(),
                    toml::from_str(
                        r#"
                        events = ["push", "pull_request"]
                        [config]
                        url = "https://ci.example.com/hook"
                        "#,
                    )
                    .unwrap(),
                )]
                .into(),
                ..RepositorySpec::default()
            },
        )
        .unwrap();

        let mock = MockGithub::new();
        let opts = ConvergeOptions::default();
        converge_all(&mock, &mut registry, &opts).unwrap();
        assert!(!mock.calls().is_empty());

        mock.clear_calls();
        converge_all(&mock, &mut registry, &opts).unwrap();
        assert_eq!(mock.calls(), Vec::<String>::new());
    }

    /// Dry run against an empty remote: same decisions, no mutations.
    #[test]
    fn test_dry_run_issues_no_mutating_calls() {
        let mut registry = Registry::new();
        let org = registry.define_organization("acme").unwrap();
        org.define_team("core", TeamSpec::default()).unwrap();
        org.define_repository(
            "svc",
            RepositorySpec {
                pull_teams: vec!["core".to_string()],
                ..RepositorySpec::default()
            },
        )
        .unwrap();

        let mock = MockGithub::new();
        let opts = ConvergeOptions {
            dry_run: true,
            ..ConvergeOptions::default()
        };
        converge_all(&mock, &mut registry, &opts).unwrap();
        assert_eq!(mock.calls(), Vec::<String>::new());
    }
}
