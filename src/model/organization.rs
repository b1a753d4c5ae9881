//! Organizations: the team and repository namespaces.

use super::repository::{Repository, RepositorySpec};
use super::team::{Team, TeamSpec};
use super::Permission;
use anyhow::{Result, bail};
use std::collections::BTreeMap;

/// An organization in the desired-state graph.
///
/// Owns its teams and repositories; both namespaces reject duplicate
/// names. Repositories must be defined after the teams they grant
/// access to.
#[derive(Debug)]
pub struct Organization {
    /// Organization name, the unique case-sensitive key.
    pub name: String,
    teams: BTreeMap<String, Team>,
    repositories: BTreeMap<String, Repository>,
}

impl Organization {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            teams: BTreeMap::new(),
            repositories: BTreeMap::new(),
        }
    }

    /// Define a team.
    pub fn define_team(&mut self, name: &str, spec: TeamSpec) -> Result<()> {
        if self.teams.contains_key(name) {
            bail!(
                "team '{}' is already defined in organization '{}'",
                name,
                self.name
            );
        }
        self.teams.insert(name.to_string(), Team::new(name, spec));
        Ok(())
    }

    /// Whether a team with this name is defined.
    pub fn has_team(&self, name: &str) -> bool {
        self.teams.contains_key(name)
    }

    /// Look up a team, failing if it does not exist.
    pub fn team(&self, name: &str) -> Result<&Team> {
        match self.teams.get(name) {
            Some(team) => Ok(team),
            None => bail!("no team named '{}' in organization '{}'", name, self.name),
        }
    }

    /// Mutable lookup, failing if the team does not exist.
    pub fn team_mut(&mut self, name: &str) -> Result<&mut Team> {
        match self.teams.get_mut(name) {
            Some(team) => Ok(team),
            None => bail!("no team named '{}' in organization '{}'", name, self.name),
        }
    }

    /// All teams, in name order.
    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    /// All teams, mutable, in name order.
    pub fn teams_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.teams.values_mut()
    }

    /// Define a repository. Every team it grants access to must already
    /// be defined on this organization.
    pub fn define_repository(&mut self, name: &str, spec: RepositorySpec) -> Result<()> {
        if self.repositories.contains_key(name) {
            bail!(
                "repository '{}' is already defined in organization '{}'",
                name,
                self.name
            );
        }
        for team in spec
            .admin_teams
            .iter()
            .chain(&spec.push_teams)
            .chain(&spec.pull_teams)
        {
            if !self.teams.contains_key(team) {
                bail!(
                    "repository '{}' grants access to unknown team '{}' in organization '{}'",
                    name,
                    team,
                    self.name
                );
            }
        }
        self.repositories
            .insert(name.to_string(), Repository::new(name, spec)?);
        Ok(())
    }

    /// Whether a repository with this name is defined.
    pub fn has_repository(&self, name: &str) -> bool {
        self.repositories.contains_key(name)
    }

    /// Look up a repository, failing if it does not exist.
    pub fn repository(&self, name: &str) -> Result<&Repository> {
        match self.repositories.get(name) {
            Some(repository) => Ok(repository),
            None => bail!(
                "no repository named '{}' in organization '{}'",
                name,
                self.name
            ),
        }
    }

    /// All repositories, in name order.
    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.repositories.values()
    }

    /// The repositories a team has access to, with the effective level.
    ///
    /// Derived from the repository edge maps on every call; nothing is
    /// cached, so the answer never goes stale.
    pub fn repositories_for_team(&self, team: &str) -> Vec<(&Repository, Permission)> {
        self.repositories
            .values()
            .filter_map(|repository| {
                repository
                    .team_permission(team)
                    .map(|level| (repository, level))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org_with_team(team: &str) -> Organization {
        let mut org = Organization::new("acme");
        org.define_team(team, TeamSpec::default()).unwrap();
        org
    }

    #[test]
    fn test_team_namespace() {
        let mut org = org_with_team("core");
        assert!(org.has_team("core"));
        assert!(org.team("ghost").is_err());

        let err = org.define_team("core", TeamSpec::default()).unwrap_err();
        assert!(err.to_string().contains("already defined"));
    }

    #[test]
    fn test_repository_namespace() {
        let mut org = Organization::new("acme");
        org.define_repository("svc", RepositorySpec::default())
            .unwrap();
        assert!(org.has_repository("svc"));
        assert!(org.repository("ghost").is_err());

        let err = org
            .define_repository("svc", RepositorySpec::default())
            .unwrap_err();
        assert!(err.to_string().contains("already defined"));
    }

    #[test]
    fn test_repository_rejects_unknown_team() {
        let mut org = Organization::new("acme");
        let spec = RepositorySpec {
            pull_teams: vec!["ghost".to_string()],
            ..RepositorySpec::default()
        };
        let err = org.define_repository("svc", spec).unwrap_err();
        assert!(err.to_string().contains("unknown team 'ghost'"));
    }

    #[test]
    fn test_repositories_for_team_is_derived() {
        let mut org = org_with_team("core");
        org.define_repository(
            "svc",
            RepositorySpec {
                admin_teams: vec!["core".to_string()],
                ..RepositorySpec::default()
            },
        )
        .unwrap();
        org.define_repository(
            "docs",
            RepositorySpec {
                pull_teams: vec!["core".to_string()],
                ..RepositorySpec::default()
            },
        )
        .unwrap();
        org.define_repository("misc", RepositorySpec::default())
            .unwrap();

        let repos = org.repositories_for_team("core");
        assert_eq!(repos.len(), 2);
        // name order: docs before svc
        assert_eq!(repos[0].0.name, "docs");
        assert_eq!(repos[0].1, Permission::Pull);
        assert_eq!(repos[1].0.name, "svc");
        assert_eq!(repos[1].1, Permission::Admin);

        assert!(org.repositories_for_team("ghost").is_empty());
    }
}
