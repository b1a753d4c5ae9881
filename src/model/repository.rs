//! Repositories within an organization.

use super::hook::{HookSpec, RepositoryHook};
use super::Permission;
use anyhow::{Result, bail};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Declared attributes of a repository.
///
/// Team access is declared as three name lists for compatibility with
/// the existing configuration vocabulary; they collapse into a single
/// team -> permission edge map when the repository is defined, with
/// admin > push > pull precedence when a team is listed more than once.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositorySpec {
    /// Description. Empty string when unset, never null.
    pub description: String,
    /// Homepage URL. Empty string when unset, never null.
    pub homepage: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Whether the issue tracker is enabled.
    pub issues: bool,
    /// Whether the wiki is enabled.
    pub wiki: bool,
    /// Whether downloads are enabled.
    pub downloads: bool,
    /// Repository topics.
    pub topics: Vec<String>,
    /// Free-form tags, `key=value` or bare markers.
    pub tags: Vec<String>,
    /// Teams with admin access.
    pub admin_teams: Vec<String>,
    /// Teams with push access.
    pub push_teams: Vec<String>,
    /// Teams with pull access.
    pub pull_teams: Vec<String>,
    /// Hooks by name.
    pub hooks: BTreeMap<String, HookSpec>,
}

impl Default for RepositorySpec {
    fn default() -> Self {
        Self {
            description: String::new(),
            homepage: String::new(),
            private: true,
            issues: false,
            wiki: false,
            downloads: false,
            topics: Vec::new(),
            tags: Vec::new(),
            admin_teams: Vec::new(),
            push_teams: Vec::new(),
            pull_teams: Vec::new(),
            hooks: BTreeMap::new(),
        }
    }
}

/// A repository in the desired-state graph.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Repository name, unique within its organization.
    pub name: String,
    /// Description.
    pub description: String,
    /// Homepage URL.
    pub homepage: String,
    /// Whether the repository is private.
    pub private: bool,
    /// Whether the issue tracker is enabled.
    pub issues: bool,
    /// Whether the wiki is enabled.
    pub wiki: bool,
    /// Whether downloads are enabled.
    pub downloads: bool,
    /// Repository topics.
    pub topics: Vec<String>,
    /// Free-form tags carried from the declaration or import.
    pub tags: Vec<String>,
    /// Team name -> effective permission. At most one entry per team.
    teams: BTreeMap<String, Permission>,
    hooks: BTreeMap<String, RepositoryHook>,
}

impl Repository {
    /// Build a repository from its spec. Team name resolution against
    /// the owning organization happens in
    /// [`Organization::define_repository`](super::Organization::define_repository);
    /// this constructor only collapses the three lists into the edge
    /// map.
    pub(crate) fn new(name: &str, spec: RepositorySpec) -> Result<Self> {
        let mut teams = BTreeMap::new();
        // admin first, then push, then pull: first match wins.
        for (names, level) in [
            (&spec.admin_teams, Permission::Admin),
            (&spec.push_teams, Permission::Push),
            (&spec.pull_teams, Permission::Pull),
        ] {
            for team in names {
                teams.entry(team.clone()).or_insert(level);
            }
        }

        let mut repository = Self {
            name: name.to_string(),
            description: spec.description,
            homepage: spec.homepage,
            private: spec.private,
            issues: spec.issues,
            wiki: spec.wiki,
            downloads: spec.downloads,
            topics: spec.topics,
            tags: spec.tags,
            teams,
            hooks: BTreeMap::new(),
        };
        for (hook_name, hook_spec) in spec.hooks {
            repository.define_hook(&hook_name, hook_spec)?;
        }
        Ok(repository)
    }

    /// The effective permission of a team on this repository, if any.
    pub fn team_permission(&self, team: &str) -> Option<Permission> {
        self.teams.get(team).copied()
    }

    /// Whether the named team has any access to this repository.
    pub fn has_team(&self, team: &str) -> bool {
        self.teams.contains_key(team)
    }

    /// All (team name, permission) edges, in team-name order.
    pub fn teams(&self) -> impl Iterator<Item = (&str, Permission)> {
        self.teams.iter().map(|(name, level)| (name.as_str(), *level))
    }

    /// Define a hook on this repository.
    pub fn define_hook(&mut self, name: &str, spec: HookSpec) -> Result<()> {
        if self.hooks.contains_key(name) {
            bail!(
                "hook '{}' is already defined on repository '{}'",
                name,
                self.name
            );
        }
        self.hooks
            .insert(name.to_string(), RepositoryHook::new(name, spec));
        Ok(())
    }

    /// Whether a hook with this name is defined.
    pub fn has_hook(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Look up a hook, failing if it does not exist.
    pub fn hook(&self, name: &str) -> Result<&RepositoryHook> {
        match self.hooks.get(name) {
            Some(hook) => Ok(hook),
            None => bail!(
                "no hook named '{}' on repository '{}'",
                name,
                self.name
            ),
        }
    }

    /// All hooks, in name order.
    pub fn hooks(&self) -> impl Iterator<Item = &RepositoryHook> {
        self.hooks.values()
    }
}
