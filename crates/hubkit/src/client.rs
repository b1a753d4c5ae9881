//! The [`GithubApi`] capability set and an in-memory mock.
//!
//! The trait is the exact surface the convergence engine needs: list,
//! create, update and delete for teams, repositories, team-repository
//! assignments and hooks. The primary implementation is
//! [`RestClient`](crate::RestClient).
//!
//! # Testing
//!
//! Use [`MockGithub`] for testing without network access. The mock holds
//! remote state in memory, applies every mutation to it, and records a
//! log of the mutating calls it served:
//!
//! ```
//! use hubkit::{GithubApi, MockGithub};
//!
//! let mock = MockGithub::new();
//! mock.add_team("acme", "core", "admin");
//!
//! let teams = mock.list_teams("acme").unwrap();
//! assert_eq!(teams.len(), 1);
//! assert!(mock.calls().is_empty()); // listings are not logged
//! ```

use crate::error::{Error, Result};
use crate::types::{
    PermissionFlags, RemoteHook, RemoteRepository, RemoteTeam, RepositoryPatch, TeamRepository,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// The GitHub management calls the convergence engine consumes.
///
/// Every call is a blocking round-trip. Any failure is terminal for the
/// caller's current run; implementations must not retry internally.
pub trait GithubApi: Send + Sync {
    /// List all teams of an organization.
    fn list_teams(&self, org: &str) -> Result<Vec<RemoteTeam>>;

    /// Create a team and return it with its new remote id.
    fn create_team(&self, org: &str, name: &str, permission: &str) -> Result<RemoteTeam>;

    /// Update a team's default permission.
    fn update_team(&self, team_id: u64, permission: &str) -> Result<()>;

    /// Delete a team.
    fn delete_team(&self, team_id: u64) -> Result<()>;

    /// List the repositories a team has access to, with permission flags.
    fn list_team_repositories(&self, team_id: u64) -> Result<Vec<TeamRepository>>;

    /// List all repositories of an organization.
    fn list_repositories(&self, org: &str) -> Result<Vec<RemoteRepository>>;

    /// Create a repository with all managed fields set.
    fn create_repository(
        &self,
        org: &str,
        name: &str,
        fields: &RepositoryPatch,
    ) -> Result<RemoteRepository>;

    /// Edit a repository's managed fields in one combined call.
    fn update_repository(&self, full_name: &str, fields: &RepositoryPatch)
    -> Result<RemoteRepository>;

    /// List the teams assigned to a repository.
    fn list_repository_teams(&self, full_name: &str) -> Result<Vec<RemoteTeam>>;

    /// Assign a team to a repository at the given permission level.
    ///
    /// Re-assigning an already assigned team changes its level.
    fn add_team_repository(&self, team_id: u64, full_name: &str, permission: &str) -> Result<()>;

    /// Remove a team's assignment from a repository.
    fn remove_team_repository(&self, team_id: u64, full_name: &str) -> Result<()>;

    /// List a repository's hooks.
    fn list_hooks(&self, full_name: &str) -> Result<Vec<RemoteHook>>;

    /// Create a named hook, replacing any existing hook with that name.
    fn create_hook(
        &self,
        full_name: &str,
        name: &str,
        config: &BTreeMap<String, String>,
        events: &[String],
        active: bool,
    ) -> Result<RemoteHook>;

    /// Delete a hook by id.
    fn delete_hook(&self, full_name: &str, hook_id: u64) -> Result<()>;
}

// =============================================================================
// Mock implementation
// =============================================================================

#[derive(Debug, Default)]
struct MockState {
    next_id: u64,
    /// (org, team) pairs.
    teams: Vec<(String, RemoteTeam)>,
    repositories: Vec<RemoteRepository>,
    assignments: Vec<Assignment>,
    /// (full_name, hook) pairs.
    hooks: Vec<(String, RemoteHook)>,
}

#[derive(Debug, Clone)]
struct Assignment {
    team_id: u64,
    full_name: String,
    permission: String,
}

impl MockState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`GithubApi`] for testing without network access.
///
/// Mutations are applied to the stored state, so converging against the
/// mock a second time sees the effects of the first run. Mutating calls
/// are recorded in a log for assertions; listings are not.
#[derive(Debug, Default)]
pub struct MockGithub {
    state: Mutex<MockState>,
    calls: Mutex<Vec<String>>,
}

impl MockGithub {
    /// Create a new empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a team, returning its id.
    pub fn add_team(&self, org: &str, name: &str, permission: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        state.teams.push((
            org.to_string(),
            RemoteTeam {
                id,
                name: name.to_string(),
                permission: permission.to_string(),
            },
        ));
        id
    }

    /// Seed a repository. `full_name` must be `org/name`.
    pub fn add_repository(&self, repository: RemoteRepository) {
        self.state.lock().unwrap().repositories.push(repository);
    }

    /// Seed a team-repository assignment.
    pub fn add_assignment(&self, team_id: u64, full_name: &str, permission: &str) {
        self.state.lock().unwrap().assignments.push(Assignment {
            team_id,
            full_name: full_name.to_string(),
            permission: permission.to_string(),
        });
    }

    /// Seed a hook, returning the id the mock assigned it.
    pub fn add_hook(&self, full_name: &str, mut hook: RemoteHook) -> u64 {
        let mut state = self.state.lock().unwrap();
        hook.id = state.allocate_id();
        let id = hook.id;
        state.hooks.push((full_name.to_string(), hook));
        id
    }

    /// The mutating calls served so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget the recorded calls (state is kept).
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn org_of(full_name: &str) -> &str {
        full_name.split('/').next().unwrap_or(full_name)
    }
}

impl GithubApi for MockGithub {
    fn list_teams(&self, org: &str) -> Result<Vec<RemoteTeam>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .teams
            .iter()
            .filter(|(o, _)| o == org)
            .map(|(_, t)| t.clone())
            .collect())
    }

    fn create_team(&self, org: &str, name: &str, permission: &str) -> Result<RemoteTeam> {
        self.log(format!("create_team {} {} {}", org, name, permission));
        let mut state = self.state.lock().unwrap();
        let id = state.allocate_id();
        let team = RemoteTeam {
            id,
            name: name.to_string(),
            permission: permission.to_string(),
        };
        state.teams.push((org.to_string(), team.clone()));
        Ok(team)
    }

    fn update_team(&self, team_id: u64, permission: &str) -> Result<()> {
        self.log(format!("update_team {} {}", team_id, permission));
        let mut state = self.state.lock().unwrap();
        let team = state
            .teams
            .iter_mut()
            .find(|(_, t)| t.id == team_id)
            .ok_or_else(|| Error::unknown(format!("team {}", team_id)))?;
        team.1.permission = permission.to_string();
        Ok(())
    }

    fn delete_team(&self, team_id: u64) -> Result<()> {
        self.log(format!("delete_team {}", team_id));
        let mut state = self.state.lock().unwrap();
        if !state.teams.iter().any(|(_, t)| t.id == team_id) {
            return Err(Error::unknown(format!("team {}", team_id)));
        }
        state.teams.retain(|(_, t)| t.id != team_id);
        state.assignments.retain(|a| a.team_id != team_id);
        Ok(())
    }

    fn list_team_repositories(&self, team_id: u64) -> Result<Vec<TeamRepository>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.team_id == team_id)
            .map(|a| TeamRepository {
                name: a
                    .full_name
                    .split('/')
                    .nth(1)
                    .unwrap_or(&a.full_name)
                    .to_string(),
                full_name: a.full_name.clone(),
                permissions: PermissionFlags::exact(&a.permission),
            })
            .collect())
    }

    fn list_repositories(&self, org: &str) -> Result<Vec<RemoteRepository>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .repositories
            .iter()
            .filter(|r| Self::org_of(&r.full_name) == org)
            .cloned()
            .collect())
    }

    fn create_repository(
        &self,
        org: &str,
        name: &str,
        fields: &RepositoryPatch,
    ) -> Result<RemoteRepository> {
        self.log(format!("create_repository {}/{}", org, name));
        let repository = RemoteRepository {
            name: name.to_string(),
            full_name: format!("{}/{}", org, name),
            description: Some(fields.description.clone()),
            homepage: Some(fields.homepage.clone()),
            private: fields.private,
            has_issues: fields.has_issues,
            has_wiki: fields.has_wiki,
            has_downloads: fields.has_downloads,
        };
        self.state
            .lock()
            .unwrap()
            .repositories
            .push(repository.clone());
        Ok(repository)
    }

    fn update_repository(
        &self,
        full_name: &str,
        fields: &RepositoryPatch,
    ) -> Result<RemoteRepository> {
        self.log(format!("update_repository {}", full_name));
        let mut state = self.state.lock().unwrap();
        let repository = state
            .repositories
            .iter_mut()
            .find(|r| r.full_name == full_name)
            .ok_or_else(|| Error::unknown(format!("repository {}", full_name)))?;
        repository.description = Some(fields.description.clone());
        repository.homepage = Some(fields.homepage.clone());
        repository.private = fields.private;
        repository.has_issues = fields.has_issues;
        repository.has_wiki = fields.has_wiki;
        repository.has_downloads = fields.has_downloads;
        Ok(repository.clone())
    }

    fn list_repository_teams(&self, full_name: &str) -> Result<Vec<RemoteTeam>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.full_name == full_name)
            .filter_map(|a| {
                state.teams.iter().find(|(_, t)| t.id == a.team_id).map(|(_, t)| {
                    RemoteTeam {
                        id: t.id,
                        name: t.name.clone(),
                        permission: a.permission.clone(),
                    }
                })
            })
            .collect())
    }

    fn add_team_repository(&self, team_id: u64, full_name: &str, permission: &str) -> Result<()> {
        self.log(format!(
            "add_team_repository {} {} {}",
            team_id, full_name, permission
        ));
        let mut state = self.state.lock().unwrap();
        if !state.teams.iter().any(|(_, t)| t.id == team_id) {
            return Err(Error::unknown(format!("team {}", team_id)));
        }
        if let Some(existing) = state
            .assignments
            .iter_mut()
            .find(|a| a.team_id == team_id && a.full_name == full_name)
        {
            existing.permission = permission.to_string();
        } else {
            state.assignments.push(Assignment {
                team_id,
                full_name: full_name.to_string(),
                permission: permission.to_string(),
            });
        }
        Ok(())
    }

    fn remove_team_repository(&self, team_id: u64, full_name: &str) -> Result<()> {
        self.log(format!("remove_team_repository {} {}", team_id, full_name));
        let mut state = self.state.lock().unwrap();
        state
            .assignments
            .retain(|a| !(a.team_id == team_id && a.full_name == full_name));
        Ok(())
    }

    fn list_hooks(&self, full_name: &str) -> Result<Vec<RemoteHook>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .hooks
            .iter()
            .filter(|(f, _)| f == full_name)
            .map(|(_, h)| h.clone())
            .collect())
    }

    fn create_hook(
        &self,
        full_name: &str,
        name: &str,
        config: &BTreeMap<String, String>,
        events: &[String],
        active: bool,
    ) -> Result<RemoteHook> {
        self.log(format!("create_hook {} {}", full_name, name));
        let mut state = self.state.lock().unwrap();
        if let Some((_, existing)) = state
            .hooks
            .iter_mut()
            .find(|(f, h)| f == full_name && h.name == name)
        {
            existing.config = config.clone();
            existing.events = events.to_vec();
            existing.active = active;
            return Ok(existing.clone());
        }
        let id = state.allocate_id();
        let hook = RemoteHook {
            id,
            name: name.to_string(),
            active,
            events: events.to_vec(),
            config: config.clone(),
        };
        state.hooks.push((full_name.to_string(), hook.clone()));
        Ok(hook)
    }

    fn delete_hook(&self, full_name: &str, hook_id: u64) -> Result<()> {
        self.log(format!("delete_hook {} {}", full_name, hook_id));
        let mut state = self.state.lock().unwrap();
        if !state
            .hooks
            .iter()
            .any(|(f, h)| f == full_name && h.id == hook_id)
        {
            return Err(Error::unknown(format!("hook {} on {}", hook_id, full_name)));
        }
        state
            .hooks
            .retain(|(f, h)| !(f == full_name && h.id == hook_id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_teams_are_scoped_by_org() {
        let mock = MockGithub::new();
        mock.add_team("acme", "core", "admin");
        mock.add_team("other", "core", "pull");

        let teams = mock.list_teams("acme").unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].permission, "admin");
    }

    #[test]
    fn test_mock_create_team_allocates_ids() {
        let mock = MockGithub::new();
        let a = mock.create_team("acme", "core", "pull").unwrap();
        let b = mock.create_team("acme", "deploy", "push").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(mock.calls(), vec![
            "create_team acme core pull",
            "create_team acme deploy push"
        ]);
    }

    #[test]
    fn test_mock_update_unknown_team() {
        let mock = MockGithub::new();
        assert!(mock.update_team(99, "push").is_err());
    }

    #[test]
    fn test_mock_delete_team_drops_assignments() {
        let mock = MockGithub::new();
        let id = mock.add_team("acme", "core", "pull");
        mock.add_assignment(id, "acme/svc", "push");
        mock.delete_team(id).unwrap();
        assert!(mock.list_team_repositories(id).unwrap().is_empty());
    }

    #[test]
    fn test_mock_assignment_flags_are_exact() {
        let mock = MockGithub::new();
        let id = mock.add_team("acme", "deploy", "pull");
        mock.add_assignment(id, "acme/svc", "push");

        let rows = mock.list_team_repositories(id).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "svc");
        assert!(rows[0].permissions.has("push"));
        assert!(!rows[0].permissions.has("pull"));
    }

    #[test]
    fn test_mock_reassignment_changes_level() {
        let mock = MockGithub::new();
        let id = mock.add_team("acme", "deploy", "pull");
        mock.add_assignment(id, "acme/svc", "push");
        mock.add_team_repository(id, "acme/svc", "pull").unwrap();

        let rows = mock.list_team_repositories(id).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].permissions.has("pull"));
    }

    #[test]
    fn test_mock_repository_teams_use_assignment_permission() {
        let mock = MockGithub::new();
        let id = mock.add_team("acme", "deploy", "pull");
        mock.add_assignment(id, "acme/svc", "push");

        let teams = mock.list_repository_teams("acme/svc").unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(teams[0].permission, "push");
    }

    #[test]
    fn test_mock_create_repository_round_trip() {
        let mock = MockGithub::new();
        let patch = RepositoryPatch {
            description: "service".to_string(),
            homepage: String::new(),
            private: true,
            has_issues: false,
            has_wiki: false,
            has_downloads: false,
        };
        mock.create_repository("acme", "svc", &patch).unwrap();

        let repos = mock.list_repositories("acme").unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].full_name, "acme/svc");
        assert_eq!(repos[0].description.as_deref(), Some("service"));
    }

    #[test]
    fn test_mock_create_hook_replaces_by_name() {
        let mock = MockGithub::new();
        let config: BTreeMap<String, String> =
            [("url".to_string(), "https://a".to_string())].into();
        let first = mock
            .create_hook("acme/svc", "ci", &config, &["push".to_string()], false)
            .unwrap();
        let second = mock
            .create_hook("acme/svc", "ci", &config, &["push".to_string()], true)
            .unwrap();

        assert_eq!(first.id, second.id);
        let hooks = mock.list_hooks("acme/svc").unwrap();
        assert_eq!(hooks.len(), 1);
        assert!(hooks[0].active);
    }

    #[test]
    fn test_mock_call_log_clear() {
        let mock = MockGithub::new();
        mock.create_team("acme", "core", "pull").unwrap();
        assert_eq!(mock.calls().len(), 1);
        mock.clear_calls();
        assert!(mock.calls().is_empty());
        // state survives the log reset
        assert_eq!(mock.list_teams("acme").unwrap().len(), 1);
    }
}
