//! Blocking REST implementation of [`GithubApi`].
//!
//! Talks to the GitHub v3 API with [`ureq`]. Authentication is a token
//! in the `Authorization` header; unauthenticated clients work against
//! public data but hit the 60 requests/hour rate limit quickly. No call
//! is retried.

use crate::client::GithubApi;
use crate::error::Result;
use crate::types::{
    RemoteHook, RemoteRepository, RemoteTeam, RepositoryPatch, TeamRepository,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = "backpack";

/// GitHub REST client.
///
/// # Example
///
/// ```no_run
/// use hubkit::{GithubApi, RestClient};
///
/// let client = RestClient::new(std::env::var("GITHUB_TOKEN").ok());
/// let teams = client.list_teams("acme").unwrap();
/// println!("Found {} teams", teams.len());
/// ```
pub struct RestClient {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL.
    api_base: String,
    /// Token for the `Authorization` header, if any.
    token: Option<String>,
}

impl RestClient {
    /// Create a client against `api.github.com`.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self::with_api_base("https://api.github.com", token)
    }

    /// Create a client with a custom API base (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_api_base(api_base: impl Into<String>, token: Option<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: api_base.into(),
            token,
        }
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    // -------------------------------------------------------------------------
    // URL builders
    // -------------------------------------------------------------------------

    fn org_teams_url(&self, org: &str) -> String {
        format!("{}/orgs/{}/teams", self.api_base, org)
    }

    fn team_url(&self, team_id: u64) -> String {
        format!("{}/teams/{}", self.api_base, team_id)
    }

    fn team_repos_url(&self, team_id: u64) -> String {
        format!("{}/teams/{}/repos", self.api_base, team_id)
    }

    fn team_repo_url(&self, team_id: u64, full_name: &str) -> String {
        format!("{}/teams/{}/repos/{}", self.api_base, team_id, full_name)
    }

    fn org_repos_url(&self, org: &str) -> String {
        format!("{}/orgs/{}/repos", self.api_base, org)
    }

    fn repo_url(&self, full_name: &str) -> String {
        format!("{}/repos/{}", self.api_base, full_name)
    }

    fn repo_teams_url(&self, full_name: &str) -> String {
        format!("{}/repos/{}/teams", self.api_base, full_name)
    }

    fn hooks_url(&self, full_name: &str) -> String {
        format!("{}/repos/{}/hooks", self.api_base, full_name)
    }

    fn hook_url(&self, full_name: &str, hook_id: u64) -> String {
        format!("{}/repos/{}/hooks/{}", self.api_base, full_name, hook_id)
    }

    // -------------------------------------------------------------------------
    // Request helpers
    // -------------------------------------------------------------------------

    fn headers<Any>(&self, request: ureq::RequestBuilder<Any>) -> ureq::RequestBuilder<Any> {
        let request = request
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT);
        match &self.token {
            Some(token) => request.header("Authorization", format!("token {}", token)),
            None => request,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .headers(self.agent.get(url))
            .call()?
            .body_mut()
            .read_json()?;
        Ok(response)
    }

    fn post_json<T: DeserializeOwned>(&self, url: &str, body: impl Serialize) -> Result<T> {
        let response = self
            .headers(self.agent.post(url))
            .send_json(body)?
            .body_mut()
            .read_json()?;
        Ok(response)
    }

    fn patch_json<T: DeserializeOwned>(&self, url: &str, body: impl Serialize) -> Result<T> {
        let response = self
            .headers(self.agent.patch(url))
            .send_json(body)?
            .body_mut()
            .read_json()?;
        Ok(response)
    }

    fn put(&self, url: &str, body: impl Serialize) -> Result<()> {
        self.headers(self.agent.put(url)).send_json(body)?;
        Ok(())
    }

    fn delete(&self, url: &str) -> Result<()> {
        self.headers(self.agent.delete(url)).call()?;
        Ok(())
    }
}

impl GithubApi for RestClient {
    fn list_teams(&self, org: &str) -> Result<Vec<RemoteTeam>> {
        self.get_json(&self.org_teams_url(org))
    }

    fn create_team(&self, org: &str, name: &str, permission: &str) -> Result<RemoteTeam> {
        self.post_json(
            &self.org_teams_url(org),
            serde_json::json!({ "name": name, "permission": permission }),
        )
    }

    fn update_team(&self, team_id: u64, permission: &str) -> Result<()> {
        let _: serde_json::Value = self.patch_json(
            &self.team_url(team_id),
            serde_json::json!({ "permission": permission }),
        )?;
        Ok(())
    }

    fn delete_team(&self, team_id: u64) -> Result<()> {
        self.delete(&self.team_url(team_id))
    }

    fn list_team_repositories(&self, team_id: u64) -> Result<Vec<TeamRepository>> {
        self.get_json(&self.team_repos_url(team_id))
    }

    fn list_repositories(&self, org: &str) -> Result<Vec<RemoteRepository>> {
        self.get_json(&self.org_repos_url(org))
    }

    fn create_repository(
        &self,
        org: &str,
        name: &str,
        fields: &RepositoryPatch,
    ) -> Result<RemoteRepository> {
        self.post_json(
            &self.org_repos_url(org),
            serde_json::json!({
                "name": name,
                "description": fields.description,
                "homepage": fields.homepage,
                "private": fields.private,
                "has_issues": fields.has_issues,
                "has_wiki": fields.has_wiki,
                "has_downloads": fields.has_downloads,
            }),
        )
    }

    fn update_repository(
        &self,
        full_name: &str,
        fields: &RepositoryPatch,
    ) -> Result<RemoteRepository> {
        self.patch_json(&self.repo_url(full_name), fields)
    }

    fn list_repository_teams(&self, full_name: &str) -> Result<Vec<RemoteTeam>> {
        self.get_json(&self.repo_teams_url(full_name))
    }

    fn add_team_repository(&self, team_id: u64, full_name: &str, permission: &str) -> Result<()> {
        self.put(
            &self.team_repo_url(team_id, full_name),
            serde_json::json!({ "permission": permission }),
        )
    }

    fn remove_team_repository(&self, team_id: u64, full_name: &str) -> Result<()> {
        self.delete(&self.team_repo_url(team_id, full_name))
    }

    fn list_hooks(&self, full_name: &str) -> Result<Vec<RemoteHook>> {
        self.get_json(&self.hooks_url(full_name))
    }

    fn create_hook(
        &self,
        full_name: &str,
        name: &str,
        config: &BTreeMap<String, String>,
        events: &[String],
        active: bool,
    ) -> Result<RemoteHook> {
        self.post_json(
            &self.hooks_url(full_name),
            serde_json::json!({
                "name": name,
                "config": config,
                "events": events,
                "active": active,
            }),
        )
    }

    fn delete_hook(&self, full_name: &str, hook_id: u64) -> Result<()> {
        self.delete(&self.hook_url(full_name, hook_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_teams_url() {
        let client = RestClient::new(None);
        assert_eq!(
            client.org_teams_url("acme"),
            "https://api.github.com/orgs/acme/teams"
        );
    }

    #[test]
    fn test_team_urls() {
        let client = RestClient::new(None);
        assert_eq!(client.team_url(17), "https://api.github.com/teams/17");
        assert_eq!(
            client.team_repos_url(17),
            "https://api.github.com/teams/17/repos"
        );
        assert_eq!(
            client.team_repo_url(17, "acme/svc"),
            "https://api.github.com/teams/17/repos/acme/svc"
        );
    }

    #[test]
    fn test_repo_urls() {
        let client = RestClient::new(None);
        assert_eq!(
            client.org_repos_url("acme"),
            "https://api.github.com/orgs/acme/repos"
        );
        assert_eq!(
            client.repo_url("acme/svc"),
            "https://api.github.com/repos/acme/svc"
        );
        assert_eq!(
            client.repo_teams_url("acme/svc"),
            "https://api.github.com/repos/acme/svc/teams"
        );
    }

    #[test]
    fn test_hook_urls() {
        let client = RestClient::new(None);
        assert_eq!(
            client.hooks_url("acme/svc"),
            "https://api.github.com/repos/acme/svc/hooks"
        );
        assert_eq!(
            client.hook_url("acme/svc", 3),
            "https://api.github.com/repos/acme/svc/hooks/3"
        );
    }

    #[test]
    fn test_custom_api_base() {
        let client = RestClient::with_api_base("https://ghe.example.com/api/v3", None);
        assert_eq!(client.api_base(), "https://ghe.example.com/api/v3");
        assert_eq!(
            client.org_teams_url("acme"),
            "https://ghe.example.com/api/v3/orgs/acme/teams"
        );
    }
}
