//! Phase 2: converge organization repositories.

use super::ConvergeOptions;
use crate::model::{Organization, Repository};
use crate::ui;
use anyhow::{Context, Result};
use hubkit::{GithubApi, RemoteRepository, RepositoryPatch};

/// Create missing repositories and update drifted ones.
///
/// Returns the remote repository list with newly created repositories
/// appended; the permission and hook phases iterate over it so that, in
/// a dry run, repositories whose creation was skipped are skipped too.
/// Unmanaged remote repositories are reported and never touched.
pub(crate) fn converge(
    client: &dyn GithubApi,
    org: &Organization,
    opts: &ConvergeOptions,
) -> Result<Vec<RemoteRepository>> {
    let mut remote_repositories = client
        .list_repositories(&org.name)
        .with_context(|| format!("listing repositories of organization '{}'", org.name))?;

    for remote in &remote_repositories {
        if org.has_repository(&remote.name) {
            converge_repository(client, org.repository(&remote.name)?, remote, opts)?;
        } else {
            ui::warn(&format!("unmanaged repository '{}'", remote.name));
        }
    }

    for repository in org.repositories() {
        if !remote_repositories.iter().any(|r| r.name == repository.name) {
            ui::info(&format!("Creating repository {}", repository.name));
            if !opts.dry_run {
                let created =
                    client.create_repository(&org.name, &repository.name, &patch(repository))?;
                remote_repositories.push(created);
            }
        }
    }
    Ok(remote_repositories)
}

/// Update a matched repository if at least one managed field differs.
///
/// The remote reports unset description/homepage as null; both compare
/// equal to the desired empty string. All differing fields go out in
/// one combined call.
fn converge_repository(
    client: &dyn GithubApi,
    repository: &Repository,
    remote: &RemoteRepository,
    opts: &ConvergeOptions,
) -> Result<()> {
    let update = remote.description.as_deref().unwrap_or("") != repository.description
        || remote.homepage.as_deref().unwrap_or("") != repository.homepage
        || remote.private != repository.private
        || remote.has_issues != repository.issues
        || remote.has_wiki != repository.wiki
        || remote.has_downloads != repository.downloads;

    if update {
        ui::info(&format!("Updating repository {}", repository.name));
        if !opts.dry_run {
            client.update_repository(&remote.full_name, &patch(repository))?;
        }
    }
    Ok(())
}

fn patch(repository: &Repository) -> RepositoryPatch {
    RepositoryPatch {
        description: repository.description.clone(),
        homepage: repository.homepage.clone(),
        private: repository.private,
        has_issues: repository.issues,
        has_wiki: repository.wiki,
        has_downloads: repository.downloads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RepositorySpec;
    use hubkit::MockGithub;

    fn build_org(name: &str, spec: RepositorySpec) -> Organization {
        let mut org = Organization::new("acme");
        org.define_repository(name, spec).unwrap();
        org
    }

    fn remote(description: Option<&str>, private: bool) -> RemoteRepository {
        RemoteRepository {
            name: "svc".to_string(),
            full_name: "acme/svc".to_string(),
            description: description.map(str::to_string),
            homepage: None,
            private,
            has_issues: false,
            has_wiki: false,
            has_downloads: false,
        }
    }

    #[test]
    fn test_creates_missing_repository_with_all_fields() {
        let org = build_org(
            "svc",
            RepositorySpec {
                description: "the service".to_string(),
                issues: true,
                ..RepositorySpec::default()
            },
        );
        let mock = MockGithub::new();

        let listed = converge(&mock, &org, &ConvergeOptions::default()).unwrap();

        assert_eq!(mock.calls(), vec!["create_repository acme/svc"]);
        // the created repository is appended for the later phases
        assert_eq!(listed.len(), 1);
        let stored = &mock.list_repositories("acme").unwrap()[0];
        assert_eq!(stored.description.as_deref(), Some("the service"));
        assert!(stored.private);
        assert!(stored.has_issues);
    }

    #[test]
    fn test_updates_on_any_field_drift() {
        let org = build_org(
            "svc",
            RepositorySpec {
                description: "new words".to_string(),
                ..RepositorySpec::default()
            },
        );
        let mock = MockGithub::new();
        mock.add_repository(remote(Some("old words"), true));

        converge(&mock, &org, &ConvergeOptions::default()).unwrap();

        assert_eq!(mock.calls(), vec!["update_repository acme/svc"]);
    }

    #[test]
    fn test_null_description_equals_empty_string() {
        let org = build_org("svc", RepositorySpec::default());
        let mock = MockGithub::new();
        mock.add_repository(remote(None, true));

        converge(&mock, &org, &ConvergeOptions::default()).unwrap();

        assert_eq!(mock.calls(), Vec::<String>::new());
    }

    #[test]
    fn test_privacy_drift_triggers_update() {
        let org = build_org("svc", RepositorySpec::default());
        let mock = MockGithub::new();
        mock.add_repository(remote(None, false));

        converge(&mock, &org, &ConvergeOptions::default()).unwrap();

        assert_eq!(mock.calls(), vec!["update_repository acme/svc"]);
        assert!(mock.list_repositories("acme").unwrap()[0].private);
    }

    #[test]
    fn test_unmanaged_repository_is_left_alone() {
        let org = Organization::new("acme");
        let mock = MockGithub::new();
        mock.add_repository(remote(Some("who knows"), false));

        converge(&mock, &org, &ConvergeOptions::default()).unwrap();

        assert_eq!(mock.calls(), Vec::<String>::new());
        assert_eq!(mock.list_repositories("acme").unwrap().len(), 1);
    }

    #[test]
    fn test_dry_run_does_not_append_created_repositories() {
        let org = build_org("svc", RepositorySpec::default());
        let mock = MockGithub::new();

        let opts = ConvergeOptions {
            dry_run: true,
            ..ConvergeOptions::default()
        };
        let listed = converge(&mock, &org, &opts).unwrap();

        assert_eq!(mock.calls(), Vec::<String>::new());
        assert!(listed.is_empty());
    }
}
