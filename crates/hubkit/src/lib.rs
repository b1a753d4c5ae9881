//! # hubkit
//!
//! Minimal blocking client for the slice of the GitHub management API
//! that backpack converges: organization teams, repositories,
//! team-repository permission assignments and repository hooks.
//!
//! The crate is deliberately small:
//!
//! - [`GithubApi`]: the capability set as a trait, so the convergence
//!   engine never depends on a concrete transport
//! - [`RestClient`]: the blocking `ureq` implementation
//! - [`MockGithub`]: an in-memory fake that applies mutations and logs
//!   them, for tests without network access
//!
//! ## Example
//!
//! ```no_run
//! use hubkit::{GithubApi, RestClient};
//!
//! let client = RestClient::new(std::env::var("GITHUB_TOKEN").ok());
//!
//! for team in client.list_teams("acme").unwrap() {
//!     println!("{} ({})", team.name, team.permission);
//! }
//! ```
//!
//! ## Errors
//!
//! Every call returns [`Result`]. There is no retry logic and no error
//! classification beyond what the variants carry - a failed call is
//! terminal for the caller's current run.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod rest;
pub mod types;

pub use client::{GithubApi, MockGithub};
pub use error::{Error, Result};
pub use rest::RestClient;
pub use types::{
    PermissionFlags, RemoteHook, RemoteRepository, RemoteTeam, RepositoryPatch, TeamRepository,
};
