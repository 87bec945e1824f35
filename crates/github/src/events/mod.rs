//! GitHub webhook payload types
//!
//! Records mirror GitHub's public webhook schema. Unknown fields are ignored,
//! nullable or event-dependent fields are `Option`, and everything else is
//! required. Nested shapes (users, repositories, links) are shared between
//! events.

mod check_run;
mod installation;
mod pull_request;

pub use check_run::*;
pub use installation::*;
pub use pull_request::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Permission name to access level, e.g. `"contents": "read"`
pub type Permissions = BTreeMap<String, String>;

/// A timestamp GitHub sends either as Unix seconds or as RFC 3339.
///
/// Installation and push payloads still use the integer form for some
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Unix(i64),
    Rfc3339(DateTime<Utc>),
}

impl Timestamp {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Unix(secs) => DateTime::from_timestamp(secs, 0),
            Timestamp::Rfc3339(dt) => Some(dt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    User,
    Organization,
    Bot,
    #[serde(other)]
    Unknown,
}

/// GitHub user, bot or organization account (as appears in webhook payloads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub id: i64,
    pub login: String,
    pub node_id: Option<String>,
    pub avatar_url: Option<String>,
    pub gravatar_id: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub site_admin: bool,
}

/// Organization the event belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub login: String,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub avatar_url: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    pub name: String,
    pub spdx_id: Option<String>,
    pub url: Option<String>,
}

/// GitHub repository (as appears in webhook payloads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: i64,
    pub node_id: Option<String>,
    pub name: String,
    pub full_name: String,
    pub owner: GitHubUser,
    #[serde(default)]
    pub private: bool,
    pub html_url: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub fork: bool,
    pub url: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<Timestamp>,
    pub git_url: Option<String>,
    pub ssh_url: Option<String>,
    pub clone_url: Option<String>,
    pub svn_url: Option<String>,
    pub homepage: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    pub language: Option<String>,
    #[serde(default)]
    pub has_issues: bool,
    #[serde(default)]
    pub has_projects: bool,
    #[serde(default)]
    pub has_downloads: bool,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub has_pages: bool,
    #[serde(default)]
    pub forks_count: u64,
    pub mirror_url: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub open_issues_count: u64,
    pub license: Option<License>,
    pub default_branch: Option<String>,
}

/// Abbreviated repository, as listed in installation payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub id: i64,
    pub node_id: Option<String>,
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
}

/// Installation reference attached to events delivered to a GitHub App
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationRef {
    pub id: i64,
    pub node_id: Option<String>,
}

/// GitHub App
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    pub id: i64,
    pub slug: Option<String>,
    pub node_id: Option<String>,
    pub owner: Option<GitHubUser>,
    pub name: String,
    pub description: Option<String>,
    pub external_url: Option<String>,
    pub html_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub events: Vec<String>,
}

/// Hypermedia link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

/// Sent once when a webhook is created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingEvent {
    pub zen: String,
    pub hook_id: Option<i64>,
    pub repository: Option<GitHubRepo>,
    pub organization: Option<Organization>,
    pub sender: Option<GitHubUser>,
}

/// Loosely typed payload for events without a dedicated schema.
///
/// Every field is optional since each event type carries a different subset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Event {
    pub action: Option<String>,
    pub check_run: Option<CheckRun>,
    pub installation: Option<InstallationRef>,
    pub number: Option<i64>,
    pub organization: Option<Organization>,
    pub pull_request: Option<PullRequest>,
    pub repository: Option<GitHubRepo>,
    #[serde(default)]
    pub repositories: Vec<RepositoryRef>,
    pub sender: Option<GitHubUser>,
}
