use serde::{Deserialize, Serialize};

use super::{GitHubUser, Permissions, RepositoryRef, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationAction {
    Created,
    Deleted,
    Suspend,
    Unsuspend,
    NewPermissionsAccepted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositorySelection {
    All,
    Selected,
    #[serde(other)]
    Unknown,
}

/// A GitHub App installation on a user or organization account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installation {
    pub id: i64,
    pub account: GitHubUser,
    pub repository_selection: RepositorySelection,
    pub access_tokens_url: String,
    pub repositories_url: String,
    pub html_url: String,
    pub app_id: i64,
    pub app_slug: Option<String>,
    pub target_id: i64,
    pub target_type: String,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub events: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub single_file_name: Option<String>,
    pub suspended_at: Option<Timestamp>,
    pub suspended_by: Option<GitHubUser>,
}

/// Installation event payload
///
/// Triggered when a GitHub App is installed, uninstalled, suspended or has
/// new permissions accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationEvent {
    pub action: InstallationAction,
    pub installation: Installation,
    /// Repositories the installation can access; absent for `all` selections
    /// on some actions
    #[serde(default)]
    pub repositories: Vec<RepositoryRef>,
    pub requester: Option<GitHubUser>,
    pub sender: GitHubUser,
}
