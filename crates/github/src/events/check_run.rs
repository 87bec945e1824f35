use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{App, GitHubRepo, GitHubUser, InstallationRef, Organization};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunAction {
    Created,
    Completed,
    Rerequested,
    RequestedAction,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    TimedOut,
    ActionRequired,
    Stale,
    Skipped,
    StartupFailure,
    #[serde(other)]
    Unknown,
}

/// Summary a check run reports back to the pull request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckRunOutput {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub annotations_count: u64,
    pub annotations_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRepoSummary {
    pub id: i64,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPullRequestRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub repo: CheckRepoSummary,
}

/// Pull request a check run or suite is attached to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPullRequest {
    pub id: i64,
    pub number: i64,
    pub url: String,
    pub head: CheckPullRequestRef,
    pub base: CheckPullRequestRef,
}

/// Check suite grouping one or more check runs for a commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSuite {
    pub id: i64,
    pub node_id: Option<String>,
    pub head_branch: Option<String>,
    pub head_sha: String,
    pub status: Option<CheckStatus>,
    pub conclusion: Option<CheckConclusion>,
    pub url: Option<String>,
    pub before: Option<String>,
    pub after: Option<String>,
    #[serde(default)]
    pub pull_requests: Vec<CheckPullRequest>,
    pub app: Option<App>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    pub id: i64,
    pub node_id: Option<String>,
    pub name: String,
    pub head_sha: String,
    pub external_id: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub details_url: Option<String>,
    pub status: CheckStatus,
    pub conclusion: Option<CheckConclusion>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub output: CheckRunOutput,
    pub check_suite: Option<CheckSuite>,
    pub app: Option<App>,
    #[serde(default)]
    pub pull_requests: Vec<CheckPullRequest>,
}

impl CheckRun {
    pub fn is_completed(&self) -> bool {
        self.status == CheckStatus::Completed
    }
}

/// Button the user clicked for a `requested_action` check run event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedAction {
    pub identifier: String,
}

/// Check run event payload
///
/// Triggered when a check run is created, rerequested, completed or has a
/// requested action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRunEvent {
    pub action: CheckRunAction,
    pub check_run: CheckRun,
    pub requested_action: Option<RequestedAction>,
    pub repository: GitHubRepo,
    pub organization: Option<Organization>,
    pub sender: GitHubUser,
    pub installation: Option<InstallationRef>,
}
