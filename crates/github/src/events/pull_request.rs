use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GitHubRepo, GitHubUser, InstallationRef, Link, Organization};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    Assigned,
    Unassigned,
    Labeled,
    Unlabeled,
    Opened,
    Edited,
    Closed,
    Reopened,
    Synchronize,
    ConvertedToDraft,
    ReadyForReview,
    ReviewRequested,
    ReviewRequestRemoved,
    Locked,
    Unlocked,
    AutoMergeEnabled,
    AutoMergeDisabled,
    Enqueued,
    Dequeued,
    Milestoned,
    Demilestoned,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub node_id: Option<String>,
    pub url: Option<String>,
    pub name: String,
    pub color: Option<String>,
    #[serde(default)]
    pub default: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub node_id: Option<String>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub privacy: Option<String>,
    pub url: Option<String>,
    pub html_url: Option<String>,
    pub permission: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub description: Option<String>,
    pub state: Option<String>,
    pub html_url: Option<String>,
    #[serde(default)]
    pub open_issues: u64,
    #[serde(default)]
    pub closed_issues: u64,
    pub creator: Option<GitHubUser>,
    pub due_on: Option<DateTime<Utc>>,
}

/// Head or base of a pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestBranch {
    pub label: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
    pub user: GitHubUser,
    /// `null` when the fork the branch lives in has been deleted
    pub repo: Option<GitHubRepo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    pub html: Link,
    pub issue: Link,
    pub comments: Link,
    pub review_comments: Link,
    pub review_comment: Link,
    pub commits: Link,
    pub statuses: Link,
}

/// GitHub pull request (as appears in webhook payloads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: i64,
    pub node_id: Option<String>,
    pub number: i64,
    pub url: String,
    pub html_url: Option<String>,
    pub diff_url: Option<String>,
    pub patch_url: Option<String>,
    pub issue_url: Option<String>,
    pub state: PullRequestState,
    #[serde(default)]
    pub locked: bool,
    pub title: String,
    pub user: GitHubUser,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub merge_commit_sha: Option<String>,
    pub assignee: Option<GitHubUser>,
    #[serde(default)]
    pub assignees: Vec<GitHubUser>,
    #[serde(default)]
    pub requested_reviewers: Vec<GitHubUser>,
    #[serde(default)]
    pub requested_teams: Vec<Team>,
    #[serde(default)]
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub draft: bool,
    pub commits_url: Option<String>,
    pub review_comments_url: Option<String>,
    pub review_comment_url: Option<String>,
    pub comments_url: Option<String>,
    pub statuses_url: Option<String>,
    pub head: PullRequestBranch,
    pub base: PullRequestBranch,
    #[serde(rename = "_links")]
    pub links: Option<PullRequestLinks>,
    pub author_association: Option<String>,
    pub merged: Option<bool>,
    pub mergeable: Option<bool>,
    pub rebaseable: Option<bool>,
    pub mergeable_state: Option<String>,
    pub merged_by: Option<GitHubUser>,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub review_comments: u64,
    #[serde(default)]
    pub maintainer_can_modify: bool,
    #[serde(default)]
    pub commits: u64,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub changed_files: u64,
}

/// Pull request event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub number: i64,
    pub pull_request: PullRequest,
    pub repository: GitHubRepo,
    pub sender: GitHubUser,
    pub organization: Option<Organization>,
    pub installation: Option<InstallationRef>,
    /// Set for `labeled` / `unlabeled`
    pub label: Option<Label>,
    /// Set for `assigned` / `unassigned`
    pub assignee: Option<GitHubUser>,
    /// Set for `review_requested` / `review_request_removed` on a user
    pub requested_reviewer: Option<GitHubUser>,
    /// Set for `synchronize`
    pub before: Option<String>,
    pub after: Option<String>,
}

impl PullRequestEvent {
    /// A `closed` action on a pull request that was merged
    pub fn is_merge(&self) -> bool {
        self.action == PullRequestAction::Closed && self.pull_request.merged == Some(true)
    }
}
