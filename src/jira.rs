use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const USER_SEARCH_PATH: &str = "/rest/api/3/users/search";
const PROJECT_SEARCH_PATH: &str = "/rest/api/3/project/search";
const ISSUE_SEARCH_PATH: &str = "/rest/api/3/search";
const ISSUE_FIELDS: &str = "summary,status,updated";
const AVATAR_SIZES: [&str; 4] = ["48x48", "32x32", "24x24", "16x16"];

#[derive(Debug, Error)]
pub enum JiraError {
    #[error("Jira rejected the stored credentials")]
    Unauthorized,

    #[error("Jira answered with unexpected status {0}")]
    UnexpectedStatus(StatusCode),

    #[error("request to Jira failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl JiraError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, JiraError::Unauthorized)
    }
}

/// Connection details read from the browser's cookies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JiraSession {
    pub host_url: String,
    /// Base64 `email:api_token`, sent verbatim as a Basic credential.
    pub credentials: String,
}

impl JiraSession {
    pub fn new(host_url: &str, credentials: &str) -> Self {
        Self {
            host_url: host_url.trim().trim_end_matches('/').to_string(),
            credentials: credentials.trim().to_string(),
        }
    }

    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.host_url, key)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub account_id: String,
    #[serde(default)]
    pub account_type: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_urls: HashMap<String, String>,
}

impl User {
    /// Largest avatar Jira offers, from 48x48 down to 16x16.
    pub fn avatar(&self) -> Option<&str> {
        AVATAR_SIZES
            .iter()
            .find_map(|size| self.avatar_urls.get(*size))
            .map(String::as_str)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Project {
    pub key: String,
    pub name: String,
}

/// Body shape shared by Jira's project search and the local `/api/projects`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProjectPage {
    #[serde(default)]
    pub values: Vec<Project>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    pub status: Option<IssueStatus>,
    pub updated: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct IssueStatus {
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct IssuePage {
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(Clone)]
pub struct JiraClient {
    http: Client,
}

impl JiraClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self, JiraError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    pub async fn search_users(&self, session: &JiraSession) -> Result<Vec<User>, JiraError> {
        self.fetch(self.request(session, USER_SEARCH_PATH)).await
    }

    pub async fn search_projects(&self, session: &JiraSession) -> Result<ProjectPage, JiraError> {
        self.fetch(self.request(session, PROJECT_SEARCH_PATH)).await
    }

    pub async fn search_issues(
        &self,
        session: &JiraSession,
        jql: &str,
        max_results: u32,
    ) -> Result<Vec<Issue>, JiraError> {
        let max_results = max_results.to_string();
        let request = self.request(session, ISSUE_SEARCH_PATH).query(&[
            ("jql", jql),
            ("fields", ISSUE_FIELDS),
            ("maxResults", max_results.as_str()),
        ]);
        let page: IssuePage = self.fetch(request).await?;
        Ok(page.issues)
    }

    fn request(&self, session: &JiraSession, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", session.host_url, path))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", session.credentials),
            )
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, JiraError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "jira response");
        match status {
            StatusCode::OK => Ok(response.json().await?),
            StatusCode::UNAUTHORIZED => Err(JiraError::Unauthorized),
            other => Err(JiraError::UnexpectedStatus(other)),
        }
    }
}

/// Open issues assigned to `account_id` within the selected projects.
pub fn assigned_issues_jql(account_id: &str, project_keys: &[String]) -> String {
    format!(
        "assignee = {} AND project in ({}) AND statusCategory != Done ORDER BY updated DESC",
        quote(account_id),
        quote_list(project_keys)
    )
}

/// Open issues nobody has picked up yet within the selected projects.
pub fn unassigned_issues_jql(project_keys: &[String]) -> String {
    format!(
        "assignee is EMPTY AND project in ({}) AND statusCategory != Done ORDER BY updated DESC",
        quote_list(project_keys)
    )
}

fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| quote(value))
        .collect::<Vec<_>>()
        .join(", ")
}
