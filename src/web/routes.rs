use axum::{
    extract::{Host, State},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use axum_extra::extract::{CookieJar, Form};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Datelike, Local};
use futures::future::join_all;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use super::cookies::{self, CookieConfig};
use super::error::{ApiError, PageError};
use super::state::AppState;
use super::views::{
    format_today, render_connect_page, render_standup_page, IssuesView, ProjectsView,
    StandupPage, UserWidget,
};
use crate::jira::{
    assigned_issues_jql, unassigned_issues_jql, Issue, JiraError, JiraSession, ProjectPage,
};
use crate::rotation::standup_order;
use crate::selection::Selection;

const INVALID_HOST_MESSAGE: &str =
    "Enter the full address of your Jira site, e.g. https://your-team.atlassian.net";
const MISSING_CREDENTIALS_MESSAGE: &str = "Email and API token are both required.";

#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    host_url: String,
    email: String,
    api_token: String,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsRequest {
    #[serde(default)]
    project: Vec<String>,
}

pub async fn home(jar: CookieJar) -> Html<String> {
    let host_url = jar
        .get(cookies::HOST_URL_COOKIE)
        .map(|cookie| cookie.value().to_string());
    Html(render_connect_page(host_url.as_deref(), None))
}

pub async fn connect(
    Host(host): Host,
    jar: CookieJar,
    Form(request): Form<ConnectRequest>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    let host_url = request.host_url.trim();
    let reject = |message: &str| {
        (
            StatusCode::BAD_REQUEST,
            Html(render_connect_page(Some(host_url), Some(message))),
        )
    };

    let url = Url::parse(host_url).map_err(|_| reject(INVALID_HOST_MESSAGE))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(reject(INVALID_HOST_MESSAGE));
    }

    let email = request.email.trim();
    let api_token = request.api_token.trim();
    if email.is_empty() || api_token.is_empty() {
        return Err(reject(MISSING_CREDENTIALS_MESSAGE));
    }

    let credentials = STANDARD.encode(format!("{email}:{api_token}"));
    let session = JiraSession::new(url.as_str(), &credentials);
    info!(jira = %session.host_url, "storing Jira connection");

    let jar = cookies::store_session(jar, &CookieConfig::for_host(&host), &session);
    Ok((jar, Redirect::to("/standup")))
}

pub async fn standup(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, PageError> {
    let session = cookies::session(&jar).ok_or(PageError::MissingSession)?;
    let selection = cookies::selection(&jar);
    let now = Local::now();

    let (users, projects) = tokio::join!(
        state.jira.search_users(&session),
        state.jira.search_projects(&session),
    );
    let users = standup_order(users?, now.day());

    let projects = match projects {
        Ok(page) => ProjectsView::Loaded(page.values),
        Err(err) if err.is_unauthorized() => return Err(err.into()),
        Err(err) => {
            warn!(?err, "failed to load projects");
            ProjectsView::Unavailable
        }
    };

    // Stale keys in the cookie must not reach JQL, where Jira would reject them.
    let project_keys: Vec<String> = match &projects {
        ProjectsView::Loaded(values) => selection
            .filter(values)
            .into_iter()
            .map(|project| project.key.clone())
            .collect(),
        ProjectsView::Unavailable => selection.keys().to_vec(),
    };

    let (users, unassigned) = if project_keys.is_empty() {
        let users: Vec<UserWidget> = users
            .into_iter()
            .map(|user| UserWidget {
                user,
                issues: IssuesView::Disabled,
            })
            .collect();
        (users, None)
    } else {
        let max_results = state.config.max_issues;
        let jira = &state.jira;
        let session = &session;
        let assigned = users.iter().map(|user| {
            let jql = assigned_issues_jql(&user.account_id, &project_keys);
            async move { jira.search_issues(session, &jql, max_results).await }
        });
        let unassigned_jql = unassigned_issues_jql(&project_keys);

        let (assigned, unassigned) = tokio::join!(
            join_all(assigned),
            jira.search_issues(session, &unassigned_jql, max_results),
        );

        let mut widgets = Vec::with_capacity(users.len());
        for (user, issues) in users.into_iter().zip(assigned) {
            let issues = issues_view(issues, &user.account_id)?;
            widgets.push(UserWidget { user, issues });
        }
        (widgets, Some(issues_view(unassigned, "unassigned")?))
    };

    let page = StandupPage {
        today: format_today(&now),
        session: &session,
        selection: &selection,
        projects,
        users,
        unassigned,
    };
    Ok(Html(render_standup_page(&page)))
}

fn issues_view(
    result: Result<Vec<Issue>, JiraError>,
    widget: &str,
) -> Result<IssuesView, PageError> {
    match result {
        Ok(issues) => Ok(IssuesView::Loaded(issues)),
        Err(err) if err.is_unauthorized() => Err(err.into()),
        Err(err) => {
            warn!(?err, widget, "failed to load issues");
            Ok(IssuesView::Failed)
        }
    }
}

pub async fn save_projects(
    Host(host): Host,
    jar: CookieJar,
    Form(request): Form<ProjectsRequest>,
) -> (CookieJar, Redirect) {
    let selection = Selection::from_keys(&request.project);
    info!(projects = %selection.to_cookie_value(), "saving project selection");
    let jar = cookies::store_selection(jar, &CookieConfig::for_host(&host), &selection);
    (jar, Redirect::to("/standup"))
}

pub async fn projects_api(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<ProjectPage>, ApiError> {
    let session = cookies::session(&jar).ok_or(ApiError::MissingSession)?;
    Ok(Json(state.jira.search_projects(&session).await?))
}

pub async fn healthz() -> &'static str {
    "ok"
}
