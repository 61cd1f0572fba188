//! Shared harness: a fake Jira site and a running dashboard pointed at it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reqwest::redirect::Policy;
use serde_json::json;
use standup::{web, AppState, Args};
use tokio::net::TcpListener;

/// `base64("a:b")`, the only credential the fake Jira accepts.
pub const CREDENTIALS: &str = "YTpi";

#[derive(Clone, Copy, Debug)]
pub enum Upstream {
    Healthy,
    Unauthorized,
    Broken,
    IssuesUnauthorized,
    IssuesBroken,
    ProjectsBroken,
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub jira_addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn start(upstream: Upstream) -> Self {
        let jira_addr = serve(fake_jira(upstream)).await;
        let state = AppState::new(&Args::default()).expect("jira client");
        let addr = serve(web::router(state)).await;
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .expect("test client");

        Self {
            addr,
            jira_addr,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn jira_url(&self) -> String {
        format!("http://{}", self.jira_addr)
    }

    pub fn session_cookie(&self) -> String {
        format!("jiraHostUrl={}; credentials={}", self.jira_url(), CREDENTIALS)
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

fn fake_jira(upstream: Upstream) -> Router {
    Router::new()
        .route("/rest/api/3/users/search", get(users))
        .route("/rest/api/3/project/search", get(projects))
        .route("/rest/api/3/search", get(issues))
        .with_state(upstream)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(&format!("Basic {CREDENTIALS}")[..])
}

async fn users(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    match upstream {
        Upstream::Unauthorized => return StatusCode::UNAUTHORIZED.into_response(),
        Upstream::Broken => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ if !authorized(&headers) => return StatusCode::UNAUTHORIZED.into_response(),
        _ => {}
    }
    Json(json!([
        {"accountId": "u-ann", "accountType": "atlassian", "active": true, "displayName": "Ann Archer"},
        {"accountId": "u-bot", "accountType": "app", "active": true, "displayName": "Deploy Bot"},
        {"accountId": "u-bea", "accountType": "atlassian", "active": true, "displayName": "Bea Baker",
         "avatarUrls": {"48x48": "https://avatars.example/bea.png"}},
        {"accountId": "u-old", "accountType": "atlassian", "active": false, "displayName": "Olly Former"},
        {"accountId": "u-cal", "accountType": "atlassian", "active": true, "displayName": "Cal Cooper"}
    ]))
    .into_response()
}

async fn projects(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    match upstream {
        Upstream::Unauthorized => return StatusCode::UNAUTHORIZED.into_response(),
        Upstream::Broken | Upstream::ProjectsBroken => {
            return StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
        _ if !authorized(&headers) => return StatusCode::UNAUTHORIZED.into_response(),
        _ => {}
    }
    Json(json!({
        "startAt": 0,
        "total": 3,
        "values": [
            {"id": "1", "key": "OPS", "name": "Operations"},
            {"id": "2", "key": "WEB", "name": "Website"},
            {"id": "3", "key": "APP", "name": "Mobile app"}
        ]
    }))
    .into_response()
}

async fn issues(
    State(upstream): State<Upstream>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    match upstream {
        Upstream::Unauthorized | Upstream::IssuesUnauthorized => {
            return StatusCode::UNAUTHORIZED.into_response()
        }
        Upstream::Broken | Upstream::IssuesBroken => {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        _ if !authorized(&headers) => return StatusCode::UNAUTHORIZED.into_response(),
        _ => {}
    }
    let jql = query.get("jql").cloned().unwrap_or_default();
    let (key, summary) = if jql.contains("assignee is EMPTY") {
        ("OPS-9", "Nobody owns this".to_string())
    } else {
        ("OPS-1", format!("Assigned work ({})", jql.split('"').nth(1).unwrap_or("?")))
    };
    Json(json!({
        "issues": [{
            "key": key,
            "fields": {
                "summary": summary,
                "status": {"name": "In Progress"},
                "updated": "2026-10-17T09:12:44.000+0000"
            }
        }]
    }))
    .into_response()
}
