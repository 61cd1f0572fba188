use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};

use crate::jira::JiraError;

/// Failures of HTML pages. Every variant sends the browser back home.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("no Jira host configured")]
    MissingSession,

    #[error(transparent)]
    Upstream(#[from] JiraError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match &self {
            PageError::MissingSession => info!("no Jira session cookie, redirecting home"),
            PageError::Upstream(err) if err.is_unauthorized() => {
                info!("Jira rejected credentials, redirecting home")
            }
            PageError::Upstream(err) => error!(?err, "Jira request failed, redirecting home"),
        }
        Redirect::temporary("/").into_response()
    }
}

/// Failures of JSON endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no Jira host configured")]
    MissingSession,

    #[error(transparent)]
    Upstream(#[from] JiraError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingSession => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(JiraError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ApiError::Upstream(err) => {
                error!(?err, "Jira request failed");
                StatusCode::BAD_GATEWAY
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
