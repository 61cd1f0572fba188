//! Cookies that carry the browser-side state of the dashboard.
//!
//! The server keeps nothing between requests: the Jira connection and the
//! project selection live entirely in these cookies.

use std::net::IpAddr;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::jira::JiraSession;
use crate::selection::Selection;

pub const HOST_URL_COOKIE: &str = "jiraHostUrl";
pub const CREDENTIALS_COOKIE: &str = "credentials";
pub const PROJECTS_COOKIE: &str = "projects";

const LOCALHOST: &str = "localhost";

/// Attributes shared by every cookie the dashboard writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    /// `None` for IP-literal hosts, which browsers refuse as a `Domain`.
    pub domain: Option<String>,
    pub secure: bool,
}

impl CookieConfig {
    /// Scopes cookies to the hostname the browser used to reach us.
    /// `Secure` is dropped only for `localhost`.
    pub fn for_host(host: &str) -> Self {
        let hostname = hostname(host);
        Self {
            secure: hostname != LOCALHOST,
            domain: match hostname.parse::<IpAddr>() {
                Ok(_) => None,
                Err(_) => Some(hostname.to_string()),
            },
        }
    }

    pub fn build(&self, name: &'static str, value: String) -> Cookie<'static> {
        let mut cookie = Cookie::build((name, value))
            .path("/")
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .build();
        if let Some(ref domain) = self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie
    }
}

/// Strips the port (and IPv6 brackets) from a `Host` header value.
fn hostname(host: &str) -> &str {
    let host = host.trim();
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.split(':').next().unwrap_or(host)
}

pub fn session(jar: &CookieJar) -> Option<JiraSession> {
    let host_url = jar.get(HOST_URL_COOKIE)?.value();
    if host_url.trim().is_empty() {
        return None;
    }
    let credentials = jar
        .get(CREDENTIALS_COOKIE)
        .map(|cookie| cookie.value())
        .unwrap_or_default();
    Some(JiraSession::new(host_url, credentials))
}

pub fn selection(jar: &CookieJar) -> Selection {
    jar.get(PROJECTS_COOKIE)
        .map(|cookie| Selection::from_cookie_value(cookie.value()))
        .unwrap_or_default()
}

pub fn store_selection(jar: CookieJar, config: &CookieConfig, selection: &Selection) -> CookieJar {
    jar.add(config.build(PROJECTS_COOKIE, selection.to_cookie_value()))
}

pub fn store_session(jar: CookieJar, config: &CookieConfig, session: &JiraSession) -> CookieJar {
    let mut credentials = config.build(CREDENTIALS_COOKIE, session.credentials.clone());
    credentials.set_http_only(true);
    jar.add(config.build(HOST_URL_COOKIE, session.host_url.clone()))
        .add(credentials)
}
