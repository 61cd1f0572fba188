use chrono::{DateTime, FixedOffset, Local, TimeZone};
use v_htmlescape::escape;

use crate::jira::{Issue, JiraSession, Project, User};
use crate::selection::Selection;

const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

const STYLES: &str = r#"
        body {
            margin: 0;
            font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
            background: #f3f4f6;
            color: #111827;
        }
        header.hero {
            position: relative;
            background: linear-gradient(to top right, #2563eb, #3b82f6);
            color: #f9fafb;
            overflow: hidden;
        }
        header.hero .inner {
            max-width: 48rem;
            margin: 0 auto;
            padding: 2rem 1rem 0;
        }
        header.hero h1 {
            margin: 0;
            padding: 0.5rem 0;
            font-size: clamp(2.4rem, 6vw, 3.75rem);
            font-weight: 800;
        }
        header.hero svg.wave {
            display: block;
            width: 100%;
            height: 60px;
        }
        .selector {
            margin: 0 -1rem;
            border-radius: 0.375rem;
        }
        .selector.open {
            background: rgba(249, 250, 251, 0.1);
            padding-bottom: 0.5rem;
        }
        .selector summary,
        .selector .summary {
            display: block;
            padding: 0.5rem 1rem;
            cursor: pointer;
            border-radius: 0.375rem;
        }
        .selector summary:hover {
            background: rgba(249, 250, 251, 0.1);
        }
        .selector a {
            color: #dbeafe;
            font-weight: 600;
            text-decoration: none;
        }
        .selector a:hover {
            color: #ffffff;
            text-decoration: underline;
        }
        .selector form {
            padding: 0 1rem;
        }
        .selector label {
            display: flex;
            align-items: center;
            gap: 0.5rem;
            margin-bottom: 0.5rem;
        }
        .selector button {
            padding: 0.25rem 0.5rem;
            font-size: 0.75rem;
            color: #dbeafe;
            background: #1e3a8a;
            border: none;
            border-radius: 0.25rem;
            cursor: pointer;
        }
        .note {
            padding: 0.5rem 1rem;
            color: #fee2e2;
        }
        main {
            max-width: 42rem;
            margin: 0 auto;
            padding: 3rem 0;
        }
        main ul.users {
            list-style: none;
            margin: 0;
            padding: 0;
        }
        .card {
            background: #ffffff;
            border-radius: 0.5rem;
            box-shadow: 0 1px 3px rgba(15, 23, 42, 0.12);
            padding: 1.25rem 1.5rem;
            margin-bottom: 3rem;
        }
        .card.disabled {
            opacity: 0.6;
        }
        .card h2 {
            display: flex;
            align-items: center;
            gap: 0.75rem;
            margin: 0 0 1rem;
            font-size: 1.25rem;
        }
        .card h2 img {
            width: 40px;
            height: 40px;
            border-radius: 999px;
        }
        .issues {
            list-style: none;
            margin: 0;
            padding: 0;
        }
        .issues li {
            display: grid;
            grid-template-columns: 6rem 1fr auto;
            gap: 0.75rem;
            padding: 0.5rem 0;
            border-top: 1px solid #e5e7eb;
        }
        .issues a {
            color: #1d4ed8;
            font-weight: 600;
            text-decoration: none;
        }
        .issue-meta {
            color: #6b7280;
            font-size: 0.85rem;
            text-align: right;
        }
        .empty {
            color: #6b7280;
        }
        .error {
            color: #b91c1c;
        }
        section.unassigned {
            background: linear-gradient(to top right, #dbeafe, #bfdbfe);
            padding: 3rem 0;
        }
        section.unassigned .inner {
            max-width: 42rem;
            margin: 0 auto;
        }
"#;

const WAVE: &str = r##"<svg class="wave" viewBox="0 0 1280 86" preserveAspectRatio="none" xmlns="http://www.w3.org/2000/svg" aria-hidden="true"><g fill="#f3f4f6"><path fill-opacity=".5" d="M0 60 C 160 20, 320 20, 480 55 S 800 90, 960 50 S 1200 20, 1280 40 V86 H0 Z"/><path d="M0 75 C 200 45, 400 50, 640 72 S 1040 85, 1280 62 V86 H0 Z"/></g></svg>"##;

/// Project list as far as the page is concerned.
pub enum ProjectsView {
    Loaded(Vec<Project>),
    Unavailable,
}

/// Content of one issue widget.
pub enum IssuesView {
    /// No project is selected, so nothing was queried.
    Disabled,
    Loaded(Vec<Issue>),
    Failed,
}

pub struct UserWidget {
    pub user: User,
    pub issues: IssuesView,
}

pub struct StandupPage<'a> {
    pub today: String,
    pub session: &'a JiraSession,
    pub selection: &'a Selection,
    pub projects: ProjectsView,
    pub users: Vec<UserWidget>,
    /// `None` when no project is selected.
    pub unassigned: Option<IssuesView>,
}

/// Heading date, e.g. `Sunday, October 18`.
pub fn format_today<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %B %d").to_string()
}

pub fn render_standup_page(page: &StandupPage<'_>) -> String {
    let users: String = page
        .users
        .iter()
        .map(|widget| format!("<li>{}</li>", render_user_widget(widget, page.session)))
        .collect();
    let users = if users.is_empty() {
        r#"<p class="empty">Nobody to call on today.</p>"#.to_string()
    } else {
        format!(r#"<ul class="users">{users}</ul>"#)
    };
    let unassigned = match &page.unassigned {
        Some(issues) => format!(
            r#"<section class="unassigned"><div class="inner"><div class="card"><h2>Unassigned</h2>{}</div></div></section>"#,
            render_issue_list(issues, page.session)
        ),
        None => String::new(),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Standup · {today}</title>
    <style>{styles}</style>
</head>
<body>
<header class="hero">
    <div class="inner">
        <h1>{today}</h1>
        {selector}
    </div>
    {wave}
</header>
<main>
    {users}
</main>
{unassigned}
</body>
</html>"##,
        today = escape(&page.today),
        styles = STYLES,
        selector = render_project_selector(&page.projects, page.selection, page.session),
        wave = WAVE,
        users = users,
        unassigned = unassigned,
    )
}

/// Collapsible summary of the selection plus the checkbox form that edits it.
///
/// With nothing selected the form is always shown open; otherwise it folds
/// behind a "Showing tickets for ..." summary.
pub fn render_project_selector(
    projects: &ProjectsView,
    selection: &Selection,
    session: &JiraSession,
) -> String {
    let projects = match projects {
        ProjectsView::Loaded(projects) => projects,
        ProjectsView::Unavailable => {
            return r#"<p class="note">Could not load projects from Jira.</p>"#.to_string();
        }
    };

    let checkboxes: String = projects
        .iter()
        .map(|project| {
            format!(
                r#"<label><input type="checkbox" name="project" value="{key}"{checked}>{name}</label>"#,
                key = escape(&project.key),
                name = escape(&project.name),
                checked = if selection.contains(&project.key) {
                    " checked"
                } else {
                    ""
                },
            )
        })
        .collect();
    let form = format!(
        r#"<form method="post" action="/standup/projects">{checkboxes}<div><button type="submit">Save changes</button></div></form>"#
    );

    let selected = selection.filter(projects);
    if selected.is_empty() {
        return format!(
            r#"<div class="selector open"><div class="summary">Choose projects to display</div>{form}</div>"#
        );
    }

    let links = selected
        .iter()
        .map(|project| {
            format!(
                r#"<a href="{href}" target="_blank" rel="noreferrer nofollow">{name}</a>"#,
                href = escape(&session.browse_url(&project.key)),
                name = escape(&project.name),
            )
        })
        .collect::<Vec<_>>()
        .join(" and ");

    format!(
        r#"<details class="selector"><summary>Showing tickets for {links}.</summary>{form}</details>"#
    )
}

pub fn render_user_widget(widget: &UserWidget, session: &JiraSession) -> String {
    let user = &widget.user;
    let avatar = user
        .avatar()
        .map(|url| format!(r#"<img src="{}" alt="">"#, escape(url)))
        .unwrap_or_default();
    let class = match widget.issues {
        IssuesView::Disabled => "card disabled",
        _ => "card",
    };

    format!(
        r#"<article class="{class}" id="user-{id}"><h2>{avatar}{name}</h2>{issues}</article>"#,
        id = escape(&user.account_id),
        name = escape(&user.display_name),
        issues = render_issue_list(&widget.issues, session),
    )
}

pub fn render_issue_list(issues: &IssuesView, session: &JiraSession) -> String {
    let issues = match issues {
        IssuesView::Disabled => {
            return r#"<p class="empty">Select a project to see tickets.</p>"#.to_string();
        }
        IssuesView::Failed => {
            return r#"<p class="error">Could not load tickets.</p>"#.to_string();
        }
        IssuesView::Loaded(issues) if issues.is_empty() => {
            return r#"<p class="empty">No open tickets.</p>"#.to_string();
        }
        IssuesView::Loaded(issues) => issues,
    };

    let rows: String = issues
        .iter()
        .map(|issue| {
            let status = issue
                .fields
                .status
                .as_ref()
                .map(|status| status.name.as_str())
                .unwrap_or("");
            let updated = issue
                .fields
                .updated
                .as_deref()
                .map(humanize_timestamp)
                .unwrap_or_default();
            format!(
                r#"<li><a href="{href}" target="_blank" rel="noreferrer nofollow">{key}</a><span>{summary}</span><span class="issue-meta">{status}<br>{updated}</span></li>"#,
                href = escape(&session.browse_url(&issue.key)),
                key = escape(&issue.key),
                summary = escape(&issue.fields.summary),
                status = escape(status),
                updated = escape(&updated),
            )
        })
        .collect();

    format!(r#"<ul class="issues">{rows}</ul>"#)
}

pub fn render_connect_page(host_url: Option<&str>, error: Option<&str>) -> String {
    let error = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape(message)))
        .unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Standup · Connect to Jira</title>
    <style>{styles}
        form.connect {{
            display: grid;
            gap: 1rem;
        }}
        form.connect label {{
            display: flex;
            flex-direction: column;
            gap: 0.35rem;
            font-weight: 600;
        }}
        form.connect input {{
            padding: 0.6rem 0.75rem;
            border: 1px solid #d1d5db;
            border-radius: 0.375rem;
            font-size: 1rem;
        }}
        form.connect button {{
            justify-self: start;
            padding: 0.6rem 1.2rem;
            border: none;
            border-radius: 0.375rem;
            background: #1e3a8a;
            color: #ffffff;
            font-weight: 600;
            cursor: pointer;
        }}
    </style>
</head>
<body>
<header class="hero">
    <div class="inner">
        <h1>Standup</h1>
        <p>Connect a Jira Cloud site to see who is up first today.</p>
    </div>
    {wave}
</header>
<main>
    <div class="card">
        {error}
        <form class="connect" method="post" action="/connect">
            <label>
                Jira site
                <input type="url" name="host_url" required placeholder="https://your-team.atlassian.net" value="{host_url}">
            </label>
            <label>
                Email
                <input type="email" name="email" required autocomplete="username">
            </label>
            <label>
                API token
                <input type="password" name="api_token" required autocomplete="current-password">
            </label>
            <button type="submit">Open standup</button>
        </form>
    </div>
</main>
</body>
</html>"##,
        styles = STYLES,
        wave = WAVE,
        error = error,
        host_url = escape(host_url.unwrap_or_default()),
    )
}

fn humanize_timestamp(raw: &str) -> String {
    DateTime::<FixedOffset>::parse_from_str(raw, JIRA_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|ts| {
            ts.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}
