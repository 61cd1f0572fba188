use crate::args::Args;
use crate::jira::{JiraClient, JiraError};

#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub max_issues: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { max_issues: 20 }
    }
}

/// Shared by all handlers. Holds no per-user data.
#[derive(Clone)]
pub struct AppState {
    pub jira: JiraClient,
    pub config: DashboardConfig,
}

impl AppState {
    pub fn new(args: &Args) -> Result<Self, JiraError> {
        Ok(Self {
            jira: JiraClient::new(args.upstream_timeout())?,
            config: DashboardConfig {
                max_issues: args.max_issues,
            },
        })
    }
}
