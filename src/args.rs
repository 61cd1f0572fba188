use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "standup")]
#[command(version)]
#[command(about = "Daily standup dashboard for Jira teams", long_about = None)]
pub struct Args {
    /// Address the HTTP server binds to
    #[arg(long, env = "STANDUP_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Timeout in seconds for requests made to Jira (client default when unset)
    #[arg(long, env = "STANDUP_UPSTREAM_TIMEOUT")]
    pub upstream_timeout: Option<u64>,

    /// Maximum number of issues shown in each widget
    #[arg(long, env = "STANDUP_MAX_ISSUES", default_value_t = 20)]
    pub max_issues: u32,
}

impl Args {
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout.map(Duration::from_secs)
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 8080)),
            upstream_timeout: None,
            max_issues: 20,
        }
    }
}
