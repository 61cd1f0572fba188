pub mod args;
pub mod jira;
pub mod rotation;
pub mod selection;
pub mod web;

use tokio::net::TcpListener;
use tracing::info;

pub use args::Args;
pub use jira::{JiraClient, JiraError, JiraSession, Project, User};
pub use rotation::{eligible_users, rotate, standup_order};
pub use selection::Selection;
pub use web::AppState;

pub async fn run(args: Args) -> anyhow::Result<()> {
    let state = AppState::new(&args)?;
    let app = web::router(state);

    info!("Starting standup server on {}", args.listen);
    let listener = TcpListener::bind(args.listen).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("standup server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
