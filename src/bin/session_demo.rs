//! Drives the client session flow against a running gateway.
//!
//! The chat connection is simulated with `FakeChatSession`; credentials are
//! kept in `client.storage_path`, so successive runs behave like relaunches.
//!
//! ```text
//! $ cargo run --bin huddle-gateway &
//! $ cargo run --bin session_demo -- login john_doe
//! $ cargo run --bin session_demo -- status
//! $ cargo run --bin session_demo -- logout
//! ```

use clap::{Parser, Subcommand};
use huddle::application_impl::{CredentialStore, SessionBootstrapper};
use huddle::application_port::SessionService;
use huddle::infra::{FakeChatSession, FileKeyValueStore, HttpGatewayClient};
use huddle::logger::*;
use huddle::settings::parse_settings;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    settings: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restore the stored session and print it.
    Status,
    /// Log in with a user id.
    Login { user_id: String },
    /// Log out and forget stored credentials.
    Logout,
    /// Probe the gateway.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let logger = Logger::new_bootstrap()?;
    let settings = parse_settings(args.settings.as_deref())?;
    logger.reload(&settings.log.filter)?;

    let gateway = HttpGatewayClient::new(
        settings.client.gateway_url.clone(),
        Duration::from_secs(settings.client.timeout_secs),
    )?;
    let store = FileKeyValueStore::new(&settings.client.storage_path);
    let session = SessionBootstrapper::new(
        Arc::new(gateway),
        Arc::new(FakeChatSession::new()),
        CredentialStore::new(Arc::new(store)),
    );

    if let Command::Health = args.command {
        let report = session.check_gateway().await?;
        println!("{} at {}", report.message, report.timestamp);
        return Ok(());
    }

    let restored = session.restore_session().await;
    match args.command {
        Command::Status | Command::Health => {}
        Command::Login { user_id } => {
            if restored.is_authenticated() {
                session.logout().await?;
            }
            session.login(&user_id).await?;
        }
        Command::Logout => session.logout().await?,
    }

    println!("{}", serde_json::to_string_pretty(&session.state())?);
    Ok(())
}
