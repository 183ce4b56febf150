use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use commandcenter_common::models::ViewerSession;
use commandcenter_core::Error;
use commandcenter_core::auth::{DEFAULT_CALLBACK_PORT, authorize_broadcaster};
use commandcenter_core::catalog::{BuildOutcome, build_catalog};
use commandcenter_core::config::{BuildMode, CatalogPaths};

mod context;
mod server;

use context::ServerContext;
use server::{AppState, run_server};

const AUTHORIZE_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Parser, Debug)]
#[command(name = "commandcenter")]
#[command(author, version, about = "Command Center - Twitch chat command and reward catalog with viewer role checks")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild commands.json / bits.json / points.json from commands.csv
    BuildCatalog,

    /// Serve the role and catalog JSON endpoints
    Serve {
        /// Address to which the server will bind
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: String,
    },

    /// Resolve mod/VIP/sub membership for one user and print it as JSON
    Roles {
        #[arg(long)]
        user_id: String,

        /// The viewer's own access token; without it the subscriber check is false
        #[arg(long)]
        user_token: Option<String>,
    },

    /// Run the one-off broadcaster OAuth flow and print the refresh token
    Authorize {
        #[arg(long, default_value_t = DEFAULT_CALLBACK_PORT)]
        port: u16,
    },
}

fn init_tracing() {
    let filter = EnvFilter::from_default_env()
        .add_directive("commandcenter=info".parse().unwrap_or_default());
    // stdout belongs to command output (summaries, JSON).
    let sub = fmt().with_env_filter(filter).with_writer(std::io::stderr).finish();
    if tracing::subscriber::set_global_default(sub).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    match args.command {
        Command::BuildCatalog => run_build_catalog(),
        Command::Serve { addr } => {
            let addr: SocketAddr = addr.parse()?;
            let ctx = ServerContext::from_env();
            let state = AppState {
                roles: ctx.roles.clone(),
                catalog: Arc::new(ctx.load_catalog()?),
            };
            run_server(addr, state).await
        }
        Command::Roles { user_id, user_token } => {
            let ctx = ServerContext::from_env();
            let session = ViewerSession {
                twitch_user_id: Some(user_id),
                access_token: user_token,
            };
            let roles = ctx.roles.resolve(&session).await;
            println!("{}", serde_json::to_string_pretty(&roles)?);
            Ok(())
        }
        Command::Authorize { port } => {
            let ctx = ServerContext::from_env();
            let grant = authorize_broadcaster(ctx.http.clone(), ctx.config.clone(), port, AUTHORIZE_TIMEOUT, |url| {
                println!("Open this URL as the broadcaster and approve access:\n\n  {}\n", url);
            })
            .await?;

            println!("Authorized with scopes: {}", grant.scopes.join(" "));
            println!("Add this to your environment (.env):\n");
            println!("  TWITCH_BROADCASTER_REFRESH_TOKEN={}", grant.refresh_token);
            Ok(())
        }
    }
}

fn run_build_catalog() -> anyhow::Result<()> {
    let paths = CatalogPaths::from_env();
    match build_catalog(&paths, BuildMode::from_env()) {
        Ok(BuildOutcome::Skipped) => {
            info!("No commands in {}; snapshots left untouched", paths.csv.display());
            Ok(())
        }
        Ok(BuildOutcome::Built(report)) => {
            println!(
                "Built {} from {} ({} commands)",
                paths.commands.display(),
                paths.csv.display(),
                report.commands
            );
            if report.rewards_written {
                println!(
                    "Built {} ({} items) and {} ({} items)",
                    paths.bits.display(),
                    report.bits,
                    paths.points.display(),
                    report.points
                );
            }
            Ok(())
        }
        Err(Error::Schema(msg)) => {
            error!("Catalog rejected");
            eprintln!("{}", msg);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
