use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use casa_db::init_db;
use casa_panel::config::{MailTransportKind, PanelConfig};
use casa_panel::mailer::{LogTransport, MailTransport, MemoryTransport};
use casa_panel::{AppState, build_router, cli};

#[derive(Parser)]
#[command(name = "casa-panel")]
#[command(about = "CASA case management panel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve,
    /// Administrative tools
    Admin {
        #[command(subcommand)]
        subcommand: AdminCommands,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create an organization
    CreateOrg {
        name: String,
    },
    /// Create a user inside an organization
    CreateUser {
        #[arg(long)]
        org: i64,
        /// volunteer, supervisor or casa_admin
        #[arg(long)]
        role: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        password: String,
    },
    /// Reset a user's password
    ResetPassword {
        email: String,
        new_pass: String,
    },
    /// Create a case, optionally assigning a volunteer
    CreateCase {
        #[arg(long)]
        org: i64,
        case_number: String,
        #[arg(long)]
        volunteer: Option<i64>,
    },
    /// Show panel connection information
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Failed to load .env file: {}", e);
    }

    let cli = Cli::parse();

    let file_appender = tracing_appender::rolling::never(".", "casa-panel.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "casa_panel=debug,casa_db=info,tower_http=info,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    let config = PanelConfig::load()?;
    let pool = init_db(&config.database_url).await?;

    match cli.command {
        Commands::Serve => run_server(pool, config).await?,
        Commands::Admin { subcommand } => match subcommand {
            AdminCommands::CreateOrg { name } => {
                cli::create_org(&pool, &name).await?;
            }
            AdminCommands::CreateUser {
                org,
                role,
                email,
                display_name,
                password,
            } => {
                cli::create_user(&pool, org, &role, &email, &display_name, &password).await?;
            }
            AdminCommands::ResetPassword { email, new_pass } => {
                cli::reset_password(&pool, &email, &new_pass).await?;
            }
            AdminCommands::CreateCase {
                org,
                case_number,
                volunteer,
            } => {
                cli::create_case(&pool, org, &case_number, volunteer).await?;
            }
            AdminCommands::Info => cli::print_info(&pool, &config).await?,
        },
    }

    Ok(())
}

async fn run_server(pool: sqlx::SqlitePool, config: PanelConfig) -> Result<()> {
    let transport: Arc<dyn MailTransport> = match config.mail_transport {
        MailTransportKind::Log => Arc::new(LogTransport),
        MailTransportKind::Memory => Arc::new(MemoryTransport::new()),
    };
    tracing::info!("Mail transport: {:?}", config.mail_transport);

    let port = config.port;
    let state = AppState::new(pool, config, transport);

    match state.session_service.purge_expired().await {
        Ok(0) => {}
        Ok(n) => tracing::info!("Purged {} expired sessions", n),
        Err(e) => tracing::warn!("Failed to purge expired sessions: {:#}", e),
    }

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
