use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobly_api::{app, config, database::DatabaseManager, AppState};

#[derive(Parser)]
#[command(name = "jobly-api")]
#[command(about = "Jobly API server - companies, jobs and users")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Apply pending migrations before serving")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jobly_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Jobly API in {:?} mode", config.environment);
    if config.uses_dev_secret_in_production() {
        tracing::warn!("SECRET_KEY is not set; production tokens are signed with the development secret");
    }

    let pool = DatabaseManager::pool().await.context("connecting to database")?;

    if args.migrate {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
        tracing::info!("Migrations applied");
    }

    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Jobly API listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(pool)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close_all().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
