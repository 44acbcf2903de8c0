use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use weather_core::{Config, WeatherService, WeatherStore, provider::provider_from_config};

use crate::{api, state::AppState};

const UNITS: [&str; 3] = ["metric", "imperial", "standard"];

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather cache HTTP server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Listen address, e.g. "0.0.0.0:3000" (overrides config).
    #[arg(short, long, global = true)]
    pub bind: Option<String>,

    /// Database path (overrides config).
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server in the foreground (default).
    Serve,

    /// Interactively write the configuration file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(database) = self.database {
            config.storage.path = Some(database);
        }

        match self.command.unwrap_or(Command::Serve) {
            Command::Serve => serve(config).await,
            Command::Configure => configure(config, self.config),
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind))?;

    let db_path = config.storage.resolved_path();
    let store = WeatherStore::open(&db_path)
        .with_context(|| format!("DB Error: cannot open {}", db_path.display()))?;

    let service = WeatherService::new(store, provider_from_config(&config));
    let state = AppState::new(service);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    run(listener, state, shutdown_signal()).await
}

/// Serve requests on `listener` until `shutdown` resolves, then close the store.
///
/// Fails if the state is still shared once the server has drained, since the store
/// could not be closed explicitly.
async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = api::router()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(Arc::clone(&state));

    info!("server running at http://{}/", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    let state = Arc::try_unwrap(state).map_err(|_| {
        anyhow!("Application state still shared after shutdown; database was not closed")
    })?;
    state.service.close()?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

fn configure(mut config: Config, path: Option<PathBuf>) -> anyhow::Result<()> {
    let bind = Text::new("Listen address:")
        .with_default(&config.server.bind)
        .prompt()?;
    if bind.parse::<SocketAddr>().is_err() {
        bail!("'{bind}' is not a valid listen address (expected host:port)");
    }

    let db_default = config.storage.resolved_path().display().to_string();
    let database = Text::new("Database path:")
        .with_default(&db_default)
        .prompt()?;

    let base_url = Text::new("Weather provider base URL:")
        .with_default(&config.provider.base_url)
        .prompt()?;

    let cursor = UNITS
        .iter()
        .position(|u| *u == config.provider.units)
        .unwrap_or(0);
    let units = Select::new("Units:", UNITS.to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;

    config.server.bind = bind;
    config.storage.path = Some(PathBuf::from(database));
    config.provider.base_url = base_url;
    config.provider.units = units.to_string();

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}
