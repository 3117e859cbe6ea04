use anyhow::{Context, Result};
use folio_config::Config;
use folio_engine::io;
use folio_engine::media::{FileSystemStorage, MediaStorage};
use folio_server::AppState;
use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("folio starting up");

    let config = load_config()?;
    log::info!("Content file: {}", config.content_path.display());

    let site = io::load_site_or_default(&config.content_path)
        .with_context(|| format!("loading {}", config.content_path.display()))?;

    // Pages still render without storage; media actions answer 503.
    let storage: Option<Arc<dyn MediaStorage>> =
        match FileSystemStorage::new(&config.media.root, &config.media.base_url) {
            Ok(storage) => Some(Arc::new(storage)),
            Err(e) => {
                log::error!(
                    "Media storage at {} is unavailable: {e}",
                    config.media.root.display()
                );
                None
            }
        };

    let address = config.listen_addr();
    let app = folio_server::router(AppState::new(config, site, storage));

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    log::info!("Serving on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    log::info!("Server shut down");
    Ok(())
}

/// Config from the path given as the only argument, else the default
/// location, else built-in defaults.
fn load_config() -> Result<Config> {
    let args: Vec<String> = env::args().collect();
    match args.len() {
        2 => {
            let path = PathBuf::from(&args[1]);
            log::info!("Using config from CLI argument: {}", path.display());
            Config::load_from_path(&path)?
                .with_context(|| format!("no config file at {}", path.display()))
        }
        1 => match Config::load()? {
            Some(config) => {
                log::info!("Loaded config from {}", Config::config_path().display());
                Ok(config)
            }
            None => {
                log::info!(
                    "No config file at {}, using defaults",
                    Config::config_path().display()
                );
                Ok(Config::default())
            }
        },
        _ => {
            let program_name = args.first().map_or("folio-server", String::as_str);
            eprintln!("Usage: {program_name} [config-file]");
            process::exit(1);
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        log::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                log::info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
