mod refresh;
mod transport;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use treksafer_config::Settings;
use treksafer_fires::FireFinder;
use treksafer_http::CachedHttp;
use treksafer_router::Router;

use transport::{SocketTransport, Transport};

#[derive(Parser, Debug)]
#[command(name = "treksafer-server")]
#[command(about = "TrekSafer request-processing engine")]
struct Args {
    /// Environment variant to load (falls back to TREKSAFER_ENV, then "dev").
    #[arg(long)]
    env: Option<String>,

    /// Directory holding `<env>.yaml` config files.
    #[arg(long, default_value = "config")]
    config_dir: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let env = args.env.or_else(|| std::env::var("TREKSAFER_ENV").ok()).unwrap_or_else(|| "dev".to_string());

    let settings = match treksafer_config::load_env(&args.config_dir, &env) {
        Ok(settings) => Arc::new(settings),
        Err(error) => {
            eprintln!("configuration error: {error}");
            std::process::exit(1);
        }
    };

    init_logging(&settings);
    tracing::info!(env, "treksafer-server starting");

    let http = Arc::new(CachedHttp::new(
        "cache",
        std::time::Duration::from_secs(settings.request_cache_timeout),
        std::time::Duration::from_secs(settings.http_timeout_secs),
    ));
    let geo = Arc::new(treksafer_geoindex::GeoIndex::new(16));

    let fires = FireFinder::new(Arc::clone(&settings), Arc::clone(&geo), Arc::clone(&http));
    let avalanche_providers = treksafer_avalanche::build_providers(&settings, &geo, &http);
    let router = Arc::new(Router::new(Arc::clone(&settings), fires, avalanche_providers, Arc::clone(&http)));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut transports: Vec<Box<dyn Transport>> = Vec::new();
    for config in settings.enabled_transports() {
        match config {
            treksafer_config::TransportConfig::Cli { host, port, .. } => {
                transports.push(Box::new(SocketTransport {
                    host: host.clone(),
                    port: *port,
                    router: Arc::clone(&router),
                }));
            }
            treksafer_config::TransportConfig::Sms { .. } => {
                tracing::warn!("sms transport configured but no gateway client is wired up in this deployment; skipping");
            }
        }
    }

    let mut handles = Vec::new();
    for transport in transports {
        let name = transport.name();
        let rx = shutdown_rx.clone();
        handles.push(tokio::spawn(async move {
            if let Err(error) = transport.run(rx).await {
                tracing::warn!(name, %error, "transport exited with an error");
            }
        }));
    }

    let refresh_settings = Arc::clone(&settings);
    let refresh_http = Arc::clone(&http);
    let refresh_rx = shutdown_rx.clone();
    handles.push(tokio::spawn(async move {
        refresh::run(refresh_settings, refresh_http, refresh_rx).await;
    }));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received, draining in-flight requests");
    let _ = shutdown_tx.send(true);

    let drain = std::time::Duration::from_secs(5);
    let _ = tokio::time::timeout(drain, futures::future::join_all(handles)).await;

    tracing::info!("treksafer-server shut down cleanly");
    Ok(())
}

/// `tracing_subscriber::fmt` with an `EnvFilter` (`RUST_LOG`, default
/// `info`), writing to stdout and appending to `logs/<env>.log` the way the
/// original `logging.FileHandler` did.
fn init_logging(settings: &Settings) {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let log_path = settings.log_file_path();
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = std::fs::OpenOptions::new().create(true).append(true).open(&log_path).ok();

    match file {
        Some(file) => {
            let writer = std::io::stdout.and(move || file.try_clone().expect("log file handle clone"));
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
}
