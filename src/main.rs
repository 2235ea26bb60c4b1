use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wovenx_api::RestApi;
use wovenx_storage::load_catalog;

/// Read-only catalog API for woven fabric designs
#[derive(Parser, Debug)]
#[command(name = "wovenx")]
#[command(about = "Faceted catalog of wovens, variants, stock and Pantone colors", long_about = None)]
struct Args {
    /// Directory holding the offline-computed JSON artifacts
    #[arg(short, long, env = "WOVENX_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Bind address
    #[arg(long, env = "WOVENX_HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, env = "WOVENX_HTTP_PORT", default_value_t = 8000)]
    http_port: u16,

    /// Log level
    #[arg(long, env = "WOVENX_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting wovenX v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);

    // The catalog is built once, before any request is served, and never
    // mutated afterwards.
    let catalog = Arc::new(load_catalog(&args.data_dir)?);
    info!(
        "Catalog loaded: {} wovens, {} variants, {} stock rows, {} Pantone colors",
        catalog.wovens().len(),
        catalog.variants().len(),
        catalog.stocks().len(),
        catalog.pantone_colors().len()
    );

    let catalog_http = catalog.clone();
    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(catalog_http, &host, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("wovenX started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
