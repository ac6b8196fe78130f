use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use clap::Parser;

use mediacat::catalog::{self, count_files, extract_options, filter_tree, FilterCriteria, MediaNode};
use mediacat::cli::{self, Command};
use mediacat::config::{self, Config};
use mediacat::http;
use mediacat::probe::{ffprobe::Ffprobe, scanner};

/// Set to true once the first Ctrl+C is received. Second Ctrl+C force-exits.
static SHUTTING_DOWN: AtomicBool = AtomicBool::new(false);

async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install Ctrl+C handler: {}", e);
        return;
    }
    if SHUTTING_DOWN.swap(true, Ordering::SeqCst) {
        eprintln!("\nmediacat: forced exit");
        std::process::exit(1);
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    std::process::exit(1);
}

fn load_or_exit(path: &Path) -> Vec<MediaNode> {
    match catalog::load_document(path) {
        Ok(nodes) => {
            tracing::info!(
                "Loaded {} ({} videos)",
                path.display(),
                count_files(&nodes)
            );
            nodes
        }
        Err(e) => fail(format_args!("{}: {}", path.display(), e)),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let file_config = config::find_config_file(args.config.as_deref()).and_then(|path| {
        match config::load_config(&path) {
            Ok(cfg) => {
                tracing::debug!("Loaded config from {}", path.display());
                Some(cfg)
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                None
            }
        }
    });

    let config = Config::resolve(file_config, &args);

    match args.command {
        Command::Scan { paths, .. } => run_scan(&config, &paths),
        Command::Serve { .. } => run_serve(&config).await,
        Command::Filter { criteria, .. } => run_filter(&config, &criteria.into()),
        Command::Options { .. } => run_options(&config),
    }
}

fn run_scan(config: &Config, paths: &[std::path::PathBuf]) {
    for path in paths {
        if !path.exists() {
            fail(format_args!("path does not exist: {}", path.display()));
        }
    }

    let ffprobe = Ffprobe::new(&config.ffprobe);
    if let Err(e) = ffprobe.check() {
        fail(format_args!("{} -- install FFmpeg or pass --ffprobe", e));
    }

    let nodes = scanner::scan(paths, &ffprobe);
    if let Err(e) = catalog::document::write_document(&config.document, &nodes) {
        fail(format_args!("{}: {}", config.document.display(), e));
    }
    tracing::info!("Results saved to {}", config.document.display());
}

fn run_filter(config: &Config, criteria: &FilterCriteria) {
    let nodes = load_or_exit(&config.document);
    let filtered = filter_tree(&nodes, criteria);
    tracing::info!(
        "{} of {} videos match",
        count_files(&filtered),
        count_files(&nodes)
    );
    match catalog::document::to_json_pretty(&filtered) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(e),
    }
}

fn run_options(config: &Config) {
    let nodes = load_or_exit(&config.document);
    print!("{}", extract_options(&nodes));
}

async fn run_serve(config: &Config) {
    let state = match http::state::AppState::load(&config.document) {
        Ok(state) => state,
        Err(e) => fail(format_args!("{}: {}", config.document.display(), e)),
    };
    tracing::info!(
        "Loaded {} ({} videos)",
        config.document.display(),
        count_files(&state.catalog)
    );
    tracing::info!(
        "Filter options: {} video codecs, {} audio codecs, {} channel counts, {} resolutions",
        state.options.video_codecs.len(),
        state.options.audio_codecs.len(),
        state.options.audio_channels.len(),
        state.options.video_resolutions.len()
    );
    let app = http::build_router(state);

    let host = if config.localhost { "127.0.0.1" } else { "0.0.0.0" };
    serve(&format!("{}:{}", host, config.port), app).await;
}

async fn serve(addr: &str, app: Router) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => fail(format_args!("failed to bind {}: {}", addr, e)),
    };
    tracing::info!("Serving catalog on http://{}", addr);

    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);
    let mut http_rx = shutdown_tx.subscribe();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = http_rx.recv().await;
            })
            .await
            .unwrap_or_else(|e| tracing::error!("HTTP server error: {}", e));
    });

    wait_for_shutdown().await;
    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(());
    let _ = server.await;
    tracing::info!("Goodbye.");
}
