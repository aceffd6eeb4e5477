use std::time::Duration;
use std::{fs, path::Path};

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vigia::{
    api::{self, error::ApiError, AppState},
    config::load_config,
    core::{error::EngineError, rate_limiter::SlidingWindowLimiter},
    history::HistoryStore,
    inference::InferenceClient,
};

#[derive(Parser, Debug)]
#[command(
    name = "vigia",
    about = "Heuristic risk analysis for suspicious links and claims"
)]
struct Cli {
    /// Path to config file (TOML). Default: config/vigia.toml
    #[arg(long)]
    config: Option<String>,
    /// Bind address override, host:port
    #[arg(long)]
    bind: Option<String>,
    /// Increase verbosity (info, debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Optional log file path
    #[arg(long, default_value = "data/vigia.log")]
    log_file: String,
    /// Disable the verification history store
    #[arg(long)]
    no_history: bool,
}

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli)?;

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = &cli.bind {
        let (host, port) = bind
            .rsplit_once(':')
            .ok_or_else(|| EngineError::Config(format!("invalid bind address: {bind}")))?;
        config.host = host.to_string();
        config.port = port
            .parse()
            .map_err(|_| EngineError::Config(format!("invalid bind port: {port}")))?;
    }

    let inference = match std::env::var("VIGIA_API_KEY") {
        Ok(key) if !key.trim().is_empty() => Some(InferenceClient::new(
            &config.inference.base_url,
            key.trim(),
            &config.inference.model,
            config.inference.timeout_ms,
            config.inference.max_attempts,
            &config.user_agent,
        )?),
        _ => {
            tracing::warn!(
                "VIGIA_API_KEY not set; text verification disabled, link analysis is heuristic only"
            );
            None
        }
    };

    let history = if cli.no_history {
        None
    } else {
        let store = HistoryStore::open(Path::new(&config.history_db_path))?;
        let purged = store.purge_older_than(config.history_retention_days)?;
        if purged > 0 {
            tracing::info!(purged, "expired history records removed");
        }
        Some(store)
    };

    let addr = config.bind_addr();
    tracing::info!(host = %addr.0, port = addr.1, "starting server");

    let window = Duration::from_millis(config.rate_limits.window_ms);
    let state = web::Data::new(AppState {
        link_limiter: SlidingWindowLimiter::new(config.rate_limits.link_per_window, window),
        text_limiter: SlidingWindowLimiter::new(config.rate_limits.text_per_window, window),
        inference,
        history,
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                tracing::debug!(error = %err, "rejected request body");
                ApiError::InvalidInput("Corpo da requisição inválido".to_string()).into()
            }))
            .wrap(
                middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add((
                        "Access-Control-Allow-Headers",
                        "authorization, x-client-info, apikey, content-type",
                    ))
                    .add(("Access-Control-Allow-Methods", "POST, OPTIONS")),
            )
            .wrap(middleware::Logger::default())
            .configure(api::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}

fn init_tracing(cli: &Cli) -> Result<(), EngineError> {
    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_path = Path::new(&cli.log_file);
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent).map_err(|e| EngineError::Config(e.to_string()))?;
    }
    if log_path.exists() {
        if let Ok(meta) = fs::metadata(log_path) {
            if meta.len() > 1_000_000 {
                let rotated = log_path.with_extension("log.1");
                let _ = fs::rename(log_path, rotated);
            }
        }
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| EngineError::Config(e.to_string()))?;

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(false);

    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| EngineError::Config(e.to_string()))
}
