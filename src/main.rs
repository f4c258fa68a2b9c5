mod cli;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use cli::{Cli, Command};
use job_alert::config::{LoggingSettings, Settings};
use job_alert::routes::{self, handle_json_payload_error, matches::AppState};
use job_alert::{DailyRun, Matcher};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (APIFY_TOKEN, EMAIL_USER, EMAIL_PASSWORD)
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            init_logging(&LoggingSettings::default());
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    init_logging(&settings.logging);
    info!("Configuration loaded successfully");

    match cli.command.unwrap_or(Command::Run { dry_run: false }) {
        Command::Run { dry_run } => run_daily(&settings, dry_run).await,
        Command::Serve => serve(settings).await,
    }
}

/// Initialize logging; LOG_LEVEL and LOG_FORMAT override the config file
fn init_logging(logging: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

async fn run_daily(settings: &Settings, dry_run: bool) -> std::io::Result<()> {
    info!("Starting daily job-alert run{}", if dry_run { " (dry run)" } else { "" });

    match DailyRun::new(settings, dry_run).execute().await {
        Ok(summary) => {
            info!(
                "Run complete: fetched={} unseen={} matched={} delivered={} recorded={}",
                summary.fetched, summary.unseen, summary.matched, summary.delivered, summary.recorded
            );
            Ok(())
        }
        Err(e) => {
            error!("Daily run failed: {}", e);
            Err(std::io::Error::other(e))
        }
    }
}

async fn serve(settings: Settings) -> std::io::Result<()> {
    let matcher = Matcher::new(settings.matching.clone());
    info!(
        "Matcher initialized with {} keywords, max experience {} years",
        settings.matching.keywords.len(),
        settings.matching.max_experience_years
    );

    let app_state = AppState { matcher };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(2);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
