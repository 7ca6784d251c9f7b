use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use genboq_api::config::ApiConfig;
use genboq_api::helpers::llm::create_llm_client;
use genboq_api::logging::init_logging;
use genboq_api::routes::configure_routes;
use genboq_api::state::AppState;
use genboq_api::{generation_settings, rate_source};
use genboq_core::{load_rates, BoqGenerator};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};

const SWEEP_INTERVAL_SECS: u64 = 300;

#[derive(Parser, Debug)]
#[command(name = "genboq-api", version, about = "GenBOQ AV Bill of Quantities server")]
struct Args {
    /// Path to the config file (default: <config dir>/genboq/api.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the config file
    #[arg(long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut config, config_path) = match args.config {
        Some(path) => (ApiConfig::load_from(&path)?, path),
        None => ApiConfig::load()?,
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _log_guard = init_logging(config.log_directory())?;
    info!(config = %config_path.display(), "Loaded configuration");

    let llm_client = match create_llm_client(&config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Startup aborted");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let generator = BoqGenerator::new(llm_client, generation_settings(&config));
    let state = web::Data::new(AppState::with_session_ttl(generator, config.session_ttl()));

    let source = rate_source(&config)?;
    let rates_state = state.clone();
    actix_web::rt::spawn(async move {
        let rates = load_rates(source.as_ref()).await;
        if let Err(e) = rates_state.install_rates(rates) {
            error!(error = %e, "Failed to install exchange rates");
        }
    });

    if let Some(ttl) = config.session_ttl() {
        let sweep_state = state.clone();
        let every = ttl.min(Duration::from_secs(SWEEP_INTERVAL_SECS));
        actix_web::rt::spawn(async move {
            let mut ticker = actix_web::rt::time::interval(every);
            loop {
                ticker.tick().await;
                match sweep_state.sessions.sweep(Instant::now()) {
                    Ok(0) => {}
                    Ok(expired) => info!(expired, "Discarded idle sessions"),
                    Err(e) => error!(error = %e, "Session sweep failed"),
                }
            }
        });
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let allowed_origins = config.allowed_origins().to_vec();
    info!("Starting genboq-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
            .expose_headers(["content-disposition"])
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
