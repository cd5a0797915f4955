use actix_web::{App, HttpServer, web};
use clap::Parser;
use tracing::{error, info};

mod api;
mod auth;
mod cli;
mod config;
mod db;
mod logging;
mod shutdown;

use crate::api::{health::health_config, job::{JobService, job_config}, validation};
use crate::auth::AuthKeys;
use crate::cli::{Cli, Command};
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = config::Config::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    config.environment.install();

    logging::init(&config.log_dir)?;

    info!("Starting job-board ({:?} mode)", config.environment);
    info!("Configuration loaded successfully:");
    info!("  - Listening address: {}:{}", config.bind_address, config.port);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);

    let pool = db::connection::get_connection(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {:?}", e);
            std::io::Error::other(e)
        })?;
    info!("Database connection pool established");

    db::migrations::run_migrations(&pool).await.map_err(|e| {
        error!("Failed to run database migrations: {:?}", e);
        std::io::Error::other(e)
    })?;

    if cli.command() == Command::Migrate {
        pool.close().await;
        return Ok(());
    }

    let job_service = web::Data::new(JobService::postgres(pool.clone()));
    let auth_keys = web::Data::new(AuthKeys::from_secret(&config.jwt_secret));
    let server_pool = web::Data::new(pool.clone());
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_pool.clone())
            .app_data(job_service.clone())
            .app_data(auth_keys.clone())
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config().limit(max_payload_size))
            .app_data(validation::path_config())
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(job_config)
    })
    .disable_signals()
    .bind((config.bind_address.as_str(), config.port))?
    .run();

    info!("Server starting on http://{}:{}", config.bind_address, config.port);

    let server_handle = server.handle();
    let server_task = actix_web::rt::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}
