mod config;
mod live;
mod services;
mod store;

use crate::config::AppConfig;
use crate::live::state::AppState;
use crate::store::SqliteStore;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::{error, info};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("{}", e);
        std::io::Error::other(e.to_string())
    })?;

    let store = SqliteStore::open(&config.database_path)
        .map_err(|e| std::io::Error::other(e.to_string()))?
        .with_home_currency(config.home_currency.clone());
    let state = AppState::new(Arc::new(store), config.home_currency.clone())
        .with_upload_limit(config.payload_limit);

    // The feed and the statistics timer live exactly as long as the server.
    let feed = live::feed::mount(&state.store, &state.list)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let monitor = live::statistics::start(
        state.store.clone(),
        state.statistics.clone(),
        config.stats_refresh,
    );

    let url = format!("http://{}:{}", config.host, config.port);
    info!("Server running at {}", url);

    let payload_limit = config.payload_limit;
    let result = HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(payload_limit))
            .app_data(web::PayloadConfig::default().limit(payload_limit))
            .app_data(web::Data::new(state.clone()))
            .service(services::csv::configure_routes())
            .service(services::guarantees::configure_routes())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    drop(monitor);
    feed.unsubscribe();
    result
}
