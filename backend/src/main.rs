use actix_web::{web, App, HttpServer};
use backend::catalog::Catalog;
use backend::config::AppConfig;
use backend::services;
use backend::store::SqliteStore;
use backend::validation::{self, clock::SystemClock, rules::ArticleRules};
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config =
        AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let store = SqliteStore::open(&config.db_path).map_err(io::Error::other)?;
    let validator = validation::build(
        config.validator,
        ArticleRules::default(),
        Arc::new(SystemClock),
    );
    let catalog = web::Data::new(Catalog::new(Arc::new(store), validator));

    info!(
        "Catalog using {} at {} ({} validator)",
        if config.db_path == ":memory:" { "in-memory store" } else { "database" },
        config.db_path,
        catalog.validator_name()
    );
    info!("Server running at {}", config.url());

    let json_limit = config.json_limit;
    HttpServer::new(move || {
        App::new()
            .app_data(services::json_config(json_limit))
            .app_data(catalog.clone())
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
