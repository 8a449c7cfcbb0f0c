use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod config;
mod controllers;
mod db;
mod models;
mod report;
mod views;

use config::Config;
use db::Database;
use models::UserRole;

pub struct AppState {
    pub db: Arc<Database>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url, config.db_pool_size).map_err(|e| {
        log::error!("Failed to initialize database: {}", e);
        std::io::Error::other(e)
    })?;

    if !config.seed_telecallers.is_empty() {
        match db.seed_users(&config.seed_telecallers, UserRole::TELECALLER) {
            Ok(created) => log::info!(
                "Seeded {} new telecaller(s) from {} configured",
                created,
                config.seed_telecallers.len()
            ),
            Err(e) => {
                log::error!("Failed to seed telecallers: {}", e);
                return Err(std::io::Error::other(e));
            }
        }
    }

    let db = Arc::new(db);

    log::info!("Starting dialer server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
            }))
            .wrap(Logger::default())
            .configure(controllers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
