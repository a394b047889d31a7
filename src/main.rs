use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use taskmaster::{
    auth::{PasswordHasher, TokenKeys},
    config::Config,
    routes,
    store::{MemoryStore, PgStore, Store},
};

fn startup_error(err: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    log::error!("startup failed: {}", err);
    io::Error::new(io::ErrorKind::Other, err)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(startup_error)?;

    let store: Arc<dyn Store> = if config.uses_memory_store() {
        log::warn!("using the in-memory store, nothing survives a restart");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(
            PgStore::connect(&config.database_url)
                .await
                .map_err(startup_error)?,
        )
    };
    let store = web::Data::from(store);
    let keys = web::Data::new(TokenKeys::new(&config.jwt_secret));
    let hasher = web::Data::new(PasswordHasher::new(config.bcrypt_cost));

    log::info!("Starting TaskMaster server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(keys.clone())
            .app_data(hasher.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
