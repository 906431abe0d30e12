use actix_web::{App, HttpServer};
use certverify_backend::config::AppConfig;
use certverify_backend::engine::FixtureExtractor;
use certverify_backend::store::{seed, Store};
use certverify_backend::AppState;
use env_logger::Env;
use log::info;
use std::fs;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = AppConfig::from_env();

    let store = Store::open(&config.database_path).map_err(io::Error::other)?;
    if config.seed_demo_data {
        seed::seed_demo_data(&store).map_err(io::Error::other)?;
    }
    fs::create_dir_all(&config.upload_dir)?;

    let state = AppState::new(config.clone(), store, Arc::new(FixtureExtractor::default()));
    let (host, port) = config.bind_address();
    info!(
        "Server running at http://{}:{} (database {}, uploads in {})",
        host,
        port,
        config.database_path.display(),
        config.upload_dir.display()
    );

    HttpServer::new(move || App::new().configure(|cfg| state.configure(cfg)))
        .bind((host.as_str(), port))?
        .run()
        .await
}
