use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use chrono::Duration;
use log::info;

use bizcuit::{
    auth::TokenService, config::Config, db, routes, state::AppState, store::PgStore,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env()?;

    let pool = db::connect(&config).await?;
    if config.run_migrations {
        db::run_migrations(&pool).await?;
    }

    let store = Arc::new(PgStore::new(pool.clone()));
    let tokens = TokenService::new(
        &config.jwt_secret,
        Duration::hours(config.jwt_expiration_hours),
    );
    let state = web::Data::new(AppState::new(
        store.clone(),
        store,
        tokens,
        config.bcrypt_cost,
    ));

    info!("Starting server at {}", config.server_url());
    let cors_origin = config.cors_origin.clone();
    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header(),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}
