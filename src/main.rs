use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;
use std::path::PathBuf;

use careval::routes::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .format_module_path(false)
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let workers = std::env::var("WORKERS")
        .ok()
        .and_then(|w| w.parse().ok())
        .unwrap_or_else(num_cpus::get);
    let model_path =
        PathBuf::from(std::env::var("MODEL_PATH").unwrap_or_else(|_| "model.bin".to_string()));

    let bind_address = format!("{host}:{port}");
    info!("car evaluation service listening on http://{bind_address}");
    info!("model artifact: {}", model_path.display());
    info!("routes: GET /health, POST /train, POST /predict");

    let state = web::Data::new(AppState { model_path });

    HttpServer::new(move || {
        // Browser clients are allowed from anywhere; this is a dev
        // convenience, not a security boundary.
        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(careval::configure)
    })
    .workers(workers)
    .bind(&bind_address)?
    .run()
    .await
}
