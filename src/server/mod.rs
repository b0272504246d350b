pub mod handlers;

use crate::{config::Config, error::GeneLabError, lab::LabClient};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Register the proxy routes. Shared by `run` and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(handlers::health))
        .route("/api/generate-image", web::post().to(handlers::generate_image))
        .route("/api/chat", web::post().to(handlers::chat));
}

/// Malformed or oversized bodies get the same envelope as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| {
            log::warn!("Rejected request body: {}", err);
            GeneLabError::invalid_input(format!("Invalid JSON body: {}", err)).into()
        })
}

/// Any origin, method and requested header; preflights on every path are
/// answered before routing.
pub fn cors() -> Cors {
    Cors::permissive()
}

pub async fn run(lab: LabClient, config: &Config) -> std::io::Result<()> {
    let lab = web::Data::new(lab);

    HttpServer::new(move || {
        App::new()
            .app_data(lab.clone())
            .wrap(cors())
            .wrap(Logger::new("%r → %s in %Dms"))
            .configure(configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind(config.bind_address())?
    .run()
    .await
}
