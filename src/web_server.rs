use actix_web::http::Method;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{web, App, HttpResponse, HttpServer};
use std::collections::HashMap;
use std::sync::Arc;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::service::CameraService;

const ALLOWED_HEADERS: &str = "Content-Type, Depth, User-Agent, X-File-Size, X-Requested-With, If-Modified-Since, X-File-Name, Cache-Control";

fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Credentials", "true"))
        .add(("Access-Control-Allow-Methods", "OPTIONS, GET, POST"))
        .add(("Access-Control-Allow-Headers", ALLOWED_HEADERS))
}

/// Loose truthiness: empty and `"0"` are false, anything else is true.
fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

async fn get_cameras(
    service: web::Data<CameraService>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    log::debug!("Received request for cameras with query: {:?}", query);

    let force = query.get("force").map(|v| is_truthy(v)).unwrap_or(false);
    let response = service.cameras(force).await?;

    Ok(HttpResponse::Ok().json(response))
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

fn routes(cfg: &mut web::ServiceConfig) {
    for path in ["/api", "/api/"] {
        cfg.service(
            web::resource(path)
                .route(web::get().to(get_cameras))
                .route(web::post().to(get_cameras))
                .route(web::method(Method::OPTIONS).to(preflight)),
        );
    }
}

pub async fn start_web_server(
    config: Arc<AppConfig>,
    service: Arc<CameraService>,
) -> std::io::Result<()> {
    let port = config.web_port;
    let static_directory = config.static_directory.clone();
    let service_data = web::Data::from(service);

    log::info!("Starting web server on port: {}", port);
    log::debug!("Serving static files from {} directory.", static_directory);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(Logger::default())
            .app_data(service_data.clone())
            .configure(routes)
            .service(actix_files::Files::new("/", &static_directory).index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
