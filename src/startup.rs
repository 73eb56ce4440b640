use crate::configuration::{Settings, StoreBackend};
use crate::db::{MemoryProductStore, PgProductStore, ProductStore, StoreError};
use crate::helpers::JsonResponse;
use crate::routes;
use crate::services::products::{ProductService, NOT_FOUND_MESSAGE};
use actix_cors::Cors;
use actix_web::{dev::Server, error, web, App, HttpServer};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

pub fn run(listener: TcpListener, store: Arc<dyn ProductStore>) -> Result<Server, std::io::Error> {
    let service = web::Data::new(ProductService::new(store));

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "Malformed JSON at line {}, column {}: {}",
                err.line(),
                err.column(),
                err
            ),
            other => other.to_string(),
        };
        tracing::debug!("Rejected request body: {}", message);
        error::InternalError::from_response(err, JsonResponse::bad_request(&message)).into()
    });

    // a non-numeric id can never name a product
    let path_config = web::PathConfig::default().error_handler(|err, _req| {
        error::InternalError::from_response(err, JsonResponse::not_found(NOT_FOUND_MESSAGE)).into()
    });

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/api/products")
                    .service(routes::product::get::list)
                    .service(routes::product::get::item)
                    .service(routes::product::add::add)
                    .service(routes::product::update::item)
                    .service(routes::product::delete::item),
            )
            .app_data(json_config.clone())
            .app_data(path_config.clone())
            .app_data(service.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// Open the store named by the settings; PostgreSQL gets its migrations run.
pub async fn build_store(settings: &Settings) -> Result<Arc<dyn ProductStore>, StoreError> {
    match settings.store {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory product store");
            Ok(Arc::new(MemoryProductStore::new()))
        }
        StoreBackend::Postgres => {
            tracing::info!(
                db_host = %settings.database.host,
                db_port = settings.database.port,
                db_name = %settings.database.database_name,
                "Connecting to PostgreSQL"
            );

            let connect_options = PgConnectOptions::new()
                .host(&settings.database.host)
                .port(settings.database.port)
                .username(&settings.database.username)
                .password(&settings.database.password)
                .database(&settings.database.database_name)
                .ssl_mode(PgSslMode::Disable);

            let pg_pool = PgPoolOptions::new()
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(30))
                .connect_with(connect_options)
                .await?;

            let store = PgProductStore::new(pg_pool);
            store.migrate().await?;
            Ok(Arc::new(store))
        }
    }
}
