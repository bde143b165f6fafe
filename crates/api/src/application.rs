#[cfg(unix)]
use std::{fs, path::Path};

use actix_web::{middleware::Logger, web, App, HttpServer};
use phone_registry_domain::config::{ApiConfig, ConfigError};
use phone_registry_domain::services::telemetry::{
    init_telemetry, TelemetryConfig, TelemetryError,
};
use phone_registry_domain::storage::StorageError;
use phone_registry_storage::SeaOrmStorage;
use thiserror::Error;
use tracing::info;

use crate::{
    handlers::{
        assign_phone_number_handler, assign_phone_number_to_account_handler,
        create_account_handler, delete_phone_number_handler, get_account_handler,
        get_phone_number_handler, json_error_handler, list_accounts_handler, metrics_handler,
        phone_numbers_for_account_handler, toggle_account_status_handler,
    },
    state::AppState,
};

/// Registers the account and phone number endpoints.
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));
    cfg.service(
        web::scope("/api/accounts")
            .route("", web::get().to(list_accounts_handler))
            .route("", web::post().to(create_account_handler))
            .route("/{id}", web::get().to(get_account_handler))
            .route(
                "/{id}/toggle-status",
                web::patch().to(toggle_account_status_handler),
            ),
    )
    .service(
        web::scope("/api/phonenumbers")
            .route(
                "/account/{account_id}",
                web::get().to(phone_numbers_for_account_handler),
            )
            .route(
                "/{id}/assign-to-account/{account_id}",
                web::patch().to(assign_phone_number_to_account_handler),
            )
            .route("/{account_id}", web::post().to(assign_phone_number_handler))
            .route("/{id}", web::get().to(get_phone_number_handler))
            .route("/{id}", web::delete().to(delete_phone_number_handler)),
    );
}

pub async fn run() -> Result<(), BootstrapError> {
    // 1. configuration and telemetry
    let config = ApiConfig::load_from_env()?;
    let telemetry_config = TelemetryConfig::from_env("API");
    let telemetry = init_telemetry(&telemetry_config)?;

    // 2. storage (schema is created on connect)
    let storage = SeaOrmStorage::builder()
        .database_url(config.database_url())
        .max_connections(config.database_max_connections())
        .build()
        .await?;
    info!("storage ready");

    let state = AppState::new(storage, telemetry);

    // Metrics stay off the public listener when an internal one exists.
    let include_metrics_on_public = !config.has_internal_listener();

    let public_state = state.clone();
    let mut public_server = HttpServer::new(move || {
        let mut app = App::new()
            .app_data(web::Data::new(public_state.clone()))
            .wrap(Logger::default())
            .configure(configure_api_routes);

        if include_metrics_on_public {
            app = app.route("/metrics", web::get().to(metrics_handler));
        }

        app
    });

    #[cfg(unix)]
    {
        if let Some(socket) = config.api_unix_socket() {
            cleanup_socket(socket)?;
            public_server = public_server.bind_uds(socket)?;
        } else {
            public_server = public_server.bind(config.api_bind_address())?;
        }
    }

    #[cfg(not(unix))]
    {
        if let Some(socket) = config.api_unix_socket() {
            return Err(BootstrapError::Io(std::io::Error::other(format!(
                "unix socket '{socket}' requested but this platform does not support it"
            ))));
        }
        public_server = public_server.bind(config.api_bind_address())?;
    }

    info!(
        bind = config.api_unix_socket().unwrap_or(config.api_bind_address()),
        "public listener bound"
    );
    let public_server = public_server.run();

    // 3. optional internal listener serving metrics only
    let internal_server = if config.has_internal_listener() {
        let internal_state = state.clone();
        let mut internal_server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(internal_state.clone()))
                .wrap(Logger::default())
                .route("/metrics", web::get().to(metrics_handler))
        });

        #[cfg(unix)]
        {
            if let Some(socket) = config.internal_unix_socket() {
                cleanup_socket(socket)?;
                internal_server = internal_server.bind_uds(socket)?;
            } else if let Some(addr) = config.internal_bind_address() {
                internal_server = internal_server.bind(addr)?;
            } else {
                return Err(BootstrapError::Io(std::io::Error::other(
                    "internal listener configured but no bind target provided",
                )));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(socket) = config.internal_unix_socket() {
                return Err(BootstrapError::Io(std::io::Error::other(format!(
                    "internal unix socket '{socket}' requested but this platform does not support it"
                ))));
            }
            if let Some(addr) = config.internal_bind_address() {
                internal_server = internal_server.bind(addr)?;
            } else {
                return Err(BootstrapError::Io(std::io::Error::other(
                    "internal listener configured but no bind target provided",
                )));
            }
        }

        info!("internal listener bound");
        Some(internal_server.run())
    } else {
        None
    };

    if let Some(internal) = internal_server {
        tokio::try_join!(public_server, internal)?;
    } else {
        public_server.await?;
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Removes a stale socket file left behind by an unclean shutdown; binding
/// fails otherwise.
#[cfg(unix)]
fn cleanup_socket(path: &str) -> std::io::Result<()> {
    let socket_path = Path::new(path);
    if socket_path.exists() {
        fs::remove_file(socket_path)?;
    }
    Ok(())
}
