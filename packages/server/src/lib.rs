#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web dashboard API for the hotspot analysis.
//!
//! The pipeline runs once before the server starts; the resulting labeled
//! [`Snapshot`] is held read-only in [`AppState`] for the lifetime of the
//! process. Every endpoint recomputes its view from the shared snapshot on
//! request, so the only state transitions are the filter parameters the
//! client sends. No authentication and no persisted session state.

mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use hotspot_map_analytics::Snapshot;

/// Shared application state: the immutable labeled dataset.
pub struct AppState {
    /// Snapshot built once at startup.
    pub snapshot: Arc<Snapshot>,
}

/// Starts the dashboard API server over a pre-built snapshot.
///
/// Binds to `BIND_ADDR`/`PORT` (defaults `127.0.0.1:8080`). If
/// `static_dir` is given, its contents are served at `/` for the frontend.
/// This is a regular async function — the caller provides the runtime.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(
    snapshot: Arc<Snapshot>,
    static_dir: Option<PathBuf>,
) -> std::io::Result<()> {
    let state = web::Data::new(AppState { snapshot });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting dashboard server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let mut app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/meta", web::get().to(handlers::meta))
                    .route("/overview", web::get().to(handlers::overview))
                    .route("/trends", web::get().to(handlers::trends))
                    .route("/map", web::get().to(handlers::map))
                    .route("/clusters", web::get().to(handlers::clusters)),
            );

        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/", dir).index_file("index.html"));
        }

        app
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
