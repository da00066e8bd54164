use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use std::io;
use std::net::SocketAddr;

use crate::config::RelayConfig;
use crate::handlers;
use crate::middleware::TracingMiddleware;
use crate::state::AppState;

/// Route table shared by the binary and the tests.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/chat", web::post().to(handlers::chat::handler))
            .route("/health", web::get().to(handlers::health::handler)),
    );
}

/// Bind without running. Port 0 picks a free port; the bound address is
/// returned alongside the server future.
pub fn build_server(state: AppState, host: &str, port: u16) -> io::Result<(Server, SocketAddr)> {
    let state = web::Data::new(state);

    let http = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(TracingMiddleware)
            .configure(app_config)
    })
    .bind((host, port))?;

    let addr = http.addrs().first().copied().ok_or_else(|| {
        io::Error::new(io::ErrorKind::AddrNotAvailable, "server bound no address")
    })?;

    Ok((http.run(), addr))
}

pub async fn run_server(config: RelayConfig, host: &str, port: u16) -> io::Result<()> {
    if !config.has_credential() {
        tracing::warn!("GEMINI_API_KEY is not set; /api/chat will answer 500 until it is configured");
    }

    let (server, addr) = build_server(AppState::from_config(config), host, port)?;
    tracing::info!("Taskpad relay listening on http://{}", addr);
    server.await
}
