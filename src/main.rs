use actix_web::{web, App, HttpServer};
use tracing::info;

use hearts_server::config::ServerConfig;
use hearts_server::middleware::RequestLog;
use hearts_server::services::GameService;
use hearts_server::state::AppState;
use hearts_server::{routes, telemetry, ws};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Load environment variables early
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().unwrap_or_else(|err| {
        eprintln!("invalid configuration: {err}");
        std::process::exit(1);
    });

    let service = GameService::new();
    let app_state = AppState::new(service);

    info!(port = config.port, "starting hearts server");

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLog)
            .app_data(web::Data::new(app_state.clone()))
            .configure(routes::configure)
            .configure(ws::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
