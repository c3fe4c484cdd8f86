use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::router::{handle, App};
use astra::{ConnectionInfo, Request, Server};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let db = Database::new(config.db_path.clone());

    if let Err(e) = init_db(&db, &config.schema_path) {
        error!("database initialization failed: {e}");
        std::process::exit(1);
    }

    let app = App::new(db, &config);
    info!(addr = %config.addr, workers = config.workers, "starting server");

    let server = Server::bind(&config.addr).max_workers(config.workers);

    let result = server.serve(move |req: Request, _info: ConnectionInfo| {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let resp = match handle(req, &app) {
            Ok(resp) => resp,
            Err(err) => responses::error_to_response(err),
        };

        info!(%method, %path, status = resp.status().as_u16(), "request");
        resp
    });

    if let Err(e) = result {
        error!("server ended with error: {e}");
    }

    info!("server shut down cleanly");
}
