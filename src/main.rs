use crate::config::Config;
use crate::db::init_db;
use crate::domain::application::decode_applications;
use crate::domain::stats::aggregate;
use crate::responses::error_to_response;
use crate::router::handle;
use crate::state::AppState;
use astra::{Request, Response, Server};
use std::io::Write;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod errors;
mod responses;
mod router;
mod spreadsheets;
mod state;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // `visa_desk summarize <feed.json>` prints bucket counts for an exported feed.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [cmd, path] = args.as_slice() {
        if cmd == "summarize" {
            std::process::exit(summarize(path, &mut std::io::stdout()));
        }
    }

    let cfg = Config::load();
    let state = AppState::from_config(&cfg);

    if let Err(e) = init_db(&state.db, &cfg.schema_path) {
        error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    info!(
        stages = ?cfg.stages.stages(),
        tax_percent = cfg.tax_percent,
        "Starting server at http://{}",
        cfg.addr
    );

    let server = Server::bind(&cfg.addr).max_workers(cfg.max_workers);

    let result = server.serve(move |req: Request, _info| serve_request(req, &state));

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}

/// Runs one request through the router. Errors become rendered error pages.
fn serve_request(req: Request, state: &AppState) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match handle(req, state) {
        Ok(resp) => {
            info!(%method, path, status = resp.status().as_u16(), "request");
            resp
        }
        Err(err) => error_to_response(err),
    }
}

/// Writes the bucket counts of the feed at `path` to `out` as JSON. Returns the exit code.
fn summarize<W: Write>(path: &str, out: &mut W) -> i32 {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Could not read {path}: {e}");
            return 1;
        }
    };

    let apps = decode_applications(&raw);
    info!(count = apps.len(), "Decoded application feed");

    let written = serde_json::to_string_pretty(&aggregate(&apps).as_map())
        .map_err(|e| e.to_string())
        .and_then(|json| writeln!(out, "{json}").map_err(|e| e.to_string()));

    match written {
        Ok(()) => 0,
        Err(e) => {
            error!("Could not write summary: {e}");
            1
        }
    }
}
