//! Edumate · Intelligent Student Assistant Backend
//!
//! - Axum HTTP + WebSocket API
//! - Quiz/assessment scoring with a timed quiz session per WS connection
//! - Optional Gemini + YouTube integrations (via environment variables)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT          : u16 (default 5000)
//!   GEMINI_API_KEY    : enables Gemini integration if present
//!   GEMINI_BASE_URL    : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL  : default "gemini-2.0-flash"
//!   YOUTUBE_API_KEY   : enables YouTube recommendations if present
//!   INSIGHTS_PATH  : insight storage file (default ./data/insights.json)
//!   ASSISTANT_CONFIG_PATH  : path to TOML config (prompts + extra quiz banks)
//!   LOG_LEVEL    : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod banks;
mod engine;
mod session;
mod insights;
mod state;
mod protocol;
mod logic;
mod gemini;
mod youtube;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (question banks, doubt ledger, insights
  // store, external clients).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 5000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "edumate_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
