use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::error;

use crate::log::store::{CsvEventLog, EventLog};

use super::{aggregate::available_days, page, report::build_report};

pub struct ServeConfig {
    pub port: u16,
    pub log_path: PathBuf,
}

struct AppState {
    log_path: PathBuf,
}

#[derive(Deserialize)]
struct DayQuery {
    date: Option<String>,
}

/// Build the router (for testing without binding to a port).
pub fn router(log_path: PathBuf) -> Router {
    let state = Arc::new(AppState { log_path });
    Router::new().route("/", get(day_view)).with_state(state)
}

pub async fn serve(config: ServeConfig) -> Result<()> {
    let app = router(config.log_path);
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Activity viewer running at http://{addr}");
    println!("Press Ctrl+C to stop.");
    axum::serve(listener, app).await?;
    Ok(())
}

/// The one read endpoint. Always answers with a complete document; a day
/// without data renders the empty state rather than an error page.
async fn day_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DayQuery>,
) -> Html<String> {
    // The log is re-read on every request so a running collector is always
    // reflected. No cache, no shared state across requests.
    let events = match CsvEventLog::new(state.log_path.clone()).read_all().await {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to read the event log {e:?}");
            Vec::new()
        }
    };

    let days = available_days(&events);
    let day = query
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .or_else(|| days.first().copied())
        .unwrap_or_else(|| Local::now().date_naive());

    let report = build_report(&events, day, days);
    Html(page::render(&report))
}
