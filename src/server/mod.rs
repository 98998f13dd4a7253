//! Blog front-end server

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::error::Error;
use crate::listing::{ListingController, ListingError};
use crate::pages;
use crate::resolver::PostResolver;

/// Shared server state: one listing controller and one resolver per process
pub struct AppState {
    pub config: SiteConfig,
    pub listing: ListingController,
    pub resolver: PostResolver,
}

/// Start the front-end server
pub async fn start(state: Arc<AppState>, ip: &str, port: u16) -> Result<()> {
    let app = Router::new()
        .route("/", get(listing_page))
        .route("/load-more", get(load_more))
        .route("/post/:slug", get(post_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// The paginated listing of posts
async fn listing_page(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(pages::render_listing(
        &state.config,
        &state.listing.posts(),
        state.listing.has_more(),
    ))
}

/// User-triggered "load more": merge one page, then return to the listing.
/// A rejected or failed load keeps the accumulated state intact, so the
/// redirect is always safe.
async fn load_more(State(state): State<Arc<AppState>>) -> Redirect {
    match state.listing.load_more().await {
        Ok(outcome) => {
            tracing::info!(appended = outcome.appended, "merged one listing page");
        }
        Err(ListingError::NoMorePages) => {
            tracing::debug!("load-more requested with no pages left");
        }
        Err(ListingError::LoadInProgress) => {
            tracing::debug!("load-more already in flight, ignoring");
        }
        Err(ListingError::Fetch(e)) => {
            tracing::warn!(error = %e, "load-more fetch failed, listing unchanged");
        }
    }
    Redirect::to("/")
}

/// A single post page with prev/next navigation
async fn post_page(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match state.resolver.resolve(&slug).await {
        Ok(resolved) => {
            let cache_control = format!("public, max-age={}", state.resolver.freshness_secs());
            (
                [(header::CACHE_CONTROL, cache_control)],
                Html(pages::render_post(&state.config, &resolved)),
            )
                .into_response()
        }
        Err(Error::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Html(pages::render_not_found(&state.config, &slug)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(slug, error = %e, "post resolution failed");
            (
                StatusCode::BAD_GATEWAY,
                Html(format!("<h1>Content provider unavailable</h1><p>{}</p>", e)),
            )
                .into_response()
        }
    }
}
