mod analysis;
mod config;
mod errors;
mod extraction;
mod geo;
mod models;
mod recommendations;
mod routes;
mod state;
mod text;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::{FieldExtractor, PdfFieldExtractor};
use crate::geo::{GeoLocator, HttpGeoLocator};
use crate::recommendations::catalog::CourseCatalog;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Course catalog (embedded unless COURSE_CATALOG_PATH overrides it)
    let catalog = CourseCatalog::load(config.course_catalog_path.as_deref())
        .context("failed to load course catalog")?;
    info!(
        "Course catalog loaded: {} courses, {} general links",
        catalog.courses.len(),
        catalog.general().len()
    );

    // Optional geolocation
    let geo: Option<Arc<dyn GeoLocator>> = match &config.geolocation_url {
        Some(url) => {
            let locator = HttpGeoLocator::new(
                url,
                Duration::from_millis(config.geolocation_timeout_ms),
            )
            .context("failed to build geolocation client")?;
            info!("Geolocation enabled via {url}");
            Some(Arc::new(locator))
        }
        None => {
            info!("Geolocation disabled (GEOLOCATION_URL not set)");
            None
        }
    };

    let extractor: Arc<dyn FieldExtractor> = Arc::new(PdfFieldExtractor);

    info!(
        "Experience overlap policy: {:?}, upload limit: {} MB",
        config.overlap_policy, config.max_upload_mb
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        extractor,
        catalog: Arc::new(catalog),
        geo,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
