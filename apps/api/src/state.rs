use std::sync::Arc;

use crate::config::Config;
use crate::extraction::FieldExtractor;
use crate::geo::GeoLocator;
use crate::recommendations::catalog::CourseCatalog;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable field extractor. Default: PdfFieldExtractor.
    pub extractor: Arc<dyn FieldExtractor>,
    pub catalog: Arc<CourseCatalog>,
    /// `None` when GEOLOCATION_URL is unset.
    pub geo: Option<Arc<dyn GeoLocator>>,
}
