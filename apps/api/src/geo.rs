//! Best-effort client geolocation. Lookups that fail for any reason leave the
//! location out of the report; they never fail the request.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lookup service returned status {0}")]
    Status(u16),

    #[error("lookup returned no location fields")]
    Incomplete,
}

#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn locate(&self, ip: IpAddr) -> Result<Location, GeoError>;
}

/// Queries `{base_url}/{ip}` on an ip-api style service.
pub struct HttpGeoLocator {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

impl HttpGeoLocator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GeoError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoLocator for HttpGeoLocator {
    async fn locate(&self, ip: IpAddr) -> Result<Location, GeoError> {
        let url = format!("{}/{}", self.base_url, ip);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }
        let body: LookupResponse = response.json().await?;
        location_from(body)
    }
}

fn location_from(body: LookupResponse) -> Result<Location, GeoError> {
    let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    let location = Location {
        city: clean(body.city),
        region: clean(body.region_name),
        country: clean(body.country),
    };
    if location.city.is_none() && location.region.is_none() && location.country.is_none() {
        return Err(GeoError::Incomplete);
    }
    Ok(location)
}

/// Looks up the caller's location, swallowing every failure.
pub async fn locate_client(locator: Option<&dyn GeoLocator>, headers: &HeaderMap) -> Option<Location> {
    let locator = locator?;
    let Some(ip) = client_ip(headers) else {
        debug!("No routable client IP in request headers; skipping geolocation");
        return None;
    };
    match locator.locate(ip).await {
        Ok(location) => Some(location),
        Err(e) => {
            warn!("Geolocation lookup for {ip} failed: {e}");
            None
        }
    }
}

/// Client address from `X-Forwarded-For` (first hop) or `X-Real-IP`.
/// Private, loopback and unspecified addresses are ignored.
pub fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());
    let real = headers.get("x-real-ip").and_then(|v| v.to_str().ok());

    [forwarded, real]
        .into_iter()
        .flatten()
        .filter_map(|v| v.trim().parse::<IpAddr>().ok())
        .find(is_routable)
}

fn is_routable(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified())
        }
        IpAddr::V6(v6) => !(v6.is_loopback() || v6.is_unspecified()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    struct FailingLocator;

    #[async_trait]
    impl GeoLocator for FailingLocator {
        async fn locate(&self, _ip: IpAddr) -> Result<Location, GeoError> {
            Err(GeoError::Status(503))
        }
    }

    struct FixedLocator;

    #[async_trait]
    impl GeoLocator for FixedLocator {
        async fn locate(&self, _ip: IpAddr) -> Result<Location, GeoError> {
            Ok(Location {
                city: Some("Pune".to_string()),
                region: Some("Maharashtra".to_string()),
                country: Some("India".to_string()),
            })
        }
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn test_client_ip_prefers_first_forwarded_hop() {
        let map = headers(&[
            ("x-forwarded-for", "203.0.113.7, 10.0.0.1"),
            ("x-real-ip", "198.51.100.2"),
        ]);
        assert_eq!(client_ip(&map), Some("203.0.113.7".parse().unwrap()));
    }

    #[test]
    fn test_client_ip_falls_back_to_real_ip() {
        let map = headers(&[("x-forwarded-for", "10.1.2.3"), ("x-real-ip", "198.51.100.2")]);
        assert_eq!(client_ip(&map), Some("198.51.100.2".parse().unwrap()));
        assert_eq!(client_ip(&headers(&[("x-real-ip", "127.0.0.1")])), None);
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_empty_lookup_body_is_incomplete() {
        let body = LookupResponse {
            city: Some(" ".to_string()),
            region_name: None,
            country: None,
        };
        assert!(matches!(location_from(body), Err(GeoError::Incomplete)));
    }

    #[tokio::test]
    async fn test_failures_degrade_to_none() {
        let map = headers(&[("x-real-ip", "198.51.100.2")]);
        assert_eq!(locate_client(Some(&FailingLocator as &dyn GeoLocator), &map).await, None);
        assert_eq!(locate_client(None, &map).await, None);
        assert!(locate_client(Some(&FixedLocator as &dyn GeoLocator), &map).await.is_some());
    }
}
