//! Location service: resolves street addresses to coordinates through a
//! configurable geocoding provider.

pub mod api;
pub mod config;
pub mod geocode;
pub mod routes;
pub mod state;

pub use config::Config;
pub use geocode::{GeocodeError, Geocoder, HttpGeocoder};
pub use routes::build_router;
pub use state::AppState;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use slotwise_core::{GeoPoint, GeocodedAddress};
    use slotwise_runtime::MetricsServer;
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedGeocoder;

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, address: &str) -> Result<GeocodedAddress, GeocodeError> {
            if address == "nowhere" {
                return Err(GeocodeError::NoMatch(address.to_string()));
            }
            Ok(GeocodedAddress {
                point: GeoPoint {
                    latitude: 58.378,
                    longitude: 26.729,
                },
                formatted: "Tartu, Estonia".to_string(),
            })
        }
    }

    fn app() -> axum::Router {
        build_router(AppState {
            geocoder: Arc::new(FixedGeocoder),
            metrics: Arc::new(MetricsServer::new("127.0.0.1:0".parse().unwrap())),
        })
    }

    #[tokio::test]
    async fn resolves_an_address() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/location?address=Tartu")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_address_is_a_400() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/location?address=%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_address_is_a_404() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/location?address=nowhere")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
