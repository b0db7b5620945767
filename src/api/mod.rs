// HTTP and WebSocket APIs

pub mod office;
pub mod websocket;

pub use office::{create_office_router, OfficeAppState, SERVICE_NAME};
pub use websocket::{create_ws_router, ws_handler, WsAppState};

use crate::service::OfficeService;
use axum::{http::Method, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Full application router: office endpoints, event stream and CORS for
/// any origin.
pub fn create_app(office: Arc<OfficeService>) -> Router {
    Router::new()
        .merge(create_office_router(OfficeAppState {
            office: Arc::clone(&office),
        }))
        .merge(create_ws_router(WsAppState { office }))
        .layer(cors_layer())
}

/// Any origin, no credentials
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}
