#![warn(missing_docs)]
//! A REST API for the shop trade system.
//!
//! The router exposes price previews, checkout, the order lifecycle and
//! after-sale handling over any [`Application`]. Every handler delegates to
//! `shop_trade` and maps its [`TradeError`] onto an HTTP status with
//! [`reject`].

mod after_sale_routes;
mod order_routes;
mod price_routes;

use aide::{
    axum::{ApiRouter, routing::get},
    openapi::OpenApi,
};
use axum::{Extension, Json, extract::DefaultBodyLimit, http::StatusCode};
use schemars::JsonSchema;
use serde::Serialize;
use shop_core::{TradeError, ports::Application};
use std::sync::Arc;
use tracing::{Level, event};

mod openapi;
use openapi::{api_docs, docs_routes};

pub mod config;
use config::AxumConfig;

/// Response for the health check endpoint
#[derive(Serialize, JsonSchema)]
#[schemars(inline)]
struct HealthResponse {
    status: String,
}

/// Simple health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

fn build<T: ApiApplication>(state: T, config: AxumConfig) -> (axum::Router, Arc<OpenApi>) {
    let mut api = OpenApi::default();
    let router = ApiRouter::new()
        .api_route("/health", get(health_check))
        .nest("/price", price_routes::router())
        .nest("/order", order_routes::router())
        .nest("/after-sale", after_sale_routes::router())
        .nest_api_service("/docs", docs_routes())
        .finish_api_with(&mut api, api_docs);

    // share one copy of the document between every request
    let api = Arc::new(api);
    let router = router
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(Extension(api.clone()))
        .with_state(state);
    (router, api)
}

/// Construct a full API router with the given state and config
pub fn router<T: ApiApplication>(state: T, config: AxumConfig) -> axum::Router {
    build(state, config).0
}

/// The OpenAPI document describing [`router`]
pub fn openapi<T: ApiApplication>(state: T, config: AxumConfig) -> Arc<OpenApi> {
    build(state, config).1
}

/// Starts the HTTP server with the provided configuration
pub async fn start_server<T: ApiApplication>(
    config: AxumConfig,
    app: T,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    tracing::info!("Listening for requests on {}", listener.local_addr()?);

    let service = router(app, config);
    axum::serve(listener, service).await
}

/// Axum imposes all sorts of constraints on what can pass for state. This
/// trait, coupled with a blanket implementation, specifies it all upfront and
/// in one place. If a function takes a generic `T: ApiApplication`, then
/// every handler in this crate can be mounted for it.
pub trait ApiApplication: Application {}

// this is the blanket implementation
impl<T: Application> ApiApplication for T {}

/// Map a trade error onto a status code and a message for the client.
///
/// Infrastructure failures are logged and reported without their details.
pub(crate) fn reject(err: TradeError) -> (StatusCode, String) {
    let status = match &err {
        TradeError::Validation(_) => StatusCode::BAD_REQUEST,
        TradeError::NotFound(_) => StatusCode::NOT_FOUND,
        TradeError::Conflict(_)
        | TradeError::Ineligible(_)
        | TradeError::StockInsufficient { .. } => StatusCode::CONFLICT,
        TradeError::PriceIllegal(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TradeError::TransactionAborted(_) | TradeError::Backend(_) => {
            event!(Level::ERROR, err = err.to_string());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            );
        }
    };
    event!(Level::DEBUG, %status, err = err.to_string());
    (status, err.to_string())
}
