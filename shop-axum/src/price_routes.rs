//! REST API endpoints for price previews.
//!
//! Nothing here writes: the checkout page prices a cart with the same
//! pipeline an order is committed with, and product pages show the price a
//! member would pay for a SKU before delivery, coupons and points.

use crate::{ApiApplication, reject};
use aide::axum::{ApiRouter, routing::post};
use axum::{Json, extract::State, http::StatusCode};
use schemars::JsonSchema;
use serde::Deserialize;
use shop_core::models::{PriceContext, PriceRequest, SkuId, SkuPrice, UserId};
use shop_trade::{calculate_price, calculate_sku_prices};

/// Creates a router with price-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with("/", post(price_cart::<T>), |route| route.tag("price"))
        .api_route_with("/skus", post(price_skus::<T>), |route| route.tag("price"))
}

/// The SKUs to show a member's price for
#[derive(Deserialize, JsonSchema)]
struct SkuPriceQuery {
    /// The member browsing
    user_id: UserId,
    /// The SKUs on the page
    sku_ids: Vec<SkuId>,
}

/// Price a cart.
///
/// Runs the full calculator pipeline and returns the itemised breakdown with
/// every promotion that was considered.
///
/// # Returns
///
/// - `200 OK`: The priced cart
/// - `400 Bad Request`: Malformed request
/// - `404 Not Found`: Unknown SKU, address, coupon or activity
/// - `409 Conflict`: Out of stock, or a promotion's rules are not met
/// - `422 Unprocessable Entity`: Nothing would be left to pay
async fn price_cart<T: ApiApplication>(
    State(app): State<T>,
    Json(request): Json<PriceRequest>,
) -> Result<Json<PriceContext>, (StatusCode, String)> {
    let ctx = calculate_price(&app, &request).await.map_err(reject)?;
    Ok(Json(ctx))
}

/// Preview member prices for a list of SKUs.
///
/// # Returns
///
/// - `200 OK`: One price per known SKU
/// - `500 Internal Server Error`: Database query failed
async fn price_skus<T: ApiApplication>(
    State(app): State<T>,
    Json(SkuPriceQuery { user_id, sku_ids }): Json<SkuPriceQuery>,
) -> Result<Json<Vec<SkuPrice>>, (StatusCode, String)> {
    let prices = calculate_sku_prices(&app, user_id, &sku_ids)
        .await
        .map_err(reject)?;
    Ok(Json(prices))
}
