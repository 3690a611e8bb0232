//! REST API endpoints for after-sale requests.
//!
//! A buyer opens a request for one order item; the seller reviews it and,
//! for returns, receives the goods before refunding.

use crate::{ApiApplication, reject};
use aide::axum::{
    ApiRouter,
    routing::{get, post},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schemars::JsonSchema;
use serde::Deserialize;
use shop_core::models::{AfterSale, AfterSaleApply, AfterSaleId, LogisticsId, UserId};
use shop_trade::after_sale::{
    agree_after_sale, cancel_after_sale, create_after_sale, deliver_after_sale,
    disagree_after_sale, get_after_sale, receive_after_sale, refund_after_sale,
    refuse_after_sale,
};

/// Creates a router with after-sale endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with("/", post(apply::<T>), |route| route.tag("after-sale"))
        .api_route_with("/{after_sale_id}", get(find::<T>), |route| {
            route.tag("after-sale")
        })
        .api_route_with("/{after_sale_id}/agree", post(agree::<T>), |route| {
            route.tag("after-sale").tag("admin")
        })
        .api_route_with("/{after_sale_id}/disagree", post(disagree::<T>), |route| {
            route.tag("after-sale").tag("admin")
        })
        .api_route_with("/{after_sale_id}/deliver", post(deliver::<T>), |route| {
            route.tag("after-sale")
        })
        .api_route_with("/{after_sale_id}/receive", post(receive::<T>), |route| {
            route.tag("after-sale").tag("admin")
        })
        .api_route_with("/{after_sale_id}/refuse", post(refuse::<T>), |route| {
            route.tag("after-sale").tag("admin")
        })
        .api_route_with("/{after_sale_id}/refund", post(refund::<T>), |route| {
            route.tag("after-sale").tag("admin")
        })
        .api_route_with("/{after_sale_id}/cancel", post(cancel::<T>), |route| {
            route.tag("after-sale")
        })
}

/// Path parameter for after-sale endpoints.
#[derive(Deserialize, JsonSchema)]
#[schemars(inline)]
struct Id {
    /// The unique identifier of the after-sale request
    after_sale_id: AfterSaleId,
}

/// The seller's reason for declining
#[derive(Deserialize, JsonSchema)]
struct Reason {
    reason: String,
}

/// The buyer shipping goods back
#[derive(Deserialize, JsonSchema)]
struct Return {
    user_id: UserId,
    /// Carrier
    logistics_id: LogisticsId,
    /// Tracking number
    logistics_no: String,
}

/// The buyer acting on their own request
#[derive(Deserialize, JsonSchema)]
struct Buyer {
    user_id: UserId,
}

/// Open an after-sale request for an order item.
///
/// # Returns
///
/// - `201 Created`: The new request
/// - `400 Bad Request`: The refund is not within the item's pay price
/// - `404 Not Found`: Unknown item, or it belongs to someone else
/// - `409 Conflict`: The order does not allow after-sale, or the item already has a request
async fn apply<T: ApiApplication>(
    State(app): State<T>,
    Json(apply): Json<AfterSaleApply>,
) -> Result<(StatusCode, Json<AfterSale>), (StatusCode, String)> {
    let after_sale = create_after_sale(&app, apply).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(after_sale)))
}

/// Retrieve an after-sale request.
async fn find<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { after_sale_id }): Path<Id>,
) -> Result<Json<AfterSale>, (StatusCode, String)> {
    let after_sale = get_after_sale(&app, after_sale_id).await.map_err(reject)?;
    Ok(Json(after_sale))
}

/// Approve a request awaiting review.
async fn agree<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { after_sale_id }): Path<Id>,
) -> Result<Json<AfterSale>, (StatusCode, String)> {
    let after_sale = agree_after_sale(&app, after_sale_id)
        .await
        .map_err(reject)?;
    Ok(Json(after_sale))
}

/// Decline a request awaiting review.
async fn disagree<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { after_sale_id }): Path<Id>,
    Json(Reason { reason }): Json<Reason>,
) -> Result<Json<AfterSale>, (StatusCode, String)> {
    let after_sale = disagree_after_sale(&app, after_sale_id, reason)
        .await
        .map_err(reject)?;
    Ok(Json(after_sale))
}

/// The buyer ships the goods of an approved return.
async fn deliver<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { after_sale_id }): Path<Id>,
    Json(Return {
        user_id,
        logistics_id,
        logistics_no,
    }): Json<Return>,
) -> Result<Json<AfterSale>, (StatusCode, String)> {
    let after_sale = deliver_after_sale(&app, user_id, after_sale_id, logistics_id, logistics_no)
        .await
        .map_err(reject)?;
    Ok(Json(after_sale))
}

/// The seller accepts the returned goods.
async fn receive<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { after_sale_id }): Path<Id>,
) -> Result<Json<AfterSale>, (StatusCode, String)> {
    let after_sale = receive_after_sale(&app, after_sale_id)
        .await
        .map_err(reject)?;
    Ok(Json(after_sale))
}

/// The seller refuses the returned goods.
async fn refuse<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { after_sale_id }): Path<Id>,
    Json(Reason { reason }): Json<Reason>,
) -> Result<Json<AfterSale>, (StatusCode, String)> {
    let after_sale = refuse_after_sale(&app, after_sale_id, reason)
        .await
        .map_err(reject)?;
    Ok(Json(after_sale))
}

/// Refund a request, returning the stock and settling the order.
async fn refund<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { after_sale_id }): Path<Id>,
) -> Result<Json<AfterSale>, (StatusCode, String)> {
    let after_sale = refund_after_sale(&app, after_sale_id)
        .await
        .map_err(reject)?;
    Ok(Json(after_sale))
}

/// The buyer withdraws a request.
async fn cancel<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { after_sale_id }): Path<Id>,
    Json(Buyer { user_id }): Json<Buyer>,
) -> Result<Json<AfterSale>, (StatusCode, String)> {
    let after_sale = cancel_after_sale(&app, user_id, after_sale_id)
        .await
        .map_err(reject)?;
    Ok(Json(after_sale))
}
