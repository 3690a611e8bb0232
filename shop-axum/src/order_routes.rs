//! REST API endpoints for checkout and the order lifecycle.
//!
//! Every state change goes through a guarded transition: a request made in
//! the wrong status answers `409 Conflict` and changes nothing.

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
use shop_core::models::{
    CancelType, LogisticsId, Operator, Order, OrderId, OrderLog, OrderRecord, PayOrderId,
    PriceRequest, UserId,
};
use shop_trade::order::{
    cancel_order, cancel_paid_order, create_order, deliver_order, get_order, get_order_logs,
    pay_order, pick_up_order, receive_order,
};

/// Creates a router with order-related endpoints.
pub fn router<T: ApiApplication>() -> ApiRouter<T> {
    ApiRouter::new()
        .api_route_with("/", post(checkout::<T>), |route| route.tag("order"))
        .api_route_with("/pick-up", post(pick_up::<T>), |route| {
            route.tag("order").tag("admin")
        })
        .api_route_with("/{order_id}", get(find::<T>), |route| route.tag("order"))
        .api_route_with("/{order_id}/logs", get(logs::<T>), |route| {
            route.tag("order")
        })
        .api_route_with("/{order_id}/pay", post(pay::<T>), |route| {
            route.tag("order").tag("admin")
        })
        .api_route_with("/{order_id}/cancel", post(cancel::<T>), |route| {
            route.tag("order")
        })
        .api_route_with("/{order_id}/cancel-paid", post(cancel_paid::<T>), |route| {
            route.tag("order").tag("admin")
        })
        .api_route_with("/{order_id}/deliver", post(deliver::<T>), |route| {
            route.tag("order").tag("admin")
        })
        .api_route_with("/{order_id}/receive", post(receive::<T>), |route| {
            route.tag("order")
        })
}

/// Path parameter for order-specific endpoints.
#[derive(Deserialize, JsonSchema)]
#[schemars(inline)]
struct Id {
    /// The unique identifier of the order
    order_id: OrderId,
}

/// A checkout: the priced request and a note for the seller
#[derive(Deserialize, JsonSchema)]
struct Checkout {
    #[serde(flatten)]
    request: PriceRequest,
    /// Free-form note from the buyer
    #[serde(default)]
    remark: Option<String>,
}

/// The payment system's success callback
#[derive(Deserialize, JsonSchema)]
struct PaidCallback {
    /// The payment order that was paid
    pay_order_id: PayOrderId,
}

/// Who cancels an order
#[derive(Deserialize, JsonSchema)]
struct Cancel {
    operator: Operator,
}

/// Who cancels a paid order, and why
#[derive(Deserialize, JsonSchema)]
struct CancelPaid {
    operator: Operator,
    cancel_type: CancelType,
}

/// Shipping details
#[derive(Deserialize, JsonSchema)]
struct Shipment {
    /// Carrier
    logistics_id: LogisticsId,
    /// Tracking number
    logistics_no: String,
}

/// The buyer confirming receipt
#[derive(Deserialize, JsonSchema)]
struct Receipt {
    user_id: UserId,
}

/// A store clerk verifying a pick-up code
#[derive(Deserialize, JsonSchema)]
struct PickUp {
    verify_code: String,
    operator: Operator,
}

/// Place an order.
///
/// The request is priced again and committed as one unit of work: stock,
/// activity stock, coupon, points, cart and payment order change together
/// or not at all.
///
/// # Returns
///
/// - `201 Created`: The order with its items
/// - `400 Bad Request`: Malformed request
/// - `404 Not Found`: Unknown SKU, address, coupon or activity
/// - `409 Conflict`: Out of stock, or a promotion is no longer available
/// - `422 Unprocessable Entity`: Nothing would be left to pay
/// - `500 Internal Server Error`: The transaction was aborted
async fn checkout<T: ApiApplication>(
    State(app): State<T>,
    Json(Checkout { request, remark }): Json<Checkout>,
) -> Result<(StatusCode, Json<OrderRecord>), (StatusCode, String)> {
    let record = create_order(&app, &request, remark).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Retrieve an order with its items.
async fn find<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { order_id }): Path<Id>,
) -> Result<Json<OrderRecord>, (StatusCode, String)> {
    let record = get_order(&app, order_id).await.map_err(reject)?;
    Ok(Json(record))
}

/// Retrieve the audit log of an order, oldest first.
async fn logs<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { order_id }): Path<Id>,
) -> Result<Json<Vec<OrderLog>>, (StatusCode, String)> {
    let logs = get_order_logs(&app, order_id).await.map_err(reject)?;
    Ok(Json(logs))
}

/// Record a successful payment.
///
/// # Returns
///
/// - `200 OK`: The paid order
/// - `404 Not Found`: Unknown order
/// - `409 Conflict`: The order is not awaiting payment, or the payment order does not match
async fn pay<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { order_id }): Path<Id>,
    Json(PaidCallback { pay_order_id }): Json<PaidCallback>,
) -> Result<Json<Order>, (StatusCode, String)> {
    let order = pay_order(&app, order_id, pay_order_id)
        .await
        .map_err(reject)?;
    Ok(Json(order))
}

/// Cancel an unpaid order, returning everything it reserved.
async fn cancel<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { order_id }): Path<Id>,
    Json(Cancel { operator }): Json<Cancel>,
) -> Result<Json<Order>, (StatusCode, String)> {
    let order = cancel_order(&app, order_id, operator)
        .await
        .map_err(reject)?;
    Ok(Json(order))
}

/// Cancel a paid order that has not shipped, refunding it in full.
async fn cancel_paid<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { order_id }): Path<Id>,
    Json(CancelPaid {
        operator,
        cancel_type,
    }): Json<CancelPaid>,
) -> Result<Json<Order>, (StatusCode, String)> {
    let order = cancel_paid_order(&app, order_id, operator, cancel_type)
        .await
        .map_err(reject)?;
    Ok(Json(order))
}

/// Ship an express order.
async fn deliver<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { order_id }): Path<Id>,
    Json(Shipment {
        logistics_id,
        logistics_no,
    }): Json<Shipment>,
) -> Result<Json<Order>, (StatusCode, String)> {
    let order = deliver_order(&app, order_id, logistics_id, logistics_no)
        .await
        .map_err(reject)?;
    Ok(Json(order))
}

/// The buyer confirms receipt of a shipped order.
async fn receive<T: ApiApplication>(
    State(app): State<T>,
    Path(Id { order_id }): Path<Id>,
    Json(Receipt { user_id }): Json<Receipt>,
) -> Result<Json<Order>, (StatusCode, String)> {
    let order = receive_order(&app, user_id, order_id)
        .await
        .map_err(reject)?;
    Ok(Json(order))
}

/// Hand over a pick-up order against its verify code.
async fn pick_up<T: ApiApplication>(
    State(app): State<T>,
    Json(PickUp {
        verify_code,
        operator,
    }): Json<PickUp>,
) -> Result<Json<Order>, (StatusCode, String)> {
    let order = pick_up_order(&app, &verify_code, operator)
        .await
        .map_err(reject)?;
    Ok(Json(order))
}
