use shop_core::{
    TradeError,
    models::{AfterSale, AfterSaleApply, AfterSaleId, LogisticsId, UserId},
    ports::{AfterSaleRepository, Application, OrderRepository},
};

/// Prefix of after-sale numbers
pub const AFTER_SALE_NO_PREFIX: &str = "r";

/// Open an after-sale request for an order item.
pub async fn create_after_sale<T: Application>(
    app: &T,
    apply: AfterSaleApply,
) -> Result<AfterSale, TradeError> {
    if apply.refund_price <= 0 {
        return Err(TradeError::Validation(
            "refund price must be positive".to_owned(),
        ));
    }
    if apply.reason.trim().is_empty() {
        return Err(TradeError::Validation("a reason is required".to_owned()));
    }

    let repository = app.database();
    let now = app.now();
    let no = repository
        .next_order_no(AFTER_SALE_NO_PREFIX, now)
        .await
        .map_err(TradeError::backend)?;
    let after_sale = repository
        .create_after_sale(apply, no, now)
        .await
        .map_err(TradeError::backend)??;

    tracing::info!(
        after_sale_id = %after_sale.id,
        order_id = %after_sale.order_id,
        refund_price = after_sale.refund_price,
        "created after-sale"
    );
    Ok(after_sale)
}

/// Get an after-sale request
pub async fn get_after_sale<T: Application>(
    app: &T,
    after_sale_id: AfterSaleId,
) -> Result<AfterSale, TradeError> {
    app.database()
        .get_after_sale(after_sale_id)
        .await
        .map_err(TradeError::backend)?
        .ok_or_else(|| TradeError::NotFound(format!("after-sale {after_sale_id}")))
}

/// The seller approves a request
pub async fn agree_after_sale<T: Application>(
    app: &T,
    after_sale_id: AfterSaleId,
) -> Result<AfterSale, TradeError> {
    let after_sale = app
        .database()
        .agree_after_sale(after_sale_id, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(%after_sale_id, status = ?after_sale.status, "after-sale approved");
    Ok(after_sale)
}

/// The seller declines a request
pub async fn disagree_after_sale<T: Application>(
    app: &T,
    after_sale_id: AfterSaleId,
    reason: String,
) -> Result<AfterSale, TradeError> {
    let after_sale = app
        .database()
        .disagree_after_sale(after_sale_id, reason, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(%after_sale_id, "after-sale rejected");
    Ok(after_sale)
}

/// The buyer ships the goods back
pub async fn deliver_after_sale<T: Application>(
    app: &T,
    user_id: UserId,
    after_sale_id: AfterSaleId,
    logistics_id: LogisticsId,
    logistics_no: String,
) -> Result<AfterSale, TradeError> {
    if logistics_no.trim().is_empty() {
        return Err(TradeError::Validation("tracking number is empty".to_owned()));
    }
    let after_sale = app
        .database()
        .deliver_after_sale(user_id, after_sale_id, logistics_id, logistics_no, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(%after_sale_id, "after-sale goods shipped back");
    Ok(after_sale)
}

/// The seller receives the returned goods
pub async fn receive_after_sale<T: Application>(
    app: &T,
    after_sale_id: AfterSaleId,
) -> Result<AfterSale, TradeError> {
    let after_sale = app
        .database()
        .receive_after_sale(after_sale_id, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(%after_sale_id, "after-sale goods received");
    Ok(after_sale)
}

/// The seller refuses the returned goods
pub async fn refuse_after_sale<T: Application>(
    app: &T,
    after_sale_id: AfterSaleId,
    reason: String,
) -> Result<AfterSale, TradeError> {
    let after_sale = app
        .database()
        .refuse_after_sale(after_sale_id, reason, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(%after_sale_id, "after-sale goods refused");
    Ok(after_sale)
}

/// Refund a request
pub async fn refund_after_sale<T: Application>(
    app: &T,
    after_sale_id: AfterSaleId,
) -> Result<AfterSale, TradeError> {
    let after_sale = app
        .database()
        .refund_after_sale(after_sale_id, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(
        %after_sale_id,
        order_id = %after_sale.order_id,
        refund_price = after_sale.refund_price,
        "after-sale refunded"
    );
    Ok(after_sale)
}

/// The buyer withdraws a request
pub async fn cancel_after_sale<T: Application>(
    app: &T,
    user_id: UserId,
    after_sale_id: AfterSaleId,
) -> Result<AfterSale, TradeError> {
    let after_sale = app
        .database()
        .cancel_after_sale(user_id, after_sale_id, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(%after_sale_id, "after-sale withdrawn");
    Ok(after_sale)
}
