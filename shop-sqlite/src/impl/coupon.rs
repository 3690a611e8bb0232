use crate::{
    Db,
    types::{COUPON_UNUSED, CouponRow},
};
use shop_core::{
    models::{CategoryId, CouponId, CouponQuote, DateTime, SpuId, UserId},
    ports::{CouponFailure, CouponRepository},
};

impl CouponRepository for Db {
    async fn calculate_coupon(
        &self,
        user_id: UserId,
        coupon_id: CouponId,
        pay_price: i64,
        spu_ids: &[SpuId],
        category_ids: &[CategoryId],
        as_of: DateTime,
    ) -> Result<Result<CouponQuote, CouponFailure>, Self::Error> {
        let coupon: Option<CouponRow> = sqlx::query_as(
            r#"
            select
                id, user_id, name, status, usable_price, product_scope, discount_type,
                discount_price, discount_percent, discount_limit_price, valid_start_time,
                valid_end_time
            from
                coupon
            where
                id = $1
            "#,
        )
        .bind(coupon_id)
        .fetch_optional(&self.reader)
        .await?;

        let Some(coupon) = coupon else {
            return Ok(Err(CouponFailure::NotFound));
        };
        if coupon.user_id != user_id {
            return Ok(Err(CouponFailure::NotOwned));
        }
        if coupon.status != COUPON_UNUSED
            || as_of < coupon.valid_start_time
            || as_of >= coupon.valid_end_time
        {
            return Ok(Err(CouponFailure::Unusable));
        }
        if !coupon.covers(spu_ids, category_ids) {
            return Ok(Err(CouponFailure::ScopeMismatch));
        }
        if pay_price < coupon.usable_price {
            return Ok(Err(CouponFailure::ThresholdNotMet {
                min_price: coupon.usable_price,
            }));
        }

        Ok(Ok(CouponQuote {
            coupon_id: coupon.id,
            discount_price: coupon.saving(pay_price).clamp(0, pay_price.max(0)),
            name: coupon.name,
        }))
    }
}
