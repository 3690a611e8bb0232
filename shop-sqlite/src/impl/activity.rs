use crate::{
    Db,
    types::{BARGAIN_SUCCEEDED, BargainRow, DiscountRow, ExclusiveRow, RewardRow},
};
use shop_core::{
    models::{
        CategoryId, DateTime, DiscountProduct, ExclusiveKind, ExclusiveQuery, ExclusiveQuote,
        ProductScope, RewardActivity, SkuId, SpuId,
    },
    ports::{ActivityFailure, ActivityRepository},
};

// Each query selects the activity and, through a left join, its terms for
// the requested SKU. A missing product row means the SKU does not take part.
const SECKILL: &str = r#"
    select
        a.id as activity_id,
        a.name,
        (a.enabled and a.start_time <= $3 and $3 < a.end_time) as live,
        a.single_limit_count,
        p.seckill_price as unit_price,
        0 as unit_point,
        p.stock
    from
        seckill_activity a
    left join
        seckill_product p
    on
        p.activity_id = a.id and p.sku_id = $2
    where
        a.id = $1
"#;

const COMBINATION: &str = r#"
    select
        a.id as activity_id,
        a.name,
        (a.enabled and a.start_time <= $3 and $3 < a.end_time) as live,
        a.single_limit_count,
        p.combination_price as unit_price,
        0 as unit_point,
        null as stock
    from
        combination_activity a
    left join
        combination_product p
    on
        p.activity_id = a.id and p.sku_id = $2
    where
        a.id = $1
"#;

const POINT: &str = r#"
    select
        a.id as activity_id,
        a.name,
        a.enabled as live,
        a.single_limit_count,
        p.price as unit_price,
        coalesce(p.point, 0) as unit_point,
        p.stock
    from
        point_activity a
    left join
        point_product p
    on
        p.activity_id = a.id and p.sku_id = $2
    where
        a.id = $1
"#;

impl Db {
    async fn price_bargain(
        &self,
        query: &ExclusiveQuery,
        as_of: DateTime,
    ) -> Result<Result<ExclusiveQuote, ActivityFailure>, sqlx::Error> {
        let record: Option<BargainRow> = sqlx::query_as(
            r#"
            select
                a.id as activity_id,
                a.name,
                (a.enabled and a.start_time <= $2 and $2 < a.end_time) as live,
                r.user_id,
                r.sku_id,
                r.bargain_price,
                r.status,
                r.order_id,
                a.stock
            from
                bargain_record r
            join
                bargain_activity a
            on
                a.id = r.activity_id
            where
                r.id = $1
            "#,
        )
        .bind(query.activity_id)
        .bind(as_of)
        .fetch_optional(&self.reader)
        .await?;

        let Some(record) = record else {
            return Ok(Err(ActivityFailure::NotFound));
        };
        if !record.live {
            return Ok(Err(ActivityFailure::NotLive));
        }
        if record.user_id != query.user_id
            || record.status != BARGAIN_SUCCEEDED
            || record.order_id.is_some()
        {
            return Ok(Err(ActivityFailure::RecordNotUsable));
        }
        if record.sku_id != query.sku_id {
            return Ok(Err(ActivityFailure::SkuNotInActivity));
        }
        // a bargain is always for a single unit
        if query.count != 1 {
            return Ok(Err(ActivityFailure::CountExceeded { limit: 1 }));
        }
        if record.stock < 1 {
            return Ok(Err(ActivityFailure::StockExhausted));
        }

        Ok(Ok(ExclusiveQuote {
            activity_id: record.activity_id,
            name: record.name,
            unit_price: record.bargain_price,
            unit_point: 0,
        }))
    }
}

impl ActivityRepository for Db {
    async fn price_exclusive(
        &self,
        query: &ExclusiveQuery,
        as_of: DateTime,
    ) -> Result<Result<ExclusiveQuote, ActivityFailure>, Self::Error> {
        let sql = match query.kind {
            ExclusiveKind::Seckill => SECKILL,
            ExclusiveKind::Combination => COMBINATION,
            ExclusiveKind::Point => POINT,
            ExclusiveKind::Bargain => return self.price_bargain(query, as_of).await,
        };

        let mut select = sqlx::query_as::<sqlx::Sqlite, ExclusiveRow>(sql)
            .bind(query.activity_id)
            .bind(query.sku_id);
        // point activities have no time window
        if query.kind != ExclusiveKind::Point {
            select = select.bind(as_of);
        }
        let row = select.fetch_optional(&self.reader).await?;

        let Some(row) = row else {
            return Ok(Err(ActivityFailure::NotFound));
        };
        if !row.live {
            return Ok(Err(ActivityFailure::NotLive));
        }
        let Some(unit_price) = row.unit_price else {
            return Ok(Err(ActivityFailure::SkuNotInActivity));
        };
        if row.single_limit_count > 0 && query.count > row.single_limit_count {
            return Ok(Err(ActivityFailure::CountExceeded {
                limit: row.single_limit_count,
            }));
        }
        if row.stock.is_some_and(|stock| stock < query.count) {
            return Ok(Err(ActivityFailure::StockExhausted));
        }

        Ok(Ok(ExclusiveQuote {
            activity_id: row.activity_id,
            name: row.name,
            unit_price,
            unit_point: row.unit_point,
        }))
    }

    async fn match_reward_activities(
        &self,
        spu_ids: &[SpuId],
        category_ids: &[CategoryId],
        as_of: DateTime,
    ) -> Result<Vec<RewardActivity>, Self::Error> {
        let rows: Vec<RewardRow> = sqlx::query_as(
            r#"
            select
                id, name, condition_type, product_scope, rules
            from
                reward_activity
            where
                enabled
            and
                start_time <= $1 and $1 < end_time
            order by
                id
            "#,
        )
        .bind(as_of)
        .fetch_all(&self.reader)
        .await?;

        Ok(rows
            .into_iter()
            .map(RewardActivity::from)
            .filter(|activity| match &activity.product_scope {
                ProductScope::All => true,
                ProductScope::Spu(ids) => spu_ids.iter().any(|id| ids.contains(id)),
                ProductScope::Category(ids) => category_ids.iter().any(|id| ids.contains(id)),
            })
            .collect())
    }

    async fn match_discount_products(
        &self,
        sku_ids: &[SkuId],
        as_of: DateTime,
    ) -> Result<Vec<DiscountProduct>, Self::Error> {
        if sku_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut rows: Vec<DiscountRow> = sqlx::query_as(
            r#"
            select
                a.id as activity_id,
                a.name as activity_name,
                p.sku_id,
                p.discount_type,
                p.discount_percent,
                p.discount_price
            from
                discount_product p
            join
                discount_activity a
            on
                a.id = p.activity_id
            where
                a.enabled
            and
                a.start_time <= $2 and $2 < a.end_time
            and
                p.sku_id in (select atom from json_each($1))
            order by
                p.sku_id, a.id desc
            "#,
        )
        .bind(sqlx::types::Json(sku_ids))
        .bind(as_of)
        .fetch_all(&self.reader)
        .await?;

        // the most recent activity wins when several cover the same SKU
        rows.dedup_by_key(|row| row.sku_id);
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
