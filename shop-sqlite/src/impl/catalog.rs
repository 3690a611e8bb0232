use crate::{
    Db,
    types::{SkuRow, SpuRow},
};
use shop_core::{
    models::{Sku, SkuId, Spu, SpuId},
    ports::CatalogRepository,
};

impl CatalogRepository for Db {
    async fn get_skus(&self, sku_ids: &[SkuId]) -> Result<Vec<Sku>, Self::Error> {
        if sku_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<SkuRow> = sqlx::query_as(
            r#"
            select
                sku.id, sku.spu_id, sku.price, sku.stock, sku.weight, sku.volume,
                sku.pic_url, sku.properties
            from
                sku
            join
                (select distinct atom from json_each($1)) as sku_ids
            on
                sku.id = sku_ids.atom
            "#,
        )
        .bind(sqlx::types::Json(sku_ids))
        .fetch_all(&self.reader)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_spus(&self, spu_ids: &[SpuId]) -> Result<Vec<Spu>, Self::Error> {
        if spu_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<SpuRow> = sqlx::query_as(
            r#"
            select
                spu.id, spu.name, spu.category_id, spu.status, spu.delivery_template_id,
                spu.delivery_types, spu.give_point, spu.pic_url
            from
                spu
            join
                (select distinct atom from json_each($1)) as spu_ids
            on
                spu.id = spu_ids.atom
            "#,
        )
        .bind(sqlx::types::Json(spu_ids))
        .fetch_all(&self.reader)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn adjust_stock(&self, sku_id: SkuId, delta: i32) -> Result<bool, Self::Error> {
        let result = sqlx::query(
            r#"
            update
                sku
            set
                stock = stock + $2
            where
                id = $1
            and
                stock + $2 >= 0
            "#,
        )
        .bind(sku_id)
        .bind(delta)
        .execute(&self.writer)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
