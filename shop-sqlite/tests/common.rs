#![allow(dead_code)]

use shop_core::{
    models::{
        ActivityId, AddressId, CouponId, DateTime, DeliveryType, PriceRequest, RequestItem, SkuId,
        StoreId, TradeConfig, UserId,
    },
    ports::Application,
};
use shop_sqlite::{Db, config::SqliteConfig};
use std::{path::Path, time::Duration};
use time::macros::datetime;

pub const BUYER: UserId = UserId(1);
pub const OTHER: UserId = UserId(2);
/// 10.00, 10 in stock
pub const TEA: SkuId = SkuId(1);
/// 20.00, the last one
pub const CUP: SkuId = SkuId(2);
/// 50.00, 5 in stock
pub const POT: SkuId = SkuId(3);

#[derive(Clone)]
pub struct TestApp {
    pub db: Db,
    pub config: TradeConfig,
    pub now: DateTime,
}

impl Application for TestApp {
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.db
    }

    fn now(&self) -> DateTime {
        self.now
    }

    fn config(&self) -> &TradeConfig {
        &self.config
    }
}

impl TestApp {
    /// A seeded in-memory database
    pub async fn new() -> anyhow::Result<Self> {
        Self::open(SqliteConfig::default()).await
    }

    /// A seeded database stored in `dir`
    pub async fn on_disk(dir: &Path) -> anyhow::Result<Self> {
        Self::open(SqliteConfig {
            database_path: Some(dir.join("shop.db")),
            ..Default::default()
        })
        .await
    }

    async fn open(config: SqliteConfig) -> anyhow::Result<Self> {
        let app = Self {
            db: Db::open(&config).await?,
            config: TradeConfig::default(),
            now: datetime!(2025-06-01 10:00:00 UTC).into(),
        };
        app.seed().await?;
        Ok(app)
    }

    pub fn later(&self, minutes: u64) -> DateTime {
        self.now.plus(Duration::from_secs(minutes * 60))
    }

    async fn seed(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            insert into delivery_template (id, name, charge_mode) values (1, 'standard', 1);
            insert into delivery_template_charge
                (template_id, area_ids, start_count, start_price, extra_count, extra_price)
            values
                (1, '[]', 1, 500, 1, 200);

            insert into spu (id, name, category_id, delivery_template_id, delivery_types, give_point)
            values
                (1, 'tea', 1, 1, '["EXPRESS","PICK_UP"]', 1),
                (2, 'cup', 2, 1, '["EXPRESS"]', 0),
                (3, 'pot', 1, 1, '["EXPRESS","PICK_UP"]', 0);

            insert into sku (id, spu_id, price, stock)
            values
                (1, 1, 1000, 10),
                (2, 2, 2000, 1),
                (3, 3, 5000, 5);

            insert into member_user (id, point) values (1, 0), (2, 0);
            insert into member_address (id, user_id, name, mobile, area_id, detail_address)
            values
                (1, 1, 'Ada', '555-0100', 110100, '1 Tea Street');

            insert into pick_up_store (id, name) values (1, 'downtown');
            "#,
        )
        .execute(&self.db.writer)
        .await?;
        Ok(())
    }

    pub async fn stock(&self, sku_id: SkuId) -> anyhow::Result<i32> {
        Ok(sqlx::query_scalar("select stock from sku where id = $1")
            .bind(sku_id)
            .fetch_one(&self.db.reader)
            .await?)
    }

    pub async fn point(&self, user_id: UserId) -> anyhow::Result<i64> {
        Ok(
            sqlx::query_scalar("select point from member_user where id = $1")
                .bind(user_id)
                .fetch_one(&self.db.reader)
                .await?,
        )
    }

    pub async fn set_point(&self, user_id: UserId, point: i64) -> anyhow::Result<()> {
        sqlx::query("update member_user set point = $2 where id = $1")
            .bind(user_id)
            .bind(point)
            .execute(&self.db.writer)
            .await?;
        Ok(())
    }

    pub async fn count(&self, table: &str) -> anyhow::Result<i64> {
        Ok(sqlx::query_scalar(&format!("select count(*) from {table}"))
            .fetch_one(&self.db.reader)
            .await?)
    }

    /// Issue a fixed-amount coupon to the buyer, valid for a day around now
    pub async fn grant_coupon(&self, coupon_id: CouponId, discount_price: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            insert into coupon
                (id, user_id, name, discount_type, discount_price, valid_start_time, valid_end_time)
            values
                ($1, $2, 'welcome', 1, $3, $4, $5)
            "#,
        )
        .bind(coupon_id)
        .bind(BUYER)
        .bind(discount_price)
        .bind(self.now.minus(Duration::from_secs(3600)))
        .bind(self.now.plus(Duration::from_secs(86400)))
        .execute(&self.db.writer)
        .await?;
        Ok(())
    }

    pub async fn coupon_status(&self, coupon_id: CouponId) -> anyhow::Result<i32> {
        Ok(sqlx::query_scalar("select status from coupon where id = $1")
            .bind(coupon_id)
            .fetch_one(&self.db.reader)
            .await?)
    }

    /// A live flash sale selling TEA at 6.00, at most 2 per order, 3 in stock
    pub async fn seckill(&self, activity_id: ActivityId) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            insert into seckill_activity (id, name, start_time, end_time, single_limit_count)
            values ($1, 'flash', $2, $3, 2)
            "#,
        )
        .bind(activity_id)
        .bind(self.now.minus(Duration::from_secs(3600)))
        .bind(self.now.plus(Duration::from_secs(3600)))
        .execute(&self.db.writer)
        .await?;
        sqlx::query(
            "insert into seckill_product (activity_id, sku_id, seckill_price, stock) values ($1, 1, 600, 3)",
        )
        .bind(activity_id)
        .execute(&self.db.writer)
        .await?;
        Ok(())
    }

    pub async fn seckill_stock(&self, activity_id: ActivityId) -> anyhow::Result<i32> {
        Ok(sqlx::query_scalar(
            "select stock from seckill_product where activity_id = $1 and sku_id = 1",
        )
        .bind(activity_id)
        .fetch_one(&self.db.reader)
        .await?)
    }
}

pub fn line(sku_id: SkuId, count: i32) -> RequestItem {
    RequestItem {
        sku_id,
        count,
        cart_id: None,
        selected: true,
    }
}

/// An express checkout to the buyer's address
pub fn request(items: Vec<RequestItem>) -> PriceRequest {
    PriceRequest {
        user_id: BUYER,
        coupon_id: None,
        point_status: false,
        delivery_type: DeliveryType::Express,
        address_id: Some(AddressId(1)),
        pick_up_store_id: None,
        seckill_activity_id: None,
        combination_activity_id: None,
        combination_head_id: None,
        bargain_record_id: None,
        point_activity_id: None,
        items,
    }
}

/// A pick-up checkout at the downtown store
pub fn pick_up(items: Vec<RequestItem>) -> PriceRequest {
    PriceRequest {
        delivery_type: DeliveryType::PickUp,
        address_id: None,
        pick_up_store_id: Some(StoreId(1)),
        ..request(items)
    }
}
