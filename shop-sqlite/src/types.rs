//! Row types for database mapping.
//!
//! Each row mirrors a table (or a join) column for column and converts into
//! the corresponding `shop_core` model. JSON text columns decode through
//! [`sqlx::types::Json`].

use shop_core::models::{
    ActivityId, AfterSale, AfterSaleId, AfterSaleStatus, AfterSaleWay, AreaId, CancelType,
    CartId, CategoryId, ChargeMode, ConditionType, CouponId, DateTime, DeliveryType,
    DiscountProduct, DiscountType, ItemAfterSaleStatus, LevelId, LogisticsId, MemberAddress,
    MemberLevel, MemberUser, Order, OrderId, OrderItem, OrderItemId, OrderLog, OrderOperateType,
    OrderStatus, OrderType, PayOrderId, PriceTotals, ProductScope, Receiver, RefundStatus,
    RewardActivity, RewardRule, Sku, SkuId, SkuProperty, Spu, SpuId, SpuStatus, StoreId,
    TemplateCharge, TemplateFree, TemplateId, UserId, UserType,
};
use sqlx::types::Json;

#[derive(sqlx::FromRow)]
pub(crate) struct SkuRow {
    pub id: SkuId,
    pub spu_id: SpuId,
    pub price: i64,
    pub stock: i32,
    pub weight: i64,
    pub volume: i64,
    pub pic_url: Option<String>,
    pub properties: Json<Vec<SkuProperty>>,
}

impl From<SkuRow> for Sku {
    fn from(row: SkuRow) -> Self {
        Sku {
            id: row.id,
            spu_id: row.spu_id,
            price: row.price,
            stock: row.stock,
            weight: row.weight,
            volume: row.volume,
            pic_url: row.pic_url,
            properties: row.properties.0,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct SpuRow {
    pub id: SpuId,
    pub name: String,
    pub category_id: CategoryId,
    pub status: SpuStatus,
    pub delivery_template_id: Option<TemplateId>,
    pub delivery_types: Json<Vec<DeliveryType>>,
    pub give_point: i32,
    pub pic_url: Option<String>,
}

impl From<SpuRow> for Spu {
    fn from(row: SpuRow) -> Self {
        Spu {
            id: row.id,
            name: row.name,
            category_id: row.category_id,
            status: row.status,
            delivery_template_id: row.delivery_template_id,
            delivery_types: row.delivery_types.0,
            give_point: row.give_point,
            pic_url: row.pic_url,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: UserId,
    pub level_id: Option<LevelId>,
    pub point: i64,
}

impl From<UserRow> for MemberUser {
    fn from(row: UserRow) -> Self {
        MemberUser {
            id: row.id,
            level_id: row.level_id,
            point: row.point,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct LevelRow {
    pub id: LevelId,
    pub name: String,
    pub discount_percent: i32,
    pub enabled: bool,
}

impl From<LevelRow> for MemberLevel {
    fn from(row: LevelRow) -> Self {
        MemberLevel {
            id: row.id,
            name: row.name,
            discount_percent: row.discount_percent,
            enabled: row.enabled,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AddressRow {
    pub id: shop_core::models::AddressId,
    pub user_id: UserId,
    pub name: String,
    pub mobile: String,
    pub area_id: AreaId,
    pub detail_address: String,
}

impl From<AddressRow> for MemberAddress {
    fn from(row: AddressRow) -> Self {
        MemberAddress {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            mobile: row.mobile,
            area_id: row.area_id,
            detail_address: row.detail_address,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct TemplateRow {
    pub id: TemplateId,
    pub name: String,
    pub charge_mode: ChargeMode,
}

#[derive(sqlx::FromRow)]
pub(crate) struct ChargeRow {
    pub template_id: TemplateId,
    pub area_ids: Json<Vec<AreaId>>,
    pub start_count: i64,
    pub start_price: i64,
    pub extra_count: i64,
    pub extra_price: i64,
}

impl From<ChargeRow> for TemplateCharge {
    fn from(row: ChargeRow) -> Self {
        TemplateCharge {
            area_ids: row.area_ids.0,
            start_count: row.start_count,
            start_price: row.start_price,
            extra_count: row.extra_count,
            extra_price: row.extra_price,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct FreeRow {
    pub template_id: TemplateId,
    pub area_ids: Json<Vec<AreaId>>,
    pub free_price: i64,
    pub free_count: i64,
}

impl From<FreeRow> for TemplateFree {
    fn from(row: FreeRow) -> Self {
        TemplateFree {
            area_ids: row.area_ids.0,
            free_price: row.free_price,
            free_count: row.free_count,
        }
    }
}

/// Coupon status as stored: 1 unused, 2 used, 3 expired
pub(crate) const COUPON_UNUSED: i32 = 1;
pub(crate) const COUPON_USED: i32 = 2;

#[derive(sqlx::FromRow)]
pub(crate) struct CouponRow {
    pub id: CouponId,
    pub user_id: UserId,
    pub name: String,
    pub status: i32,
    pub usable_price: i64,
    pub product_scope: Json<ProductScope>,
    pub discount_type: DiscountType,
    pub discount_price: i64,
    pub discount_percent: i32,
    pub discount_limit_price: i64,
    pub valid_start_time: DateTime,
    pub valid_end_time: DateTime,
}

impl CouponRow {
    /// What the coupon takes off `pay_price`, before capping at the pay price.
    pub fn saving(&self, pay_price: i64) -> i64 {
        match self.discount_type {
            DiscountType::Price => self.discount_price,
            DiscountType::Percent => {
                let saving = if (1..100).contains(&self.discount_percent) {
                    pay_price - pay_price * self.discount_percent as i64 / 100
                } else {
                    0
                };
                if self.discount_limit_price > 0 {
                    saving.min(self.discount_limit_price)
                } else {
                    saving
                }
            }
        }
    }

    /// Whether any of the checkout's products fall in the coupon's scope
    pub fn covers(&self, spu_ids: &[SpuId], category_ids: &[CategoryId]) -> bool {
        match &self.product_scope.0 {
            ProductScope::All => true,
            ProductScope::Spu(ids) => spu_ids.iter().any(|id| ids.contains(id)),
            ProductScope::Category(ids) => category_ids.iter().any(|id| ids.contains(id)),
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct RewardRow {
    pub id: ActivityId,
    pub name: String,
    pub condition_type: ConditionType,
    pub product_scope: Json<ProductScope>,
    pub rules: Json<Vec<RewardRule>>,
}

impl From<RewardRow> for RewardActivity {
    fn from(row: RewardRow) -> Self {
        RewardActivity {
            id: row.id,
            name: row.name,
            condition_type: row.condition_type,
            product_scope: row.product_scope.0,
            rules: row.rules.0,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct DiscountRow {
    pub activity_id: ActivityId,
    pub activity_name: String,
    pub sku_id: SkuId,
    pub discount_type: DiscountType,
    pub discount_percent: i32,
    pub discount_price: i64,
}

impl From<DiscountRow> for DiscountProduct {
    fn from(row: DiscountRow) -> Self {
        DiscountProduct {
            activity_id: row.activity_id,
            activity_name: row.activity_name,
            sku_id: row.sku_id,
            discount_type: row.discount_type,
            discount_percent: row.discount_percent,
            discount_price: row.discount_price,
        }
    }
}

/// An exclusive activity's terms for one SKU, as selected by `price_exclusive`.
#[derive(sqlx::FromRow)]
pub(crate) struct ExclusiveRow {
    pub activity_id: ActivityId,
    pub name: String,
    pub live: bool,
    pub single_limit_count: i32,
    pub unit_price: Option<i64>,
    pub unit_point: i64,
    pub stock: Option<i32>,
}

#[derive(sqlx::FromRow)]
pub(crate) struct BargainRow {
    pub activity_id: ActivityId,
    pub name: String,
    pub live: bool,
    pub user_id: UserId,
    pub sku_id: SkuId,
    pub bargain_price: i64,
    pub status: i32,
    pub order_id: Option<OrderId>,
    pub stock: i32,
}

/// Bargain record status as stored: 1 in progress, 2 succeeded, 3 failed
pub(crate) const BARGAIN_SUCCEEDED: i32 = 2;

#[derive(sqlx::FromRow)]
pub(crate) struct OrderRow {
    pub id: OrderId,
    pub no: String,
    pub order_type: OrderType,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub cancel_type: Option<CancelType>,
    pub remark: Option<String>,
    pub pay_status: bool,
    pub pay_time: Option<DateTime>,
    pub pay_order_id: Option<PayOrderId>,
    pub delivery_type: DeliveryType,
    pub logistics_id: Option<LogisticsId>,
    pub logistics_no: Option<String>,
    pub delivery_time: Option<DateTime>,
    pub receive_time: Option<DateTime>,
    pub finish_time: Option<DateTime>,
    pub cancel_time: Option<DateTime>,
    pub receiver_name: Option<String>,
    pub receiver_mobile: Option<String>,
    pub receiver_area_id: Option<AreaId>,
    pub receiver_detail_address: Option<String>,
    pub pick_up_store_id: Option<StoreId>,
    pub pick_up_verify_code: Option<String>,
    #[sqlx(flatten)]
    pub price: PriceTotals,
    pub coupon_id: Option<CouponId>,
    pub use_point: i64,
    pub give_point: i64,
    pub refund_status: RefundStatus,
    pub refund_price: i64,
    pub activity_id: Option<ActivityId>,
    pub bargain_record_id: Option<ActivityId>,
    pub combination_head_id: Option<i64>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        let receiver = match (
            row.receiver_name,
            row.receiver_mobile,
            row.receiver_area_id,
            row.receiver_detail_address,
        ) {
            (Some(name), Some(mobile), Some(area_id), Some(detail_address)) => Some(Receiver {
                name,
                mobile,
                area_id,
                detail_address,
            }),
            _ => None,
        };
        Order {
            id: row.id,
            no: row.no,
            order_type: row.order_type,
            user_id: row.user_id,
            status: row.status,
            cancel_type: row.cancel_type,
            remark: row.remark,
            pay_status: row.pay_status,
            pay_time: row.pay_time,
            pay_order_id: row.pay_order_id,
            delivery_type: row.delivery_type,
            logistics_id: row.logistics_id,
            logistics_no: row.logistics_no,
            delivery_time: row.delivery_time,
            receive_time: row.receive_time,
            finish_time: row.finish_time,
            cancel_time: row.cancel_time,
            receiver,
            pick_up_store_id: row.pick_up_store_id,
            pick_up_verify_code: row.pick_up_verify_code,
            price: row.price,
            coupon_id: row.coupon_id,
            use_point: row.use_point,
            give_point: row.give_point,
            refund_status: row.refund_status,
            refund_price: row.refund_price,
            activity_id: row.activity_id,
            bargain_record_id: row.bargain_record_id,
            combination_head_id: row.combination_head_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct OrderItemRow {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub cart_id: Option<CartId>,
    pub sku_id: SkuId,
    pub spu_id: SpuId,
    pub spu_name: String,
    pub pic_url: Option<String>,
    pub properties: Json<Vec<SkuProperty>>,
    pub count: i32,
    pub price: i64,
    pub discount_price: i64,
    pub delivery_price: i64,
    pub coupon_price: i64,
    pub point_price: i64,
    pub use_point: i64,
    pub vip_price: i64,
    pub pay_price: i64,
    pub give_point: i64,
    pub after_sale_id: Option<AfterSaleId>,
    pub after_sale_status: ItemAfterSaleStatus,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            user_id: row.user_id,
            cart_id: row.cart_id,
            sku_id: row.sku_id,
            spu_id: row.spu_id,
            spu_name: row.spu_name,
            pic_url: row.pic_url,
            properties: row.properties.0,
            count: row.count,
            price: row.price,
            discount_price: row.discount_price,
            delivery_price: row.delivery_price,
            coupon_price: row.coupon_price,
            point_price: row.point_price,
            use_point: row.use_point,
            vip_price: row.vip_price,
            pay_price: row.pay_price,
            give_point: row.give_point,
            after_sale_id: row.after_sale_id,
            after_sale_status: row.after_sale_status,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct OrderLogRow {
    pub order_id: OrderId,
    pub user_id: Option<UserId>,
    pub user_type: UserType,
    pub before_status: Option<OrderStatus>,
    pub after_status: OrderStatus,
    pub operate_type: OrderOperateType,
    pub content: String,
    pub created_at: DateTime,
}

impl From<OrderLogRow> for OrderLog {
    fn from(row: OrderLogRow) -> Self {
        OrderLog {
            order_id: row.order_id,
            user_id: row.user_id,
            user_type: row.user_type,
            before_status: row.before_status,
            after_status: row.after_status,
            operate_type: row.operate_type,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AfterSaleRow {
    pub id: AfterSaleId,
    pub no: String,
    pub order_id: OrderId,
    pub order_item_id: OrderItemId,
    pub user_id: UserId,
    pub sku_id: SkuId,
    pub count: i32,
    pub way: AfterSaleWay,
    pub status: AfterSaleStatus,
    pub reason: String,
    pub description: Option<String>,
    pub refund_price: i64,
    pub audit_reason: Option<String>,
    pub logistics_id: Option<LogisticsId>,
    pub logistics_no: Option<String>,
    pub audit_time: Option<DateTime>,
    pub receive_time: Option<DateTime>,
    pub refund_time: Option<DateTime>,
    pub created_at: DateTime,
}

impl From<AfterSaleRow> for AfterSale {
    fn from(row: AfterSaleRow) -> Self {
        AfterSale {
            id: row.id,
            no: row.no,
            order_id: row.order_id,
            order_item_id: row.order_item_id,
            user_id: row.user_id,
            sku_id: row.sku_id,
            count: row.count,
            way: row.way,
            status: row.status,
            reason: row.reason,
            description: row.description,
            refund_price: row.refund_price,
            audit_reason: row.audit_reason,
            logistics_id: row.logistics_id,
            logistics_no: row.logistics_no,
            audit_time: row.audit_time,
            receive_time: row.receive_time,
            refund_time: row.refund_time,
            created_at: row.created_at,
        }
    }
}
