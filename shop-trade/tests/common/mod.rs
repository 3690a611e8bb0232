#![allow(dead_code)]

use shop_core::{
    models::*,
    ports::{
        ActivityFailure, ActivityRepository, AfterSaleFailure, AfterSaleRepository,
        Application, CatalogRepository, CouponFailure, CouponRepository, DeliveryRepository,
        MemberRepository, OrderFailure, OrderRepository, Repository,
    },
};
use std::{
    convert::Infallible,
    sync::{Arc, Mutex, MutexGuard},
};

/// A coupon held by a member
#[derive(Clone)]
pub struct CouponGrant {
    pub user_id: UserId,
    pub min_price: i64,
    pub quote: CouponQuote,
    pub used: bool,
}

/// An exclusive activity offer for a single SKU
#[derive(Clone)]
pub struct Offer {
    pub kind: ExclusiveKind,
    pub selector: ActivityId,
    pub sku_id: SkuId,
    pub limit: i32,
    pub quote: ExclusiveQuote,
}

#[derive(Default)]
pub struct State {
    pub skus: Vec<Sku>,
    pub spus: Vec<Spu>,
    pub users: Vec<MemberUser>,
    pub levels: Vec<MemberLevel>,
    pub addresses: Vec<MemberAddress>,
    pub templates: Vec<DeliveryTemplate>,
    pub stores: Vec<StoreId>,
    pub coupons: Vec<CouponGrant>,
    pub offers: Vec<Offer>,
    pub rewards: Vec<RewardActivity>,
    pub discounts: Vec<DiscountProduct>,
    pub orders: Vec<OrderRecord>,
    pub logs: Vec<OrderLog>,
    pub sequence: i64,
}

/// An in-memory stand-in for the storage adapter
#[derive(Clone, Default)]
pub struct MemoryDb(Arc<Mutex<State>>);

impl MemoryDb {
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    pub fn stock(&self, sku_id: SkuId) -> i32 {
        self.state()
            .skus
            .iter()
            .find(|sku| sku.id == sku_id)
            .map(|sku| sku.stock)
            .unwrap_or_default()
    }

    pub fn point(&self, user_id: UserId) -> i64 {
        self.state()
            .users
            .iter()
            .find(|user| user.id == user_id)
            .map(|user| user.point)
            .unwrap_or_default()
    }
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }

    fn adjust_stock(&mut self, sku_id: SkuId, delta: i32) -> bool {
        match self.skus.iter_mut().find(|sku| sku.id == sku_id) {
            Some(sku) if sku.stock + delta >= 0 => {
                sku.stock += delta;
                true
            }
            _ => false,
        }
    }

    fn order_mut(&mut self, order_id: OrderId) -> Option<&mut OrderRecord> {
        self.orders
            .iter_mut()
            .find(|record| record.order.id == order_id)
    }

    fn log(
        &mut self,
        order: &Order,
        operator: Operator,
        before: Option<OrderStatus>,
        operate_type: OrderOperateType,
    ) {
        self.logs.push(OrderLog {
            order_id: order.id,
            user_id: operator.user_id,
            user_type: operator.user_type,
            before_status: before,
            after_status: order.status,
            operate_type,
            content: format!("{operate_type:?}"),
            created_at: order.updated_at,
        });
    }

    fn restore(&mut self, record: &OrderRecord) {
        for item in &record.items {
            self.adjust_stock(item.sku_id, item.count);
        }
        if let Some(coupon_id) = record.order.coupon_id {
            if let Some(grant) = self
                .coupons
                .iter_mut()
                .find(|grant| grant.quote.coupon_id == coupon_id)
            {
                grant.used = false;
            }
        }
        if let Some(user) = self
            .users
            .iter_mut()
            .find(|user| user.id == record.order.user_id)
        {
            user.point += record.order.use_point;
        }
    }

    fn cancel(
        &mut self,
        order_id: OrderId,
        operator: Operator,
        cancel_type: CancelType,
        from: OrderStatus,
        as_of: DateTime,
    ) -> Result<Order, OrderFailure> {
        let record = self
            .orders
            .iter()
            .find(|record| record.order.id == order_id)
            .filter(|record| {
                operator.user_type != UserType::Member
                    || operator.user_id == Some(record.order.user_id)
            })
            .cloned()
            .ok_or(OrderFailure::NotFound)?;
        if record.order.status != from {
            return Err(OrderFailure::InvalidStatus(record.order.status));
        }
        self.restore(&record);

        let paid = from == OrderStatus::Undelivered;
        let Some(target) = self.order_mut(order_id) else {
            return Err(OrderFailure::NotFound);
        };
        target.order.status = OrderStatus::Canceled;
        target.order.cancel_type = Some(cancel_type);
        target.order.cancel_time = Some(as_of);
        target.order.updated_at = as_of;
        if paid {
            target.order.refund_status = RefundStatus::All;
            target.order.refund_price = target.order.price.pay_price;
        }
        let order = target.order.clone();

        let operate_type = match (paid, cancel_type) {
            (true, _) => OrderOperateType::CancelPaid,
            (false, CancelType::PayTimeout) => OrderOperateType::Timeout,
            (false, _) => OrderOperateType::Cancel,
        };
        self.log(&order, operator, Some(from), operate_type);
        Ok(order)
    }

    fn advance(
        &mut self,
        order_id: OrderId,
        operator: Operator,
        next: OrderStatus,
        operate_type: OrderOperateType,
        as_of: DateTime,
        guard: impl FnOnce(&Order) -> Result<(), OrderFailure>,
        update: impl FnOnce(&mut Order),
    ) -> Result<Order, OrderFailure> {
        let Some(record) = self.order_mut(order_id) else {
            return Err(OrderFailure::NotFound);
        };
        guard(&record.order)?;
        let before = record.order.status;
        if !before.can_transition(next) {
            return Err(OrderFailure::InvalidStatus(before));
        }
        record.order.status = next;
        record.order.updated_at = as_of;
        update(&mut record.order);
        let order = record.order.clone();
        self.log(&order, operator, Some(before), operate_type);
        Ok(order)
    }
}

impl Repository for MemoryDb {
    type Error = Infallible;
}

impl CatalogRepository for MemoryDb {
    async fn get_skus(&self, sku_ids: &[SkuId]) -> Result<Vec<Sku>, Self::Error> {
        Ok(self
            .state()
            .skus
            .iter()
            .filter(|sku| sku_ids.contains(&sku.id))
            .cloned()
            .collect())
    }

    async fn get_spus(&self, spu_ids: &[SpuId]) -> Result<Vec<Spu>, Self::Error> {
        Ok(self
            .state()
            .spus
            .iter()
            .filter(|spu| spu_ids.contains(&spu.id))
            .cloned()
            .collect())
    }

    async fn adjust_stock(&self, sku_id: SkuId, delta: i32) -> Result<bool, Self::Error> {
        Ok(self.state().adjust_stock(sku_id, delta))
    }
}

impl CouponRepository for MemoryDb {
    async fn calculate_coupon(
        &self,
        user_id: UserId,
        coupon_id: CouponId,
        pay_price: i64,
        _spu_ids: &[SpuId],
        _category_ids: &[CategoryId],
        _as_of: DateTime,
    ) -> Result<Result<CouponQuote, CouponFailure>, Self::Error> {
        let state = self.state();
        let Some(grant) = state
            .coupons
            .iter()
            .find(|grant| grant.quote.coupon_id == coupon_id)
        else {
            return Ok(Err(CouponFailure::NotFound));
        };
        Ok(if grant.user_id != user_id {
            Err(CouponFailure::NotOwned)
        } else if grant.used {
            Err(CouponFailure::Unusable)
        } else if pay_price < grant.min_price {
            Err(CouponFailure::ThresholdNotMet {
                min_price: grant.min_price,
            })
        } else {
            Ok(grant.quote.clone())
        })
    }
}

impl MemberRepository for MemoryDb {
    async fn get_user(&self, user_id: UserId) -> Result<Option<MemberUser>, Self::Error> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn get_level(&self, level_id: LevelId) -> Result<Option<MemberLevel>, Self::Error> {
        Ok(self
            .state()
            .levels
            .iter()
            .find(|level| level.id == level_id)
            .cloned())
    }

    async fn get_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Option<MemberAddress>, Self::Error> {
        Ok(self
            .state()
            .addresses
            .iter()
            .find(|address| address.id == address_id && address.user_id == user_id)
            .cloned())
    }
}

impl DeliveryRepository for MemoryDb {
    async fn get_delivery_templates(
        &self,
        template_ids: &[TemplateId],
    ) -> Result<Vec<DeliveryTemplate>, Self::Error> {
        Ok(self
            .state()
            .templates
            .iter()
            .filter(|template| template_ids.contains(&template.id))
            .cloned()
            .collect())
    }

    async fn pick_up_store_enabled(&self, store_id: StoreId) -> Result<bool, Self::Error> {
        Ok(self.state().stores.contains(&store_id))
    }
}

impl ActivityRepository for MemoryDb {
    async fn price_exclusive(
        &self,
        query: &ExclusiveQuery,
        _as_of: DateTime,
    ) -> Result<Result<ExclusiveQuote, ActivityFailure>, Self::Error> {
        let state = self.state();
        let Some(offer) = state
            .offers
            .iter()
            .find(|offer| offer.kind == query.kind && offer.selector == query.activity_id)
        else {
            return Ok(Err(ActivityFailure::NotFound));
        };
        Ok(if offer.sku_id != query.sku_id {
            Err(ActivityFailure::SkuNotInActivity)
        } else if query.count > offer.limit {
            Err(ActivityFailure::CountExceeded { limit: offer.limit })
        } else {
            Ok(offer.quote.clone())
        })
    }

    async fn match_reward_activities(
        &self,
        _spu_ids: &[SpuId],
        _category_ids: &[CategoryId],
        _as_of: DateTime,
    ) -> Result<Vec<RewardActivity>, Self::Error> {
        Ok(self.state().rewards.clone())
    }

    async fn match_discount_products(
        &self,
        sku_ids: &[SkuId],
        _as_of: DateTime,
    ) -> Result<Vec<DiscountProduct>, Self::Error> {
        Ok(self
            .state()
            .discounts
            .iter()
            .filter(|product| sku_ids.contains(&product.sku_id))
            .cloned()
            .collect())
    }
}

impl OrderRepository for MemoryDb {
    async fn next_order_no(&self, prefix: &str, as_of: DateTime) -> Result<String, Self::Error> {
        let seq = self.state().next_id();
        Ok(format!("{prefix}{}{seq:06}", as_of.compact()))
    }

    async fn create_order(
        &self,
        draft: OrderDraft,
    ) -> Result<Result<OrderRecord, OrderFailure>, Self::Error> {
        let mut state = self.state();

        // check everything first, so a refusal leaves the state untouched
        for item in &draft.items {
            let stock = state
                .skus
                .iter()
                .find(|sku| sku.id == item.sku_id)
                .map(|sku| sku.stock)
                .unwrap_or_default();
            if stock < item.count {
                return Ok(Err(OrderFailure::StockInsufficient(item.sku_id)));
            }
        }
        if let Some(coupon_id) = draft.coupon_id {
            let usable = state
                .coupons
                .iter()
                .any(|grant| grant.quote.coupon_id == coupon_id && !grant.used);
            if !usable {
                return Ok(Err(OrderFailure::CouponUnavailable));
            }
        }
        if draft.use_point > 0 {
            let balance = state
                .users
                .iter()
                .find(|user| user.id == draft.user_id)
                .map(|user| user.point)
                .unwrap_or_default();
            if balance < draft.use_point {
                return Ok(Err(OrderFailure::PointInsufficient));
            }
        }

        for item in &draft.items {
            state.adjust_stock(item.sku_id, -item.count);
        }
        if let Some(coupon_id) = draft.coupon_id {
            if let Some(grant) = state
                .coupons
                .iter_mut()
                .find(|grant| grant.quote.coupon_id == coupon_id)
            {
                grant.used = true;
            }
        }
        if let Some(user) = state.users.iter_mut().find(|user| user.id == draft.user_id) {
            user.point -= draft.use_point;
        }

        let order_id = OrderId(state.next_id());
        let free = draft.price.pay_price == 0;
        let pay_order_id = if free {
            None
        } else {
            Some(PayOrderId(state.next_id()))
        };
        let order = Order {
            id: order_id,
            no: draft.no,
            order_type: draft.order_type,
            user_id: draft.user_id,
            status: if free {
                OrderStatus::Undelivered
            } else {
                OrderStatus::Unpaid
            },
            cancel_type: None,
            remark: draft.remark,
            pay_status: free,
            pay_time: free.then_some(draft.created_at),
            pay_order_id,
            delivery_type: draft.delivery_type,
            logistics_id: None,
            logistics_no: None,
            delivery_time: None,
            receive_time: None,
            finish_time: None,
            cancel_time: None,
            receiver: draft.receiver,
            pick_up_store_id: draft.pick_up_store_id,
            pick_up_verify_code: draft.pick_up_verify_code,
            price: draft.price,
            coupon_id: draft.coupon_id,
            use_point: draft.use_point,
            give_point: draft.give_point,
            refund_status: RefundStatus::None,
            refund_price: 0,
            activity_id: draft.activity.as_ref().map(|activity| activity.activity_id),
            bargain_record_id: draft.activity.as_ref().and_then(|activity| activity.record_id),
            combination_head_id: draft
                .activity
                .as_ref()
                .and_then(|activity| activity.combination_head_id),
            created_at: draft.created_at,
            updated_at: draft.created_at,
        };

        let mut items = Vec::with_capacity(draft.items.len());
        for item in draft.items {
            items.push(OrderItem {
                id: OrderItemId(state.next_id()),
                order_id,
                user_id: order.user_id,
                cart_id: item.cart_id,
                sku_id: item.sku_id,
                spu_id: item.spu_id,
                spu_name: item.spu_name,
                pic_url: item.pic_url,
                properties: item.properties,
                count: item.count,
                price: item.price,
                discount_price: item.discount_price,
                delivery_price: item.delivery_price,
                coupon_price: item.coupon_price,
                point_price: item.point_price,
                use_point: item.use_point,
                vip_price: item.vip_price,
                pay_price: item.pay_price,
                give_point: item.give_point,
                after_sale_id: None,
                after_sale_status: ItemAfterSaleStatus::None,
            });
        }

        let record = OrderRecord { order, items };
        state.log(
            &record.order,
            Operator::member(record.order.user_id),
            None,
            OrderOperateType::Create,
        );
        state.orders.push(record.clone());
        Ok(Ok(record))
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>, Self::Error> {
        Ok(self
            .state()
            .orders
            .iter()
            .find(|record| record.order.id == order_id)
            .cloned())
    }

    async fn get_order_logs(&self, order_id: OrderId) -> Result<Vec<OrderLog>, Self::Error> {
        Ok(self
            .state()
            .logs
            .iter()
            .filter(|log| log.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn pay_order(
        &self,
        order_id: OrderId,
        pay_order_id: PayOrderId,
        as_of: DateTime,
    ) -> Result<Result<Order, OrderFailure>, Self::Error> {
        Ok(self.state().advance(
            order_id,
            Operator::system(),
            OrderStatus::Undelivered,
            OrderOperateType::Pay,
            as_of,
            |order| {
                if order.status == OrderStatus::Unpaid && order.pay_order_id != Some(pay_order_id)
                {
                    Err(OrderFailure::PayOrderMismatch)
                } else {
                    Ok(())
                }
            },
            |order| {
                order.pay_status = true;
                order.pay_time = Some(as_of);
            },
        ))
    }

    async fn cancel_order(
        &self,
        order_id: OrderId,
        operator: Operator,
        cancel_type: CancelType,
        as_of: DateTime,
    ) -> Result<Result<Order, OrderFailure>, Self::Error> {
        Ok(self
            .state()
            .cancel(order_id, operator, cancel_type, OrderStatus::Unpaid, as_of))
    }

    async fn cancel_paid_order(
        &self,
        order_id: OrderId,
        operator: Operator,
        cancel_type: CancelType,
        as_of: DateTime,
    ) -> Result<Result<Order, OrderFailure>, Self::Error> {
        Ok(self.state().cancel(
            order_id,
            operator,
            cancel_type,
            OrderStatus::Undelivered,
            as_of,
        ))
    }

    async fn list_expired_orders(
        &self,
        created_before: DateTime,
        limit: u32,
    ) -> Result<Vec<OrderId>, Self::Error> {
        Ok(self
            .state()
            .orders
            .iter()
            .filter(|record| {
                record.order.status == OrderStatus::Unpaid
                    && record.order.created_at < created_before
            })
            .map(|record| record.order.id)
            .take(limit as usize)
            .collect())
    }

    async fn deliver_order(
        &self,
        order_id: OrderId,
        logistics_id: LogisticsId,
        logistics_no: String,
        as_of: DateTime,
    ) -> Result<Result<Order, OrderFailure>, Self::Error> {
        Ok(self.state().advance(
            order_id,
            Operator::system(),
            OrderStatus::Delivered,
            OrderOperateType::Deliver,
            as_of,
            |order| {
                if order.delivery_type == DeliveryType::Express {
                    Ok(())
                } else {
                    Err(OrderFailure::DeliveryTypeMismatch)
                }
            },
            |order| {
                order.logistics_id = Some(logistics_id);
                order.logistics_no = Some(logistics_no);
                order.delivery_time = Some(as_of);
            },
        ))
    }

    async fn receive_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
        as_of: DateTime,
    ) -> Result<Result<Order, OrderFailure>, Self::Error> {
        Ok(self.state().advance(
            order_id,
            Operator::member(user_id),
            OrderStatus::Completed,
            OrderOperateType::Receive,
            as_of,
            |order| {
                if order.user_id != user_id {
                    Err(OrderFailure::NotFound)
                } else if order.status != OrderStatus::Delivered {
                    Err(OrderFailure::InvalidStatus(order.status))
                } else {
                    Ok(())
                }
            },
            |order| {
                order.receive_time = Some(as_of);
                order.finish_time = Some(as_of);
            },
        ))
    }

    async fn pick_up_order(
        &self,
        verify_code: &str,
        operator: Operator,
        as_of: DateTime,
    ) -> Result<Result<Order, OrderFailure>, Self::Error> {
        let mut state = self.state();
        let Some(order_id) = state
            .orders
            .iter()
            .find(|record| record.order.pick_up_verify_code.as_deref() == Some(verify_code))
            .map(|record| record.order.id)
        else {
            return Ok(Err(OrderFailure::NotFound));
        };
        Ok(state.advance(
            order_id,
            operator,
            OrderStatus::Completed,
            OrderOperateType::PickUp,
            as_of,
            |order| {
                if order.delivery_type != DeliveryType::PickUp {
                    Err(OrderFailure::DeliveryTypeMismatch)
                } else if order.status != OrderStatus::Undelivered {
                    Err(OrderFailure::InvalidStatus(order.status))
                } else {
                    Ok(())
                }
            },
            |order| {
                order.receive_time = Some(as_of);
                order.finish_time = Some(as_of);
            },
        ))
    }
}

// After-sale requests are exercised against the SQLite adapter.
impl AfterSaleRepository for MemoryDb {
    async fn create_after_sale(
        &self,
        _apply: AfterSaleApply,
        _no: String,
        _as_of: DateTime,
    ) -> Result<Result<AfterSale, AfterSaleFailure>, Self::Error> {
        Ok(Err(AfterSaleFailure::ItemNotFound))
    }

    async fn agree_after_sale(
        &self,
        _after_sale_id: AfterSaleId,
        _as_of: DateTime,
    ) -> Result<Result<AfterSale, AfterSaleFailure>, Self::Error> {
        Ok(Err(AfterSaleFailure::NotFound))
    }

    async fn disagree_after_sale(
        &self,
        _after_sale_id: AfterSaleId,
        _reason: String,
        _as_of: DateTime,
    ) -> Result<Result<AfterSale, AfterSaleFailure>, Self::Error> {
        Ok(Err(AfterSaleFailure::NotFound))
    }

    async fn deliver_after_sale(
        &self,
        _user_id: UserId,
        _after_sale_id: AfterSaleId,
        _logistics_id: LogisticsId,
        _logistics_no: String,
        _as_of: DateTime,
    ) -> Result<Result<AfterSale, AfterSaleFailure>, Self::Error> {
        Ok(Err(AfterSaleFailure::NotFound))
    }

    async fn receive_after_sale(
        &self,
        _after_sale_id: AfterSaleId,
        _as_of: DateTime,
    ) -> Result<Result<AfterSale, AfterSaleFailure>, Self::Error> {
        Ok(Err(AfterSaleFailure::NotFound))
    }

    async fn refuse_after_sale(
        &self,
        _after_sale_id: AfterSaleId,
        _reason: String,
        _as_of: DateTime,
    ) -> Result<Result<AfterSale, AfterSaleFailure>, Self::Error> {
        Ok(Err(AfterSaleFailure::NotFound))
    }

    async fn refund_after_sale(
        &self,
        _after_sale_id: AfterSaleId,
        _as_of: DateTime,
    ) -> Result<Result<AfterSale, AfterSaleFailure>, Self::Error> {
        Ok(Err(AfterSaleFailure::NotFound))
    }

    async fn cancel_after_sale(
        &self,
        _user_id: UserId,
        _after_sale_id: AfterSaleId,
        _as_of: DateTime,
    ) -> Result<Result<AfterSale, AfterSaleFailure>, Self::Error> {
        Ok(Err(AfterSaleFailure::NotFound))
    }

    async fn get_after_sale(
        &self,
        _after_sale_id: AfterSaleId,
    ) -> Result<Option<AfterSale>, Self::Error> {
        Ok(None)
    }
}

#[derive(Clone)]
pub struct TestApp {
    pub db: MemoryDb,
    pub config: TradeConfig,
    pub now: DateTime,
}

impl Application for TestApp {
    type Repository = MemoryDb;

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

pub const BUYER: UserId = UserId(1);
pub const TEA: SkuId = SkuId(1);
pub const CUP: SkuId = SkuId(2);
pub const POT: SkuId = SkuId(3);

fn spu(id: i64, name: &str, category: i64) -> Spu {
    Spu {
        id: SpuId(id),
        name: name.to_owned(),
        category_id: CategoryId(category),
        status: SpuStatus::Enable,
        delivery_template_id: Some(TemplateId(1)),
        delivery_types: vec![DeliveryType::Express, DeliveryType::PickUp],
        give_point: 1,
        pic_url: Some(format!("https://img.example/{name}.png")),
    }
}

fn sku(id: i64, spu_id: i64, price: i64, stock: i32) -> Sku {
    Sku {
        id: SkuId(id),
        spu_id: SpuId(spu_id),
        price,
        stock,
        weight: 100,
        volume: 10,
        pic_url: None,
        properties: Vec::new(),
    }
}

/// A small shop: three products, one buyer without a tier, one freight
/// template charging 500 for the first unit and 200 for each further one.
pub fn seed() -> TestApp {
    let db = MemoryDb::default();
    {
        let mut state = db.state();
        state.spus = vec![spu(1, "tea", 1), spu(2, "cup", 2), spu(3, "pot", 2)];
        state.skus = vec![sku(1, 1, 1000, 10), sku(2, 2, 2000, 1), sku(3, 3, 5000, 5)];
        state.users = vec![MemberUser {
            id: BUYER,
            level_id: None,
            point: 0,
        }];
        state.addresses = vec![MemberAddress {
            id: AddressId(1),
            user_id: BUYER,
            name: "Ada".to_owned(),
            mobile: "13800000000".to_owned(),
            area_id: AreaId(110100),
            detail_address: "1 Main Street".to_owned(),
        }];
        state.templates = vec![DeliveryTemplate {
            id: TemplateId(1),
            name: "standard".to_owned(),
            charge_mode: ChargeMode::Count,
            charges: vec![TemplateCharge {
                area_ids: Vec::new(),
                start_count: 1,
                start_price: 500,
                extra_count: 1,
                extra_price: 200,
            }],
            frees: Vec::new(),
        }];
        state.stores = vec![StoreId(1)];
        state.sequence = 100;
    }

    let now = DateTime::from(time::macros::datetime!(2025-06-01 10:00:00 UTC));
    TestApp {
        db,
        config: TradeConfig::default(),
        now,
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
