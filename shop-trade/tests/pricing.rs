use shop_core::{TradeError, models::*};
use shop_trade::{calculate_price, calculate_sku_prices};

mod common;
use common::*;

fn tier(db: &MemoryDb, discount_percent: i32) {
    let mut state = db.state();
    state.levels.push(MemberLevel {
        id: LevelId(1),
        name: "gold".to_owned(),
        discount_percent,
        enabled: true,
    });
    state.users[0].level_id = Some(LevelId(1));
}

fn discount(db: &MemoryDb, sku_id: SkuId, discount_price: i64) {
    db.state().discounts.push(DiscountProduct {
        activity_id: ActivityId(9),
        activity_name: "summer sale".to_owned(),
        sku_id,
        discount_type: DiscountType::Price,
        discount_percent: 0,
        discount_price,
    });
}

fn offer(db: &MemoryDb, kind: ExclusiveKind, unit_price: i64, unit_point: i64) {
    db.state().offers.push(Offer {
        kind,
        selector: ActivityId(5),
        sku_id: TEA,
        limit: 2,
        quote: ExclusiveQuote {
            activity_id: ActivityId(5),
            name: "flash".to_owned(),
            unit_price,
            unit_point,
        },
    });
}

fn assert_consistent(ctx: &PriceContext) {
    for item in &ctx.items {
        for value in [
            item.discount_price,
            item.delivery_price,
            item.coupon_price,
            item.point_price,
            item.vip_price,
            item.pay_price,
        ] {
            assert!(value >= 0, "negative price field in {item:?}");
        }
        let expected = (item.total() - item.discount_price + item.delivery_price
            - item.coupon_price
            - item.point_price
            - item.vip_price)
            .max(0);
        assert_eq!(item.pay_price, expected);
    }
    let items: i64 = ctx.selected().map(|item| item.pay_price).sum();
    assert_eq!(ctx.price.pay_price, items + ctx.price.delivery_price);
}

#[test_log::test(tokio::test)]
async fn test_tier_beats_smaller_discount() -> anyhow::Result<()> {
    let app = seed();
    tier(&app.db, 80);
    discount(&app.db, TEA, 150);

    let mut req = request(vec![line(TEA, 1)]);
    req.address_id = None;
    let ctx = calculate_price(&app, &req).await?;

    assert_eq!(ctx.items[0].vip_price, 200);
    assert_eq!(ctx.items[0].discount_price, 0);
    assert_eq!(ctx.price.pay_price, 800);
    assert_eq!(ctx.promotions.len(), 1);
    assert_eq!(ctx.promotions[0].kind, PromotionKind::MemberLevel);
    assert_consistent(&ctx);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_shared_template_ships_once() -> anyhow::Result<()> {
    let app = seed();
    let ctx = calculate_price(&app, &request(vec![line(TEA, 2), line(POT, 1)])).await?;

    assert_eq!(ctx.price.delivery_price, 900);
    assert_eq!(ctx.price.total_price, 7000);
    assert_eq!(ctx.price.pay_price, 7900);
    assert!(ctx.items.iter().all(|item| item.delivery_price == 0));
    assert_consistent(&ctx);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_conflicting_selectors_are_rejected() -> anyhow::Result<()> {
    let app = seed();
    let mut req = request(vec![line(TEA, 1)]);
    req.seckill_activity_id = Some(ActivityId(1));
    req.combination_activity_id = Some(ActivityId(2));

    let err = calculate_price(&app, &req).await.unwrap_err();
    assert!(matches!(err, TradeError::Validation(_)));

    let mut req = request(vec![line(TEA, 1), line(POT, 1)]);
    req.seckill_activity_id = Some(ActivityId(5));
    let err = calculate_price(&app, &req).await.unwrap_err();
    assert!(matches!(err, TradeError::Ineligible(_)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_seckill_price() -> anyhow::Result<()> {
    let app = seed();
    offer(&app.db, ExclusiveKind::Seckill, 600, 0);
    // reward promotions never apply to exclusive orders
    app.db.state().rewards.push(RewardActivity {
        id: ActivityId(3),
        name: "spend 5 save 1".to_owned(),
        condition_type: ConditionType::Price,
        product_scope: ProductScope::All,
        rules: vec![RewardRule {
            limit: 500,
            discount_price: 100,
            free_delivery: false,
            give_point: 0,
        }],
    });

    let mut req = request(vec![line(TEA, 2)]);
    req.seckill_activity_id = Some(ActivityId(5));
    let ctx = calculate_price(&app, &req).await?;

    assert_eq!(ctx.order_type, OrderType::Seckill);
    assert_eq!(ctx.activity_id, Some(ActivityId(5)));
    assert_eq!(ctx.items[0].discount_price, 800);
    // 1200 for the items and 700 shipping
    assert_eq!(ctx.price.pay_price, 1900);
    assert!(
        ctx.promotions
            .iter()
            .all(|promotion| promotion.kind == PromotionKind::Seckill)
    );
    assert_consistent(&ctx);

    req.items[0].count = 3;
    let err = calculate_price(&app, &req).await.unwrap_err();
    assert!(matches!(err, TradeError::Ineligible(_)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_free_exclusive_order_is_rejected() -> anyhow::Result<()> {
    let app = seed();
    offer(&app.db, ExclusiveKind::Seckill, 0, 0);

    let mut req = request(vec![line(TEA, 1)]);
    req.address_id = None;
    req.seckill_activity_id = Some(ActivityId(5));
    let err = calculate_price(&app, &req).await.unwrap_err();
    assert!(matches!(err, TradeError::PriceIllegal(_)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_point_redemption_may_be_free() -> anyhow::Result<()> {
    let app = seed();
    offer(&app.db, ExclusiveKind::Point, 0, 250);

    let mut req = request(vec![line(TEA, 2)]);
    req.address_id = None;
    req.point_activity_id = Some(ActivityId(5));
    let ctx = calculate_price(&app, &req).await?;

    assert_eq!(ctx.order_type, OrderType::Point);
    assert_eq!(ctx.price.pay_price, 0);
    assert_eq!(ctx.use_point, 500);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_points_cannot_cover_everything() -> anyhow::Result<()> {
    let app = seed();
    app.db.state().users[0].point = 1000;

    let mut req = request(vec![line(TEA, 1)]);
    req.address_id = None;
    req.point_status = true;
    let err = calculate_price(&app, &req).await.unwrap_err();
    assert!(matches!(err, TradeError::PriceIllegal(_)));

    app.db.state().users[0].point = 300;
    let ctx = calculate_price(&app, &req).await?;
    assert_eq!(ctx.use_point, 300);
    assert_eq!(ctx.total_point, 300);
    assert_eq!(ctx.price.pay_price, 700);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_stacked_promotions() -> anyhow::Result<()> {
    let app = seed();
    tier(&app.db, 90);
    discount(&app.db, POT, 1000);
    {
        let mut state = app.db.state();
        state.rewards.push(RewardActivity {
            id: ActivityId(3),
            name: "spend 60 save 6".to_owned(),
            condition_type: ConditionType::Price,
            product_scope: ProductScope::All,
            rules: vec![RewardRule {
                limit: 6000,
                discount_price: 600,
                free_delivery: true,
                give_point: 10,
            }],
        });
        state.coupons.push(CouponGrant {
            user_id: BUYER,
            min_price: 100,
            quote: CouponQuote {
                coupon_id: CouponId(4),
                name: "welcome".to_owned(),
                discount_price: 333,
            },
            used: false,
        });
    }

    let mut req = request(vec![line(TEA, 2), line(POT, 1)]);
    req.coupon_id = Some(CouponId(4));
    let ctx = calculate_price(&app, &req).await?;

    // the reward waived shipping for every item
    assert!(ctx.free_delivery);
    assert_eq!(ctx.price.delivery_price, 0);
    assert_eq!(ctx.coupon_id, Some(CouponId(4)));
    assert_eq!(ctx.price.coupon_price, 333);
    assert_eq!(ctx.give_point, 3 + 10);
    assert_consistent(&ctx);

    let kinds: Vec<_> = ctx.promotions.iter().map(|p| p.kind).collect();
    assert!(kinds.contains(&PromotionKind::Reward));
    assert!(kinds.contains(&PromotionKind::Discount));
    assert!(kinds.contains(&PromotionKind::MemberLevel));
    assert!(kinds.contains(&PromotionKind::Coupon));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_pricing_is_deterministic() -> anyhow::Result<()> {
    let app = seed();
    tier(&app.db, 85);
    discount(&app.db, TEA, 120);

    let req = request(vec![line(TEA, 3), line(POT, 1), line(CUP, 1)]);
    let first = calculate_price(&app, &req).await?;
    let second = calculate_price(&app, &req).await?;
    assert_eq!(first, second);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_unselected_lines_are_carried_but_not_priced() -> anyhow::Result<()> {
    let app = seed();
    let mut req = request(vec![line(TEA, 1), line(POT, 1)]);
    req.items[1].selected = false;
    let ctx = calculate_price(&app, &req).await?;

    assert_eq!(ctx.items.len(), 2);
    assert_eq!(ctx.price.total_price, 1000);
    assert_eq!(ctx.price.pay_price, 1500);
    assert_consistent(&ctx);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_catalog_failures() -> anyhow::Result<()> {
    let app = seed();

    let err = calculate_price(&app, &request(vec![line(CUP, 2)]))
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::StockInsufficient { sku_id } if sku_id == CUP));

    let err = calculate_price(&app, &request(vec![line(SkuId(99), 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::NotFound(_)));

    app.db.state().spus[0].status = SpuStatus::Disable;
    let err = calculate_price(&app, &request(vec![line(TEA, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::Conflict(_)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_coupon_threshold() -> anyhow::Result<()> {
    let app = seed();
    app.db.state().coupons.push(CouponGrant {
        user_id: BUYER,
        min_price: 5000,
        quote: CouponQuote {
            coupon_id: CouponId(4),
            name: "big spender".to_owned(),
            discount_price: 500,
        },
        used: false,
    });

    let mut req = request(vec![line(TEA, 1)]);
    req.coupon_id = Some(CouponId(4));
    let err = calculate_price(&app, &req).await.unwrap_err();
    assert!(matches!(err, TradeError::Ineligible(_)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_sku_prices_ignore_stock() -> anyhow::Result<()> {
    let app = seed();
    discount(&app.db, TEA, 150);
    app.db.state().skus[1].stock = 0;

    let prices = calculate_sku_prices(&app, BUYER, &[TEA, CUP, TEA]).await?;
    assert_eq!(
        prices,
        vec![
            SkuPrice {
                sku_id: TEA,
                price: 1000,
                pay_price: 850,
            },
            SkuPrice {
                sku_id: CUP,
                price: 2000,
                pay_price: 2000,
            },
        ]
    );
    Ok(())
}
