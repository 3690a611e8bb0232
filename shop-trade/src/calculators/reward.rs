use super::{PriceScope, format_price};
use crate::{
    Set,
    allocation::{divide_price_among, recount_pay_price},
};
use shop_core::{
    TradeError,
    models::{
        ConditionType, PriceContext, PromotionItem, PromotionKind, PromotionRecord,
        RewardActivity, RewardRule,
    },
    ports::PricingRepository,
};

pub(super) async fn calculate<R: PricingRepository>(
    scope: &PriceScope<'_, R>,
    ctx: PriceContext,
) -> Result<PriceContext, TradeError> {
    let spu_ids: Set<_> = ctx.selected().map(|item| item.spu_id).collect();
    let category_ids: Set<_> = ctx.selected().map(|item| item.category_id).collect();
    if spu_ids.is_empty() {
        return Ok(ctx);
    }

    let spu_ids: Vec<_> = spu_ids.into_iter().collect();
    let category_ids: Vec<_> = category_ids.into_iter().collect();
    let activities = scope
        .repository
        .match_reward_activities(&spu_ids, &category_ids, scope.as_of)
        .await
        .map_err(TradeError::backend)?;

    Ok(apply_reward(ctx, activities))
}

/// Apply every reward activity whose best satisfied rule matches the items.
///
/// Activities are evaluated in id order. Each one divides its discount
/// over the items it matched; activities with no satisfied rule leave a
/// zero-discount record describing how far the order is from the threshold.
pub fn apply_reward(mut ctx: PriceContext, mut activities: Vec<RewardActivity>) -> PriceContext {
    activities.sort_by_key(|activity| activity.id);

    for activity in activities {
        let matched: Vec<usize> = ctx
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| {
                item.selected
                    && activity
                        .product_scope
                        .matches(item.spu_id, item.category_id)
            })
            .map(|(idx, _)| idx)
            .collect();
        if matched.is_empty() || activity.rules.is_empty() {
            continue;
        }

        let total_price: i64 = matched.iter().map(|&idx| ctx.items[idx].pay_price).sum();
        let measure = match activity.condition_type {
            ConditionType::Price => total_price,
            ConditionType::Count => matched.iter().map(|&idx| ctx.items[idx].count as i64).sum(),
        };

        let Some(rule) = best_rule(&activity.rules, measure) else {
            let items = promotion_items(&ctx, &matched, &vec![0; ctx.items.len()]);
            ctx.promotions.push(PromotionRecord {
                id: activity.id.0,
                name: activity.name.clone(),
                kind: PromotionKind::Reward,
                total_price,
                discount_price: 0,
                matched: false,
                description: shortfall(&activity, measure),
                items,
            });
            continue;
        };

        let discount = rule.discount_price.clamp(0, total_price);
        let discount_shares = divide_price_among(&ctx.items, &matched, discount);
        let point_shares = divide_price_among(&ctx.items, &matched, rule.give_point.max(0));
        let record_items = promotion_items(&ctx, &matched, &discount_shares);

        for &idx in &matched {
            let item = &mut ctx.items[idx];
            item.discount_price += discount_shares[idx];
            item.give_point += point_shares[idx];
            if rule.free_delivery {
                item.free_delivery = true;
            }
            recount_pay_price(item);
        }

        ctx.promotions.push(PromotionRecord {
            id: activity.id.0,
            name: activity.name.clone(),
            kind: PromotionKind::Reward,
            total_price,
            discount_price: discount,
            matched: true,
            description: describe(activity.condition_type, rule),
            items: record_items,
        });
    }

    ctx.free_delivery =
        ctx.selected().next().is_some() && ctx.selected().all(|item| item.free_delivery);
    ctx
}

/// The rule with the highest limit not above `measure`.
fn best_rule(rules: &[RewardRule], measure: i64) -> Option<&RewardRule> {
    rules
        .iter()
        .filter(|rule| rule.limit <= measure)
        .max_by_key(|rule| rule.limit)
}

fn promotion_items(ctx: &PriceContext, matched: &[usize], shares: &[i64]) -> Vec<PromotionItem> {
    matched
        .iter()
        .map(|&idx| PromotionItem {
            sku_id: ctx.items[idx].sku_id,
            total_price: ctx.items[idx].pay_price,
            discount_price: shares[idx],
        })
        .collect()
}

fn describe(condition_type: ConditionType, rule: &RewardRule) -> String {
    let mut description = match condition_type {
        ConditionType::Price => format!(
            "spend {} save {}",
            format_price(rule.limit),
            format_price(rule.discount_price)
        ),
        ConditionType::Count => format!(
            "buy {} save {}",
            rule.limit,
            format_price(rule.discount_price)
        ),
    };
    if rule.free_delivery {
        description.push_str(", free shipping");
    }
    if rule.give_point > 0 {
        description.push_str(&format!(", {} bonus points", rule.give_point));
    }
    description
}

fn shortfall(activity: &RewardActivity, measure: i64) -> String {
    let next = activity
        .rules
        .iter()
        .filter(|rule| rule.limit > measure)
        .min_by_key(|rule| rule.limit);
    match (next, activity.condition_type) {
        (Some(rule), ConditionType::Price) => format!(
            "spend {} more to save {}",
            format_price(rule.limit - measure),
            format_price(rule.discount_price)
        ),
        (Some(rule), ConditionType::Count) => format!(
            "buy {} more to save {}",
            rule.limit - measure,
            format_price(rule.discount_price)
        ),
        (None, _) => activity.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::recount_totals;
    use shop_core::models::{ActivityId, CategoryId, PricedItem, ProductScope, SkuId, SpuId};

    fn context() -> PriceContext {
        let items = [(1, 1, 1000, true), (2, 2, 2000, true), (3, 1, 4000, false)]
            .into_iter()
            .map(|(id, category, price, selected)| {
                let mut item = PricedItem {
                    sku_id: SkuId(id),
                    spu_id: SpuId(id),
                    category_id: CategoryId(category),
                    price,
                    count: 1,
                    selected,
                    ..Default::default()
                };
                recount_pay_price(&mut item);
                item
            })
            .collect();
        PriceContext {
            items,
            ..Default::default()
        }
    }

    fn rule(limit: i64, discount_price: i64) -> RewardRule {
        RewardRule {
            limit,
            discount_price,
            free_delivery: false,
            give_point: 0,
        }
    }

    fn activity(scope: ProductScope, rules: Vec<RewardRule>) -> RewardActivity {
        RewardActivity {
            id: ActivityId(5),
            name: "spend and save".into(),
            condition_type: ConditionType::Price,
            product_scope: scope,
            rules,
        }
    }

    #[test]
    fn test_best_rule_is_divided_over_matched_items() {
        let rules = vec![rule(1000, 100), rule(3000, 300), rule(5000, 900)];
        let mut ctx = apply_reward(context(), vec![activity(ProductScope::All, rules)]);
        recount_totals(&mut ctx);

        assert_eq!(ctx.items[0].discount_price, 100);
        assert_eq!(ctx.items[1].discount_price, 200);
        assert_eq!(ctx.items[2].discount_price, 0);
        assert_eq!(ctx.price.pay_price, 2700);

        let record = &ctx.promotions[0];
        assert!(record.matched);
        assert_eq!(record.discount_price, 300);
        assert_eq!(record.items.len(), 2);
    }

    #[test]
    fn test_scope_limits_matched_items() {
        let scope = ProductScope::Category(vec![CategoryId(2)]);
        let ctx = apply_reward(context(), vec![activity(scope, vec![rule(1500, 150)])]);

        assert_eq!(ctx.items[0].discount_price, 0);
        assert_eq!(ctx.items[1].discount_price, 150);
    }

    #[test]
    fn test_unsatisfied_activity_explains_shortfall() {
        let ctx = apply_reward(context(), vec![activity(ProductScope::All, vec![rule(5000, 500)])]);

        let record = &ctx.promotions[0];
        assert!(!record.matched);
        assert_eq!(record.discount_price, 0);
        assert_eq!(record.description, "spend 20.00 more to save 5.00");
        assert!(ctx.items.iter().all(|item| item.discount_price == 0));
    }

    #[test]
    fn test_free_delivery_and_points() {
        let mut rich = rule(1000, 0);
        rich.free_delivery = true;
        rich.give_point = 30;
        let mut ctx = apply_reward(context(), vec![activity(ProductScope::All, vec![rich])]);
        recount_totals(&mut ctx);

        assert!(ctx.free_delivery);
        assert_eq!(ctx.items[0].give_point, 10);
        assert_eq!(ctx.items[1].give_point, 20);
        assert_eq!(ctx.give_point, 30);
    }
}
