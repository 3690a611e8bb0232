//! Division of pooled, order-level discounts across line items.
//!
//! Every pooled amount is split in proportion to the lines' current pay
//! price. Shares are floored, and the last eligible line absorbs the
//! rounding remainder, so the shares always sum to exactly the pooled
//! amount.

use shop_core::models::{PriceContext, PriceTotals, PricedItem};

/// Divide `total` across the selected items, in proportion to their pay price.
///
/// The result has one entry per item; unselected items always get 0.
pub fn divide_price(items: &[PricedItem], total: i64) -> Vec<i64> {
    let all: Vec<usize> = (0..items.len()).collect();
    divide_price_among(items, &all, total)
}

/// Like [`divide_price`], but only the items at `indices` take part.
pub fn divide_price_among(items: &[PricedItem], indices: &[usize], total: i64) -> Vec<i64> {
    let mut shares = vec![0; items.len()];

    let eligible: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&idx| items.get(idx).is_some_and(|item| item.selected))
        .collect();
    let sum: i64 = eligible.iter().map(|&idx| items[idx].pay_price).sum();
    if sum <= 0 {
        return shares;
    }

    let Some((&last, rest)) = eligible.split_last() else {
        return shares;
    };

    let mut remain = total;
    for &idx in rest {
        // widen to avoid overflow on large orders
        let share = (total as i128 * items[idx].pay_price as i128 / sum as i128) as i64;
        shares[idx] = share;
        remain -= share;
    }
    shares[last] = remain;

    shares
}

/// Re-derive an item's pay price from its price fields, flooring at 0.
pub fn recount_pay_price(item: &mut PricedItem) {
    let pay_price = item.total() - item.discount_price + item.delivery_price
        - item.coupon_price
        - item.point_price
        - item.vip_price;
    item.pay_price = pay_price.max(0);
}

/// Re-derive the order totals from the selected items.
///
/// The order-level shipping fee is not divided into items, so it is carried
/// over from the current totals and added on top of the items' pay prices.
pub fn recount_totals(ctx: &mut PriceContext) {
    let delivery_price = ctx.price.delivery_price;
    let mut price = PriceTotals::default();
    let mut use_point = 0;
    let mut give_point = 0;

    for item in ctx.items.iter().filter(|item| item.selected) {
        price.total_price += item.total();
        price.discount_price += item.discount_price;
        price.coupon_price += item.coupon_price;
        price.point_price += item.point_price;
        price.vip_price += item.vip_price;
        price.pay_price += item.pay_price;
        use_point += item.use_point;
        give_point += item.give_point;
    }

    price.delivery_price = delivery_price;
    price.pay_price += delivery_price;

    ctx.price = price;
    ctx.use_point = use_point;
    ctx.give_point = give_point;
}

/// The sum of the selected items' pay prices, excluding order-level shipping.
pub fn selected_pay_price(ctx: &PriceContext) -> i64 {
    ctx.selected().map(|item| item.pay_price).sum()
}
