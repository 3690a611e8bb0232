use crate::{
    allocation::recount_totals,
    calculators::{Calculator, PriceScope},
};
use shop_core::{TradeError, models::PriceContext, ports::PricingRepository};

/// An ordered table of calculators.
///
/// The table is sorted by [`Calculator::priority`] once, when it is built;
/// registration order never affects the precedence.
#[derive(Debug, Clone)]
pub struct Pipeline {
    calculators: Vec<Calculator>,
}

impl Pipeline {
    /// Build a pipeline from any subset of the calculators
    pub fn new(calculators: impl IntoIterator<Item = Calculator>) -> Self {
        let mut calculators: Vec<_> = calculators.into_iter().collect();
        calculators.sort_by_key(|calculator| calculator.priority());
        calculators.dedup();
        Self { calculators }
    }

    /// The promotions shown on product listings: no coupon, points or shipping
    pub fn preview() -> Self {
        Self::new([Calculator::Reward, Calculator::Discount])
    }

    /// The calculators, in execution order
    pub fn calculators(&self) -> &[Calculator] {
        &self.calculators
    }

    /// Fold the context through every calculator applicable to its order type.
    ///
    /// Totals are re-derived after each step. The first error aborts the
    /// run; no partially priced context is ever returned.
    pub async fn run<R: PricingRepository>(
        &self,
        scope: &PriceScope<'_, R>,
        mut ctx: PriceContext,
    ) -> Result<PriceContext, TradeError> {
        for &calculator in &self.calculators {
            if !calculator.is_applicable(ctx.order_type) {
                continue;
            }
            ctx = calculator.calculate(scope, ctx).await?;
            recount_totals(&mut ctx);
            tracing::debug!(
                calculator = calculator.name(),
                pay_price = ctx.price.pay_price,
                "applied calculator"
            );
        }
        Ok(ctx)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Calculator::ALL)
    }
}
