use crate::models::{AreaId, TemplateId};

/// What a delivery template counts when charging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum ChargeMode {
    /// Number of units
    Count = 1,
    /// Total weight in grams
    Weight = 2,
    /// Total volume in cubic centimetres
    Volume = 3,
}

/// The charge rule of a template for a set of areas.
///
/// A rule with no areas applies to every area no other rule names.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateCharge {
    /// Areas this rule covers
    pub area_ids: Vec<AreaId>,
    /// Quantity covered by the start price
    pub start_count: i64,
    /// Price for the first `start_count` units
    pub start_price: i64,
    /// Size of each additional step
    pub extra_count: i64,
    /// Price of each additional step
    pub extra_price: i64,
}

/// A free-shipping rule of a template for a set of areas.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateFree {
    /// Areas this rule covers
    pub area_ids: Vec<AreaId>,
    /// Subtotal (cents) at which shipping is free
    pub free_price: i64,
    /// Quantity at which shipping is free
    pub free_count: i64,
}

/// A freight template shared by the products that reference it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryTemplate {
    /// Template id
    pub id: TemplateId,
    /// Display name
    pub name: String,
    /// What quantity means for this template
    pub charge_mode: ChargeMode,
    /// Area charge rules
    pub charges: Vec<TemplateCharge>,
    /// Area free-shipping rules
    pub frees: Vec<TemplateFree>,
}

impl DeliveryTemplate {
    /// The fee for shipping `quantity` (in the template's charge mode) worth
    /// `subtotal` cents to `area_id`.
    ///
    /// Returns `None` when no charge rule covers the area.
    pub fn compute_fee(&self, area_id: AreaId, quantity: i64, subtotal: i64) -> Option<i64> {
        let is_free = self
            .frees
            .iter()
            .filter(|free| free.area_ids.contains(&area_id))
            .any(|free| {
                (free.free_price > 0 && subtotal >= free.free_price)
                    || (free.free_count > 0 && quantity >= free.free_count)
            });
        if is_free {
            return Some(0);
        }

        let charge = self
            .charges
            .iter()
            .find(|charge| charge.area_ids.contains(&area_id))
            .or_else(|| self.charges.iter().find(|charge| charge.area_ids.is_empty()))?;

        if quantity <= charge.start_count || charge.extra_count <= 0 {
            return Some(charge.start_price);
        }

        let steps = (quantity - charge.start_count + charge.extra_count - 1) / charge.extra_count;
        Some(charge.start_price + steps * charge.extra_price)
    }
}
