use crate::models::{CategoryId, SkuId, SpuId, TemplateId};

/// How an order reaches the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum DeliveryType {
    /// Shipped by an express carrier, charged by delivery template
    Express = 1,
    /// Collected by the buyer at a pick-up store
    PickUp = 2,
}

/// Whether a product may currently be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum SpuStatus {
    /// Published and orderable
    Enable = 1,
    /// Taken off the shelf
    Disable = 0,
    /// In the recycle bin
    Recycle = -1,
}

/// A single property of a SKU, e.g. "color: red".
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkuProperty {
    /// Property id
    pub property_id: i64,
    /// Property name
    pub property_name: String,
    /// Value id
    pub value_id: i64,
    /// Value name
    pub value_name: String,
}

/// A stock-keeping unit as seen by the catalog port.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sku {
    /// SKU id
    pub id: SkuId,
    /// Parent product
    pub spu_id: SpuId,
    /// Unit price in cents
    pub price: i64,
    /// Units available
    pub stock: i32,
    /// Weight in grams
    pub weight: i64,
    /// Volume in cubic centimetres
    pub volume: i64,
    /// Picture shown on the order line
    pub pic_url: Option<String>,
    /// Distinguishing properties
    pub properties: Vec<SkuProperty>,
}

/// A standard product unit (the parent of one or more SKUs).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spu {
    /// SPU id
    pub id: SpuId,
    /// Display name
    pub name: String,
    /// Category used for promotion and coupon scoping
    pub category_id: CategoryId,
    /// Publication status
    pub status: SpuStatus,
    /// Freight template used for express delivery
    pub delivery_template_id: Option<TemplateId>,
    /// Delivery types the product supports
    pub delivery_types: Vec<DeliveryType>,
    /// Loyalty points granted per unit bought
    pub give_point: i32,
    /// Fallback picture
    pub pic_url: Option<String>,
}
