use crate::models::{AddressId, AreaId, LevelId, UserId};

/// The part of a member account that pricing needs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberUser {
    /// User id
    pub id: UserId,
    /// Membership tier, if any
    pub level_id: Option<LevelId>,
    /// Loyalty point balance
    pub point: i64,
}

/// A membership tier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberLevel {
    /// Level id
    pub id: LevelId,
    /// Display name
    pub name: String,
    /// Percentage of the price a member of this level pays, e.g. 80 means 20% off
    pub discount_percent: i32,
    /// Disabled levels grant no discount
    pub enabled: bool,
}

impl MemberLevel {
    /// The tier saving on `total` cents, or 0 when the level grants nothing.
    pub fn saving(&self, total: i64) -> i64 {
        if !self.enabled || self.discount_percent <= 0 || self.discount_percent >= 100 {
            return 0;
        }
        total - total * self.discount_percent as i64 / 100
    }
}

/// A member's delivery address.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberAddress {
    /// Address id
    pub id: AddressId,
    /// Owner
    pub user_id: UserId,
    /// Receiver name
    pub name: String,
    /// Receiver phone
    pub mobile: String,
    /// Destination area (drives delivery fees)
    pub area_id: AreaId,
    /// Street address
    pub detail_address: String,
}
