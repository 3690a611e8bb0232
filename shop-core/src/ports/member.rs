use crate::models::{AddressId, LevelId, MemberAddress, MemberLevel, MemberUser, UserId};

/// Read access to member accounts.
pub trait MemberRepository: super::Repository {
    /// Get the user's level and point balance
    fn get_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<MemberUser>, Self::Error>> + Send;

    /// Get a membership level
    fn get_level(
        &self,
        level_id: LevelId,
    ) -> impl Future<Output = Result<Option<MemberLevel>, Self::Error>> + Send;

    /// Get one of the user's addresses. Addresses of other users are reported as missing.
    fn get_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> impl Future<Output = Result<Option<MemberAddress>, Self::Error>> + Send;
}
