use crate::{
    Db,
    types::{AddressRow, LevelRow, UserRow},
};
use shop_core::{
    models::{AddressId, LevelId, MemberAddress, MemberLevel, MemberUser, UserId},
    ports::MemberRepository,
};

impl MemberRepository for Db {
    async fn get_user(&self, user_id: UserId) -> Result<Option<MemberUser>, Self::Error> {
        let row: Option<UserRow> =
            sqlx::query_as("select id, level_id, point from member_user where id = $1")
                .bind(user_id)
                .fetch_optional(&self.reader)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn get_level(&self, level_id: LevelId) -> Result<Option<MemberLevel>, Self::Error> {
        let row: Option<LevelRow> = sqlx::query_as(
            "select id, name, discount_percent, enabled from member_level where id = $1",
        )
        .bind(level_id)
        .fetch_optional(&self.reader)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn get_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
    ) -> Result<Option<MemberAddress>, Self::Error> {
        let row: Option<AddressRow> = sqlx::query_as(
            r#"
            select
                id, user_id, name, mobile, area_id, detail_address
            from
                member_address
            where
                id = $1
            and
                user_id = $2
            "#,
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(&self.reader)
        .await?;
        Ok(row.map(Into::into))
    }
}
