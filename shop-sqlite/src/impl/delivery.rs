use crate::{
    Db,
    types::{ChargeRow, FreeRow, TemplateRow},
};
use shop_core::{
    models::{DeliveryTemplate, StoreId, TemplateId},
    ports::DeliveryRepository,
};

impl DeliveryRepository for Db {
    async fn get_delivery_templates(
        &self,
        template_ids: &[TemplateId],
    ) -> Result<Vec<DeliveryTemplate>, Self::Error> {
        if template_ids.is_empty() {
            return Ok(Vec::new());
        }
        let template_ids = sqlx::types::Json(template_ids);

        let templates: Vec<TemplateRow> = sqlx::query_as(
            r#"
            select
                id, name, charge_mode
            from
                delivery_template
            where
                id in (select atom from json_each($1))
            "#,
        )
        .bind(&template_ids)
        .fetch_all(&self.reader)
        .await?;

        let charges: Vec<ChargeRow> = sqlx::query_as(
            r#"
            select
                template_id, area_ids, start_count, start_price, extra_count, extra_price
            from
                delivery_template_charge
            where
                template_id in (select atom from json_each($1))
            order by
                id
            "#,
        )
        .bind(&template_ids)
        .fetch_all(&self.reader)
        .await?;

        let frees: Vec<FreeRow> = sqlx::query_as(
            r#"
            select
                template_id, area_ids, free_price, free_count
            from
                delivery_template_free
            where
                template_id in (select atom from json_each($1))
            order by
                id
            "#,
        )
        .bind(&template_ids)
        .fetch_all(&self.reader)
        .await?;

        let mut templates: Vec<DeliveryTemplate> = templates
            .into_iter()
            .map(|row| DeliveryTemplate {
                id: row.id,
                name: row.name,
                charge_mode: row.charge_mode,
                charges: Vec::new(),
                frees: Vec::new(),
            })
            .collect();
        for charge in charges {
            if let Some(template) = templates.iter_mut().find(|t| t.id == charge.template_id) {
                template.charges.push(charge.into());
            }
        }
        for free in frees {
            if let Some(template) = templates.iter_mut().find(|t| t.id == free.template_id) {
                template.frees.push(free.into());
            }
        }
        Ok(templates)
    }

    async fn pick_up_store_enabled(&self, store_id: StoreId) -> Result<bool, Self::Error> {
        let enabled: Option<bool> =
            sqlx::query_scalar("select enabled from pick_up_store where id = $1")
                .bind(store_id)
                .fetch_optional(&self.reader)
                .await?;
        Ok(enabled.unwrap_or(false))
    }
}
