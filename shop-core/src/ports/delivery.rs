use crate::models::{DeliveryTemplate, StoreId, TemplateId};

/// Read access to freight templates and pick-up stores.
pub trait DeliveryRepository: super::Repository {
    /// Fetch the templates with the given ids, including their charge and free rules
    fn get_delivery_templates(
        &self,
        template_ids: &[TemplateId],
    ) -> impl Future<Output = Result<Vec<DeliveryTemplate>, Self::Error>> + Send;

    /// Whether the store exists and currently accepts pick-ups
    fn pick_up_store_enabled(
        &self,
        store_id: StoreId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
