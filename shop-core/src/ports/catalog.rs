use crate::models::{Sku, SkuId, Spu, SpuId};

/// Read access to products, plus the conditional stock adjustment.
pub trait CatalogRepository: super::Repository {
    /// Fetch the SKUs with the given ids. Missing ids are simply absent from the result.
    fn get_skus(
        &self,
        sku_ids: &[SkuId],
    ) -> impl Future<Output = Result<Vec<Sku>, Self::Error>> + Send;

    /// Fetch the SPUs with the given ids. Missing ids are simply absent from the result.
    fn get_spus(
        &self,
        spu_ids: &[SpuId],
    ) -> impl Future<Output = Result<Vec<Spu>, Self::Error>> + Send;

    /// Add `delta` to the SKU's stock, as long as the stock stays non-negative.
    ///
    /// # Returns
    ///
    /// - Ok(true) if the stock was adjusted
    /// - Ok(false) if the SKU is missing or has too little stock
    /// - Err otherwise
    fn adjust_stock(
        &self,
        sku_id: SkuId,
        delta: i32,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;
}
