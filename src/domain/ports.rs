use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn data_file(&self) -> &str;
    fn root_category(&self) -> &str;
    fn page_limit(&self) -> u32;
    fn timeout_seconds(&self) -> Option<u64>;
    fn user_agent(&self) -> &str;
    fn subcategories_only(&self) -> bool;
}

/// Source of direct subcategory names for a category.
#[async_trait]
pub trait CategoryFetcher: Send + Sync {
    /// Names are returned without the `Category:` prefix, in service order.
    async fn fetch_subcategories(&self, category: &str) -> Result<Vec<String>>;
}
