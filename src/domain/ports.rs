use crate::domain::model::{Payload, RequestOptions};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, url: &str, options: &RequestOptions) -> Result<Payload>;
}

pub trait KeyValue: Send + Sync {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>>> + Send;
    fn put(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn del(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}
