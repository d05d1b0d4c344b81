use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::{
    customer::{Customer, CustomerId, CustomerRepository},
    DataAccessError,
};

/// REST API顧客リポジトリ
///
/// `GET/POST/PUT/DELETE /customers[/:id]` を公開する外部バックエンドを
/// 呼び出す。リトライもリクエストの多重化も行わない。
#[derive(Clone, Debug)]
pub struct RestCustomerRepository {
    client: reqwest::Client,
    base_url: String,
}

impl RestCustomerRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/customers", self.base_url)
    }

    fn item_url(&self, id: CustomerId) -> String {
        format!("{}/customers/{}", self.base_url, id)
    }
}

#[async_trait]
impl CustomerRepository for RestCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError> {
        let response = self.client.get(self.collection_url()).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        let response = self.client.get(self.item_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.json().await?))
    }

    async fn insert(&mut self, entity: &Customer) -> Result<CustomerId, DataAccessError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(entity)
            .send()
            .await?;
        let created: Customer = response
            .error_for_status()
            .map_err(|e| DataAccessError::WriteError(Box::new(e)))?
            .json()
            .await?;
        // サーバー側で採番された場合もあるため、応答のIDを返す
        Ok(created.id())
    }

    async fn update(&mut self, entity: &Customer) -> Result<bool, DataAccessError> {
        let response = self
            .client
            .put(self.item_url(entity.id()))
            .json(entity)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response
            .error_for_status()
            .map_err(|e| DataAccessError::WriteError(Box::new(e)))?;
        Ok(true)
    }

    async fn delete(&mut self, id: CustomerId) -> Result<bool, DataAccessError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        response
            .error_for_status()
            .map_err(|e| DataAccessError::WriteError(Box::new(e)))?;
        Ok(true)
    }
}
