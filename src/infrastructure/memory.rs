use async_trait::async_trait;

use crate::domain::{
    customer::{Customer, CustomerId, CustomerRepository},
    DataAccessError,
};

/// インメモリ顧客リポジトリ(モックストア)
///
/// RESTリポジトリと差し替え可能なバックエンドのスタンドイン。
/// IDの一意性は呼び出し側の責任で、重複の検査は行わない。
#[derive(Clone, Debug, Default)]
pub struct MemoryCustomerRepository {
    customers: Vec<Customer>,
}

impl MemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期データ付きで作成する
    pub fn with_customers(customers: Vec<Customer>) -> Self {
        Self { customers }
    }

    /// 次に採番するID(最大ID + 1)
    fn next_id(&self) -> CustomerId {
        CustomerId::from(self.customers.iter().map(|c| *c.id()).max().unwrap_or(0) + 1)
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError> {
        Ok(self.customers.clone())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError> {
        Ok(self.customers.iter().find(|c| c.id() == id).cloned())
    }

    async fn insert(&mut self, entity: &Customer) -> Result<CustomerId, DataAccessError> {
        let mut stored = entity.clone();
        if *stored.id() == 0 {
            stored.set_id(self.next_id());
        }
        let id = stored.id();
        self.customers.push(stored);
        Ok(id)
    }

    async fn update(&mut self, entity: &Customer) -> Result<bool, DataAccessError> {
        match self.customers.iter_mut().find(|c| c.id() == entity.id()) {
            Some(stored) => {
                *stored = entity.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&mut self, id: CustomerId) -> Result<bool, DataAccessError> {
        match self.customers.iter().position(|c| c.id() == id) {
            Some(index) => {
                self.customers.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
