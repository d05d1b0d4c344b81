use async_trait::async_trait;
use derive_more::{Deref, Display, Error, From};
use serde::{Deserialize, Serialize};

use crate::domain::{DataAccessError, Id};

/// 顧客リポジトリ
#[async_trait]
pub trait CustomerRepository {
    /// 顧客を全件取得する
    async fn find_all(&self) -> Result<Vec<Customer>, DataAccessError>;
    /// 顧客をIDで検索する
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, DataAccessError>;
    /// 顧客を登録する(IDが未採番なら採番したIDを返す)
    async fn insert(&mut self, entity: &Customer) -> Result<CustomerId, DataAccessError>;
    /// 顧客を更新する(該当IDがなければ `false`)
    async fn update(&mut self, entity: &Customer) -> Result<bool, DataAccessError>;
    /// 顧客を削除する(該当IDがなければ `false`)
    async fn delete(&mut self, id: CustomerId) -> Result<bool, DataAccessError>;
}

/// 顧客ID
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, From,
    Deref, Default,
)]
pub struct CustomerId(u64);

impl Id for CustomerId {
    type Inner = u64;
}

/// 顧客エンティティ
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Customer {
    id: CustomerId,
    name: String,
    email: String,
    password: String,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: String,
        email: String,
        password: String,
    ) -> Result<Self, CustomerError> {
        Self::validate(&name, &email, &password)?;
        Ok(Self {
            id,
            name,
            email,
            password,
        })
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// 名前・メールアドレス・パスワードをまとめて差し替える
    pub fn revise(
        &mut self,
        name: String,
        email: String,
        password: String,
    ) -> Result<(), CustomerError> {
        Self::validate(&name, &email, &password)?;
        self.name = name;
        self.email = email;
        self.password = password;
        Ok(())
    }

    /// 検索語との部分一致(ID・名前・メールアドレス・パスワード、大文字小文字は無視)
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.id.to_string().contains(&term)
            || self.name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
            || self.password.to_lowercase().contains(&term)
    }

    pub(crate) fn set_id(&mut self, id: CustomerId) {
        self.id = id;
    }

    fn validate(name: &str, email: &str, password: &str) -> Result<(), CustomerError> {
        if name.trim().is_empty() {
            return Err(CustomerError::NameIsBlank);
        }
        if email.trim().is_empty() {
            return Err(CustomerError::EmailIsBlank);
        }
        if !email.contains('@') {
            return Err(CustomerError::EmailIsInvalid);
        }
        if password.trim().is_empty() {
            return Err(CustomerError::PasswordIsBlank);
        }
        Ok(())
    }
}

/// 顧客エラー
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum CustomerError {
    /// 名前が空欄です
    #[display(fmt = "Name cannot be blank")]
    NameIsBlank,
    /// メールアドレスが空欄です
    #[display(fmt = "Email cannot be blank")]
    EmailIsBlank,
    /// メールアドレスの形式が不正です
    #[display(fmt = "Email must contain '@'")]
    EmailIsInvalid,
    /// パスワードが空欄です
    #[display(fmt = "Password cannot be blank")]
    PasswordIsBlank,
}
