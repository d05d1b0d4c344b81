use derive_more::{Display, Error, From};

use crate::domain::{
    customer::{Customer, CustomerError, CustomerId, CustomerRepository},
    DataAccessError,
};

/// フロントエンドセッション
///
/// 取得済みの顧客一覧と検索による絞り込み、行選択の状態を保持する。
pub struct Session<R> {
    repository: R,
    customers: Vec<Customer>,
    filtered: Vec<Customer>,
    search_term: String,
    selected: Option<CustomerId>,
}

/// セッションエラー
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    #[display(fmt = "{}", _0)]
    Validation(CustomerError),
    #[display(fmt = "{}", _0)]
    DataAccess(DataAccessError),
    /// 顧客が選択されていない
    #[display(fmt = "No customer is selected")]
    NothingSelected,
    /// 該当する顧客が存在しない
    #[display(fmt = "Customer not found")]
    NotFound,
}

impl<R> Session<R>
where
    R: CustomerRepository,
{
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            customers: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            selected: None,
        }
    }

    /// 顧客一覧を取得し直す(選択は解除され、検索語は適用し直される)
    pub async fn refresh(&mut self) -> Result<(), DataAccessError> {
        self.customers = self.repository.find_all().await?;
        self.selected = None;
        self.apply_filter();
        Ok(())
    }

    /// 検索語で一覧を絞り込む(空欄なら全件表示)
    pub fn search(&mut self, term: &str) {
        self.search_term = term.to_owned();
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        if self.search_term.trim().is_empty() {
            self.filtered = self.customers.clone();
        } else {
            self.filtered = self
                .customers
                .iter()
                .filter(|c| c.matches(&self.search_term))
                .cloned()
                .collect();
        }
        // 絞り込みで選択行が消えたら選択も解除する
        if let Some(id) = self.selected {
            if !self.filtered.iter().any(|c| c.id() == id) {
                self.selected = None;
            }
        }
    }

    /// 行の選択を切り替える(選択済みの行なら解除、非表示のIDは無視)
    pub fn toggle_select(&mut self, id: CustomerId) {
        if self.selected == Some(id) {
            self.selected = None;
        } else if self.filtered.iter().any(|c| c.id() == id) {
            self.selected = Some(id);
        }
    }

    /// 選択中の顧客
    pub fn selected_customer(&self) -> Option<&Customer> {
        self.selected
            .and_then(|id| self.filtered.iter().find(|c| c.id() == id))
    }

    /// 絞り込み後の一覧(取得順)
    pub fn customers(&self) -> &[Customer] {
        &self.filtered
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// 表示中の件数
    pub fn visible(&self) -> usize {
        self.filtered.len()
    }

    /// 全件数
    pub fn total(&self) -> usize {
        self.customers.len()
    }

    /// 絞り込み後の一覧から1ページ分を切り出す(ページ番号は1始まり)
    pub fn page(&self, number: usize, per_page: usize) -> &[Customer] {
        if number == 0 || per_page == 0 {
            return &[];
        }
        let start = (number - 1).saturating_mul(per_page);
        if start >= self.filtered.len() {
            return &[];
        }
        let end = start.saturating_add(per_page).min(self.filtered.len());
        &self.filtered[start..end]
    }

    /// 次に割り当てる顧客ID(全件中の最大ID + 1)
    fn next_id(&self) -> CustomerId {
        CustomerId::from(self.customers.iter().map(|c| *c.id()).max().unwrap_or(0) + 1)
    }

    /// 顧客を追加する
    pub async fn add(
        &mut self,
        name: String,
        email: String,
        password: String,
    ) -> Result<CustomerId, SessionError> {
        let entity = Customer::new(self.next_id(), name, email, password)?;
        let id = self.repository.insert(&entity).await?;
        self.refresh().await?;
        Ok(id)
    }

    /// 選択中の顧客を更新する(ID以外の全項目を差し替え)
    pub async fn update(
        &mut self,
        name: String,
        email: String,
        password: String,
    ) -> Result<(), SessionError> {
        let id = self.selected.ok_or(SessionError::NothingSelected)?;
        let entity = Customer::new(id, name, email, password)?;
        if !self.repository.update(&entity).await? {
            return Err(SessionError::NotFound);
        }
        self.refresh().await?;
        Ok(())
    }

    /// 選択中の顧客を削除する
    pub async fn delete_selected(&mut self) -> Result<(), SessionError> {
        let id = self.selected.ok_or(SessionError::NothingSelected)?;
        let deleted = self.repository.delete(id).await?;
        self.refresh().await?;
        if !deleted {
            return Err(SessionError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::infrastructure::{memory::MemoryCustomerRepository, rest::RestCustomerRepository};

    fn seeded() -> Session<MemoryCustomerRepository> {
        let customers = vec![
            Customer::new(
                1.into(),
                "Alice Smith".to_owned(),
                "alice@example.com".to_owned(),
                "wonderland".to_owned(),
            )
            .unwrap(),
            Customer::new(
                2.into(),
                "Bob Jones".to_owned(),
                "bob@example.com".to_owned(),
                "builder".to_owned(),
            )
            .unwrap(),
            Customer::new(
                3.into(),
                "Carol White".to_owned(),
                "carol@example.com".to_owned(),
                "poinsettia".to_owned(),
            )
            .unwrap(),
        ];
        Session::new(MemoryCustomerRepository::with_customers(customers))
    }

    #[tokio::test]
    async fn test_refresh_loads_all() {
        let mut session = seeded();
        session.refresh().await.unwrap();
        assert_eq!(session.total(), 3);
        assert_eq!(session.visible(), 3);
        assert_eq!(session.selected_customer(), None);
    }

    #[tokio::test]
    async fn test_search_filters() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        // 大文字小文字を区別しない
        session.search("ALICE");
        assert_eq!(session.visible(), 1);
        assert_eq!(session.total(), 3);
        assert_eq!(session.customers()[0].name(), "Alice Smith");

        // IDでも一致する
        session.search("2");
        assert_eq!(session.visible(), 1);
        assert_eq!(session.customers()[0].id(), CustomerId::from(2));

        session.search("zzz");
        assert_eq!(session.visible(), 0);

        // 空欄で全件に戻る
        session.search("");
        assert_eq!(session.visible(), 3);
    }

    #[tokio::test]
    async fn test_toggle_select() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        session.toggle_select(2.into());
        assert_eq!(
            session.selected_customer().map(Customer::id),
            Some(CustomerId::from(2))
        );

        // 同じ行をもう一度選択すると解除される
        session.toggle_select(2.into());
        assert_eq!(session.selected_customer(), None);

        // 存在しないIDは無視される
        session.toggle_select(99.into());
        assert_eq!(session.selected_customer(), None);
    }

    #[tokio::test]
    async fn test_search_clears_hidden_selection() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        session.toggle_select(2.into());
        session.search("alice");
        assert_eq!(session.selected_customer(), None);

        // 表示されたままの選択は維持される
        session.search("");
        session.toggle_select(1.into());
        session.search("alice");
        assert_eq!(
            session.selected_customer().map(Customer::id),
            Some(CustomerId::from(1))
        );
    }

    #[tokio::test]
    async fn test_add_assigns_next_id() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        let id = session
            .add(
                "Dave Brown".to_owned(),
                "dave@example.com".to_owned(),
                "sierra".to_owned(),
            )
            .await
            .unwrap();
        assert_eq!(id, CustomerId::from(4));
        assert_eq!(session.total(), 4);

        // 同じ内容でも2件の独立した書き込みになる
        let id = session
            .add(
                "Dave Brown".to_owned(),
                "dave@example.com".to_owned(),
                "sierra".to_owned(),
            )
            .await
            .unwrap();
        assert_eq!(id, CustomerId::from(5));
        assert_eq!(session.total(), 5);
    }

    #[tokio::test]
    async fn test_add_validates() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        let result = session
            .add("".to_owned(), "dave@example.com".to_owned(), "s".to_owned())
            .await;
        assert!(matches!(
            result,
            Err(SessionError::Validation(CustomerError::NameIsBlank))
        ));
        assert_eq!(session.total(), 3);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        session.toggle_select(2.into());
        session
            .update(
                "Robert Jones".to_owned(),
                "robert@example.com".to_owned(),
                "crane".to_owned(),
            )
            .await
            .unwrap();

        // 更新後は一覧を取り直すため選択は解除される
        assert_eq!(session.selected_customer(), None);
        let updated = session
            .customers()
            .iter()
            .find(|c| c.id() == CustomerId::from(2))
            .cloned()
            .unwrap();
        assert_eq!(updated.name(), "Robert Jones");
        assert_eq!(updated.email(), "robert@example.com");
        assert_eq!(updated.password(), "crane");
    }

    #[tokio::test]
    async fn test_update_requires_selection() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        let result = session
            .update("a".to_owned(), "a@b".to_owned(), "p".to_owned())
            .await;
        assert!(matches!(result, Err(SessionError::NothingSelected)));
    }

    #[tokio::test]
    async fn test_delete_selected() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        session.toggle_select(1.into());
        session.delete_selected().await.unwrap();
        assert_eq!(session.total(), 2);
        assert_eq!(session.selected_customer(), None);

        // 選択なしでは削除できない
        let result = session.delete_selected().await;
        assert!(matches!(result, Err(SessionError::NothingSelected)));
    }

    /// 一覧には載っているが、バックエンドからは消えている顧客を返すサーバー
    async fn stale_backend() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 2, "name": "Bob Jones", "email": "bob@example.com", "password": "builder" }
            ])))
            .mount(&server)
            .await;
        // PUT/DELETEのモックは登録しないため、どちらも404が返る
        server
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let server = stale_backend().await;
        let mut session = Session::new(RestCustomerRepository::new(server.uri()));
        session.refresh().await.unwrap();
        session.toggle_select(2.into());

        let result = session
            .update(
                "Robert Jones".to_owned(),
                "robert@example.com".to_owned(),
                "crane".to_owned(),
            )
            .await;
        assert!(matches!(result, Err(SessionError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_record_is_not_found() {
        let server = stale_backend().await;
        let mut session = Session::new(RestCustomerRepository::new(server.uri()));
        session.refresh().await.unwrap();
        session.toggle_select(2.into());

        let result = session.delete_selected().await;
        assert!(matches!(result, Err(SessionError::NotFound)));

        // 削除の失敗後も一覧は取得し直され、選択は解除されている
        assert_eq!(session.total(), 1);
        assert_eq!(session.selected_customer(), None);
    }

    #[tokio::test]
    async fn test_page() {
        let mut session = seeded();
        session.refresh().await.unwrap();

        assert_eq!(session.page(1, 2).len(), 2);
        assert_eq!(session.page(2, 2).len(), 1);
        assert_eq!(session.page(2, 2)[0].id(), CustomerId::from(3));
        assert!(session.page(3, 2).is_empty());
        assert!(session.page(0, 2).is_empty());
        assert!(session.page(1, 0).is_empty());
    }
}
