use derive_more::{Display, Error};

/// 管理者の固定資格情報
static ADMIN_EMAIL: &str = "admin@admin.com";
static ADMIN_PASSWORD: &str = "admin";

/// ログイン済み管理者
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminUser {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// ログインエラー
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, Error)]
pub enum LoginError {
    /// 管理者以外はログインできない
    #[display(fmt = "Access denied. Only administrators can log in to this system.")]
    AccessDenied,
}

/// 管理者の資格情報を検証する(メールアドレスは大文字小文字を区別しない)
pub fn authenticate(email: &str, password: &str) -> Result<AdminUser, LoginError> {
    if email.to_lowercase() == ADMIN_EMAIL && password == ADMIN_PASSWORD {
        Ok(AdminUser {
            id: 1,
            name: "Administrator".to_owned(),
            email: ADMIN_EMAIL.to_owned(),
        })
    } else {
        Err(LoginError::AccessDenied)
    }
}
