pub mod memory;
pub mod rest;

use crate::domain::DataAccessError;

impl From<reqwest::Error> for DataAccessError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_connect() || value.is_timeout() {
            Self::ConnectionError(Box::new(value))
        } else if value.is_decode() || value.is_body() {
            Self::ReadError(Box::new(value))
        } else if value.is_builder() || value.is_redirect() {
            Self::ClientSideError(Box::new(value))
        } else {
            Self::QueryError(Box::new(value))
        }
    }
}
