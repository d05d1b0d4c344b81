pub mod customer;

use serde::{Deserialize, Serialize};
use std::{
    error::Error,
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
};
use thiserror::Error;

pub trait Id:
    Copy
    + Eq
    + Deref<Target = Self::Inner>
    + From<Self::Inner>
    + Display
    + Debug
    + Serialize
    + for<'de> Deserialize<'de>
{
    type Inner: FromStr;
}

/// データアクセスエラー
#[derive(Error, Debug)]
pub enum DataAccessError {
    #[error("Store connection error: {0}")]
    ConnectionError(Box<dyn Error + Send + Sync>),
    #[error("Store query error: {0}")]
    QueryError(Box<dyn Error + Send + Sync>),
    #[error("Data read error: {0}")]
    ReadError(Box<dyn Error + Send + Sync>),
    #[error("Data write error: {0}")]
    WriteError(Box<dyn Error + Send + Sync>),
    #[error("Client side error: {0}")]
    ClientSideError(Box<dyn Error + Send + Sync>),
}
