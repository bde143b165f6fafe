use strum_macros::AsRefStr;
use thiserror::Error;

use crate::model::{AccountId, NumberFormatError, PhoneNumberId};
use crate::storage::StorageError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Client-facing classification of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Internal,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),
    #[error("phone number {0} not found")]
    PhoneNumberNotFound(PhoneNumberId),
    #[error("phone number `{0}` is already assigned to another account")]
    NumberTaken(String),
    #[error("cannot assign phone number to suspended account {0}")]
    AccountSuspended(AccountId),
    #[error(transparent)]
    InvalidNumber(#[from] NumberFormatError),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::AccountNotFound(_) | ServiceError::PhoneNumberNotFound(_) => {
                ErrorKind::NotFound
            }
            ServiceError::NumberTaken(_) | ServiceError::AccountSuspended(_) => ErrorKind::Conflict,
            ServiceError::InvalidNumber(_) => ErrorKind::InvalidInput,
            ServiceError::Storage(_) => ErrorKind::Internal,
        }
    }
}
