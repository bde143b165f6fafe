use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    Account, AccountId, NewAccount, NewPhoneNumber, PhoneNumber, PhoneNumberId,
};

/// Common result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl StorageError {
    pub fn from_source(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }
}

/// Persistence for accounts. Every write commits before returning.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn list_accounts(&self) -> StorageResult<Vec<Account>>;
    async fn insert_account(&self, account: NewAccount) -> StorageResult<Account>;
    async fn find_account(&self, id: AccountId) -> StorageResult<Option<Account>>;
    /// Flips the stored status inside a single transaction. `None` when the
    /// account does not exist.
    async fn toggle_account_status(&self, id: AccountId) -> StorageResult<Option<Account>>;
}

/// Persistence for phone numbers. `number` is unique across all rows.
#[async_trait]
pub trait PhoneNumberStore: Send + Sync {
    async fn insert_phone_number(&self, phone: NewPhoneNumber) -> StorageResult<PhoneNumber>;
    async fn find_phone_number(&self, id: PhoneNumberId) -> StorageResult<Option<PhoneNumber>>;
    async fn find_phone_number_by_number(&self, number: &str)
        -> StorageResult<Option<PhoneNumber>>;
    async fn list_phone_numbers_for_account(
        &self,
        account_id: AccountId,
    ) -> StorageResult<Vec<PhoneNumber>>;
    async fn update_phone_number_account(
        &self,
        id: PhoneNumberId,
        account_id: AccountId,
    ) -> StorageResult<Option<PhoneNumber>>;
    /// Returns `false` when no row matched.
    async fn delete_phone_number(&self, id: PhoneNumberId) -> StorageResult<bool>;
}
