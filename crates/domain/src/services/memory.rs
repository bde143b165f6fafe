use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{
    Account, AccountId, NewAccount, NewPhoneNumber, PhoneNumber, PhoneNumberId,
};
use crate::storage::{AccountStore, PhoneNumberStore, StorageError, StorageResult};

/// Test double backing the service tests.
#[derive(Default)]
pub(crate) struct MemoryStore {
    tables: Mutex<Tables>,
    stale_number_lookups: bool,
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    phone_numbers: BTreeMap<PhoneNumberId, PhoneNumber>,
    next_account: i32,
    next_phone_number: i32,
}

impl MemoryStore {
    /// Number lookups always miss, as if a concurrent insert had not been
    /// committed yet when the uniqueness check ran.
    pub(crate) fn with_stale_number_lookups() -> Self {
        Self {
            stale_number_lookups: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn list_accounts(&self) -> StorageResult<Vec<Account>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.accounts.values().cloned().collect())
    }

    async fn insert_account(&self, account: NewAccount) -> StorageResult<Account> {
        let mut tables = self.tables.lock().unwrap();
        tables.next_account += 1;
        let created = Account {
            id: AccountId::new(tables.next_account),
            name: account.name,
            status: account.status,
        };
        tables.accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_account(&self, id: AccountId) -> StorageResult<Option<Account>> {
        Ok(self.tables.lock().unwrap().accounts.get(&id).cloned())
    }

    async fn toggle_account_status(&self, id: AccountId) -> StorageResult<Option<Account>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.accounts.get_mut(&id).map(|account| {
            account.status = account.status.toggled();
            account.clone()
        }))
    }
}

#[async_trait]
impl PhoneNumberStore for MemoryStore {
    async fn insert_phone_number(&self, phone: NewPhoneNumber) -> StorageResult<PhoneNumber> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .phone_numbers
            .values()
            .any(|existing| existing.number == phone.number)
        {
            return Err(StorageError::UniqueViolation("phone_numbers.number".into()));
        }
        tables.next_phone_number += 1;
        let created = PhoneNumber {
            id: PhoneNumberId::new(tables.next_phone_number),
            number: phone.number,
            account_id: phone.account_id,
        };
        tables.phone_numbers.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_phone_number(&self, id: PhoneNumberId) -> StorageResult<Option<PhoneNumber>> {
        Ok(self.tables.lock().unwrap().phone_numbers.get(&id).cloned())
    }

    async fn find_phone_number_by_number(
        &self,
        number: &str,
    ) -> StorageResult<Option<PhoneNumber>> {
        if self.stale_number_lookups {
            return Ok(None);
        }
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .phone_numbers
            .values()
            .find(|phone| phone.number == number)
            .cloned())
    }

    async fn list_phone_numbers_for_account(
        &self,
        account_id: AccountId,
    ) -> StorageResult<Vec<PhoneNumber>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .phone_numbers
            .values()
            .filter(|phone| phone.account_id == Some(account_id))
            .cloned()
            .collect())
    }

    async fn update_phone_number_account(
        &self,
        id: PhoneNumberId,
        account_id: AccountId,
    ) -> StorageResult<Option<PhoneNumber>> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.phone_numbers.get_mut(&id).map(|phone| {
            phone.account_id = Some(account_id);
            phone.clone()
        }))
    }

    async fn delete_phone_number(&self, id: PhoneNumberId) -> StorageResult<bool> {
        Ok(self.tables.lock().unwrap().phone_numbers.remove(&id).is_some())
    }
}
