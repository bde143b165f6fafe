use tracing::{debug, info};

use crate::model::{Account, AccountId, NewAccount};
use crate::storage::AccountStore;

use super::{ServiceError, ServiceResult};

/// Account lifecycle: creation, lookup and the Active/Suspended toggle.
pub struct AccountService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> AccountService<'a, S>
where
    S: AccountStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn list_accounts(&self) -> ServiceResult<Vec<Account>> {
        Ok(self.store.list_accounts().await?)
    }

    pub async fn create_account(&self, account: NewAccount) -> ServiceResult<Account> {
        let created = self.store.insert_account(account).await?;
        info!(
            account_id = %created.id,
            status = ?created.status,
            "account created"
        );
        Ok(created)
    }

    pub async fn get_account(&self, id: AccountId) -> ServiceResult<Account> {
        self.store.find_account(id).await?.ok_or_else(|| {
            debug!(account_id = %id, "account lookup missed");
            ServiceError::AccountNotFound(id)
        })
    }

    /// Flips Active to Suspended and back, returning the stored result.
    pub async fn toggle_account_status(&self, id: AccountId) -> ServiceResult<Account> {
        let updated = self
            .store
            .toggle_account_status(id)
            .await?
            .ok_or(ServiceError::AccountNotFound(id))?;
        info!(
            account_id = %id,
            status = ?updated.status,
            "account status toggled"
        );
        Ok(updated)
    }
}
