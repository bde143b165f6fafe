use tracing::{debug, info, warn};

use crate::model::{validate_number, AccountId, NewPhoneNumber, PhoneNumber, PhoneNumberId};
use crate::storage::{AccountStore, PhoneNumberStore, StorageError};

use super::{ServiceError, ServiceResult};

/// Phone number lifecycle and (re)assignment rules. Reads account state
/// straight from storage rather than going through `AccountService`.
pub struct PhoneNumberService<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> PhoneNumberService<'a, S>
where
    S: AccountStore + PhoneNumberStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Creates `number` bound to `account_id`.
    ///
    /// Checks run in a fixed order, each mapping to a distinct error: the
    /// account must exist, then the number must be unused, then it must fit
    /// the length limit. A uniqueness violation raised by the insert itself
    /// (a concurrent request won) is reported the same way as the check.
    pub async fn assign_phone_number(
        &self,
        account_id: AccountId,
        number: String,
    ) -> ServiceResult<PhoneNumber> {
        if self.store.find_account(account_id).await?.is_none() {
            debug!(account_id = %account_id, "assignment rejected: unknown account");
            return Err(ServiceError::AccountNotFound(account_id));
        }

        if self
            .store
            .find_phone_number_by_number(&number)
            .await?
            .is_some()
        {
            debug!(
                account_id = %account_id,
                number = %number,
                "assignment rejected: number taken"
            );
            return Err(ServiceError::NumberTaken(number));
        }

        validate_number(&number)?;

        let created = match self
            .store
            .insert_phone_number(NewPhoneNumber {
                number: number.clone(),
                account_id: Some(account_id),
            })
            .await
        {
            Ok(created) => created,
            Err(StorageError::UniqueViolation(detail)) => {
                warn!(number = %number, detail = %detail, "number claimed concurrently");
                return Err(ServiceError::NumberTaken(number));
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            phone_number_id = %created.id,
            account_id = %account_id,
            "phone number assigned"
        );
        Ok(created)
    }

    pub async fn get_phone_number(&self, id: PhoneNumberId) -> ServiceResult<PhoneNumber> {
        self.store
            .find_phone_number(id)
            .await?
            .ok_or(ServiceError::PhoneNumberNotFound(id))
    }

    /// Moves an existing phone number onto `account_id`. Suspended accounts
    /// cannot receive numbers.
    pub async fn assign_phone_number_to_account(
        &self,
        id: PhoneNumberId,
        account_id: AccountId,
    ) -> ServiceResult<PhoneNumber> {
        if self.store.find_phone_number(id).await?.is_none() {
            return Err(ServiceError::PhoneNumberNotFound(id));
        }

        if self.is_account_suspended(account_id).await? {
            warn!(
                phone_number_id = %id,
                account_id = %account_id,
                "reassignment rejected: account suspended"
            );
            return Err(ServiceError::AccountSuspended(account_id));
        }

        let updated = self
            .store
            .update_phone_number_account(id, account_id)
            .await?
            .ok_or(ServiceError::PhoneNumberNotFound(id))?;
        info!(
            phone_number_id = %id,
            account_id = %account_id,
            "phone number reassigned"
        );
        Ok(updated)
    }

    pub async fn delete_phone_number(&self, id: PhoneNumberId) -> ServiceResult<()> {
        if !self.store.delete_phone_number(id).await? {
            return Err(ServiceError::PhoneNumberNotFound(id));
        }
        info!(phone_number_id = %id, "phone number deleted");
        Ok(())
    }

    pub async fn get_phone_numbers_for_account(
        &self,
        account_id: AccountId,
    ) -> ServiceResult<Vec<PhoneNumber>> {
        if self.store.find_account(account_id).await?.is_none() {
            return Err(ServiceError::AccountNotFound(account_id));
        }
        Ok(self.store.list_phone_numbers_for_account(account_id).await?)
    }

    pub async fn is_account_suspended(&self, account_id: AccountId) -> ServiceResult<bool> {
        let account = self
            .store
            .find_account(account_id)
            .await?
            .ok_or(ServiceError::AccountNotFound(account_id))?;
        Ok(account.status.is_suspended())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Account, AccountStatus, NewAccount};
    use crate::services::memory::MemoryStore;
    use crate::services::{AccountService, ErrorKind};

    async fn account(store: &MemoryStore, name: &str) -> Account {
        store
            .insert_account(NewAccount {
                name: Some(name.into()),
                status: AccountStatus::Active,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn assigns_number_to_existing_account() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        let service = PhoneNumberService::new(&store);

        let phone = service
            .assign_phone_number(a.id, "5551234567".into())
            .await
            .unwrap();
        assert_eq!(phone.number, "5551234567");
        assert_eq!(phone.account_id, Some(a.id));
        assert_eq!(service.get_phone_number(phone.id).await.unwrap(), phone);
    }

    #[tokio::test]
    async fn duplicate_number_conflicts_across_accounts() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        let b = account(&store, "B").await;
        let service = PhoneNumberService::new(&store);

        service
            .assign_phone_number(a.id, "5551234567".into())
            .await
            .unwrap();
        let err = service
            .assign_phone_number(b.id, "5551234567".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NumberTaken(ref n) if n == "5551234567"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn uniqueness_is_checked_before_length() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        store
            .insert_phone_number(NewPhoneNumber {
                number: "123456789012".into(),
                account_id: None,
            })
            .await
            .unwrap();
        let service = PhoneNumberService::new(&store);

        let err = service
            .assign_phone_number(a.id, "123456789012".into())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn account_existence_is_checked_first() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        let service = PhoneNumberService::new(&store);
        service
            .assign_phone_number(a.id, "5551234567".into())
            .await
            .unwrap();

        let err = service
            .assign_phone_number(AccountId::new(99), "5551234567".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AccountNotFound(_)));

        let err = service
            .assign_phone_number(AccountId::new(99), "123456789012".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn overlong_number_is_invalid_input() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        let service = PhoneNumberService::new(&store);

        let err = service
            .assign_phone_number(a.id, "123456789012".into())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(store.list_phone_numbers_for_account(a.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_race_surfaces_as_conflict() {
        let store = MemoryStore::with_stale_number_lookups();
        let a = account(&store, "A").await;
        let service = PhoneNumberService::new(&store);

        service
            .assign_phone_number(a.id, "5550000000".into())
            .await
            .unwrap();
        let err = service
            .assign_phone_number(a.id, "5550000000".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NumberTaken(_)));
    }

    #[tokio::test]
    async fn reassignment_respects_account_status() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        let b = account(&store, "B").await;
        let accounts = AccountService::new(&store);
        let service = PhoneNumberService::new(&store);
        let phone = service
            .assign_phone_number(b.id, "5559876543".into())
            .await
            .unwrap();

        accounts.toggle_account_status(a.id).await.unwrap();
        assert!(service.is_account_suspended(a.id).await.unwrap());
        let err = service
            .assign_phone_number_to_account(phone.id, a.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AccountSuspended(id) if id == a.id));
        assert_eq!(
            service.get_phone_number(phone.id).await.unwrap().account_id,
            Some(b.id)
        );

        accounts.toggle_account_status(a.id).await.unwrap();
        let moved = service
            .assign_phone_number_to_account(phone.id, a.id)
            .await
            .unwrap();
        assert_eq!(moved.account_id, Some(a.id));
        assert_eq!(moved.number, phone.number);
    }

    #[tokio::test]
    async fn reassignment_reports_missing_entities() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        let service = PhoneNumberService::new(&store);
        let phone = service
            .assign_phone_number(a.id, "5551112222".into())
            .await
            .unwrap();

        let err = service
            .assign_phone_number_to_account(PhoneNumberId::new(77), a.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PhoneNumberNotFound(_)));

        let err = service
            .assign_phone_number_to_account(phone.id, AccountId::new(77))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn deleted_number_is_gone() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        let service = PhoneNumberService::new(&store);
        let phone = service
            .assign_phone_number(a.id, "5553334444".into())
            .await
            .unwrap();

        service.delete_phone_number(phone.id).await.unwrap();
        assert!(matches!(
            service.get_phone_number(phone.id).await.unwrap_err(),
            ServiceError::PhoneNumberNotFound(_)
        ));
        assert!(matches!(
            service.delete_phone_number(phone.id).await.unwrap_err(),
            ServiceError::PhoneNumberNotFound(_)
        ));
    }

    #[tokio::test]
    async fn lists_numbers_per_account() {
        let store = MemoryStore::default();
        let a = account(&store, "A").await;
        let b = account(&store, "B").await;
        let service = PhoneNumberService::new(&store);
        service
            .assign_phone_number(a.id, "5550000001".into())
            .await
            .unwrap();
        service
            .assign_phone_number(a.id, "5550000002".into())
            .await
            .unwrap();

        let numbers = service.get_phone_numbers_for_account(a.id).await.unwrap();
        assert_eq!(numbers.len(), 2);
        assert!(numbers.iter().all(|phone| phone.account_id == Some(a.id)));
        assert!(service
            .get_phone_numbers_for_account(b.id)
            .await
            .unwrap()
            .is_empty());
        assert!(matches!(
            service
                .get_phone_numbers_for_account(AccountId::new(9))
                .await
                .unwrap_err(),
            ServiceError::AccountNotFound(_)
        ));
    }
}
