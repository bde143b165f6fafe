use phone_registry_domain::model::{Account, AccountId, AccountStatus, NewAccount};
use phone_registry_domain::storage::{AccountStore, StorageResult};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};

use crate::entity::accounts::{self, AccountStatusDb};
use crate::errors::from_db;
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl AccountStore for SeaOrmStorage {
    async fn list_accounts(&self) -> StorageResult<Vec<Account>> {
        let models = accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(self.connection())
            .await
            .map_err(from_db)?;
        Ok(models.into_iter().map(account_from_model).collect())
    }

    async fn insert_account(&self, account: NewAccount) -> StorageResult<Account> {
        let model = accounts::ActiveModel {
            name: Set(account.name),
            status: Set(status_to_db(account.status)),
            ..Default::default()
        };
        let created = model.insert(self.connection()).await.map_err(from_db)?;
        Ok(account_from_model(created))
    }

    async fn find_account(&self, id: AccountId) -> StorageResult<Option<Account>> {
        let maybe = accounts::Entity::find_by_id(id.get())
            .one(self.connection())
            .await
            .map_err(from_db)?;
        Ok(maybe.map(account_from_model))
    }

    async fn toggle_account_status(&self, id: AccountId) -> StorageResult<Option<Account>> {
        let txn = self.connection().begin().await.map_err(from_db)?;
        let maybe = accounts::Entity::find_by_id(id.get())
            .one(&txn)
            .await
            .map_err(from_db)?;
        let Some(model) = maybe else {
            txn.rollback().await.map_err(from_db)?;
            return Ok(None);
        };

        let next = status_from_db(model.status).toggled();
        let mut active: accounts::ActiveModel = model.into();
        active.status = Set(status_to_db(next));
        let updated = active.update(&txn).await.map_err(from_db)?;
        txn.commit().await.map_err(from_db)?;
        Ok(Some(account_from_model(updated)))
    }
}

fn account_from_model(model: accounts::Model) -> Account {
    Account {
        id: AccountId::new(model.id),
        name: model.name,
        status: status_from_db(model.status),
    }
}

fn status_from_db(status: AccountStatusDb) -> AccountStatus {
    match status {
        AccountStatusDb::Active => AccountStatus::Active,
        AccountStatusDb::Suspended => AccountStatus::Suspended,
    }
}

fn status_to_db(status: AccountStatus) -> AccountStatusDb {
    match status {
        AccountStatus::Active => AccountStatusDb::Active,
        AccountStatus::Suspended => AccountStatusDb::Suspended,
    }
}
