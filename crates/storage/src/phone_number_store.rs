use phone_registry_domain::model::{AccountId, NewPhoneNumber, PhoneNumber, PhoneNumberId};
use phone_registry_domain::storage::{PhoneNumberStore, StorageResult};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entity::phone_numbers;
use crate::errors::from_db;
use crate::SeaOrmStorage;

#[async_trait::async_trait]
impl PhoneNumberStore for SeaOrmStorage {
    async fn insert_phone_number(&self, phone: NewPhoneNumber) -> StorageResult<PhoneNumber> {
        let model = phone_numbers::ActiveModel {
            number: Set(phone.number),
            account_id: Set(phone.account_id.map(AccountId::get)),
            ..Default::default()
        };
        let created = model.insert(self.connection()).await.map_err(from_db)?;
        Ok(phone_number_from_model(created))
    }

    async fn find_phone_number(&self, id: PhoneNumberId) -> StorageResult<Option<PhoneNumber>> {
        let maybe = phone_numbers::Entity::find_by_id(id.get())
            .one(self.connection())
            .await
            .map_err(from_db)?;
        Ok(maybe.map(phone_number_from_model))
    }

    async fn find_phone_number_by_number(
        &self,
        number: &str,
    ) -> StorageResult<Option<PhoneNumber>> {
        let maybe = phone_numbers::Entity::find()
            .filter(phone_numbers::Column::Number.eq(number))
            .one(self.connection())
            .await
            .map_err(from_db)?;
        Ok(maybe.map(phone_number_from_model))
    }

    async fn list_phone_numbers_for_account(
        &self,
        account_id: AccountId,
    ) -> StorageResult<Vec<PhoneNumber>> {
        let models = phone_numbers::Entity::find()
            .filter(phone_numbers::Column::AccountId.eq(account_id.get()))
            .order_by_asc(phone_numbers::Column::Id)
            .all(self.connection())
            .await
            .map_err(from_db)?;
        Ok(models.into_iter().map(phone_number_from_model).collect())
    }

    async fn update_phone_number_account(
        &self,
        id: PhoneNumberId,
        account_id: AccountId,
    ) -> StorageResult<Option<PhoneNumber>> {
        let maybe = phone_numbers::Entity::find_by_id(id.get())
            .one(self.connection())
            .await
            .map_err(from_db)?;
        let Some(model) = maybe else {
            return Ok(None);
        };

        let mut active: phone_numbers::ActiveModel = model.into();
        active.account_id = Set(Some(account_id.get()));
        let updated = active.update(self.connection()).await.map_err(from_db)?;
        Ok(Some(phone_number_from_model(updated)))
    }

    async fn delete_phone_number(&self, id: PhoneNumberId) -> StorageResult<bool> {
        let result = phone_numbers::Entity::delete_by_id(id.get())
            .exec(self.connection())
            .await
            .map_err(from_db)?;
        Ok(result.rows_affected > 0)
    }
}

fn phone_number_from_model(model: phone_numbers::Model) -> PhoneNumber {
    PhoneNumber {
        id: PhoneNumberId::new(model.id),
        number: model.number,
        account_id: model.account_id.map(AccountId::new),
    }
}
