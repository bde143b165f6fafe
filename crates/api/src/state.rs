use phone_registry_domain::services::{
    telemetry::TelemetryGuard, AccountService, PhoneNumberService,
};
use phone_registry_storage::SeaOrmStorage;

#[derive(Clone)]
pub struct AppState {
    storage: SeaOrmStorage,
    telemetry: TelemetryGuard,
}

impl AppState {
    pub fn new(storage: SeaOrmStorage, telemetry: TelemetryGuard) -> Self {
        Self { storage, telemetry }
    }

    pub fn storage(&self) -> &SeaOrmStorage {
        &self.storage
    }

    pub fn telemetry(&self) -> &TelemetryGuard {
        &self.telemetry
    }

    /// Request-scoped account service over the shared storage handle.
    pub fn accounts(&self) -> AccountService<'_, SeaOrmStorage> {
        AccountService::new(self.storage())
    }

    pub fn phone_numbers(&self) -> PhoneNumberService<'_, SeaOrmStorage> {
        PhoneNumberService::new(self.storage())
    }
}
