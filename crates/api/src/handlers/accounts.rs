use actix_web::{http::header, web, HttpResponse};
use phone_registry_domain::model::{Account, AccountId, AccountStatus, NewAccount};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

use super::{observe, ApiError};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
    Active,
    Suspended,
}

impl From<AccountStatus> for AccountState {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Active => AccountState::Active,
            AccountStatus::Suspended => AccountState::Suspended,
        }
    }
}

impl From<AccountState> for AccountStatus {
    fn from(state: AccountState) -> Self {
        match state {
            AccountState::Active => AccountStatus::Active,
            AccountState::Suspended => AccountStatus::Suspended,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<AccountState>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: i32,
    pub name: Option<String>,
    pub status: AccountState,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.get(),
            name: account.name,
            status: account.status.into(),
        }
    }
}

pub async fn list_accounts_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let accounts = observe("list_accounts", state.accounts().list_accounts().await)?;
    let body: Vec<AccountResponse> = accounts.into_iter().map(AccountResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn create_account_handler(
    state: web::Data<AppState>,
    payload: web::Json<CreateAccountRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let new_account = NewAccount {
        name: request.name,
        status: request.status.map(AccountStatus::from).unwrap_or_default(),
    };
    let created = observe(
        "create_account",
        state.accounts().create_account(new_account).await,
    )?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/accounts/{}", created.id)))
        .json(AccountResponse::from(created)))
}

pub async fn get_account_handler(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = AccountId::new(path.into_inner());
    let account = observe("get_account", state.accounts().get_account(id).await)?;
    Ok(HttpResponse::Ok().json(AccountResponse::from(account)))
}

pub async fn toggle_account_status_handler(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = AccountId::new(path.into_inner());
    observe(
        "toggle_account_status",
        state.accounts().toggle_account_status(id).await,
    )?;
    Ok(HttpResponse::NoContent().finish())
}
