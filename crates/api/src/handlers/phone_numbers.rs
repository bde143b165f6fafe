use actix_web::{http::header, web, HttpResponse};
use phone_registry_domain::model::{AccountId, PhoneNumber, PhoneNumberId};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

use super::{observe, ApiError};

#[derive(Debug, Deserialize, Serialize)]
pub struct AssignPhoneNumberRequest {
    pub number: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneNumberResponse {
    pub id: i32,
    pub number: String,
    pub account_id: Option<i32>,
}

impl From<PhoneNumber> for PhoneNumberResponse {
    fn from(phone: PhoneNumber) -> Self {
        Self {
            id: phone.id.get(),
            number: phone.number,
            account_id: phone.account_id.map(AccountId::get),
        }
    }
}

pub async fn assign_phone_number_handler(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    payload: web::Json<AssignPhoneNumberRequest>,
) -> Result<HttpResponse, ApiError> {
    let account_id = AccountId::new(path.into_inner());
    let created = observe(
        "assign_phone_number",
        state
            .phone_numbers()
            .assign_phone_number(account_id, payload.into_inner().number)
            .await,
    )?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/phonenumbers/{}", created.id)))
        .json(PhoneNumberResponse::from(created)))
}

pub async fn get_phone_number_handler(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = PhoneNumberId::new(path.into_inner());
    let phone = observe(
        "get_phone_number",
        state.phone_numbers().get_phone_number(id).await,
    )?;
    Ok(HttpResponse::Ok().json(PhoneNumberResponse::from(phone)))
}

pub async fn assign_phone_number_to_account_handler(
    state: web::Data<AppState>,
    path: web::Path<(i32, i32)>,
) -> Result<HttpResponse, ApiError> {
    let (id, account_id) = path.into_inner();
    observe(
        "assign_phone_number_to_account",
        state
            .phone_numbers()
            .assign_phone_number_to_account(PhoneNumberId::new(id), AccountId::new(account_id))
            .await,
    )?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn phone_numbers_for_account_handler(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let account_id = AccountId::new(path.into_inner());
    let phones = observe(
        "phone_numbers_for_account",
        state
            .phone_numbers()
            .get_phone_numbers_for_account(account_id)
            .await,
    )?;
    let body: Vec<PhoneNumberResponse> =
        phones.into_iter().map(PhoneNumberResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub async fn delete_phone_number_handler(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let id = PhoneNumberId::new(path.into_inner());
    observe(
        "delete_phone_number",
        state.phone_numbers().delete_phone_number(id).await,
    )?;
    Ok(HttpResponse::NoContent().finish())
}
