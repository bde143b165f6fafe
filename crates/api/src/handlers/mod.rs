pub mod accounts;
pub mod metrics;
pub mod phone_numbers;

pub use accounts::{
    create_account_handler, get_account_handler, list_accounts_handler,
    toggle_account_status_handler,
};
pub use self::metrics::metrics_handler;
pub use phone_numbers::{
    assign_phone_number_handler, assign_phone_number_to_account_handler,
    delete_phone_number_handler, get_phone_number_handler, phone_numbers_for_account_handler,
};

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use ::metrics::counter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use phone_registry_domain::services::{ErrorKind, ServiceError, ServiceResult};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ApiError {
    fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Service(err) => err.kind(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self.kind() {
            ErrorKind::Internal => {
                error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error: message })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Answers unreadable request bodies with a 400 carrying an `ErrorBody`.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected request body");
    let response = HttpResponse::BadRequest().json(ErrorBody {
        error: err.to_string(),
    });
    InternalError::from_response(err, response).into()
}

/// Counts the outcome of a service call under `endpoint` and lifts the error
/// into an `ApiError`.
fn observe<T>(endpoint: &'static str, result: ServiceResult<T>) -> Result<T, ApiError> {
    let status = match &result {
        Ok(_) => "ok".to_owned(),
        Err(err) => err.kind().as_ref().to_owned(),
    };
    counter!("api_requests_total", "endpoint" => endpoint, "status" => status).increment(1);
    result.map_err(ApiError::from)
}
