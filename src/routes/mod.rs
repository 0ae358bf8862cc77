//! JSON HTTP handlers.
//!
//! Handlers stay thin: they pull shared state out of `web::Data`, call a
//! service and translate [`ServiceError`] into a status code.

use actix_web::{HttpResponse, Responder, get};
use chrono::{Local, NaiveDate};
use serde_json::json;

use crate::models::config::ServerConfig;
use crate::services::ServiceError;
use crate::services::master_data::PageLimits;

pub mod forms;
pub mod input;
pub mod master;
pub mod notifications;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Maps a service failure to its HTTP response.
///
/// Field errors are returned as `{ "errors": { field: message } }` with 422.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "Not found" })),
        ServiceError::Validation(errors) => {
            HttpResponse::UnprocessableEntity().json(json!({ "errors": errors }))
        }
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        ServiceError::Conflict(message) => {
            HttpResponse::Conflict().json(json!({ "error": message }))
        }
        err => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub(crate) fn page_limits(config: &ServerConfig) -> PageLimits {
    PageLimits {
        default_size: config.default_page_size,
        max_size: config.max_page_size,
    }
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    use super::*;
    use crate::repository::errors::RepositoryError;
    use crate::validation::FieldErrors;

    #[actix_web::test]
    async fn validation_errors_are_unprocessable() {
        let mut errors = FieldErrors::new();
        errors.insert("pan", "PAN is required");

        let response = error_response(ServiceError::Validation(errors));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["errors"]["pan"], "PAN is required");
    }

    #[test]
    fn other_errors_map_to_status_codes() {
        assert_eq!(
            error_response(ServiceError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(ServiceError::Form("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(ServiceError::Conflict("dup".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_response(ServiceError::Repository(RepositoryError::Unexpected("x".into())))
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
