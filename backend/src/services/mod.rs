pub mod csv;
pub mod guarantees;

use crate::store::StoreError;
use actix_web::HttpResponse;

/// Turns a store failure into the single message shown next to the control
/// that triggered it.
pub(crate) fn store_error_response(action: &str, err: &StoreError) -> HttpResponse {
    let body = format!("Error {}: {}", action, err);
    match err {
        StoreError::NotFound(_) => HttpResponse::NotFound().body(body),
        StoreError::Invalid(_) => HttpResponse::BadRequest().body(body),
        StoreError::NotConfigured(_) | StoreError::Database(_) | StoreError::Unavailable(_) => {
            HttpResponse::ServiceUnavailable().body(body)
        }
    }
}
