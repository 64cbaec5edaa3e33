use crate::live::state::AppState;
use crate::services::store_error_response;
use crate::store;
use actix_web::{web, HttpResponse, Responder};

/// Reads one guarantee from the store rather than from the live list.
pub(crate) async fn process(id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let id = id.into_inner();
    match store::run(&state.store, move |s| s.get(&id)).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => store_error_response("retrieving guarantee", &e),
    }
}
