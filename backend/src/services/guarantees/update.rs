use crate::live::state::AppState;
use crate::services::store_error_response;
use crate::store;
use actix_web::{web, HttpResponse, Responder};
use common::requests::GuaranteeUpdate;

/// Only the fields present in the body change.
pub(crate) async fn process(
    id: web::Path<String>,
    state: web::Data<AppState>,
    payload: web::Json<GuaranteeUpdate>,
) -> impl Responder {
    let id = id.into_inner();
    let changes = payload.into_inner();
    match store::run(&state.store, move |s| s.update(&id, changes)).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => store_error_response("updating guarantee", &e),
    }
}
