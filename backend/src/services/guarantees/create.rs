use crate::live::state::AppState;
use crate::services::store_error_response;
use crate::store;
use actix_web::{web, HttpResponse, Responder};
use common::requests::NewGuarantee;
use log::info;

pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<NewGuarantee>,
) -> impl Responder {
    let guarantee = payload.into_inner();
    match store::run(&state.store, move |s| s.create(guarantee)).await {
        Ok(record) => {
            info!("Created guarantee {} ({})", record.guarantee_number, record.id);
            HttpResponse::Created().json(record)
        }
        Err(e) => store_error_response("saving guarantee", &e),
    }
}
