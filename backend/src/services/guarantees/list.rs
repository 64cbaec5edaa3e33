use crate::live::feed;
use crate::live::state::AppState;
use crate::services::store_error_response;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    let list = state.list.read().await;
    HttpResponse::Ok().json(list.records())
}

pub(crate) async fn refresh(state: web::Data<AppState>) -> impl Responder {
    match feed::refetch(&state.store, &state.list).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => store_error_response("refreshing guarantees", &e),
    }
}
