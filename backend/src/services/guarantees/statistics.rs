use crate::live::state::AppState;
use crate::live::statistics;
use crate::services::store_error_response;
use actix_web::{web, HttpResponse, Responder};

/// Returns the latest snapshot without touching the store.
pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.statistics.read().await;
    HttpResponse::Ok().json(&*snapshot)
}

pub(crate) async fn refresh(state: web::Data<AppState>) -> impl Responder {
    match statistics::refresh(&state.store, &state.statistics).await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => store_error_response("refreshing statistics", &e),
    }
}
