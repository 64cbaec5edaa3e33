use crate::live::state::AppState;
use crate::services::store_error_response;
use crate::store;
use actix_web::{web, HttpResponse, Responder};
use log::info;

pub(crate) async fn process(id: web::Path<String>, state: web::Data<AppState>) -> impl Responder {
    let id = id.into_inner();
    let target = id.clone();
    match store::run(&state.store, move |s| s.delete(&target)).await {
        Ok(()) => {
            info!("Deleted guarantee {}", id);
            HttpResponse::NoContent().finish()
        }
        Err(e) => store_error_response("deleting guarantee", &e),
    }
}
