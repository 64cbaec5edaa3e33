use super::{attachment, CSV_CONTENT_TYPE};
use crate::live::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::csv::{export_guarantees, EXPORT_FILE_NAME};

/// Exports the live list, in the order the dashboard shows it.
pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    let list = state.list.read().await;
    match export_guarantees(list.records()) {
        Some(text) => HttpResponse::Ok()
            .content_type(CSV_CONTENT_TYPE)
            .insert_header(attachment(EXPORT_FILE_NAME))
            .body(text),
        None => HttpResponse::NoContent().finish(),
    }
}
