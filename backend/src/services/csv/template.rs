use super::{attachment, CSV_CONTENT_TYPE};
use actix_web::{HttpResponse, Responder};
use common::csv::{template_csv, TEMPLATE_FILE_NAME};

pub(crate) async fn process() -> impl Responder {
    HttpResponse::Ok()
        .content_type(CSV_CONTENT_TYPE)
        .insert_header(attachment(TEMPLATE_FILE_NAME))
        .body(template_csv())
}
