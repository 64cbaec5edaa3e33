use super::upload::{read_csv_upload, ImportError};
use super::PREVIEW_ROWS;
use crate::live::state::AppState;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::csv::{parse_guarantees, RowDraft};
use serde::Serialize;

#[derive(Serialize)]
pub struct ImportPreview {
    /// Rows whose width matched the header.
    pub total_rows: usize,
    pub rows: Vec<RowDraft>,
}

pub(crate) async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    match preview_upload(&state, payload).await {
        Ok(preview) => HttpResponse::Ok().json(preview),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

async fn preview_upload(state: &AppState, payload: Multipart) -> Result<ImportPreview, ImportError> {
    let text = read_csv_upload(payload, state.upload_limit).await?;
    let mut rows = parse_guarantees(&text, &state.home_currency);
    if rows.is_empty() {
        return Err(ImportError::Empty);
    }
    let total_rows = rows.len();
    rows.truncate(PREVIEW_ROWS);
    Ok(ImportPreview { total_rows, rows })
}
