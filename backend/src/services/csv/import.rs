use super::upload::{read_csv_upload, ImportError};
use crate::live::state::AppState;
use crate::store::{self, SharedStore};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use common::csv::{parse_guarantees, RowDraft};
use common::requests::ImportSummary;
use common::validate::{validate_row, ParsedRow};
use log::{debug, info};

/// HTTP handler wrapper that converts the import result to an `HttpResponse`.
///
/// - On success: returns `200 OK` with the `ImportSummary` counts.
/// - On failure: returns `400 Bad Request` with the error message.
pub(crate) async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    match import_upload(&state, payload).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => HttpResponse::BadRequest().body(format!("Error: {}", e)),
    }
}

async fn import_upload(state: &AppState, payload: Multipart) -> Result<ImportSummary, ImportError> {
    let text = read_csv_upload(payload, state.upload_limit).await?;
    let drafts = parse_guarantees(&text, &state.home_currency);
    if drafts.is_empty() {
        return Err(ImportError::Empty);
    }
    let today = Utc::now().date_naive();
    Ok(import_rows(&state.store, drafts, today, &state.home_currency).await)
}

/// Creates one guarantee per valid draft.
///
/// Rows are sent one at a time, each create awaited before the next starts.
/// Rejected rows and failed creates both count as errors; nothing is retried.
pub async fn import_rows(
    store: &SharedStore,
    drafts: Vec<RowDraft>,
    today: NaiveDate,
    home_currency: &str,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (idx, draft) in drafts.into_iter().enumerate() {
        let guarantee = match validate_row(draft, today, home_currency) {
            ParsedRow::Complete(guarantee) => guarantee,
            ParsedRow::Incomplete(defects) => {
                let reasons: Vec<String> = defects.iter().map(|d| d.to_string()).collect();
                debug!("Skipping CSV row {}: {}", idx + 1, reasons.join(", "));
                summary.errors += 1;
                continue;
            }
        };

        match store::run(store, move |s| s.create(guarantee)).await {
            Ok(_) => summary.success += 1,
            Err(e) => {
                debug!("CSV row {} was not saved: {}", idx + 1, e);
                summary.errors += 1;
            }
        }
    }

    info!(
        "CSV import finished: {} created, {} failed",
        summary.success, summary.errors
    );
    summary
}
