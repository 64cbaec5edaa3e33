//! CSV import and export for guarantees.
//!
//! The provided routes are:
//! - `POST /api/guarantees/csv/preview`: accepts a multipart upload with a `file` field and
//!   returns the number of decodable rows together with the first five, so the user can check
//!   the column mapping before committing anything.
//!
//! - `POST /api/guarantees/csv/import`: accepts the same upload and creates one guarantee per
//!   valid row, strictly one after another. The response only carries the number of rows that
//!   were created and the number that were rejected or failed; which rows failed is not reported.
//!
//! - `GET /api/guarantees/csv/export`: downloads the live list as CSV with a byte-order mark.
//!   An empty list yields `204 No Content`.
//!
//! - `GET /api/guarantees/csv/template`: downloads a header plus one example row.
//!
//! This scope must be registered before the guarantee scope, whose `/{id}` route would
//! otherwise capture `/csv`.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod export;
mod import;
mod preview;
mod template;
mod upload;

const API_PATH: &str = "/api/guarantees/csv";

/// Rows included in an import preview.
const PREVIEW_ROWS: usize = 5;

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/preview", post().to(preview::process))
        .route("/import", post().to(import::process))
        .route("/export", get().to(export::process))
        .route("/template", get().to(template::process))
}

fn attachment(file_name: &str) -> (&'static str, String) {
    (
        "Content-Disposition",
        format!("attachment; filename=\"{}\"", file_name),
    )
}

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
