use actix_multipart::{Multipart, MultipartError};
use futures_util::StreamExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("The file must end with .csv")]
    NotCsv,

    #[error("Missing file")]
    MissingFile,

    #[error("The file is not valid UTF-8 text")]
    Encoding,

    #[error("The upload exceeds the limit of {0} bytes")]
    TooLarge(usize),

    #[error("The file is empty or contains no valid rows")]
    Empty,

    #[error("Upload failed: {0}")]
    Multipart(#[from] MultipartError),
}

/// Reads the `file` field of a multipart upload as CSV text.
///
/// Other fields are drained without being kept. Every byte read, from any
/// field, counts against `limit`.
pub(crate) async fn read_csv_upload(
    mut payload: Multipart,
    limit: usize,
) -> Result<String, ImportError> {
    let mut text: Option<String> = None;
    let mut received = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        if name.as_deref() != Some("file") {
            while let Some(chunk) = field.next().await {
                received += chunk?.len();
                if received > limit {
                    return Err(ImportError::TooLarge(limit));
                }
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();
        if !filename.to_lowercase().ends_with(".csv") {
            return Err(ImportError::NotCsv);
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            received += chunk.len();
            if received > limit {
                return Err(ImportError::TooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }
        text = Some(String::from_utf8(bytes).map_err(|_| ImportError::Encoding)?);
    }

    let text = text.ok_or(ImportError::MissingFile)?;
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }
    Ok(text)
}
