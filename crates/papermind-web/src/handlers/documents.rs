use actix_web::{web, HttpResponse};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use papermind_pdf::{extract_documents, UploadedFile};

use crate::dto::{Notice, SessionView, UploadRequest, UploadedDocument};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Replaces the session's document text with the text of the uploaded PDFs,
/// concatenated in upload order.
pub async fn upload(
    state: web::Data<AppState>,
    req: web::Json<UploadRequest>,
) -> Result<HttpResponse> {
    let UploadRequest { files } = req.into_inner();
    if files.is_empty() {
        return Err(AppError::BadRequest("no files were uploaded".to_string()));
    }

    let files = files
        .into_iter()
        .map(decode_upload)
        .collect::<Result<Vec<_>>>()?;

    let extraction = web::block(move || extract_documents(&files))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let notice = if !extraction.failures.is_empty() {
        let details: Vec<String> = extraction
            .failures
            .iter()
            .map(|failure| format!("{}: {}", failure.file, failure.message))
            .collect();
        Notice::error(format!("Error reading PDF ({})", details.join("; ")))
    } else if extraction.is_empty() {
        Notice::warning(extraction.notice())
    } else {
        Notice::success(extraction.notice())
    };

    log::info!(
        "Document text replaced: {} files, {} characters, {} failures",
        extraction.files,
        extraction.char_count(),
        extraction.failures.len()
    );

    let mut session = state.session.lock().await;
    session.set_document(extraction.text);
    Ok(HttpResponse::Ok().json(SessionView::from_session(&session).with_notice(notice)))
}

fn decode_upload(document: UploadedDocument) -> Result<UploadedFile> {
    let encoded = match document.content_base64.split_once(',') {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => document.content_base64.as_str(),
    };

    let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
        AppError::BadRequest(format!("{} is not valid base64: {}", document.name, e))
    })?;

    Ok(UploadedFile::new(document.name, bytes))
}
