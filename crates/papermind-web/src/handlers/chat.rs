use actix_web::{web, HttpResponse};

use crate::dto::{AskRequest, SessionView};
use crate::error::Result;
use crate::state::AppState;

/// Asks the gateway and returns the updated transcript. Gateway failures
/// come back as a normal 200 with the error text as the assistant turn.
pub async fn handler(
    state: web::Data<AppState>,
    req: web::Json<AskRequest>,
) -> Result<HttpResponse> {
    let mut session = state.session.lock().await;
    session.ask(&req.question).await?;
    Ok(HttpResponse::Ok().json(SessionView::from_session(&session)))
}
