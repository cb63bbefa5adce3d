use actix_web::{web, HttpResponse};

use crate::dto::{Notice, SessionView};
use crate::error::Result;
use crate::state::AppState;

pub async fn get(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = state.session.lock().await;
    Ok(HttpResponse::Ok().json(SessionView::from_session(&session)))
}

pub async fn reset(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut session = state.session.lock().await;
    session.new_conversation();
    log::info!("Started a new conversation");

    let view = SessionView::from_session(&session).with_notice(Notice::info("New conversation"));
    Ok(HttpResponse::Ok().json(view))
}
