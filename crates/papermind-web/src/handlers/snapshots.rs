use actix_web::{web, HttpResponse};
use papermind_core::SnapshotId;

use crate::dto::{Notice, SessionView, SnapshotList};
use crate::error::Result;
use crate::state::AppState;

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse> {
    let session = state.session.lock().await;
    let snapshots = session
        .list()
        .await?
        .into_iter()
        .map(|id| id.to_string())
        .collect();

    Ok(HttpResponse::Ok().json(SnapshotList {
        snapshots,
        current: session.current_snapshot().map(ToString::to_string),
    }))
}

pub async fn save(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut session = state.session.lock().await;
    let id = session.save().await?;

    let view = SessionView::from_session(&session)
        .with_notice(Notice::success(format!("Conversation saved as {}", id)));
    Ok(HttpResponse::Created().json(view))
}

pub async fn load(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = SnapshotId::parse(&path.into_inner())?;
    let mut session = state.session.lock().await;
    session.load(&id).await?;

    let view = SessionView::from_session(&session)
        .with_notice(Notice::info(format!("Loaded {}", id)));
    Ok(HttpResponse::Ok().json(view))
}

pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let id = SnapshotId::parse(&path.into_inner())?;
    let mut session = state.session.lock().await;
    session.delete(&id).await?;

    let view = SessionView::from_session(&session)
        .with_notice(Notice::success(format!("Deleted {}", id)));
    Ok(HttpResponse::Ok().json(view))
}

pub async fn delete_all(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut session = state.session.lock().await;
    let removed = session.delete_all().await?;

    let view = SessionView::from_session(&session).with_notice(Notice::success(format!(
        "Deleted {} saved conversations",
        removed
    )));
    Ok(HttpResponse::Ok().json(view))
}
