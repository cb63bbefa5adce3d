use actix_web::{web, HttpResponse, Responder};

use crate::dto::StatusView;
use crate::state::AppState;

pub async fn handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(StatusView {
        gateway_url: state.gateway_url.clone(),
        gateway_reachable: state.gateway.is_reachable().await,
    })
}
