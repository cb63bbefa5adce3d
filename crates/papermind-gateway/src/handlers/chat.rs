use std::time::Instant;

use actix_web::{web, HttpResponse, Responder};
use papermind_core::Turn;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(default)]
    pub history: Option<Vec<Turn>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

pub async fn handler(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    let ChatRequest {
        question,
        history,
        user_id,
    } = req.into_inner();
    let user_id = user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or("anonymous")
        .to_string();

    if question.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "question must not be empty"
        }));
    }

    let messages = build_messages(history.unwrap_or_default(), question);

    log::info!(
        "[{}] Relaying {} messages to model {}",
        user_id,
        messages.len(),
        state.llm.model()
    );

    let started = Instant::now();
    match state.llm.chat(&messages).await {
        Ok(response) => {
            log::info!("[{}] Completed in {:?}", user_id, started.elapsed());
            HttpResponse::Ok().json(ChatResponse { response })
        }
        Err(e) => {
            log::error!("[{}] Backend call failed: {}", user_id, e);
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": e.to_string()
            }))
        }
    }
}

/// History in order, then the new question as the final user message.
fn build_messages(history: Vec<Turn>, question: String) -> Vec<Turn> {
    let mut messages = history;
    messages.push(Turn::user(question));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::app_config;
    use actix_web::{test as actix_test, App};
    use async_trait::async_trait;
    use papermind_llm::{LLMError, LLMProvider};
    use std::sync::{Arc, Mutex};

    struct StubProvider {
        seen: Mutex<Vec<Vec<Turn>>>,
        fail: bool,
    }

    impl StubProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl LLMProvider for StubProvider {
        async fn chat(&self, messages: &[Turn]) -> papermind_llm::Result<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            if self.fail {
                Err(LLMError::MissingChoices("{\"detail\":\"oops\"}".to_string()))
            } else {
                Ok(format!("echo: {}", messages.last().unwrap().content))
            }
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    #[test]
    fn build_messages_appends_question_last() {
        let messages = build_messages(
            vec![Turn::user("a"), Turn::assistant("b")],
            "c".to_string(),
        );
        assert_eq!(
            messages,
            vec![Turn::user("a"), Turn::assistant("b"), Turn::user("c")]
        );
    }

    #[test]
    fn chat_request_deserialization_without_history() {
        let request: ChatRequest = serde_json::from_str(r#"{"question": "Hello"}"#).unwrap();
        assert_eq!(request.question, "Hello");
        assert!(request.history.is_none());
        assert!(request.user_id.is_none());
    }

    #[actix_web::test]
    async fn chat_relays_history_and_question() {
        let provider = StubProvider::new(false);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(provider.clone())))
                .configure(app_config),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({
                "question": "and now?",
                "history": [
                    {"role": "user", "content": "first"},
                    {"role": "assistant", "content": "reply"}
                ],
                "user_id": "papermind_user"
            }))
            .to_request();
        let resp: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["response"], "echo: and now?");
        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 3);
        assert_eq!(seen[0][2], Turn::user("and now?"));
    }

    #[actix_web::test]
    async fn backend_failure_is_bad_gateway_with_error_field() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(StubProvider::new(true))))
                .configure(app_config),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({"question": "hi"}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = actix_test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("oops"));
    }

    #[actix_web::test]
    async fn blank_question_is_rejected() {
        let provider = StubProvider::new(false);
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(provider.clone())))
                .configure(app_config),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({"question": "   "}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn malformed_body_is_rejected_by_extractor() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(StubProvider::new(false))))
                .configure(app_config),
        )
        .await;

        let req = actix_test::TestRequest::post()
            .uri("/chat")
            .set_json(serde_json::json!({"history": []}))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;

        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    async fn root_reports_health() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new(StubProvider::new(false))))
                .configure(app_config),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/").to_request();
        let resp: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["model"], "stub-model");
    }
}
