use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use papermind_core::{SessionError, StoreError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        AppError::Session(SessionError::Store(error))
    }
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: &'static str,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) | AppError::Session(SessionError::EmptyQuestion) => {
                "invalid_request"
            }
            AppError::Session(SessionError::Store(store)) => match store {
                StoreError::EmptyConversation | StoreError::NothingToDelete => "nothing_to_do",
                StoreError::NotFound(_) => "not_found",
                StoreError::InvalidId(_) => "invalid_request",
                StoreError::CorruptData { .. } => "corrupt_data",
                StoreError::Io(_) | StoreError::Serialization(_) => "storage_error",
            },
            AppError::Internal(_) => "api_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self.error_type() {
            "invalid_request" => StatusCode::BAD_REQUEST,
            "nothing_to_do" => StatusCode::CONFLICT,
            "not_found" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(status_code).json(JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type(),
            },
        })
    }
}
