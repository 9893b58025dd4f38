use axum::response::{IntoResponse, Response};
use hyper::StatusCode;
use serde::{Deserialize, Serialize};
use summit_entities::EntityError;
use tracing::error;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub code: StatusCode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiErrorResponse {
    message: String,
}

impl ApiError {
    pub fn new(message: String) -> Self {
        ApiError {
            message,
            code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code: StatusCode::BAD_REQUEST,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code: StatusCode::NOT_FOUND,
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code: StatusCode::FORBIDDEN,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
            code: StatusCode::CONFLICT,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        error!("Error while handling request {}", err.to_string());
        ApiError {
            message: err.to_string(),
            code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::RowNotFound => ApiError {
                message: "not found".to_string(),
                code: StatusCode::NOT_FOUND,
            },
            EntityError::Consistency(message) => ApiError {
                message,
                code: StatusCode::CONFLICT,
            },
            EntityError::Db(err) => {
                error!("Error while handling request {}", err);
                ApiError::new(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut res = serde_json::to_string(&ApiErrorResponse {
            message: self.message.clone(),
        })
        .unwrap()
        .into_response();
        *res.status_mut() = self.code;
        res
    }
}

impl From<(StatusCode, &str)> for ApiError {
    fn from((code, message): (StatusCode, &str)) -> Self {
        error!("Error while handling request {}", message);
        ApiError {
            message: message.to_string(),
            code,
        }
    }
}

impl From<(StatusCode, String)> for ApiError {
    fn from((code, message): (StatusCode, String)) -> Self {
        error!("Error while handling request {}", message);
        ApiError { message, code }
    }
}

pub fn handle_error<E>(err: E) -> ApiError
where
    E: std::error::Error,
{
    error!("Error while handling request {}", err);
    ApiError::new(err.to_string())
}
