use crate::services::FieldErrors;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// `{"message": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// `{"errors": {"field": ["..."]}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorsBody {
    pub errors: FieldErrors,
}

/// JSON bodies shared by the handlers and the error responses.
pub struct JsonResponse;

impl JsonResponse {
    pub fn message(status: StatusCode, message: &str) -> HttpResponse {
        HttpResponse::build(status).json(MessageBody {
            message: message.to_string(),
        })
    }

    pub fn ok(message: &str) -> HttpResponse {
        Self::message(StatusCode::OK, message)
    }

    pub fn not_found(message: &str) -> HttpResponse {
        let msg = if !message.trim().is_empty() {
            message
        } else {
            "Object not found"
        };
        Self::message(StatusCode::NOT_FOUND, msg)
    }

    pub fn bad_request(message: &str) -> HttpResponse {
        let msg = if !message.trim().is_empty() {
            message
        } else {
            "Bad request"
        };
        Self::message(StatusCode::BAD_REQUEST, msg)
    }

    pub fn internal_server_error(message: &str) -> HttpResponse {
        let msg = if !message.trim().is_empty() {
            message
        } else {
            "Internal server error"
        };
        Self::message(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn errors(errors: &FieldErrors) -> HttpResponse {
        HttpResponse::UnprocessableEntity().json(ErrorsBody {
            errors: errors.clone(),
        })
    }
}
