//! Error types for the records API server

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Search index error: {0}")]
    Index(#[from] reqwest::Error),

    #[error("Field \"{0}\" not found")]
    FieldNotFound(String),

    #[error("Unknown requestor type \"{0}\"")]
    UnknownRequestorType(String),

    #[error("Unknown document category \"{0}\"")]
    UnknownCategoryCode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Error::FieldNotFound(_)
            | Error::UnknownRequestorType(_)
            | Error::UnknownCategoryCode(_)
            | Error::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::Database(_) | Error::Index(_) | Error::Internal(_) | Error::Other(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": status.as_u16(),
            "message": error_message,
        }));

        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_not_found_renders_quoted_name() {
        let err = Error::FieldNotFound("load_dt".to_string());
        assert_eq!(err.to_string(), "Field \"load_dt\" not found");
    }

    #[test]
    fn client_errors_map_to_bad_request() {
        let response = Error::UnknownRequestorType("42".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
