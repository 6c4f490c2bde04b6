//! Success envelope shared by every resource handler.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shared::pagination::PaginationResponse;

/// `{code, message, data?, pagination?}`. `code` repeats the HTTP status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponseBody<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationResponse>,
}

/// A successful response: status plus envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSuccess<T: Serialize>(StatusCode, ApiResponseBody<T>);

impl ApiSuccess<()> {
    /// Message only.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        ApiSuccess(
            status,
            ApiResponseBody {
                code: status.as_u16(),
                message: message.into(),
                data: None,
                pagination: None,
            },
        )
    }
}

impl<T: Serialize> ApiSuccess<T> {
    pub fn with_data(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(
            status,
            ApiResponseBody {
                code: status.as_u16(),
                message: message.into(),
                data: Some(data),
                pagination: None,
            },
        )
    }

    pub fn with_pagination(
        status: StatusCode,
        message: impl Into<String>,
        data: T,
        pagination: PaginationResponse,
    ) -> Self {
        ApiSuccess(
            status,
            ApiResponseBody {
                code: status.as_u16(),
                message: message.into(),
                data: Some(data),
                pagination: Some(pagination),
            },
        )
    }

    pub fn status(&self) -> StatusCode {
        self.0
    }

    pub fn body(&self) -> &ApiResponseBody<T> {
        &self.1
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}
