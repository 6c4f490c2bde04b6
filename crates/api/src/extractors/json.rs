//! JSON body extractor.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, PARSE_FAILURE_MESSAGE};

/// Like [`axum::Json`], but rejects with a 400 in the API's error envelope.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(ApiError::BadRequest(PARSE_FAILURE_MESSAGE.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn request(content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_is_extracted() {
        let req = request(Some("application/json"), r#"{"name": "gateway"}"#);
        let JsonBody(payload) = JsonBody::<Payload>::from_request(req, &()).await.unwrap();
        assert_eq!(payload.name, "gateway");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let req = request(Some("application/json"), r#"{"name": "#);
        let err = JsonBody::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == PARSE_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_bad_request() {
        let req = request(Some("application/json"), r#"{"name": 42}"#);
        let err = JsonBody::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let req = request(None, r#"{"name": "gateway"}"#);
        let err = JsonBody::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
