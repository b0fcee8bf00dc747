use crate::errors::ApiError;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON body extractor whose rejections use the standard error envelope.
///
/// Bodies that parse but do not fit the target type (unknown fields, bad
/// enum values, wrong types) become validation errors. Malformed JSON and a
/// missing content type become bad requests. Both answer 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection_to_api_error(rejection)),
        }
    }
}

fn json_rejection_to_api_error(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => ApiError::ValidationError(err.body_text()),
        other => ApiError::BadRequest(other.body_text()),
    }
}

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> Response {
    (StatusCode::CREATED, Json(data)).into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Plain confirmation body for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http;
    use serde_json::Value;

    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Named {
        #[allow(dead_code)]
        name: String,
    }

    async fn reject(content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let req = builder.body(Body::from(body.to_owned())).unwrap();
        let rejection = match AppJson::<Named>::from_request(req, &()).await {
            Ok(_) => panic!("body should be rejected"),
            Err(rejection) => rejection,
        };
        let response = rejection.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn json_rejections_use_error_envelope() {
        for (content_type, body) in [
            (Some("application/json"), r#"{"name": "a", "extra": 1}"#),
            (Some("application/json"), r#"{"name": "#),
            (None, r#"{"name": "a"}"#),
        ] {
            let (status, payload) = reject(content_type, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(payload["error"], "Bad Request");
            assert!(payload["message"].as_str().is_some_and(|m| !m.is_empty()));
            assert!(payload["timestamp"].is_string());
        }
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "ACME"}"#))
            .unwrap();
        assert!(AppJson::<Named>::from_request(req, &()).await.is_ok());
    }

    #[test]
    fn response_helpers_set_status() {
        assert_eq!(success_response("ok").status(), StatusCode::OK);
        assert_eq!(created_response("ok").status(), StatusCode::CREATED);
        assert_eq!(no_content_response().status(), StatusCode::NO_CONTENT);
    }
}
