//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] (or anything that converts into one) and
//! return it. The server turns it into a hyper response at the very end.

use std::path::Path;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use mime_guess::Mime;
use serde::Serialize;
use tracing::error;

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values for use with [`Response::bytes`].
pub enum ContentType {
    Html,        // text/html; charset=utf-8
    Json,        // application/json
    Text,        // text/plain; charset=utf-8
    Mime(Mime),  // guessed from a file extension
}

impl ContentType {
    /// Guesses the content type from the file extension of `path`, falling
    /// back to `application/octet-stream`.
    pub fn from_path(path: &Path) -> Self {
        Self::Mime(mime_guess::from_path(path).first_or_octet_stream())
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Html    => "text/html; charset=utf-8",
            Self::Json    => "application/json",
            Self::Text    => "text/plain; charset=utf-8",
            Self::Mime(m) => m.as_ref(),
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use loglens::{ContentType, Response};
/// use http::StatusCode;
///
/// Response::json(br#"{"message":"pong"}"#.to_vec());
/// Response::text("ok");
/// Response::status(StatusCode::NOT_FOUND);
/// Response::bytes(ContentType::Html, b"<h1>loglens</h1>".to_vec());
/// ```
#[derive(Debug)]
pub struct Response {
    body: Vec<u8>,
    content_type: Option<String>,
    status: StatusCode,
}

impl Response {
    /// `200 OK` with an `application/json` body.
    pub fn json(body: Vec<u8>) -> Self {
        Self::bytes(ContentType::Json, body)
    }

    /// `200 OK` with a `text/plain; charset=utf-8` body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::bytes(ContentType::Text, body.into().into_bytes())
    }

    /// `200 OK` with a typed body.
    pub fn bytes(content_type: ContentType, body: Vec<u8>) -> Self {
        Self {
            body,
            content_type: Some(content_type.as_str().to_owned()),
            status: StatusCode::OK,
        }
    }

    /// Response with no body.
    pub fn status(code: StatusCode) -> Self {
        Self { body: Vec::new(), content_type: None, status: code }
    }

    pub fn status_code(&self) -> StatusCode { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    pub(crate) fn set_status(&mut self, code: StatusCode) {
        self.status = code;
    }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder().status(self.status);
        if let Some(content_type) = &self.content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type.as_str());
        }
        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|e| {
                // Only reachable with a header that is not valid on the wire.
                error!("invalid response: {e}");
                let mut fallback = http::Response::new(Full::new(Bytes::new()));
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implemented for [`Response`], strings, [`StatusCode`], [`Json`] and
/// `Result<T, E>` where both sides convert. The last one lets handlers use `?`.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(self) }
}

/// Return a [`StatusCode`] directly from a handler: `return StatusCode::NOT_FOUND`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::status(self) }
}

impl<T, E> IntoResponse for Result<T, E>
where
    T: IntoResponse,
    E: IntoResponse,
{
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

// ── Json ──────────────────────────────────────────────────────────────────────

/// Serializes the wrapped value with serde_json as a `200 OK` JSON body.
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!("failed to serialize response body: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content_type(response: Response) -> Option<String> {
        response
            .into_inner()
            .headers()
            .get(http::header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_owned())
    }

    #[test]
    fn json_sets_content_type() {
        let response = Json(json!({"message": "pong"})).into_response();
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.body(), br#"{"message":"pong"}"#);
        assert_eq!(content_type(response).as_deref(), Some("application/json"));
    }

    #[test]
    fn error_status_keeps_body_and_type() {
        let mut response = Response::text("nope");
        response.set_status(StatusCode::BAD_REQUEST);
        let inner = response.into_inner();
        assert_eq!(inner.status(), StatusCode::BAD_REQUEST);
        assert_eq!(inner.headers()["content-type"], "text/plain; charset=utf-8");
    }

    #[test]
    fn bare_status_has_no_content_type() {
        assert_eq!(content_type(Response::status(StatusCode::NOT_FOUND)), None);
    }

    #[test]
    fn guesses_content_type_from_extension() {
        let response = Response::bytes(ContentType::from_path(Path::new("css/site.css")), Vec::new());
        assert_eq!(content_type(response).as_deref(), Some("text/css"));

        let response = Response::bytes(ContentType::from_path(Path::new("blob")), Vec::new());
        assert_eq!(content_type(response).as_deref(), Some("application/octet-stream"));
    }

    #[test]
    fn result_uses_error_side() {
        let result: Result<Response, StatusCode> = Err(StatusCode::NOT_FOUND);
        assert_eq!(result.into_response().status_code(), StatusCode::NOT_FOUND);
    }
}
