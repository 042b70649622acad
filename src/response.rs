//! Handler replies and their conversion to the wire.
//!
//! A handler answers with a [`Response`]: a status, a [`Body`] and a set of
//! headers. What actually goes on the wire is decided in one place,
//! [`Response::into_http`]:
//!
//! 1. The body is normalized into its JSON envelope and pretty-printed.
//! 2. Handler headers are appended (never overwritten).
//! 3. `Content-Type` is forced to `application/json; charset=UTF-8`.
//! 4. A trailing newline follows the JSON.
//!
//! If step 1 fails the handler's headers are dropped and a hand-built 500
//! envelope is written instead.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use http_body_util::Full;
use tracing::error;

use crate::envelope::{Body, JsonData, JsonError, JsonMessage};

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

// ── Response ──────────────────────────────────────────────────────────────────

/// The outcome of a handler: status, body and headers.
///
/// ```rust
/// use restive::{Body, JsonError, Response};
/// use http::{StatusCode, header, HeaderValue};
///
/// Response::new(StatusCode::OK, Body::data(vec![1, 2, 3]));
/// Response::from(JsonError::new(StatusCode::CONFLICT, "Already exists."));
///
/// Response::builder()
///     .status(StatusCode::CREATED)
///     .header(header::LOCATION, HeaderValue::from_static("/users/42"))
///     .body(Body::data(42));
/// ```
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub body: Body,
    pub headers: HeaderMap,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Body>) -> Self {
        Self { status, body: body.into(), headers: HeaderMap::new() }
    }

    /// Builder for responses that need extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: StatusCode::OK }
    }

    /// The status the client will see: the body's own if it carries one.
    pub fn wire_status(&self) -> StatusCode {
        self.body.status().unwrap_or(self.status)
    }

    /// Renders the response for hyper.
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let (status, headers, mut bytes) = match self.body.normalize(self.status) {
            Ok((status, bytes)) => (status, self.headers, bytes),
            Err(e) => {
                error!(error = %e, "response serialization failed");
                (StatusCode::INTERNAL_SERVER_ERROR, HeaderMap::new(), fallback_body(&e))
            }
        };
        bytes.push(b'\n');

        let mut res = http::Response::new(Full::new(Bytes::from(bytes)));
        *res.status_mut() = status;
        let out = res.headers_mut();
        let mut current = None;
        for (name, value) in headers {
            // HeaderMap's owning iterator yields the name once per run of values.
            if let Some(name) = name {
                current = Some(name);
            }
            if let Some(name) = &current {
                out.append(name.clone(), value);
            }
        }
        out.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        res
    }
}

/// The 500 body written when normalization fails. Built by hand so that it
/// cannot fail itself.
fn fallback_body(e: &serde_json::Error) -> Vec<u8> {
    format!(
        "{{\n  \"status\": 500,\n  \"error\": \"Internal server error. {}\"\n}}",
        escape_json(&e.to_string()),
    )
    .into_bytes()
}

fn escape_json(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

impl From<JsonError> for Response {
    fn from(e: JsonError) -> Self { e.into_response() }
}

impl From<JsonMessage> for Response {
    fn from(m: JsonMessage) -> Self { m.into_response() }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`]. Defaults to `200 OK`.
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    /// Adds a header value. Repeated names accumulate.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(self, body: impl Into<Body>) -> Response {
        Response { status: self.status, body: body.into(), headers: self.headers }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into a [`Response`].
///
/// Handlers and wrappers may return anything implementing this trait:
///
/// ```rust,ignore
/// async fn get_user(_req: Request) -> (StatusCode, Body) {
///     (StatusCode::OK, Body::data(User { id: 1, name: "alice".into() }))
/// }
///
/// async fn missing(_req: Request) -> JsonError {
///     JsonError::new(StatusCode::NOT_FOUND, "No such user.")
/// }
/// ```
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response { Response::new(self.status, self) }
}

impl IntoResponse for JsonMessage {
    fn into_response(self) -> Response { Response::new(self.status, self) }
}

impl<T: serde::Serialize + Send + 'static> IntoResponse for JsonData<T> {
    fn into_response(self) -> Response { Response::new(self.status, self) }
}

/// Return a bare status from a handler: `{"status": …, "data": null}`.
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::new(self, Body::empty()) }
}

impl<B: Into<Body>> IntoResponse for (StatusCode, B) {
    fn into_response(self) -> Response { Response::new(self.0, self.1) }
}

impl<B: Into<Body>> IntoResponse for (StatusCode, B, HeaderMap) {
    fn into_response(self) -> Response {
        Response { status: self.0, body: self.1.into(), headers: self.2 }
    }
}
