//! JSON response envelopes.
//!
//! Every response restive writes is a JSON object carrying a numeric
//! `status` next to its payload:
//!
//! ```text
//! {"status": 200, "data": …}        ← JsonData, or any plain serializable value
//! {"status": 404, "error": "…"}     ← JsonError
//! {"status": 202, "message": "…"}   ← JsonMessage
//! ```
//!
//! A body that already knows its own status (it implements
//! [`StatusResponse`]) is written as-is and its status is the one that goes on
//! the wire. Anything else is wrapped in a [`JsonData`] using the status the
//! handler returned.

use http::StatusCode;
use serde::{Serialize, Serializer};

// ── StatusResponse ────────────────────────────────────────────────────────────

/// A body that describes its own HTTP status.
pub trait StatusResponse {
    fn status(&self) -> StatusCode;
}

// ── Canonical shapes ──────────────────────────────────────────────────────────

/// `{"status": <code>, "error": "<text>"}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JsonError {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub error: String,
}

impl JsonError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into() }
    }
}

/// `{"status": <code>, "message": "<text>"}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JsonMessage {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub message: String,
}

impl JsonMessage {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

/// `{"status": <code>, "data": <T>}`
#[derive(Clone, Debug, Serialize)]
pub struct JsonData<T> {
    #[serde(serialize_with = "serialize_status")]
    pub status: StatusCode,
    pub data: T,
}

impl<T> JsonData<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        Self { status, data }
    }
}

impl StatusResponse for JsonError {
    fn status(&self) -> StatusCode { self.status }
}

impl StatusResponse for JsonMessage {
    fn status(&self) -> StatusCode { self.status }
}

impl<T> StatusResponse for JsonData<T> {
    fn status(&self) -> StatusCode { self.status }
}

fn serialize_status<S: Serializer>(status: &StatusCode, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u16(status.as_u16())
}

// ── Body ──────────────────────────────────────────────────────────────────────

/// Object-safe view of a response body. Serialization is deferred until the
/// adapter writes the response, so a failing `Serialize` impl surfaces there.
trait ErasedBody: Send {
    fn own_status(&self) -> Option<StatusCode>;
    fn render(&self, status: StatusCode) -> serde_json::Result<Vec<u8>>;
}

/// Plain data; wrapped in `{status, data}` when rendered.
struct Data<T>(T);

/// A self-describing envelope; rendered unchanged.
struct Enveloped<T>(T);

impl<T: Serialize + Send> ErasedBody for Data<T> {
    fn own_status(&self) -> Option<StatusCode> { None }

    fn render(&self, status: StatusCode) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&JsonData::new(status, &self.0))
    }
}

impl<T: Serialize + StatusResponse + Send> ErasedBody for Enveloped<T> {
    fn own_status(&self) -> Option<StatusCode> { Some(self.0.status()) }

    fn render(&self, _status: StatusCode) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.0)
    }
}

/// The body half of a handler's reply.
///
/// Build one from any serializable value with [`Body::data`], or convert one
/// of the canonical envelopes with `.into()`.
pub struct Body(Box<dyn ErasedBody>);

impl Body {
    /// Arbitrary data. Rendered as `{"status": <handler status>, "data": value}`.
    pub fn data<T: Serialize + Send + 'static>(value: T) -> Self {
        Self(Box::new(Data(value)))
    }

    /// A value that carries its own status. Rendered unchanged.
    pub fn envelope<T: Serialize + StatusResponse + Send + 'static>(value: T) -> Self {
        Self(Box::new(Enveloped(value)))
    }

    /// `null` data.
    pub fn empty() -> Self {
        Self::data(())
    }

    /// The body's own status, if it is self-describing.
    pub fn status(&self) -> Option<StatusCode> {
        self.0.own_status()
    }

    /// Normalizes the body into its wire form.
    ///
    /// Returns the status to write and the pretty-printed JSON bytes. A
    /// self-describing body overrides `status` with its own.
    pub fn normalize(&self, status: StatusCode) -> serde_json::Result<(StatusCode, Vec<u8>)> {
        let status = self.0.own_status().unwrap_or(status);
        let bytes = self.0.render(status)?;
        Ok((status, bytes))
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body").field("status", &self.status()).finish_non_exhaustive()
    }
}

impl From<JsonError> for Body {
    fn from(e: JsonError) -> Self { Self::envelope(e) }
}

impl From<JsonMessage> for Body {
    fn from(m: JsonMessage) -> Self { Self::envelope(m) }
}

impl<T: Serialize + Send + 'static> From<JsonData<T>> for Body {
    fn from(d: JsonData<T>) -> Self { Self::envelope(d) }
}

impl From<serde_json::Value> for Body {
    fn from(v: serde_json::Value) -> Self { Self::data(v) }
}

impl From<String> for Body {
    fn from(s: String) -> Self { Self::data(s) }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self { Self::data(s) }
}

impl From<()> for Body {
    fn from((): ()) -> Self { Self::empty() }
}
