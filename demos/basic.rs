//! Minimal restive example: an open resource, a guarded resource and a
//! token endpoint.
//!
//! Run with (keys from `tests/fixtures`, or your own):
//!   RESTIVE_PRIVATE_KEY=tests/fixtures/private.pem \
//!   RESTIVE_PUBLIC_KEY=tests/fixtures/public.pem \
//!   cargo run --example basic
//!
//! Try:
//!   curl http://localhost:8080/ping
//!   curl -X DELETE http://localhost:8080/ping          # 405
//!   curl -X POST http://localhost:8080/token \
//!        -d '{"username":"username","password":"password"}'
//!   curl http://localhost:8080/notes/1 -H "Authorization: <access_token>"

use http::{HeaderValue, StatusCode, header};
use restive::auth::{DefaultValidator, TokenAuthenticator};
use restive::config::{AuthConfig, ServerConfig};
use restive::{Api, Body, JsonError, JsonMessage, Request, Resource, Response, Server, middleware};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), restive::Error> {
    tracing_subscriber::fmt::init();

    let auth = TokenAuthenticator::from_config(&AuthConfig::from_env()?, DefaultValidator)?;

    let ping = Resource::new().get(ping);
    let notes = Resource::new().get(get_note).put(put_note);

    let api = Api::new(vec![middleware::logger()])
        .resource("/ping", ping, &[])?
        .resource("/token", auth.resource(), &[])?
        .resource("/notes/{id}", notes, &[auth.authorization_required()])?;

    Server::from_config(&ServerConfig::from_env())?.serve(api).await
}

// GET /ping
async fn ping(_req: Request) -> JsonMessage {
    JsonMessage::new(StatusCode::OK, "pong")
}

// GET /notes/{id}
async fn get_note(req: Request) -> Response {
    match req.param("id") {
        Some("1") => Response::builder()
            .header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .body(Body::data(json!({"id": 1, "text": "buy milk"}))),
        _ => JsonError::new(StatusCode::NOT_FOUND, "No such note.").into(),
    }
}

// PUT /notes/{id}
async fn put_note(req: Request) -> Response {
    match serde_json::from_slice::<serde_json::Value>(req.body()) {
        Ok(note) => Response::new(StatusCode::OK, Body::data(note)),
        Err(_) => JsonError::new(StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable entity.").into(),
    }
}
