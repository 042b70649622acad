//! # restive
//!
//! A minimal resource-oriented JSON API framework with stateless token auth.
//!
//! ## The model
//!
//! - A **handler** turns a request into a status, a body and headers.
//! - A **wrapper** (middleware) gets the request and the rest of the chain,
//!   and decides whether and how to call it. Wrappers nest like an onion.
//! - A **resource** is one path with handlers for any of GET, POST, PUT,
//!   DELETE, HEAD and PATCH. The verbs it leaves out answer `405`.
//! - Every response is a JSON **envelope** with its status inside:
//!   `{"status": 200, "data": …}`, `{"status": 403, "error": "…"}`.
//! - The **token authenticator** trades credentials for RS256-signed tokens
//!   and guards resources through a wrapper. No sessions are stored.
//!
//! TLS, rate limiting and body-size policy beyond a 1 MiB cap belong to the
//! reverse proxy in front.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use restive::auth::{DefaultValidator, TokenAuthenticator};
//! use restive::config::AuthConfig;
//! use restive::{Api, Body, Request, Resource, Server, middleware};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), restive::Error> {
//!     let auth = TokenAuthenticator::from_config(&AuthConfig::from_env()?, DefaultValidator)?;
//!
//!     let notes = Resource::new().get(list_notes);
//!
//!     let api = Api::new(vec![middleware::logger()])
//!         .resource("/token", auth.resource(), &[])?
//!         .resource("/notes", notes, &[auth.authorization_required()])?;
//!
//!     Server::bind("0.0.0.0:3000")?.serve(api).await
//! }
//!
//! async fn list_notes(_req: Request) -> (StatusCode, Body) {
//!     (StatusCode::OK, Body::data(vec!["buy milk"]))
//! }
//! ```

mod api;
mod envelope;
mod error;
mod handler;
mod method;
mod request;
mod resource;
mod response;
mod router;
mod server;

pub mod auth;
pub mod config;
pub mod middleware;

pub use api::Api;
pub use envelope::{Body, JsonData, JsonError, JsonMessage, StatusResponse};
pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
pub use method::Method;
pub use request::Request;
pub use resource::Resource;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use server::{MAX_BODY_BYTES, Server};
