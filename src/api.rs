//! The application: routes, resources and the middleware around them.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use tracing::debug;

use crate::envelope::JsonError;
use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{Wrapper, compose};
use crate::request::Request;
use crate::resource::Resource;
use crate::response::{IntoResponse, Response};
use crate::router::{Lookup, Routes};

/// The application.
///
/// Holds the route table and the global wrapper list. Build it once at
/// startup, then hand it to [`Server::serve`](crate::Server::serve).
///
/// ```rust,ignore
/// let api = Api::new(vec![middleware::logger()])
///     .resource("/token", auth.resource(), &[])?
///     .resource("/notes/{id}", notes, &[auth.authorization_required()])?
///     .route(Method::Get, "/ping", ping)?;
/// ```
pub struct Api {
    routes: Routes,
    wrappers: Vec<Wrapper>,
    method_not_allowed: BoxedHandler,
    not_found: BoxedHandler,
}

impl Api {
    /// Creates an application whose resources all run inside `wrappers`.
    ///
    /// The canned 405 and 404 handlers are composed with the same list here,
    /// once, and shared by every route that needs them.
    pub fn new(wrappers: Vec<Wrapper>) -> Self {
        let method_not_allowed = compose(not_allowed.into_boxed_handler(), &wrappers);
        let not_found = compose(page_not_found.into_boxed_handler(), &wrappers);
        Self { routes: Routes::default(), wrappers, method_not_allowed, not_found }
    }

    /// Replaces the handler used when no route matches the path.
    pub fn not_found(mut self, handler: impl Handler) -> Self {
        self.not_found = compose(handler.into_boxed_handler(), &self.wrappers);
        self
    }

    /// Registers a single handler for a method + path pair.
    ///
    /// The handler is registered as given; global wrappers are not applied.
    pub fn route(mut self, method: Method, path: &str, handler: impl Handler) -> Result<Self, Error> {
        self.routes.insert(method, path, handler.into_boxed_handler())?;
        Ok(self)
    }

    /// Registers `resource` at `path` for all six resource verbs.
    ///
    /// Each implemented verb runs inside `wrappers` followed by the global
    /// wrappers. Verbs the resource leaves empty get the shared
    /// method-not-allowed handler.
    pub fn resource(mut self, path: &str, resource: Resource, wrappers: &[Wrapper]) -> Result<Self, Error> {
        let chain: Vec<Wrapper> = wrappers.iter().chain(&self.wrappers).cloned().collect();

        for method in Method::RESOURCE {
            let handler = match resource.handler(method) {
                Some(h) => compose(h.clone(), &chain),
                None => self.method_not_allowed.clone(),
            };
            self.routes.insert(method, path, handler)?;
        }
        debug!(path, allowed = ?resource.allowed(), "resource registered");
        Ok(self)
    }

    /// Runs one request through the application and renders the response.
    pub async fn dispatch(&self, req: http::Request<Bytes>) -> http::Response<Full<Bytes>> {
        self.respond(req).await.into_http()
    }

    /// Runs one request through the application, without rendering.
    pub async fn respond(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();

        let Ok(method) = Method::try_from(&parts.method) else {
            debug!(method = %parts.method, "unknown method");
            return not_allowed_error(parts.method.as_str()).into_response();
        };

        let (handler, params) = match self.routes.lookup(method, parts.uri.path()) {
            Lookup::Found(handler, params) => (handler, params),
            Lookup::MethodNotAllowed => (self.method_not_allowed.clone(), Default::default()),
            Lookup::NotFound => (self.not_found.clone(), Default::default()),
        };

        handler.call(Request::new(method, parts.uri, parts.headers, body, params)).await
    }
}

// ── Canned handlers ───────────────────────────────────────────────────────────

fn not_allowed_error(method: &str) -> JsonError {
    JsonError::new(StatusCode::METHOD_NOT_ALLOWED, format!("{method} method not allowed."))
}

async fn not_allowed(req: Request) -> JsonError {
    not_allowed_error(req.method().as_str())
}

async fn page_not_found(_req: Request) -> JsonError {
    JsonError::new(StatusCode::NOT_FOUND, "Page not found.")
}
