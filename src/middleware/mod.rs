//! Middleware layer.
//!
//! A [`Wrapper`] sits between the server and a handler. It receives the
//! request together with [`Next`], the rest of the chain, and decides
//! whether, when and how to call it:
//!
//! ```rust,ignore
//! let timing = Wrapper::new(|req: Request, next: Next| async move {
//!     let start = Instant::now();
//!     let res = next.run(req).await;      // inner layers + handler
//!     debug!(elapsed = ?start.elapsed());
//!     res
//! });
//! ```
//!
//! # Ordering
//!
//! [`compose`] nests wrappers like an onion: the first wrapper in the list is
//! the outermost layer. It runs its pre-logic first and sees the final
//! response last.
//!
//! ```text
//! compose(h, [a, b, c])   →   a( b( c( h ) ) )
//!
//! request  ──► a ──► b ──► c ──► h
//! response ◄── a ◄── b ◄── c ◄──┘
//! ```
//!
//! A wrapper that returns without calling `next` short-circuits: no inner
//! wrapper and no handler runs. That is how
//! [`TokenAuthenticator::authorization_required`](crate::auth::TokenAuthenticator::authorization_required)
//! rejects requests.

mod logger;

use std::future::Future;
use std::sync::Arc;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;
use crate::response::{IntoResponse, Response};

pub use logger::logger;

// ── Next ──────────────────────────────────────────────────────────────────────

/// The remainder of a middleware chain: inner wrappers plus the handler.
#[derive(Clone)]
pub struct Next(BoxedHandler);

impl Next {
    /// Runs the rest of the chain.
    pub async fn run(self, req: Request) -> Response {
        self.0.call(req).await
    }
}

// ── Wrapper ───────────────────────────────────────────────────────────────────

#[doc(hidden)]
pub trait ErasedWrapper {
    fn wrap(&self, req: Request, next: Next) -> BoxFuture;
}

struct FnWrapper<F>(F);

impl<F, Fut, R> ErasedWrapper for FnWrapper<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn wrap(&self, req: Request, next: Next) -> BoxFuture {
        let fut = (self.0)(req, next);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// A middleware function, type-erased and cheap to clone.
#[derive(Clone)]
pub struct Wrapper(Arc<dyn ErasedWrapper + Send + Sync + 'static>);

impl Wrapper {
    /// Wraps any `Fn(Request, Next) -> impl Future<Output = impl IntoResponse>`.
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse + Send + 'static,
    {
        Self(Arc::new(FnWrapper(f)))
    }
}

impl std::fmt::Debug for Wrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Wrapper")
    }
}

// ── Composition ───────────────────────────────────────────────────────────────

/// One wrapper bound to the chain beneath it.
struct Layer {
    wrapper: Wrapper,
    inner: BoxedHandler,
}

impl ErasedHandler for Layer {
    fn call(&self, req: Request) -> BoxFuture {
        self.wrapper.0.wrap(req, Next(Arc::clone(&self.inner)))
    }
}

/// Builds a single handler from `terminal` and `wrappers`.
///
/// With no wrappers the terminal handler is returned as-is. Otherwise the
/// list is folded from the back, so `wrappers[0]` ends up outermost.
pub fn compose(terminal: BoxedHandler, wrappers: &[Wrapper]) -> BoxedHandler {
    wrappers.iter().rev().fold(terminal, |inner, wrapper| {
        Arc::new(Layer { wrapper: wrapper.clone(), inner })
    })
}
