//! HTTP server and graceful shutdown.
//!
//! The server is the only part of restive that touches sockets. It reads
//! each request body into memory (up to [`MAX_BODY_BYTES`]), hands the
//! request to [`Api::dispatch`], and writes what comes back.
//!
//! On SIGTERM or Ctrl-C it stops accepting, lets every in-flight connection
//! finish, then returns from [`Server::serve`].

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::api::Api;
use crate::config::ServerConfig;
use crate::envelope::JsonError;
use crate::error::Error;
use crate::response::IntoResponse;

/// Request bodies larger than this are answered with `413`.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The HTTP server.
#[derive(Debug)]
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// ```rust
    /// use restive::Server;
    /// let server = Server::bind("0.0.0.0:3000").unwrap();
    /// ```
    pub fn bind(addr: &str) -> Result<Self, Error> {
        let addr = addr.parse().map_err(|_| Error::Addr(addr.to_owned()))?;
        Ok(Self { addr })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, Error> {
        Self::bind(&config.addr)
    }

    /// Serves `api` until SIGTERM or Ctrl-C, then drains and returns.
    pub async fn serve(self, api: Api) -> Result<(), Error> {
        self.serve_with_shutdown(api, shutdown_signal()).await
    }

    /// Serves `api` until `signal` resolves, then drains and returns.
    pub async fn serve_with_shutdown(
        self,
        api: Api,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        Self::run(listener, api, signal).await
    }

    /// Serves `api` on an already-bound listener.
    pub async fn run(
        listener: TcpListener,
        api: Api,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let api = Arc::new(api);
        info!(addr = %listener.local_addr()?, "restive listening");

        let mut tasks = tokio::task::JoinSet::new();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check shutdown first so a signal stops accepting immediately.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let api = Arc::clone(&api);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let api = Arc::clone(&api);
                            async move { dispatch(&api, req).await }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("restive stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Reads the body, then runs the request through the application. Every
/// failure becomes a JSON envelope, so hyper never sees an error.
///
/// A rejected body never reaches the wrapper chain, so it is logged here
/// with the same fields as [`logger`](crate::middleware::logger).
async fn dispatch(
    api: &Api,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let body = match read_body(body).await {
        Ok(body) => body,
        Err(rejection) => {
            info!(
                status = rejection.status.as_u16(),
                method = %parts.method,
                uri = %parts.uri,
                "request body rejected"
            );
            return Ok(rejection.into_response().into_http());
        }
    };

    Ok(api.dispatch(http::Request::from_parts(parts, body)).await)
}

/// Collects at most [`MAX_BODY_BYTES`] of `body`.
async fn read_body<B>(body: B) -> Result<Bytes, JsonError>
where
    B: hyper::body::Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            Err(JsonError::new(StatusCode::PAYLOAD_TOO_LARGE, "Request entity too large."))
        }
        Err(e) => {
            debug!(error = %e, "body read failed");
            Err(JsonError::new(StatusCode::BAD_REQUEST, "Bad request."))
        }
    }
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C only on Windows).
///
/// If a handler cannot be installed that arm never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
