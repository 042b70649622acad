//! Per-request access log.

use std::time::Instant;

use tracing::info;

use super::{Next, Wrapper};
use crate::request::Request;

/// Logs one `info` event per request: latency, wire status, method and URI.
///
/// Wrappers ahead of it in the chain are outside its timing. A request they
/// reject is never logged.
pub fn logger() -> Wrapper {
    Wrapper::new(|req: Request, next: Next| async move {
        let start = Instant::now();
        let method = req.method();
        let uri = req.uri().clone();

        let res = next.run(req).await;

        info!(
            elapsed = ?start.elapsed(),
            status = res.wire_status().as_u16(),
            %method,
            %uri,
            "request"
        );
        res
    })
}
