//! Per-request tracing span with method, path, status and latency.

use std::net::SocketAddr;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use tracing::{Instrument, info, info_span};

use crate::router::Router;

/// Dispatches `req` through `router` inside an `http.request` span and logs
/// the outcome once the response is ready.
pub async fn traced<B>(
    router: &Router,
    req: http::Request<B>,
    peer: SocketAddr,
) -> http::Response<Full<Bytes>> {
    let span = info_span!(
        "http.request",
        method = %req.method(),
        path = %req.uri().path(),
        %peer,
    );

    async move {
        let started = Instant::now();
        let response = router.respond(req).await;
        info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        response
    }
    .instrument(span)
    .await
}
