//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path,
//! you get a handler.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::Full;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax, catch-alls `{*name}`;
    /// `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`. Routes are fixed at startup.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::GET, ..)`.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    /// Routes one request and produces one response. Unknown paths and
    /// methods answer `404 Not Found`.
    ///
    /// The request body is discarded before the handler runs.
    pub async fn respond<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>> {
        let (parts, _) = req.into_parts();
        let response = match self.lookup(&parts.method, parts.uri.path()) {
            Some((handler, params)) => handler.call(Request::new(&parts.uri, params)).await,
            None => Response::status(StatusCode::NOT_FOUND),
        };
        response.into_inner()
    }

    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or("none").to_owned()
    }

    async fn get(router: &Router, uri: &str) -> http::Response<Full<Bytes>> {
        router.respond(http::Request::get(uri).body(()).unwrap()).await
    }

    #[tokio::test]
    async fn captures_path_parameters() {
        use http_body_util::BodyExt;

        let router = Router::new().get("/container/{id}", echo_id);
        let response = get(&router, "/container/abc123").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"abc123");
    }

    #[tokio::test]
    async fn unknown_path_or_method_is_not_found() {
        let router = Router::new().get("/container/{id}", echo_id);
        assert_eq!(get(&router, "/nope").await.status(), StatusCode::NOT_FOUND);

        let post = http::Request::post("/container/abc").body(()).unwrap();
        assert_eq!(router.respond(post).await.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_routes_panic() {
        let _ = Router::new()
            .get("/container/{id}", echo_id)
            .get("/container/{name}", echo_id);
    }
}
