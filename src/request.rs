//! Incoming HTTP request type.

use std::collections::HashMap;

use http::Uri;

/// What a handler sees of an incoming request: the decoded query string and
/// the path parameters captured by the router.
///
/// Method and path are settled by routing; the body is not kept. Every
/// route of this service is a `GET`.
pub struct Request {
    query: HashMap<String, String>,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(uri: &Uri, params: HashMap<String, String>) -> Self {
        let query = uri.query().map(parse_query).unwrap_or_default();
        Self { query, params }
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/container/{id}`, `req.param("id")` on `/container/abc`
    /// returns `Some("abc")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns a decoded query parameter. When a key repeats, the first
    /// occurrence wins.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

fn parse_query(raw: &str) -> HashMap<String, String> {
    let mut query = HashMap::new();
    for (k, v) in url::form_urlencoded::parse(raw.as_bytes()) {
        query.entry(k.into_owned()).or_insert_with(|| v.into_owned());
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> Request {
        Request::new(&uri.parse().unwrap(), HashMap::new())
    }

    #[test]
    fn decodes_query_parameters() {
        let req = request("/containers?filter=running&name=a%20b");
        assert_eq!(req.query("filter"), Some("running"));
        assert_eq!(req.query("name"), Some("a b"));
        assert_eq!(req.query("page"), None);
    }

    #[test]
    fn first_repeated_key_wins() {
        let req = request("/container-logs/x?page=2&page=5");
        assert_eq!(req.query("page"), Some("2"));
    }

    #[test]
    fn empty_value_is_present() {
        let req = request("/container-logs/x?page=");
        assert_eq!(req.query("page"), Some(""));
    }
}
