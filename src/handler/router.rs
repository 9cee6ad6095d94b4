//! Request routing dispatch module
//!
//! Entry point for HTTP request processing. The router is an immutable
//! (method, path) lookup table built once at startup; anything it does not
//! know falls through to static asset serving and finally 404.

use crate::config::AppState;
use crate::handler::{routes, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// A route handler: a pure function producing a complete response
pub type Handler = fn() -> Response<Full<Bytes>>;

/// A registered route
pub struct Route {
    pub method: Method,
    pub path: &'static str,
    pub handler: Handler,
}

/// Immutable route table
///
/// Registered once at startup and never mutated afterward. Lookup is an
/// exact match on (method, path); HEAD requests match GET routes, mirroring
/// how GET handlers double as HEAD handlers in common web frameworks.
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: vec![
                Route {
                    method: Method::GET,
                    path: "/",
                    handler: routes::welcome,
                },
                Route {
                    method: Method::GET,
                    path: "/health",
                    handler: routes::health,
                },
                Route {
                    method: Method::GET,
                    path: "/users",
                    handler: routes::list_users,
                },
            ],
        }
    }

    /// Find the handler registered for (method, path)
    pub fn find(&self, method: &Method, path: &str) -> Option<Handler> {
        let lookup = if *method == Method::HEAD {
            &Method::GET
        } else {
            method
        };
        self.routes
            .iter()
            .find(|r| r.method == *lookup && r.path == path)
            .map(|r| r.handler)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = version_label(req.version());
    let is_head = method == Method::HEAD;

    let ctx = RequestContext {
        path: &path,
        is_head,
        if_none_match: req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };
    let referer = header_string(&req, "referer");
    let user_agent = header_string(&req, "user-agent");

    let mut response = dispatch(&method, &ctx, &state).await;

    // HEAD responses keep status and headers but never a body
    if is_head {
        let (parts, _) = response.into_parts();
        response = Response::from_parts(parts, Full::new(Bytes::new()));
    }

    apply_common_headers(&mut response, &state);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = http_version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method, path, and configuration
async fn dispatch(
    method: &Method,
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    // 1. Fixed route table (exact match)
    if let Some(handler) = state.router.find(method, ctx.path) {
        return handler();
    }

    // 2. Static asset fallback, GET/HEAD only
    if state.config.static_files.enabled && (*method == Method::GET || *method == Method::HEAD) {
        if let Some(resp) = static_files::try_serve(ctx, &state.config.static_files).await {
            return resp;
        }
    }

    // 3. Everything else, including wrong-method requests to known paths
    http::build_404_response()
}

/// Add Server and CORS headers configured for every response
fn apply_common_headers(response: &mut Response<Full<Bytes>>, state: &Arc<AppState>) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        headers.insert("Server", value);
    }
    if state.config.http.enable_cors {
        headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    }
}

fn header_string(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_registered_routes() {
        let router = Router::new();
        assert!(router.find(&Method::GET, "/").is_some());
        assert!(router.find(&Method::GET, "/health").is_some());
        assert!(router.find(&Method::GET, "/users").is_some());
    }

    #[test]
    fn test_head_matches_get_routes() {
        let router = Router::new();
        assert!(router.find(&Method::HEAD, "/health").is_some());
        assert!(router.find(&Method::HEAD, "/users").is_some());
    }

    #[test]
    fn test_unknown_path_misses() {
        let router = Router::new();
        assert!(router.find(&Method::GET, "/unknown").is_none());
        assert!(router.find(&Method::GET, "/users/1").is_none());
        // Exact match only, no trailing-slash normalization
        assert!(router.find(&Method::GET, "/health/").is_none());
    }

    #[test]
    fn test_wrong_method_misses() {
        let router = Router::new();
        assert!(router.find(&Method::POST, "/health").is_none());
        assert!(router.find(&Method::DELETE, "/users").is_none());
        assert!(router.find(&Method::PUT, "/").is_none());
    }

    #[test]
    fn test_lookup_is_stable() {
        let router = Router::new();
        let first = router.find(&Method::GET, "/users");
        let second = router.find(&Method::GET, "/users");
        assert_eq!(first.map(|h| h as usize), second.map(|h| h as usize));
    }

    fn test_state() -> Arc<AppState> {
        let cfg = crate::config::Config::load_from("no-such-config-file", None).unwrap();
        Arc::new(AppState::new(&cfg))
    }

    fn test_ctx(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_known_route() {
        let state = test_state();
        let resp = dispatch(&Method::GET, &test_ctx("/health"), &state).await;
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_path_is_404() {
        let state = test_state();
        let resp = dispatch(&Method::GET, &test_ctx("/nope"), &state).await;
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_dispatch_wrong_method_is_404() {
        let state = test_state();
        let resp = dispatch(&Method::POST, &test_ctx("/health"), &state).await;
        assert_eq!(resp.status(), 404);
        let resp = dispatch(&Method::DELETE, &test_ctx("/users"), &state).await;
        assert_eq!(resp.status(), 404);
    }
}
