//! API route handlers module
//!
//! Each handler is a pure function producing a fixed JSON payload. Payload
//! types serialize exactly to the documented response bodies.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::http::json_response;

/// Welcome message payload for `GET /`
#[derive(Debug, Serialize)]
struct Welcome {
    message: &'static str,
}

/// Health probe payload for `GET /health`
#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
}

/// User record for `GET /users`
#[derive(Debug, Serialize)]
pub struct User {
    pub id: u32,
    pub name: &'static str,
}

/// Fixed user listing, always returned in this order
const USERS: [User; 2] = [
    User {
        id: 1,
        name: "Alice",
    },
    User { id: 2, name: "Bob" },
];

/// `GET /` handler
pub fn welcome() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::OK,
        &Welcome {
            message: "Welcome! Use /health or /users",
        },
    )
}

/// `GET /health` handler
pub fn health() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &Health { status: "ok" })
}

/// `GET /users` handler
pub fn list_users() -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &USERS)
}
