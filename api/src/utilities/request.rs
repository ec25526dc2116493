use crate::domain::request::{HttpMethod, HttpRequest};
use reqwest::Method;

pub fn convert_http_method(input: HttpMethod) -> Method {
    match input {
        HttpMethod::GET => Method::GET,
        HttpMethod::POST => Method::POST,
        HttpMethod::PUT => Method::PUT,
        HttpMethod::DELETE => Method::DELETE,
    }
}

/// Only POST and PUT carry a body; it is dropped for every other method.
pub fn outbound_body(request: &HttpRequest) -> Option<&str> {
    match request.method {
        HttpMethod::POST | HttpMethod::PUT => request.body.as_deref(),
        HttpMethod::GET | HttpMethod::DELETE => None,
    }
}
