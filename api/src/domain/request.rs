use std::{collections::BTreeMap, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Clone, Copy, Serialize, Debug, Deserialize, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
}
impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, PartialEq)]
pub struct HttpMethodParseError(pub String);
impl FromStr for HttpMethod {
    type Err = HttpMethodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "DELETE" => Ok(HttpMethod::DELETE),
            _ => Err(HttpMethodParseError(s.to_string())),
        }
    }
}

/// Request as submitted by the browser form. Every field is optional on the
/// wire so that missing values can be reported as a contract violation
/// instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct RequestInput {
    pub method: Option<String>,
    pub url: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub body: Option<String>,
}

/// A validated request, ready to hand to the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

impl TryFrom<RequestInput> for HttpRequest {
    type Error = ApiError;

    fn try_from(input: RequestInput) -> Result<Self, Self::Error> {
        let method = input.method.filter(|m| !m.is_empty());
        let url = input.url.filter(|u| !u.is_empty());
        let (Some(method), Some(url)) = (method, url) else {
            return Err(ApiError::MissingField);
        };
        let method = HttpMethod::from_str(&method)
            .map_err(|HttpMethodParseError(raw)| ApiError::UnsupportedMethod(raw))?;

        Ok(HttpRequest {
            method,
            url,
            headers: input.headers.unwrap_or_default(),
            body: input.body,
        })
    }
}
